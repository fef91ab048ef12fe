use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;

use crate::{
    api_client::{
        error::Error as ApiError,
        models::{ApiRequest, ApiResponse, RequestBody},
        ApiClient, MockHttpTransport,
    },
    session::{MemoryTokenStore, Session, TokenStore},
};

use super::{error::Error, ApiPredictionModelService, PredictionModelService};

const TEST_PREDICTION_JSON: &str = r#"{
    "total_predicted_amount": 30500.5,
    "message": "Prediction generated",
    "daily_predictions": [
        {"day_number": 1, "date": "2024-02-02", "predicted_withdrawal": 15000.0, "running_total": 15000.0},
        {"day_number": 2, "date": "2024-02-03", "predicted_withdrawal": 15500.5, "running_total": 30500.5}
    ],
    "prediction_date": "2024-02-01",
    "days_requested": 2
}"#;

fn create_test_service(transport: MockHttpTransport) -> anyhow::Result<ApiPredictionModelService> {
    let store = MemoryTokenStore::new_dyn();
    store.save("vault_mgr")?;
    let client = ApiClient::new("http://backend.test/api/v1", Arc::new(transport), Session::restore(store)?);
    Ok(ApiPredictionModelService { client })
}

#[tokio::test]
async fn test_train_model_uploads_multipart_with_credential() -> anyhow::Result<()> {
    let mut transport = MockHttpTransport::new();
    transport.expect_send()
        .withf(|req: &ApiRequest| {
            req.method == Method::POST
                && req.url == "http://backend.test/api/v1/model/train"
                && req.bearer.as_deref() == Some("vault_mgr")
                && req.body == RequestBody::Multipart {
                    field: String::from("file"),
                    file_name: String::from("history.csv"),
                    bytes: b"date,amount\n2024-01-01,100\n".to_vec(),
                }
        })
        .times(1)
        .returning(|_| Ok(ApiResponse { status: 200, body: String::from(r#"{"rows": 1, "status": "trained"}"#) }));

    let svc = create_test_service(transport)?;
    let meta = svc.train_model("history.csv", b"date,amount\n2024-01-01,100\n".to_vec()).await?;

    assert_eq!("trained", meta["status"]);
    Ok(())
}

#[tokio::test]
async fn test_train_model_rejects_empty_file() -> anyhow::Result<()> {
    let svc = create_test_service(MockHttpTransport::new())?;
    let res = svc.train_model("empty.csv", vec![]).await;

    assert!(matches!(res, Err(Error::EmptyTrainingFile(_))));
    Ok(())
}

#[tokio::test]
async fn test_train_model_failure_is_reported() -> anyhow::Result<()> {
    let mut transport = MockHttpTransport::new();
    transport.expect_send()
        .returning(|_| Ok(ApiResponse { status: 422, body: String::new() }));

    let svc = create_test_service(transport)?;
    let res = svc.train_model("history.csv", b"bad".to_vec()).await;

    assert!(matches!(res, Err(Error::ApiError(ApiError::TrainingFailed(422)))));
    Ok(())
}

#[tokio::test]
async fn test_predict_posts_date_and_horizon() -> anyhow::Result<()> {
    let mut transport = MockHttpTransport::new();
    transport.expect_send()
        .withf(|req: &ApiRequest| match &req.body {
            RequestBody::Json(text) => {
                let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
                req.url.ends_with("/model/predict")
                    && body["current_date"] == "2024-02-01"
                    && body["days"] == 2
            }
            _ => false,
        })
        .times(1)
        .returning(|_| Ok(ApiResponse { status: 200, body: TEST_PREDICTION_JSON.to_string() }));

    let svc = create_test_service(transport)?;
    let prediction = svc.predict(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 2).await?;

    assert_eq!(2, prediction.daily_predictions.len());
    assert_eq!(30500.5, prediction.daily_predictions[1].running_total);
    assert_eq!(2, prediction.days_requested);
    Ok(())
}

#[tokio::test]
async fn test_predict_rejects_zero_days() -> anyhow::Result<()> {
    let svc = create_test_service(MockHttpTransport::new())?;
    assert!(matches!(svc.predict(NaiveDate::default(), 0).await, Err(Error::InvalidHorizon)));
    Ok(())
}
