use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    api_client::{
        models::{ApiRequest, ApiResponse},
        ApiClient, MockHttpTransport,
    },
    session::{MemoryTokenStore, Session},
};

use super::{error::Error, AnalyticsService, ApiAnalyticsService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_test_service(transport: MockHttpTransport) -> anyhow::Result<ApiAnalyticsService> {
    let session = Session::restore(MemoryTokenStore::new_dyn())?;
    let client = ApiClient::new("http://backend.test", Arc::new(transport), session);
    Ok(ApiAnalyticsService { client })
}

#[tokio::test]
async fn test_machine_analytics_sends_date_range() -> anyhow::Result<()> {
    let mut transport = MockHttpTransport::new();
    transport.expect_send()
        .withf(|req: &ApiRequest| {
            req.url == "http://backend.test/analytics/atm/ATM003?start_date=2024-01-01&end_date=2024-01-07"
        })
        .times(1)
        .returning(|_| Ok(ApiResponse { status: 200, body: String::from(r#"{"withdrawals": [1, 2]}"#) }));

    let svc = create_test_service(transport)?;
    let res = svc.machine_analytics("ATM003", date(2024, 1, 1), date(2024, 1, 7)).await?;

    assert_eq!(Some(2), res["withdrawals"].as_array().map(|a| a.len()));
    Ok(())
}

#[tokio::test]
async fn test_network_analytics_passes_payload_through() -> anyhow::Result<()> {
    let mut transport = MockHttpTransport::new();
    transport.expect_send()
        .withf(|req: &ApiRequest| req.url.starts_with("http://backend.test/analytics/network?"))
        .times(1)
        .returning(|_| Ok(ApiResponse { status: 200, body: String::from(r#"{"anything": {"nested": true}}"#) }));

    let svc = create_test_service(transport)?;
    let res = svc.network_analytics(date(2024, 1, 1), date(2024, 1, 1)).await?;

    assert_eq!(true, res["anything"]["nested"]);
    Ok(())
}

#[tokio::test]
async fn test_inverted_range_is_rejected_locally() -> anyhow::Result<()> {
    let svc = create_test_service(MockHttpTransport::new())?;
    let res = svc.network_analytics(date(2024, 2, 1), date(2024, 1, 1)).await;

    assert!(matches!(res, Err(Error::InvalidRange(_, _))));
    Ok(())
}
