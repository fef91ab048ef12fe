pub mod error;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
#[cfg(test)]
use mockall::automock;
use reqwest::Method;
use serde_json::Value;

use crate::api_client::ApiClient;

use {error::*, models::*};

#[cfg(test)]
mod test;

pub const TRAINING_FILE_FIELD: &'static str = "file";

pub type DynPredictionModelService = Arc<dyn PredictionModelService + Send + Sync>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PredictionModelService {
    ///
    /// Uploads historical withdrawal data and returns the backend's
    /// training metadata as-is.
    ///
    async fn train_model(&self, file_name: &str, contents: Vec<u8>) -> Result<Value>;
    async fn predict(&self, current_date: NaiveDate, days: u32) -> Result<PredictionResponse>;
}

pub struct ApiPredictionModelService {
    client: ApiClient,
}

impl ApiPredictionModelService {
    pub fn new_dyn(client: ApiClient) -> DynPredictionModelService {
        Arc::new(Self { client })
    }
}

#[async_trait]
impl PredictionModelService for ApiPredictionModelService {
    async fn train_model(&self, file_name: &str, contents: Vec<u8>) -> Result<Value> {
        if contents.is_empty() {
            return Err(Error::EmptyTrainingFile(file_name.to_string()));
        }
        let size = contents.len();
        let res = self.client.upload("/model/train", TRAINING_FILE_FIELD, file_name, contents).await?;
        info!("Uploaded {} ({} bytes) for model training", file_name, size);
        Ok(serde_json::from_str(&res.body)?)
    }

    async fn predict(&self, current_date: NaiveDate, days: u32) -> Result<PredictionResponse> {
        if days == 0 {
            return Err(Error::InvalidHorizon);
        }
        let body = PredictionRequestModel { current_date, days };
        Ok(self.client.send_json(Method::POST, "/model/predict", &body).await?)
    }
}
