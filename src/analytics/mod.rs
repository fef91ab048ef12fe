use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::api_client::ApiClient;

use error::*;

pub mod error;

#[cfg(test)]
mod test;

pub type DynAnalyticsService = Arc<dyn AnalyticsService + Send + Sync>;

///
/// Read-only analytics. Payload shapes are owned by the backend and
/// passed through untouched.
///
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnalyticsService {
    async fn machine_analytics(&self, atm_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Value>;
    async fn network_analytics(&self, start: NaiveDate, end: NaiveDate) -> Result<Value>;
}

pub struct ApiAnalyticsService {
    client: ApiClient,
}

impl ApiAnalyticsService {
    pub fn new_dyn(client: ApiClient) -> DynAnalyticsService {
        Arc::new(Self { client })
    }

    async fn get_range(&self, endpoint: &str, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        if start > end {
            return Err(Error::InvalidRange(start, end));
        }
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        Ok(self.client.get(endpoint, &[("start_date", start.as_str()), ("end_date", end.as_str())]).await?)
    }
}

#[async_trait]
impl AnalyticsService for ApiAnalyticsService {
    async fn machine_analytics(&self, atm_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        self.get_range(&format!("/analytics/atm/{}", atm_id), start, end).await
    }

    async fn network_analytics(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        self.get_range("/analytics/network", start, end).await
    }
}
