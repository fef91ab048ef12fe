pub mod error;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Method;

use crate::{api_client::ApiClient, session::models::Role};

use {error::*, models::*};


pub type DynRefillRequestService = Arc<dyn RefillRequestService + Send + Sync>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RefillRequestService {
    async fn create_request(&self, atm_id: &str, requested_amount: f64, comment: Option<String>) -> Result<RefillRequest>;
    /// Lists requests, optionally narrowed to a single status.
    async fn list_requests(&self, status_filter: Option<RefillStatus>) -> Result<Vec<RefillRequest>>;
    async fn act_on_request(&self, request_id: &str, action: RefillAction, comment: Option<String>) -> Result<RefillRequest>;
}

pub struct ApiRefillRequestService {
    client: ApiClient,
}

impl ApiRefillRequestService {
    pub fn new_dyn(client: ApiClient) -> DynRefillRequestService {
        Arc::new(Self { client })
    }
}

#[async_trait]
impl RefillRequestService for ApiRefillRequestService {
    async fn create_request(&self, atm_id: &str, requested_amount: f64, comment: Option<String>) -> Result<RefillRequest> {
        if !(requested_amount > 0.0) {
            return Err(Error::InvalidAmount(requested_amount));
        }
        let body = CreateRefillRequestModel {
            atm_id: atm_id.to_string(),
            requested_amount,
            comment: comment.unwrap_or_default(),
        };
        Ok(self.client.send_json(Method::POST, "/refill-requests", &body).await?)
    }

    async fn list_requests(&self, status_filter: Option<RefillStatus>) -> Result<Vec<RefillRequest>> {
        let requests = match status_filter {
            Some(status) => self.client.get("/refill-requests", &[("status_filter", status.as_str())]).await?,
            None => self.client.get("/refill-requests", &[]).await?,
        };
        Ok(requests)
    }

    async fn act_on_request(&self, request_id: &str, action: RefillAction, comment: Option<String>) -> Result<RefillRequest> {
        let body = RefillActionModel { action, comment: comment.unwrap_or_default() };
        Ok(self.client.send_json(Method::POST, &format!("/refill-requests/{}/action", request_id), &body).await?)
    }
}

///
/// Whether `role` may approve or reject `request`. Only pending requests
/// can be acted on. The backend still enforces its own rules.
///
pub fn can_act_on(role: Role, request: &RefillRequest) -> bool {
    request.status == RefillStatus::Pending && role.can_approve_refill_requests()
}
