pub mod error;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
#[cfg(test)]
use mockall::automock;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client, Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::session::{
    models::{Role, User},
    DynSession,
};

use {error::*, models::*};


pub type DynHttpTransport = Arc<dyn HttpTransport + Send + Sync>;

///
/// The wire seam of the client. Implementations only move bytes;
/// status interpretation happens in `ApiClient`.
///
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new_dyn(client: Client) -> DynHttpTransport {
        Arc::new(ReqwestTransport { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.client.request(req.method, &req.url);
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(text) => builder.header(CONTENT_TYPE, "application/json").body(text),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { field, file_name, bytes } => {
                builder.multipart(Form::new().part(field, Part::bytes(bytes).file_name(file_name)))
            }
        };

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(ApiResponse { status, body })
    }
}

///
/// Single point of contact with the backend. Attaches the session's bearer
/// credential, maps non-success statuses onto `Error`, and clears the
/// session when the backend answers 401.
///
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: DynHttpTransport,
    session: DynSession,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: DynHttpTransport, session: DynSession) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &DynSession {
        &self.session
    }

    fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        if query.is_empty() {
            return Ok(url);
        }
        Url::parse_with_params(&url, query)
            .map(|url| url.to_string())
            .map_err(|_| Error::UrlError(url))
    }

    ///
    /// Issues a call through the generic path and returns the raw response
    /// once it is known to be successful.
    ///
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: RequestBody,
    ) -> Result<ApiResponse> {
        let req = ApiRequest {
            method,
            url: self.url(endpoint, query)?,
            bearer: self.session.token(),
            body,
        };

        let res = match self.transport.send(req).await {
            Ok(res) => res,
            Err(e) => {
                error!("API request failed: {}. Error: {}", endpoint, e);
                return Err(e);
            }
        };

        if res.is_success() {
            return Ok(res);
        }

        error!("API request failed: {}. StatusCode: {}", endpoint, res.status);
        if res.status == 401 {
            if let Err(e) = self.logout() {
                error!("Could not clear session after 401: {}", e);
            }
            return Err(Error::AuthenticationRequired);
        }
        Err(Error::StatusCodeError(res.status))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let res = self.execute(Method::GET, endpoint, query, RequestBody::Empty).await?;
        Ok(serde_json::from_str::<T>(&res.body)?)
    }

    pub async fn send_json<B, T>(&self, method: Method, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_string(body)?);
        let res = self.execute(method, endpoint, &[], body).await?;
        Ok(serde_json::from_str::<T>(&res.body)?)
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.execute(Method::DELETE, endpoint, &[], RequestBody::Empty).await?;
        Ok(())
    }

    ///
    /// Exchanges credentials for a token. The token is held in memory and
    /// persisted; the returned user's role comes from the fixed login table.
    ///
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let req = ApiRequest {
            method: Method::POST,
            url: self.url("/token", &[])?,
            bearer: None,
            body: RequestBody::Form(vec![
                (String::from("username"), username.to_string()),
                (String::from("password"), password.to_string()),
            ]),
        };

        let res = self.transport.send(req).await.map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;
        if !res.is_success() {
            error!("Login failed. StatusCode: {}", res.status);
            return Err(Error::InvalidCredentials);
        }

        let body = serde_json::from_str::<LoginResponseModel>(&res.body)?;
        let token = body.access_token
            .filter(|token| !token.is_empty())
            .unwrap_or(username.to_string());
        self.session.establish(&token)?;
        info!("Logged in as {}", username);

        Ok(User {
            username: username.to_string(),
            role: Role::from_login_id(username),
            token,
        })
    }

    pub fn logout(&self) -> Result<()> {
        Ok(self.session.clear()?)
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<serde_json::Value> {
        let body = RegisterRequestModel {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.label().to_string(),
        };
        self.send_json(Method::POST, "/register", &body).await
    }

    ///
    /// Sends a single file as multipart, outside the generic JSON path.
    /// The credential is still attached. Any non-success is a training failure.
    ///
    pub async fn upload(&self, endpoint: &str, field: &str, file_name: &str, bytes: Vec<u8>) -> Result<ApiResponse> {
        let req = ApiRequest {
            method: Method::POST,
            url: self.url(endpoint, &[])?,
            bearer: self.session.token(),
            body: RequestBody::Multipart {
                field: field.to_string(),
                file_name: file_name.to_string(),
                bytes,
            },
        };

        let res = self.transport.send(req).await?;
        if !res.is_success() {
            error!("Upload to {} failed. StatusCode: {}", endpoint, res.status);
            return Err(Error::TrainingFailed(res.status));
        }
        Ok(res)
    }
}
