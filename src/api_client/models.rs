use reqwest::Method;
use serde::{Deserialize, Serialize};

///
/// A fully-resolved outbound call: absolute URL, optional bearer credential
/// and the body in its wire shape.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Serialized JSON text
    Json(String),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// Single-file multipart payload
    Multipart { field: String, file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponseModel {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequestModel {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}
