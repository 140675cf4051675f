//! Wire models for the OpenBlu REST API
//!
//! Every response carries a `success` flag and a `response_code`. Successful
//! responses add a payload (`servers` or `server`), failed ones an `error`
//! object.

use crate::error::OpenBluError;
use crate::types::{ServerInfo, ServerRecord};
use serde::{Deserialize, Serialize};

/// Fields shared by every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub success: bool,
    pub response_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// Error object of a failed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub message: String,
    /// "CLIENT" or "SERVER"
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl ApiErrorBody {
    /// Message followed by the API error code and type,
    /// e.g. `boom (code 17, SERVER)`
    pub fn describe(&self) -> String {
        let tag = if self.kind.is_empty() {
            format!("code {}", self.error_code)
        } else {
            format!("code {}, {}", self.error_code, self.kind)
        };
        if self.message.is_empty() {
            format!("({})", tag)
        } else {
            format!("{} ({})", self.message, tag)
        }
    }
}

/// Payload of `servers/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub servers: Vec<ServerRecord>,
}

/// Payload of `servers/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoResponse {
    pub server: ServerInfo,
}

/// Which endpoint produced a failure; decides how 404 is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListServers,
    ServerInfo { id: String },
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ListServers => "servers/list",
            Endpoint::ServerInfo { .. } => "servers/get",
        }
    }
}

/// Map an unsuccessful status code to an error kind.
pub fn status_error(endpoint: &Endpoint, code: u16, message: impl Into<String>) -> OpenBluError {
    let message = message.into();
    match (code, endpoint) {
        (401 | 403, _) => OpenBluError::Auth(if message.is_empty() {
            "The API rejected the access key".to_string()
        } else {
            message
        }),
        (404, Endpoint::ServerInfo { id }) => OpenBluError::NotFound(id.clone()),
        _ => OpenBluError::Api { code, message },
    }
}

impl ApiStatus {
    /// Turn a failed envelope into an error, `Ok(())` when successful.
    pub fn check(&self, endpoint: &Endpoint) -> crate::Result<()> {
        if self.success {
            return Ok(());
        }
        let message = self
            .error
            .as_ref()
            .map(ApiErrorBody::describe)
            .unwrap_or_default();
        Err(status_error(endpoint, self.response_code, message))
    }
}

/// Decode a response body for `endpoint` into its payload type.
pub fn decode<T: serde::de::DeserializeOwned>(endpoint: &Endpoint, body: &str) -> crate::Result<T> {
    let status: ApiStatus = serde_json::from_str(body).map_err(|e| {
        OpenBluError::Parse(format!("Malformed response from {}: {}", endpoint.path(), e))
    })?;
    status.check(endpoint)?;

    serde_json::from_str(body).map_err(|e| {
        OpenBluError::Parse(format!(
            "Unexpected payload from {}: {}",
            endpoint.path(),
            e
        ))
    })
}
