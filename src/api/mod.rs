//! Client for the Museo REST API.
//!
//! Every call forwards the browser's session cookies and goes through
//! [`handle_json`], which turns the `{success, data, error, message}`
//! envelope into a `Result`.

mod payouts;
mod returns;

pub use payouts::PayoutsClient;
pub use returns::{ReturnsApi, ReturnsClient};

use reqwest::{header, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Upstream API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx status or `success: false` envelope
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Upstream status, when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Shared HTTP client and API base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(api_base: &str) -> ApiResult<Self> {
        let base = Url::parse(api_base).map_err(|e| ApiError::Url(e.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// Returns endpoints acting with the given session cookies
    pub fn returns(&self, cookie: Option<String>) -> ReturnsClient {
        ReturnsClient::new(self.clone(), cookie)
    }

    /// Payout endpoint authenticated with an optional bearer token
    pub fn payouts(&self, process_path: &str, token: Option<String>) -> PayoutsClient {
        PayoutsClient::new(self.clone(), process_path, token)
    }

    /// Base URL with `segments` appended; each segment is percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Attach forwarded session cookies to a request
pub(crate) fn with_cookie(builder: RequestBuilder, cookie: Option<&str>) -> RequestBuilder {
    match cookie {
        Some(cookie) if !cookie.is_empty() => builder.header(header::COOKIE, cookie),
        _ => builder,
    }
}

/// Parse the response body and fail on `!ok` or `success: false`
pub async fn handle_json(res: Response) -> ApiResult<Value> {
    let status = res.status();
    let body = res.text().await?;
    // An unparsable body is treated as an empty object
    let data: Value = serde_json::from_str(&body).unwrap_or_else(|_| Value::Object(Default::default()));

    let envelope_failed = data.get("success") == Some(&Value::Bool(false));
    if !status.is_success() || envelope_failed {
        return Err(ApiError::Rejected {
            status,
            message: failure_message(&data, status),
        });
    }

    Ok(data)
}

/// `error`, then `message`, then a generic line with the status code
fn failure_message(data: &Value, status: StatusCode) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()))
}

/// Decode the `data` member of an envelope, or the whole body without one
pub(crate) fn decode_data<T: DeserializeOwned>(mut body: Value) -> ApiResult<T> {
    let payload = match body.get_mut("data") {
        Some(data) => data.take(),
        None => body,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}
