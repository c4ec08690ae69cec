use async_trait::async_trait;
use reqwest::{multipart, Url};
use serde_json::{json, Value};

use super::{decode_data, handle_json, with_cookie, ApiClient, ApiResult};
use crate::models::{AdminReturnsQuery, NewReturn, Resolution, Return};

/// Operations behind the return details view
#[async_trait]
pub trait ReturnsApi: Send + Sync {
    async fn get_return_details(&self, return_id: &str) -> ApiResult<Return>;

    async fn add_return_message(&self, return_id: &str, message: &str) -> ApiResult<Value>;

    async fn dispute_return(&self, return_id: &str, dispute_reason: &str) -> ApiResult<Value>;

    async fn approve_return(&self, return_id: &str, seller_response: &str) -> ApiResult<Value>;

    async fn reject_return(&self, return_id: &str, seller_response: &str) -> ApiResult<Value>;

    async fn resolve_dispute(
        &self,
        return_id: &str,
        resolution: Resolution,
        admin_notes: &str,
    ) -> ApiResult<Value>;

    async fn mark_return_shipped(
        &self,
        return_id: &str,
        tracking_number: Option<&str>,
    ) -> ApiResult<Value>;

    async fn mark_return_received(
        &self,
        return_id: &str,
        received_condition: Option<&str>,
    ) -> ApiResult<Value>;
}

/// `/returns` endpoints, acting as one browser session
#[derive(Clone, Debug)]
pub struct ReturnsClient {
    api: ApiClient,
    cookie: Option<String>,
}

/// URL of the admin list; query params only appear when supplied
pub fn admin_returns_url(api: &ApiClient, query: &AdminReturnsQuery) -> ApiResult<Url> {
    let mut url = api.endpoint(&["returns", "admin", "all"])?;
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    if status.is_some() || query.disputed.is_some() {
        let mut pairs = url.query_pairs_mut();
        if let Some(status) = status {
            pairs.append_pair("status", status);
        }
        if let Some(disputed) = query.disputed {
            pairs.append_pair("disputed", if disputed { "true" } else { "false" });
        }
    }
    Ok(url)
}

impl ReturnsClient {
    pub fn new(api: ApiClient, cookie: Option<String>) -> Self {
        Self { api, cookie }
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        self.api.endpoint(segments)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<Value> {
        let res = with_cookie(builder, self.cookie.as_deref()).send().await?;
        handle_json(res).await
    }

    async fn get_json(&self, url: Url) -> ApiResult<Value> {
        tracing::debug!("GET {}", url.path());
        self.send(self.api.http().get(url)).await
    }

    async fn post_json(&self, url: Url, body: Value) -> ApiResult<Value> {
        tracing::debug!("POST {}", url.path());
        self.send(self.api.http().post(url).json(&body)).await
    }

    async fn put_json(&self, url: Url, body: Value) -> ApiResult<Value> {
        tracing::debug!("PUT {}", url.path());
        self.send(self.api.http().put(url).json(&body)).await
    }

    /// Open a return for an order, uploading evidence photos
    pub async fn create_return(&self, new_return: NewReturn) -> ApiResult<Value> {
        let mut form = multipart::Form::new()
            .text("orderId", new_return.order_id)
            .text("reason", new_return.reason)
            .text("description", new_return.description);

        for file in new_return.evidence {
            let part = multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part("evidence", part);
        }

        let url = self.url(&["returns"])?;
        tracing::debug!("POST {} (multipart)", url.path());
        self.send(self.api.http().post(url).multipart(form)).await
    }

    /// Returns the current user opened as a buyer
    pub async fn get_buyer_returns(&self) -> ApiResult<Vec<Return>> {
        let body = self.get_json(self.url(&["returns", "buyer"])?).await?;
        decode_data(body)
    }

    /// Returns against the current seller's shop
    pub async fn get_seller_returns(&self, status: Option<&str>) -> ApiResult<Vec<Return>> {
        let mut url = self.url(&["returns", "seller"])?;
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("status", status);
        }
        let body = self.get_json(url).await?;
        decode_data(body)
    }

    /// Every return on the marketplace (admin only)
    pub async fn get_admin_returns(&self, query: &AdminReturnsQuery) -> ApiResult<Vec<Return>> {
        let body = self.get_json(admin_returns_url(&self.api, query)?).await?;
        decode_data(body)
    }
}

#[async_trait]
impl ReturnsApi for ReturnsClient {
    async fn get_return_details(&self, return_id: &str) -> ApiResult<Return> {
        let body = self.get_json(self.url(&["returns", return_id])?).await?;
        decode_data(body)
    }

    async fn add_return_message(&self, return_id: &str, message: &str) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "messages"])?;
        self.post_json(url, json!({ "message": message })).await
    }

    async fn dispute_return(&self, return_id: &str, dispute_reason: &str) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "dispute"])?;
        self.post_json(url, json!({ "disputeReason": dispute_reason })).await
    }

    async fn approve_return(&self, return_id: &str, seller_response: &str) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "approve"])?;
        self.put_json(url, json!({ "sellerResponse": seller_response })).await
    }

    async fn reject_return(&self, return_id: &str, seller_response: &str) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "reject"])?;
        self.put_json(url, json!({ "sellerResponse": seller_response })).await
    }

    async fn resolve_dispute(
        &self,
        return_id: &str,
        resolution: Resolution,
        admin_notes: &str,
    ) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "resolve"])?;
        self.put_json(
            url,
            json!({ "resolution": resolution.as_str(), "adminNotes": admin_notes }),
        )
        .await
    }

    async fn mark_return_shipped(
        &self,
        return_id: &str,
        tracking_number: Option<&str>,
    ) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "shipped"])?;
        let body = match tracking_number {
            Some(tracking) => json!({ "tracking_number": tracking }),
            None => json!({}),
        };
        self.post_json(url, body).await
    }

    async fn mark_return_received(
        &self,
        return_id: &str,
        received_condition: Option<&str>,
    ) -> ApiResult<Value> {
        let url = self.url(&["returns", return_id, "received"])?;
        let body = match received_condition {
            Some(condition) => json!({ "received_condition": condition }),
            None => json!({}),
        };
        self.put_json(url, body).await
    }
}
