use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::api::ReturnsClient;
use crate::models::Role;
use crate::services::DetailsKey;
use crate::AppState;

/// The browser's Museo session, forwarded to the API on every call
pub struct ApiSession {
    /// `Cookie` header rebuilt from the request jar
    pub cookie: String,
    /// Value of the session cookie, used to key open details views
    pub session_id: String,
}

impl ApiSession {
    /// Returns client acting as this session
    pub fn returns(&self, state: &AppState) -> ReturnsClient {
        state.api.returns(Some(self.cookie.clone()))
    }

    pub fn details_key(&self, role: Role, return_id: &str) -> DetailsKey {
        DetailsKey {
            session: self.session_id.clone(),
            role,
            return_id: return_id.to_string(),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ApiSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let session_id = jar
            .get(&state.config.session_cookie)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(SessionError::NotAuthenticated)?;

        let cookie = jar
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(ApiSession { cookie, session_id })
    }
}

/// Session extraction errors
#[derive(Debug)]
pub enum SessionError {
    NotAuthenticated,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            SessionError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "Sign in to Museo to manage returns",
            )
                .into_response(),
        }
    }
}
