pub mod admin;
mod details;
pub mod returns;
pub mod seller;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

use crate::AppState;

/// Health check endpoint
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.upload_limit_bytes;

    Router::new()
        .route("/", get(|| async { Redirect::to("/returns") }))
        .route("/health", get(health))
        // Buyer routes
        .route("/returns", get(returns::index))
        .route(
            "/returns/new",
            get(returns::new_page).post(returns::create).layer((
                DefaultBodyLimit::disable(),
                RequestBodyLimitLayer::new(upload_limit),
            )),
        )
        .route("/returns/:id", get(returns::show))
        .route("/returns/:id/dispute", post(returns::dispute))
        .route("/returns/:id/shipped", post(returns::mark_shipped))
        .route("/returns/:id/messages", post(returns::message))
        // Seller routes
        .route("/seller/returns", get(seller::returns))
        .route("/seller/returns/:id", get(seller::show))
        .route("/seller/returns/:id/approve", post(seller::approve))
        .route("/seller/returns/:id/reject", post(seller::reject))
        .route("/seller/returns/:id/received", post(seller::mark_received))
        .route("/seller/returns/:id/messages", post(seller::message))
        // Admin routes
        .route("/admin/returns", get(admin::returns))
        .route("/admin/returns/:id", get(admin::show))
        .route("/admin/returns/:id/resolve", post(admin::resolve))
        .route("/admin/returns/:id/messages", post(admin::message))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::{Config, PayoutConfig};
    use crate::models::Role;
    use crate::services::{DetailsKey, DetailsStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(server: &MockServer) -> Arc<AppState> {
        let api_base = format!("{}/api", server.uri());
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_base: api_base.clone(),
            session_cookie: "token".to_string(),
            upload_limit_bytes: 1024 * 1024,
            details_idle_minutes: 30,
            payout: PayoutConfig {
                enabled: false,
                ..Default::default()
            },
        };

        Arc::new(AppState {
            api: ApiClient::new(&api_base).unwrap(),
            details: DetailsStore::new(),
            config,
        })
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, "token=abc")
            .body(Body::empty())
            .unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, "token=abc")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(res: axum::response::Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn mount_return(server: &MockServer, data: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/returns/r1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let res = router(test_state(&server))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let server = MockServer::start().await;
        let res = router(test_state(&server))
            .oneshot(Request::builder().uri("/returns").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buyer_index_forwards_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/returns/buyer"))
            .and(header_is("cookie", "token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "returnId": "r1abcdef99", "status": "pending", "reason": "damaged" }]
            })))
            .mount(&server)
            .await;

        let res = router(test_state(&server))
            .oneshot(get_request("/returns"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let html = body_text(res).await;
        assert!(html.contains("/returns/r1abcdef99"));
        assert!(html.contains("#r1abcdef"));
    }

    #[tokio::test]
    async fn test_seller_details_shows_response_panel() {
        let server = MockServer::start().await;
        mount_return(&server, json!({ "returnId": "r1", "status": "pending" })).await;

        let res = router(test_state(&server))
            .oneshot(get_request("/seller/returns/r1"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let html = body_text(res).await;
        assert!(html.contains("/seller/returns/r1/approve"));
    }

    #[tokio::test]
    async fn test_seller_approve_refetches() {
        let server = MockServer::start().await;
        mount_return(&server, json!({ "returnId": "r1", "status": "pending" })).await;
        Mock::given(method("PUT"))
            .and(path("/api/returns/r1/approve"))
            .and(body_json(json!({ "sellerResponse": "ok" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let app = router(test_state(&server));
        let res = app
            .clone()
            .oneshot(form_request("/seller/returns/r1/approve", "seller_response=ok"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/seller/returns/r1");

        // Open on acquire, the action, then the re-fetch
        assert_eq!(server.received_requests().await.unwrap().len(), 3);

        // Following the redirect shows the re-fetched copy without another call
        let res = app.oneshot(get_request("/seller/returns/r1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_action_shows_error_without_refetch() {
        let server = MockServer::start().await;
        mount_return(&server, json!({ "returnId": "r1", "status": "pending" })).await;
        Mock::given(method("PUT"))
            .and(path("/api/returns/r1/reject"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "Return already handled"
            })))
            .mount(&server)
            .await;

        let app = router(test_state(&server));
        let res = app
            .clone()
            .oneshot(form_request("/seller/returns/r1/reject", "seller_response=no"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        // The error is shown once, from the kept state
        let res = app.clone().oneshot(get_request("/seller/returns/r1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_text(res).await.contains("Return already handled"));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);

        // A reload re-fetches and the notice is gone
        let res = app.oneshot(get_request("/seller/returns/r1")).await.unwrap();
        assert!(!body_text(res).await.contains("Return already handled"));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reopening_held_view_keeps_guard() {
        let server = MockServer::start().await;
        mount_return(&server, json!({ "returnId": "r1", "status": "pending" })).await;
        Mock::given(method("PUT"))
            .and(path("/api/returns/r1/approve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let state = test_state(&server);
        let key = DetailsKey {
            session: "abc".to_string(),
            role: Role::Seller,
            return_id: "r1".to_string(),
        };
        let held = state
            .details
            .acquire(key, state.api.returns(None))
            .await
            .unwrap();

        let app = router(state.clone());
        let res = app.clone().oneshot(get_request("/seller/returns/r1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = app
            .clone()
            .oneshot(form_request("/seller/returns/r1/approve", "seller_response=ok"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let approvals = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|req| req.method.as_str() == "PUT")
            .count();
        assert_eq!(approvals, 0);
        assert_eq!(state.details.len().await, 1);

        drop(held);
        let res = app.oneshot(get_request("/seller/returns/r1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_concurrent_action_is_conflict() {
        let server = MockServer::start().await;
        mount_return(&server, json!({ "returnId": "r1", "status": "pending" })).await;

        let state = test_state(&server);
        let key = DetailsKey {
            session: "abc".to_string(),
            role: Role::Seller,
            return_id: "r1".to_string(),
        };
        let _held = state
            .details
            .acquire(key, state.api.returns(None))
            .await
            .unwrap();

        let res = router(state.clone())
            .oneshot(form_request("/seller/returns/r1/approve", "seller_response=ok"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_admin_resolve_rejects_unknown_resolution() {
        let server = MockServer::start().await;
        let res = router(test_state(&server))
            .oneshot(form_request(
                "/admin/returns/r1/resolve",
                "resolution=maybe&admin_notes=x",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_list_filters_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/returns/admin/all"))
            .and(query_param("status", "disputed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    { "returnId": "aaaa1111", "status": "disputed", "reason": "damaged" },
                    { "returnId": "bbbb2222", "status": "disputed", "reason": "wrong_item" }
                ]
            })))
            .mount(&server)
            .await;

        let res = router(test_state(&server))
            .oneshot(get_request("/admin/returns?status=disputed&q=wrong"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let html = body_text(res).await;
        assert!(html.contains("Showing 1 of 2 returns"));
        assert!(html.contains("bbbb2222"));
        assert!(!html.contains("aaaa1111"));
    }

    #[tokio::test]
    async fn test_upstream_not_found_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/returns/seller"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "No shop"
            })))
            .mount(&server)
            .await;

        let res = router(test_state(&server))
            .oneshot(get_request("/seller/returns"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(res).await, "No shop");
    }
}
