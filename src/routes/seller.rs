use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};

use crate::error::AppResult;
use crate::middleware::ApiSession;
use crate::models::{MarkReceivedForm, MessageForm, Role, SellerResponseForm, SellerReturnsQuery};
use crate::routes::details::{self, status_options, DetailsCommand, ReturnRow, SelectOption};
use crate::AppState;

#[derive(Template)]
#[template(path = "seller/returns.html")]
struct SellerReturnsTemplate {
    title: String,
    statuses: Vec<SelectOption>,
    rows: Vec<ReturnRow>,
}

/// Returns against the seller's shop, optionally filtered by status
pub async fn returns(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Query(query): Query<SellerReturnsQuery>,
) -> AppResult<Html<String>> {
    let status = query.status.filter(|s| !s.trim().is_empty());

    let returns = session
        .returns(&state)
        .get_seller_returns(status.as_deref())
        .await?;

    let template = SellerReturnsTemplate {
        title: "Shop Returns".to_string(),
        statuses: status_options(status.as_deref()),
        rows: returns
            .iter()
            .map(|r| ReturnRow::new(r, Role::Seller))
            .collect(),
    };

    Ok(Html(template.render()?))
}

/// Return details, as the seller
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    details::open_details(&state, &session, Role::Seller, &id).await
}

/// Approve a pending return
pub async fn approve(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<SellerResponseForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::Approve(form.seller_response);
    details::run_action(&state, &session, Role::Seller, &id, command).await
}

/// Reject a pending return
pub async fn reject(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<SellerResponseForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::Reject(form.seller_response);
    details::run_action(&state, &session, Role::Seller, &id, command).await
}

/// Confirm the returned item arrived
pub async fn mark_received(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<MarkReceivedForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::MarkReceived(form.received_condition);
    details::run_action(&state, &session, Role::Seller, &id, command).await
}

pub async fn message(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<MessageForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::SendMessage(form.message);
    details::run_action(&state, &session, Role::Seller, &id, command).await
}
