use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};

use crate::error::AppResult;
use crate::middleware::ApiSession;
use crate::models::{AdminReturnsParams, AdminReturnsQuery, MessageForm, Resolution, ResolveForm, Role};
use crate::routes::details::{self, status_options, DetailsCommand, ReturnRow, SelectOption};
use crate::services::return_filter::filter_returns;
use crate::AppState;

#[derive(Template)]
#[template(path = "admin/returns.html")]
struct AdminReturnsTemplate {
    title: String,
    query: String,
    statuses: Vec<SelectOption>,
    disputed_options: Vec<SelectOption>,
    rows: Vec<ReturnRow>,
    total: usize,
}

fn disputed_options(current: Option<bool>) -> Vec<SelectOption> {
    vec![
        SelectOption::new("", "Any", current.is_none()),
        SelectOption::new("true", "Disputed only", current == Some(true)),
        SelectOption::new("false", "Not disputed", current == Some(false)),
    ]
}

/// All returns, filtered server-side by status/disputed and locally by `q`
pub async fn returns(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Query(params): Query<AdminReturnsParams>,
) -> AppResult<Html<String>> {
    let query = AdminReturnsQuery {
        status: params.status(),
        disputed: params.disputed(),
    };

    let returns = session.returns(&state).get_admin_returns(&query).await?;
    let total = returns.len();
    let shown = filter_returns(returns, params.query());

    let template = AdminReturnsTemplate {
        title: "Returns Review".to_string(),
        query: params.query().to_string(),
        statuses: status_options(query.status.as_deref()),
        disputed_options: disputed_options(query.disputed),
        rows: shown.iter().map(|r| ReturnRow::new(r, Role::Admin)).collect(),
        total,
    };

    Ok(Html(template.render()?))
}

/// Return details, as an admin
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    details::open_details(&state, &session, Role::Admin, &id).await
}

/// Settle a disputed return
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<ResolveForm>,
) -> AppResult<Redirect> {
    let resolution: Resolution = form.resolution.parse()?;

    tracing::info!("Admin resolving return {} with {}", id, form.resolution);

    let command = DetailsCommand::Resolve(resolution, form.admin_notes);
    details::run_action(&state, &session, Role::Admin, &id, command).await
}

pub async fn message(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<MessageForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::SendMessage(form.message);
    details::run_action(&state, &session, Role::Admin, &id, command).await
}
