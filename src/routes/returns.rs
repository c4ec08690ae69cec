use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::error::{AppError, AppResult};
use crate::middleware::ApiSession;
use crate::models::{
    reason_label, DisputeForm, EvidenceFile, MarkShippedForm, MessageForm, NewReturn,
    NewReturnQuery, Role, RETURN_REASONS,
};
use crate::routes::details::{self, DetailsCommand, ReturnRow, SelectOption};
use crate::AppState;

#[derive(Template)]
#[template(path = "returns/index.html")]
struct ReturnsIndexTemplate {
    title: String,
    rows: Vec<ReturnRow>,
}

#[derive(Template)]
#[template(path = "returns/new.html")]
struct NewReturnTemplate {
    title: String,
    order_id: String,
    reasons: Vec<SelectOption>,
    error: Option<String>,
}

fn new_return_page(order_id: String, error: Option<String>) -> AppResult<Html<String>> {
    let template = NewReturnTemplate {
        title: "Request a return".to_string(),
        order_id,
        reasons: RETURN_REASONS
            .iter()
            .map(|code| SelectOption::new(code, &reason_label(code), false))
            .collect(),
        error,
    };

    Ok(Html(template.render()?))
}

/// List the buyer's returns
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
) -> AppResult<Html<String>> {
    let returns = session.returns(&state).get_buyer_returns().await?;

    let template = ReturnsIndexTemplate {
        title: "My Returns".to_string(),
        rows: returns.iter().map(|r| ReturnRow::new(r, Role::Buyer)).collect(),
    };

    Ok(Html(template.render()?))
}

/// New return form
pub async fn new_page(
    _session: ApiSession,
    Query(query): Query<NewReturnQuery>,
) -> AppResult<Html<String>> {
    new_return_page(query.order_id.unwrap_or_default(), None)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))
}

/// Create return (multipart, with evidence photos)
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut order_id = String::new();
    let mut reason = String::new();
    let mut description = String::new();
    let mut evidence = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "orderId" => order_id = read_text(field).await?,
            "reason" => reason = read_text(field).await?,
            "description" => description = read_text(field).await?,
            "evidence" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;

                // Browsers send an empty part when no file was picked
                if !file_name.is_empty() && !bytes.is_empty() {
                    evidence.push(EvidenceFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let order_id = order_id.trim().to_string();
    if order_id.is_empty() || reason.trim().is_empty() {
        let page = new_return_page(order_id, Some("Order and reason are required".to_string()))?;
        return Ok(page.into_response());
    }

    let evidence_count = evidence.len();
    let result = session
        .returns(&state)
        .create_return(NewReturn {
            order_id: order_id.clone(),
            reason: reason.trim().to_string(),
            description: description.trim().to_string(),
            evidence,
        })
        .await;

    match result {
        Ok(body) => {
            tracing::info!(
                "Return requested for order {} with {} evidence files",
                order_id,
                evidence_count
            );
            let created_id = body
                .get("data")
                .and_then(|data| data.get("returnId"))
                .and_then(|id| id.as_str());
            let target = match created_id {
                Some(id) => Role::Buyer.details_path(id),
                None => Role::Buyer.base_path().to_string(),
            };
            Ok(Redirect::to(&target).into_response())
        }
        Err(e) => {
            tracing::warn!("Return request for order {} failed: {}", order_id, e);
            Ok(new_return_page(order_id, Some(e.to_string()))?.into_response())
        }
    }
}

/// Return details, as the buyer
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    details::open_details(&state, &session, Role::Buyer, &id).await
}

/// Escalate a rejected return
pub async fn dispute(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<DisputeForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::Dispute(form.dispute_reason);
    details::run_action(&state, &session, Role::Buyer, &id, command).await
}

/// Buyer shipped the item back
pub async fn mark_shipped(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<MarkShippedForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::MarkShipped(form.tracking_number);
    details::run_action(&state, &session, Role::Buyer, &id, command).await
}

/// Buyer message
pub async fn message(
    State(state): State<Arc<AppState>>,
    session: ApiSession,
    Path(id): Path<String>,
    Form(form): Form<MessageForm>,
) -> AppResult<Redirect> {
    let command = DetailsCommand::SendMessage(form.message);
    details::run_action(&state, &session, Role::Buyer, &id, command).await
}
