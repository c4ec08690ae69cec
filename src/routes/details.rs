//! Details view shared by the buyer, seller and admin routes.

use askama::Template;
use axum::response::{Html, Redirect};
use chrono::{DateTime, Utc};

use crate::api::ReturnsApi;
use crate::error::{AppError, AppResult};
use crate::middleware::ApiSession;
use crate::models::{Resolution, Return, Role};
use crate::services::return_flow::ReturnPanel;
use crate::services::ReturnDetails;
use crate::AppState;

pub(crate) fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%b %d, %Y %H:%M").to_string()
}

fn format_opt(at: &Option<DateTime<Utc>>) -> Option<String> {
    at.as_ref().map(format_time)
}

/// Row of a returns list
pub(crate) struct ReturnRow {
    pub link: String,
    pub short_id: String,
    pub status: String,
    pub shipping: String,
    pub reason: String,
    pub order_number: String,
    pub shop_name: String,
    pub buyer: String,
    pub created_at: String,
}

impl ReturnRow {
    pub fn new(ret: &Return, role: Role) -> Self {
        Self {
            link: role.details_path(&ret.return_id),
            short_id: ret.short_id().to_string(),
            status: ret.status.as_str().to_string(),
            shipping: ret
                .shipping_status
                .map(|s| s.label().to_string())
                .unwrap_or_default(),
            reason: ret.reason_label(),
            order_number: ret.order_number().unwrap_or("-").to_string(),
            shop_name: ret.shop_name().unwrap_or("-").to_string(),
            buyer: ret.buyer_username().unwrap_or(ret.buyer_id.as_str()).to_string(),
            created_at: ret.created_at.as_ref().map(format_time).unwrap_or_default(),
        }
    }
}

/// `<option>` of a filter or form select
pub(crate) struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

const STATUS_FILTERS: [(&str, &str); 6] = [
    ("", "All"),
    ("pending", "Pending"),
    ("approved", "Approved"),
    ("rejected", "Rejected"),
    ("disputed", "Disputed"),
    ("refunded", "Refunded"),
];

/// Status filter options with `current` selected
pub(crate) fn status_options(current: Option<&str>) -> Vec<SelectOption> {
    let current = current.unwrap_or_default();
    STATUS_FILTERS
        .iter()
        .map(|(value, label)| SelectOption::new(value, label, *value == current))
        .collect()
}

struct MessageView {
    sender: String,
    body: String,
    created_at: String,
}

struct ReturnView {
    id: String,
    short_id: String,
    status: String,
    shipping: Option<String>,
    reason: String,
    description: String,
    evidence_images: Vec<String>,
    order_number: String,
    shop_name: String,
    tracking_number: Option<String>,
    received_condition: Option<String>,
    seller_response: Option<String>,
    dispute_reason: Option<String>,
    admin_notes: Option<String>,
    resolution: Option<String>,
    address_lines: Vec<String>,
    created_at: Option<String>,
    resolved_at: Option<String>,
    refunded_at: Option<String>,
    buyer_shipped_at: Option<String>,
    seller_received_at: Option<String>,
    messages: Vec<MessageView>,
}

impl ReturnView {
    fn new(ret: &Return) -> Self {
        Self {
            id: ret.return_id.clone(),
            short_id: ret.short_id().to_string(),
            status: ret.status.as_str().to_string(),
            shipping: ret.shipping_status.map(|s| s.label().to_string()),
            reason: ret.reason_label(),
            description: ret.description.clone(),
            evidence_images: ret.evidence_images.clone(),
            order_number: ret.order_number().unwrap_or("-").to_string(),
            shop_name: ret.shop_name().unwrap_or("-").to_string(),
            tracking_number: ret.tracking_number.clone(),
            received_condition: ret.received_condition.clone(),
            seller_response: ret.seller_response.clone(),
            dispute_reason: ret.dispute_reason.clone(),
            admin_notes: ret.admin_notes.clone(),
            resolution: ret.resolution.clone(),
            address_lines: ret
                .return_address
                .as_ref()
                .map(|a| a.lines())
                .unwrap_or_default(),
            created_at: format_opt(&ret.created_at),
            resolved_at: format_opt(&ret.resolved_at),
            refunded_at: format_opt(&ret.refunded_at),
            buyer_shipped_at: format_opt(&ret.buyer_shipped_at),
            seller_received_at: format_opt(&ret.seller_received_at),
            messages: ret
                .messages
                .iter()
                .map(|m| MessageView {
                    sender: if m.is_admin {
                        "Museo admin".to_string()
                    } else if m.sender_id == ret.buyer_id {
                        "Buyer".to_string()
                    } else {
                        "Seller".to_string()
                    },
                    body: m.message.clone(),
                    created_at: m.created_at.as_ref().map(format_time).unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "returns/details.html")]
struct DetailsTemplate {
    title: String,
    role: &'static str,
    back_path: String,
    action_path: String,
    ret: Option<ReturnView>,
    error: Option<String>,
    show_seller_response: bool,
    show_dispute_prompt: bool,
    show_rejection_final: bool,
    show_ship_back: bool,
    show_awaiting_shipment: bool,
    show_in_transit: bool,
    show_receive_item: bool,
    show_completed: bool,
    show_admin_resolution: bool,
    show_under_review: bool,
}

/// Render the current state of a details view
pub(crate) fn render_details<A: ReturnsApi>(details: &ReturnDetails<A>) -> AppResult<String> {
    let state = details.state();
    let role = details.role();
    let panels = details.panels();
    let has = |panel: ReturnPanel| panels.contains(&panel);

    let ret = state.ret.as_ref().map(ReturnView::new);
    let title = match &ret {
        Some(view) => format!("Return #{}", view.short_id),
        None => "Return".to_string(),
    };

    let template = DetailsTemplate {
        title,
        role: role.as_str(),
        back_path: role.base_path().to_string(),
        action_path: role.details_path(details.return_id()),
        ret,
        error: state.error.clone(),
        show_seller_response: has(ReturnPanel::SellerResponse),
        show_dispute_prompt: has(ReturnPanel::DisputePrompt),
        show_rejection_final: has(ReturnPanel::RejectionFinal),
        show_ship_back: has(ReturnPanel::ShipBack),
        show_awaiting_shipment: has(ReturnPanel::AwaitingShipment),
        show_in_transit: has(ReturnPanel::InTransitNotice),
        show_receive_item: has(ReturnPanel::ReceiveItem),
        show_completed: has(ReturnPanel::Completed),
        show_admin_resolution: has(ReturnPanel::AdminResolution),
        show_under_review: has(ReturnPanel::UnderReview),
    };

    Ok(template.render()?)
}

/// Mutation requested from a details view
#[derive(Debug, Clone)]
pub(crate) enum DetailsCommand {
    Approve(String),
    Reject(String),
    Dispute(String),
    Resolve(Resolution, String),
    MarkShipped(Option<String>),
    MarkReceived(Option<String>),
    SendMessage(String),
}

impl DetailsCommand {
    async fn apply<A: ReturnsApi>(self, details: &mut ReturnDetails<A>) -> bool {
        match self {
            DetailsCommand::Approve(response) => details.approve(&response).await,
            DetailsCommand::Reject(response) => details.reject(&response).await,
            DetailsCommand::Dispute(reason) => details.dispute(&reason).await,
            DetailsCommand::Resolve(resolution, notes) => details.resolve(resolution, &notes).await,
            DetailsCommand::MarkShipped(tracking) => details.mark_shipped(tracking.as_deref()).await,
            DetailsCommand::MarkReceived(condition) => {
                details.mark_received(condition.as_deref()).await
            }
            DetailsCommand::SendMessage(message) => details.send_message(&message).await,
        }
    }
}

/// Render a details view. A view whose last action has not been shown yet
/// is rendered as-is, once; otherwise it is re-fetched in place.
pub(crate) async fn open_details(
    state: &AppState,
    session: &ApiSession,
    role: Role,
    return_id: &str,
) -> AppResult<Html<String>> {
    let mut open = state
        .details
        .acquire(session.details_key(role, return_id), session.returns(state))
        .await
        .ok_or(AppError::ActionInProgress)?;

    if open.take_unseen() {
        let html = render_details(&open.details)?;
        open.details.dismiss_error();
        return Ok(Html(html));
    }

    open.details.refresh().await;
    Ok(Html(render_details(&open.details)?))
}

/// Run one action against the open details view, then send the browser
/// back to the details page where the outcome is shown
pub(crate) async fn run_action(
    state: &AppState,
    session: &ApiSession,
    role: Role,
    return_id: &str,
    command: DetailsCommand,
) -> AppResult<Redirect> {
    let mut open = state
        .details
        .acquire(session.details_key(role, return_id), session.returns(state))
        .await
        .ok_or(AppError::ActionInProgress)?;

    command.apply(&mut open.details).await;
    open.mark_unseen();

    Ok(Redirect::to(&role.details_path(return_id)))
}
