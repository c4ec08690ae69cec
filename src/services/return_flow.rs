//! Which panels and actions a return offers to each role.
//!
//! The server decides every transition; this only maps the state it
//! reports to what the viewer may do next.

use crate::models::{Return, ReturnStatus, Role, ShippingStatus};

/// A lifecycle mutation a viewer can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnAction {
    Approve,
    Reject,
    Dispute,
    MarkShipped,
    MarkReceived,
    ResolveApprove,
    ResolveReject,
    SendMessage,
}

impl ReturnAction {
    pub fn label(&self) -> &'static str {
        match self {
            ReturnAction::Approve => "approve",
            ReturnAction::Reject => "reject",
            ReturnAction::Dispute => "dispute",
            ReturnAction::MarkShipped => "mark shipped",
            ReturnAction::MarkReceived => "mark received",
            ReturnAction::ResolveApprove => "resolve (approve)",
            ReturnAction::ResolveReject => "resolve (reject)",
            ReturnAction::SendMessage => "send message",
        }
    }
}

/// Panel rendered in the details view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnPanel {
    /// Seller approves or rejects a pending return
    SellerResponse,
    /// Buyer may escalate a rejection
    DisputePrompt,
    /// Rejection upheld after review
    RejectionFinal,
    /// Return address and tracking number form
    ShipBack,
    /// Seller waits for the buyer to ship
    AwaitingShipment,
    /// Buyer shipped, item on its way
    InTransitNotice,
    /// Seller records the condition of the received item
    ReceiveItem,
    /// Item is back with the seller
    Completed,
    /// Admin rules on a dispute
    AdminResolution,
    /// Dispute waiting for an admin
    UnderReview,
}

impl ReturnPanel {
    /// Buttons the panel offers
    pub fn actions(&self) -> &'static [ReturnAction] {
        match self {
            ReturnPanel::SellerResponse => &[ReturnAction::Approve, ReturnAction::Reject],
            ReturnPanel::DisputePrompt => &[ReturnAction::Dispute],
            ReturnPanel::ShipBack => &[ReturnAction::MarkShipped],
            ReturnPanel::ReceiveItem => &[ReturnAction::MarkReceived],
            ReturnPanel::AdminResolution => {
                &[ReturnAction::ResolveApprove, ReturnAction::ResolveReject]
            }
            ReturnPanel::RejectionFinal
            | ReturnPanel::AwaitingShipment
            | ReturnPanel::InTransitNotice
            | ReturnPanel::Completed
            | ReturnPanel::UnderReview => &[],
        }
    }
}

/// Panels for `role` given the server-reported state of `ret`
pub fn panels_for(role: Role, ret: &Return) -> Vec<ReturnPanel> {
    let mut panels = Vec::new();

    match (role, ret.status) {
        (Role::Seller, ReturnStatus::Pending) => panels.push(ReturnPanel::SellerResponse),
        (Role::Buyer, ReturnStatus::Rejected) => {
            if ret.is_resolved() {
                panels.push(ReturnPanel::RejectionFinal);
            } else {
                panels.push(ReturnPanel::DisputePrompt);
            }
        }
        (Role::Admin, ReturnStatus::Disputed) => panels.push(ReturnPanel::AdminResolution),
        (Role::Buyer | Role::Seller, ReturnStatus::Disputed) => {
            panels.push(ReturnPanel::UnderReview)
        }
        _ => {}
    }

    match (ret.shipping_status, role) {
        (Some(ShippingStatus::PendingShipment), Role::Buyer) => panels.push(ReturnPanel::ShipBack),
        (Some(ShippingStatus::PendingShipment), Role::Seller) => {
            panels.push(ReturnPanel::AwaitingShipment)
        }
        (Some(ShippingStatus::InTransit), Role::Buyer) => panels.push(ReturnPanel::InTransitNotice),
        (Some(ShippingStatus::InTransit), Role::Seller) => panels.push(ReturnPanel::ReceiveItem),
        (Some(ShippingStatus::Completed), _) => panels.push(ReturnPanel::Completed),
        _ => {}
    }

    panels
}

/// Lifecycle actions available to `role`, in panel order
pub fn available_actions(role: Role, ret: &Return) -> Vec<ReturnAction> {
    panels_for(role, ret)
        .iter()
        .flat_map(|panel| panel.actions().iter().copied())
        .collect()
}

/// Whether `action` may be triggered right now
pub fn is_action_available(role: Role, ret: &Return, action: ReturnAction) -> bool {
    // Every party may take part in the conversation
    action == ReturnAction::SendMessage || available_actions(role, ret).contains(&action)
}

/// Admin resolution needs written notes
pub fn resolve_enabled(admin_notes: &str) -> bool {
    !admin_notes.trim().is_empty()
}
