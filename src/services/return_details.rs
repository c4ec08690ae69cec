//! State of one open return details view.
//!
//! Every change goes through [`reduce`]. The controller performs at most
//! one mutation at a time and re-fetches the return after each success, so
//! what is shown always matches the server. A failed mutation keeps the
//! previous copy and records the error.

use crate::api::{ApiError, ReturnsApi};
use crate::models::{Resolution, Return, Role};
use crate::services::return_flow::{self, ReturnAction, ReturnPanel};

#[derive(Debug, Clone, Default)]
pub struct DetailsState {
    pub ret: Option<Return>,
    pub loading: bool,
    pub action_loading: Option<ReturnAction>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum DetailsEvent {
    LoadStarted,
    Loaded(Box<Return>),
    LoadFailed(String),
    ActionStarted(ReturnAction),
    ActionSucceeded,
    ActionFailed(String),
    /// Input rejected before any request was made
    Invalid(String),
    DismissError,
}

pub fn reduce(state: DetailsState, event: DetailsEvent) -> DetailsState {
    match event {
        DetailsEvent::LoadStarted => DetailsState {
            loading: true,
            ..state
        },
        DetailsEvent::Loaded(ret) => DetailsState {
            ret: Some(*ret),
            loading: false,
            error: None,
            ..state
        },
        DetailsEvent::LoadFailed(message) => DetailsState {
            loading: false,
            error: Some(message),
            ..state
        },
        DetailsEvent::ActionStarted(action) => DetailsState {
            action_loading: Some(action),
            error: None,
            ..state
        },
        DetailsEvent::ActionSucceeded => DetailsState {
            action_loading: None,
            ..state
        },
        DetailsEvent::ActionFailed(message) => DetailsState {
            action_loading: None,
            error: Some(message),
            ..state
        },
        DetailsEvent::Invalid(message) => DetailsState {
            error: Some(message),
            ..state
        },
        DetailsEvent::DismissError => DetailsState {
            error: None,
            ..state
        },
    }
}

pub const ADMIN_NOTES_REQUIRED: &str = "Admin notes are required to resolve a dispute";
pub const ACTION_IN_PROGRESS: &str = "Another action is still in progress";

/// Controller behind one open details view
pub struct ReturnDetails<A> {
    api: A,
    return_id: String,
    role: Role,
    state: DetailsState,
}

impl<A: ReturnsApi> ReturnDetails<A> {
    /// Open the view and fetch the return
    pub async fn open(api: A, return_id: impl Into<String>, role: Role) -> Self {
        let mut details = Self {
            api,
            return_id: return_id.into(),
            role,
            state: DetailsState::default(),
        };
        details.refresh().await;
        details
    }

    pub fn return_id(&self) -> &str {
        &self.return_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> &DetailsState {
        &self.state
    }

    /// Swap the API handle, e.g. when the session cookies changed
    pub fn rebind(&mut self, api: A) {
        self.api = api;
    }

    pub fn panels(&self) -> Vec<ReturnPanel> {
        match &self.state.ret {
            Some(ret) => return_flow::panels_for(self.role, ret),
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, event: DetailsEvent) {
        self.state = reduce(std::mem::take(&mut self.state), event);
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(DetailsEvent::DismissError);
    }

    /// Re-fetch the return from the server
    pub async fn refresh(&mut self) {
        self.dispatch(DetailsEvent::LoadStarted);
        match self.api.get_return_details(&self.return_id).await {
            Ok(ret) => self.dispatch(DetailsEvent::Loaded(Box::new(ret))),
            Err(e) => {
                tracing::warn!("Failed to load return {}: {}", self.return_id, e);
                self.dispatch(DetailsEvent::LoadFailed(e.to_string()));
            }
        }
    }

    fn begin(&mut self, action: ReturnAction) -> bool {
        if self.state.action_loading.is_some() {
            self.dispatch(DetailsEvent::Invalid(ACTION_IN_PROGRESS.to_string()));
            return false;
        }

        let available = match &self.state.ret {
            Some(ret) => return_flow::is_action_available(self.role, ret, action),
            None => false,
        };
        if !available {
            self.dispatch(DetailsEvent::Invalid(format!(
                "Cannot {} this return right now",
                action.label()
            )));
            return false;
        }

        self.dispatch(DetailsEvent::ActionStarted(action));
        true
    }

    async fn settle(&mut self, action: ReturnAction, result: Result<serde_json::Value, ApiError>) -> bool {
        match result {
            Ok(_) => {
                tracing::info!(
                    "Return {}: {} succeeded as {}",
                    self.return_id,
                    action.label(),
                    self.role.as_str()
                );
                self.dispatch(DetailsEvent::ActionSucceeded);
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::warn!("Return {}: {} failed: {}", self.return_id, action.label(), e);
                self.dispatch(DetailsEvent::ActionFailed(e.to_string()));
                false
            }
        }
    }

    pub async fn approve(&mut self, seller_response: &str) -> bool {
        if !self.begin(ReturnAction::Approve) {
            return false;
        }
        let result = self.api.approve_return(&self.return_id, seller_response).await;
        self.settle(ReturnAction::Approve, result).await
    }

    pub async fn reject(&mut self, seller_response: &str) -> bool {
        if !self.begin(ReturnAction::Reject) {
            return false;
        }
        let result = self.api.reject_return(&self.return_id, seller_response).await;
        self.settle(ReturnAction::Reject, result).await
    }

    pub async fn dispute(&mut self, dispute_reason: &str) -> bool {
        if !self.begin(ReturnAction::Dispute) {
            return false;
        }
        let result = self.api.dispute_return(&self.return_id, dispute_reason).await;
        self.settle(ReturnAction::Dispute, result).await
    }

    pub async fn resolve(&mut self, resolution: Resolution, admin_notes: &str) -> bool {
        if !return_flow::resolve_enabled(admin_notes) {
            self.dispatch(DetailsEvent::Invalid(ADMIN_NOTES_REQUIRED.to_string()));
            return false;
        }

        let action = match resolution {
            Resolution::Approve => ReturnAction::ResolveApprove,
            Resolution::Reject => ReturnAction::ResolveReject,
        };
        if !self.begin(action) {
            return false;
        }
        let result = self
            .api
            .resolve_dispute(&self.return_id, resolution, admin_notes.trim())
            .await;
        self.settle(action, result).await
    }

    pub async fn mark_shipped(&mut self, tracking_number: Option<&str>) -> bool {
        if !self.begin(ReturnAction::MarkShipped) {
            return false;
        }
        let tracking_number = tracking_number.map(str::trim).filter(|t| !t.is_empty());
        let result = self
            .api
            .mark_return_shipped(&self.return_id, tracking_number)
            .await;
        self.settle(ReturnAction::MarkShipped, result).await
    }

    pub async fn mark_received(&mut self, received_condition: Option<&str>) -> bool {
        if !self.begin(ReturnAction::MarkReceived) {
            return false;
        }
        let received_condition = received_condition.map(str::trim).filter(|c| !c.is_empty());
        let result = self
            .api
            .mark_return_received(&self.return_id, received_condition)
            .await;
        self.settle(ReturnAction::MarkReceived, result).await
    }

    /// Post to the conversation; blank messages are ignored
    pub async fn send_message(&mut self, message: &str) -> bool {
        let message = message.trim();
        if message.is_empty() {
            return false;
        }
        if !self.begin(ReturnAction::SendMessage) {
            return false;
        }
        let result = self.api.add_return_message(&self.return_id, message).await;
        self.settle(ReturnAction::SendMessage, result).await
    }
}
