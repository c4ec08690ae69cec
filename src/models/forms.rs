use serde::Deserialize;

/// Seller approve/reject form
#[derive(Debug, Clone, Deserialize)]
pub struct SellerResponseForm {
    #[serde(default)]
    pub seller_response: String,
}

/// Buyer dispute form
#[derive(Debug, Clone, Deserialize)]
pub struct DisputeForm {
    #[serde(default)]
    pub dispute_reason: String,
}

/// Admin resolution form
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveForm {
    pub resolution: String,
    #[serde(default)]
    pub admin_notes: String,
}

/// Buyer mark-shipped form
#[derive(Debug, Clone, Deserialize)]
pub struct MarkShippedForm {
    pub tracking_number: Option<String>,
}

/// Seller mark-received form
#[derive(Debug, Clone, Deserialize)]
pub struct MarkReceivedForm {
    pub received_condition: Option<String>,
}

/// Conversation form
#[derive(Debug, Clone, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Query of the new return page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReturnQuery {
    pub order_id: Option<String>,
}

/// Query of the seller returns tab
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerReturnsQuery {
    pub status: Option<String>,
}

/// Query of the admin returns tab
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminReturnsParams {
    pub status: Option<String>,
    /// "true", "false" or empty
    pub disputed: Option<String>,
    /// Free-text filter applied to the fetched rows
    pub q: Option<String>,
}

impl AdminReturnsParams {
    pub fn status(&self) -> Option<String> {
        self.status.clone().filter(|s| !s.trim().is_empty())
    }

    pub fn disputed(&self) -> Option<bool> {
        match self.disputed.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_params_normalise_blanks() {
        let params = AdminReturnsParams {
            status: Some(" ".to_string()),
            disputed: Some(String::new()),
            q: None,
        };
        assert_eq!(params.status(), None);
        assert_eq!(params.disputed(), None);
        assert_eq!(params.query(), "");

        let params = AdminReturnsParams {
            status: Some("approved".to_string()),
            disputed: Some("true".to_string()),
            q: Some("ana".to_string()),
        };
        assert_eq!(params.status().as_deref(), Some("approved"));
        assert_eq!(params.disputed(), Some(true));
        assert_eq!(params.query(), "ana");
    }
}
