use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval status of a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Disputed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "pending",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
            ReturnStatus::Disputed => "disputed",
            ReturnStatus::Refunded => "refunded",
            ReturnStatus::Unknown => "unknown",
        }
    }
}

/// Physical return of the goods, tracked once a return is approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingStatus {
    PendingShipment,
    InTransit,
    Completed,
    #[serde(other)]
    Unknown,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::PendingShipment => "pendingShipment",
            ShippingStatus::InTransit => "inTransit",
            ShippingStatus::Completed => "completed",
            ShippingStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShippingStatus::PendingShipment => "Awaiting shipment",
            ShippingStatus::InTransit => "In transit",
            ShippingStatus::Completed => "Received",
            ShippingStatus::Unknown => "Unknown",
        }
    }
}

/// Message in the return conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnMessage {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Mailing address the buyer ships the item back to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAddress {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl ReturnAddress {
    /// Non-empty address lines in mailing order
    pub fn lines(&self) -> Vec<String> {
        let locality = [&self.barangay, &self.city, &self.province, &self.postal_code]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        [
            self.name.clone(),
            self.phone.clone(),
            self.street.clone(),
            Some(locality),
            self.country.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileRef {
    pub seller_profile_id: Option<String>,
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerRef {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: Option<String>,
    pub order_number: Option<String>,
    pub total_amount: Option<f64>,
}

/// Return as served by the Museo API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    pub return_id: String,
    pub status: ReturnStatus,
    pub shipping_status: Option<ShippingStatus>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evidence_images: Vec<String>,
    #[serde(default)]
    pub buyer_id: String,
    pub buyer: Option<BuyerRef>,
    pub seller_profile: Option<SellerProfileRef>,
    pub order: Option<OrderRef>,
    #[serde(default)]
    pub messages: Vec<ReturnMessage>,
    #[serde(alias = "tracking_number")]
    pub tracking_number: Option<String>,
    #[serde(alias = "received_condition")]
    pub received_condition: Option<String>,
    pub seller_response: Option<String>,
    pub dispute_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub resolution: Option<String>,
    pub return_address: Option<ReturnAddress>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub buyer_shipped_at: Option<DateTime<Utc>>,
    pub seller_received_at: Option<DateTime<Utc>>,
}

impl Return {
    /// Admin has already ruled on this return
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order.as_ref()?.order_number.as_deref()
    }

    pub fn shop_name(&self) -> Option<&str> {
        self.seller_profile.as_ref()?.shop_name.as_deref()
    }

    pub fn buyer_username(&self) -> Option<&str> {
        self.buyer.as_ref()?.username.as_deref()
    }

    /// First eight characters of the id, for headings
    pub fn short_id(&self) -> &str {
        match self.return_id.char_indices().nth(8) {
            Some((idx, _)) => &self.return_id[..idx],
            None => &self.return_id,
        }
    }

    pub fn reason_label(&self) -> String {
        reason_label(&self.reason)
    }
}

/// Human label for a return reason code
pub fn reason_label(reason: &str) -> String {
    match reason {
        "damaged" => "Item arrived damaged".to_string(),
        "not_as_described" => "Not as described".to_string(),
        "wrong_item" => "Wrong item received".to_string(),
        "missing_parts" => "Missing parts".to_string(),
        "changed_mind" => "Changed mind".to_string(),
        "other" => "Other".to_string(),
        other => {
            let spaced = other.replace(['_', '-'], " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Reason codes offered on the create form
pub const RETURN_REASONS: &[&str] = &[
    "damaged",
    "not_as_described",
    "wrong_item",
    "missing_parts",
    "changed_mind",
    "other",
];

/// Evidence file attached to a new return
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Create return request
#[derive(Debug, Clone)]
pub struct NewReturn {
    pub order_id: String,
    pub reason: String,
    pub description: String,
    pub evidence: Vec<EvidenceFile>,
}

/// Server-side filters of the admin returns list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminReturnsQuery {
    pub status: Option<String>,
    pub disputed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_return() {
        let ret: Return = serde_json::from_value(json!({
            "returnId": "ret_0123456789",
            "status": "approved",
            "shippingStatus": "inTransit",
            "reason": "damaged",
            "description": "Frame cracked",
            "evidenceImages": ["https://cdn.example/a.jpg"],
            "buyerId": "u1",
            "buyer": { "userId": "u1", "username": "ana" },
            "sellerProfile": { "sellerProfileId": "s1", "shopName": "Galleria" },
            "order": { "orderId": "o1", "orderNumber": "MUS-1001", "totalAmount": 1500.0 },
            "messages": [{ "senderId": "u1", "isAdmin": false, "message": "hi", "createdAt": "2026-01-02T03:04:05Z" }],
            "tracking_number": "LBC123",
            "buyerShippedAt": "2026-01-03T00:00:00Z",
            "returnAddress": { "name": "Galleria", "city": "Makati" }
        }))
        .unwrap();

        assert_eq!(ret.status, ReturnStatus::Approved);
        assert_eq!(ret.shipping_status, Some(ShippingStatus::InTransit));
        assert_eq!(ret.tracking_number.as_deref(), Some("LBC123"));
        assert_eq!(ret.order_number(), Some("MUS-1001"));
        assert_eq!(ret.shop_name(), Some("Galleria"));
        assert_eq!(ret.buyer_username(), Some("ana"));
        assert_eq!(ret.short_id(), "ret_0123");
        assert_eq!(ret.messages.len(), 1);
        assert!(!ret.is_resolved());
    }

    #[test]
    fn test_unknown_states_are_tolerated() {
        let ret: Return = serde_json::from_value(json!({
            "returnId": "r1",
            "status": "cancelled",
            "shippingStatus": "lost"
        }))
        .unwrap();

        assert_eq!(ret.status, ReturnStatus::Unknown);
        assert_eq!(ret.shipping_status, Some(ShippingStatus::Unknown));
        assert!(ret.messages.is_empty());
    }

    #[test]
    fn test_null_shipping_status() {
        let ret: Return = serde_json::from_value(json!({
            "returnId": "r1",
            "status": "pending",
            "shippingStatus": null
        }))
        .unwrap();
        assert_eq!(ret.shipping_status, None);
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(reason_label("wrong_item"), "Wrong item received");
        assert_eq!(reason_label("late_delivery"), "Late delivery");
        assert_eq!(reason_label(""), "");
    }

    #[test]
    fn test_address_lines_skip_blanks() {
        let address = ReturnAddress {
            name: Some("Galleria".to_string()),
            street: Some("  ".to_string()),
            city: Some("Makati".to_string()),
            postal_code: Some("1200".to_string()),
            ..Default::default()
        };
        assert_eq!(address.lines(), vec!["Galleria", "Makati, 1200"]);
    }
}
