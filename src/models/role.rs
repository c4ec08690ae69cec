use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Viewer role a return is opened as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }

    /// Route prefix of the returns pages for this role
    pub fn base_path(&self) -> &'static str {
        match self {
            Role::Buyer => "/returns",
            Role::Seller => "/seller/returns",
            Role::Admin => "/admin/returns",
        }
    }

    /// Link to the details view of a return
    pub fn details_path(&self, return_id: &str) -> String {
        format!("{}/{}", self.base_path(), return_id)
    }
}

/// Outcome an admin picks when resolving a dispute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Approve,
    Reject,
}

impl FromStr for Resolution {
    type Err = AppError;

    /// Parse the form value ("approve" or "reject")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(AppError::InvalidResolution),
        }
    }
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_paths() {
        assert_eq!(Role::Buyer.details_path("r1"), "/returns/r1");
        assert_eq!(Role::Seller.details_path("r1"), "/seller/returns/r1");
        assert_eq!(Role::Admin.details_path("r1"), "/admin/returns/r1");
    }

    #[test]
    fn test_resolution_parsing() {
        assert_eq!("approve".parse::<Resolution>().ok(), Some(Resolution::Approve));
        assert_eq!("reject".parse::<Resolution>().ok(), Some(Resolution::Reject));
        assert!(matches!(
            "split_50_50".parse::<Resolution>(),
            Err(AppError::InvalidResolution)
        ));
        assert_eq!(
            serde_json::to_value(Resolution::Reject).unwrap(),
            serde_json::json!("reject")
        );
    }
}
