use crate::models::Return;

/// Case-insensitive substring match over the fields shown in the admin tab.
/// A blank query matches everything.
pub fn matches_query(ret: &Return, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let fields = [
        Some(ret.return_id.as_str()),
        Some(ret.status.as_str()),
        Some(ret.reason.as_str()),
        Some(ret.description.as_str()),
        ret.order_number(),
        ret.shop_name(),
        ret.buyer_username(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the rows matching `query`, preserving server order
pub fn filter_returns(returns: Vec<Return>, query: &str) -> Vec<Return> {
    returns
        .into_iter()
        .filter(|ret| matches_query(ret, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Return> {
        serde_json::from_value(json!([
            {
                "returnId": "ret_a1",
                "status": "pending",
                "reason": "damaged",
                "description": "Glass shattered in transit",
                "order": { "orderNumber": "MUS-1001" },
                "sellerProfile": { "shopName": "Galleria Uno" },
                "buyer": { "username": "ana" }
            },
            {
                "returnId": "ret_b2",
                "status": "disputed",
                "reason": "wrong_item",
                "description": "Received a different print",
                "order": { "orderNumber": "MUS-2002" },
                "sellerProfile": { "shopName": "Print House" },
                "buyer": { "username": "ben" }
            },
            {
                "returnId": "ret_c3",
                "status": "refunded",
                "reason": "other",
                "description": "",
                "buyer": { "username": "Carla" }
            }
        ]))
        .unwrap()
    }

    fn ids(returns: &[Return]) -> Vec<&str> {
        returns.iter().map(|r| r.return_id.as_str()).collect()
    }

    #[test]
    fn test_blank_query_keeps_everything_in_order() {
        assert_eq!(ids(&filter_returns(rows(), "")), vec!["ret_a1", "ret_b2", "ret_c3"]);
        assert_eq!(ids(&filter_returns(rows(), "   ")), vec!["ret_a1", "ret_b2", "ret_c3"]);
    }

    #[test]
    fn test_matches_each_field() {
        assert_eq!(ids(&filter_returns(rows(), "b2")), vec!["ret_b2"]);
        assert_eq!(ids(&filter_returns(rows(), "DISPUTED")), vec!["ret_b2"]);
        assert_eq!(ids(&filter_returns(rows(), "wrong_item")), vec!["ret_b2"]);
        assert_eq!(ids(&filter_returns(rows(), "shattered")), vec!["ret_a1"]);
        assert_eq!(ids(&filter_returns(rows(), "mus-2002")), vec!["ret_b2"]);
        assert_eq!(ids(&filter_returns(rows(), "galleria")), vec!["ret_a1"]);
        assert_eq!(ids(&filter_returns(rows(), "carla")), vec!["ret_c3"]);
    }

    #[test]
    fn test_query_matching_several_rows_keeps_server_order() {
        assert_eq!(ids(&filter_returns(rows(), "MUS-")), vec!["ret_a1", "ret_b2"]);
        assert!(filter_returns(rows(), "nothing like this").is_empty());
    }
}
