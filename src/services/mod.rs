pub mod details_store;
pub mod payout_cron;
pub mod return_details;
pub mod return_filter;
pub mod return_flow;

pub use details_store::{DetailsKey, DetailsStore};
pub use payout_cron::PayoutCron;
pub use return_details::ReturnDetails;
