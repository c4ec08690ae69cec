mod forms;
mod payout;
mod returns;
mod role;

pub use forms::*;
pub use payout::*;
pub use returns::*;
pub use role::*;
