pub mod datetime;
pub mod status;

pub use status::{days_since_payment, is_paid_in_month, is_unpaid, unpaid_members};
