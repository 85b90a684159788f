use thiserror::Error as ThisError;

/// Shortest and longest billing period a member can sign up for.
pub const MIN_DURATION_MONTHS: u8 = 1;
pub const MAX_DURATION_MONTHS: u8 = 12;

/// Member input errors
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Please enter a name")]
    EmptyName,
    #[error("Please enter a contact")]
    EmptyContact,
    #[error("Payment duration must be between 1 and 12 months, got {0}")]
    DurationOutOfRange(u8),
}
