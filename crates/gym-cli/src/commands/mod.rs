mod members;
pub use members::*;

mod reminders;
pub use reminders::*;
