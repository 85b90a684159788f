mod transport;
pub use transport::*;

mod twilio;
pub use twilio::*;

mod dispatch;
pub use dispatch::*;
