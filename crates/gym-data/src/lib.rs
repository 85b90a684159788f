// Operations
mod operations;
pub use operations::*;

// Errors
mod errors;
pub use errors::*;

// Models
mod members;
pub use members::*;
