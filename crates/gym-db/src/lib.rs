
pub mod connection;
pub use connection::{open_test, Connection, TestHandle};

pub mod results;
pub use results::QueryError;

pub mod schema;
pub use schema::MigrationError;

pub mod members;
