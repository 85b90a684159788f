use sqlx::FromRow;
use thiserror::Error as ThisError;

/// Lookups that did not resolve to a single member row
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum QueryError {
    #[error("Not found")]
    NotFound,
    /// More than one row matched a lookup by key
    #[error("Ambiguous results ({0:?}) for query")]
    Ambiguous(usize),
}

/// Row produced by `RETURNING id`
#[derive(Debug, Clone, FromRow)]
pub struct Id<T> {
    pub id: T,
}
