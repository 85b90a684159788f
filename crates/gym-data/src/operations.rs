use anyhow::Result;
use async_trait::async_trait;

/// List the records of a store matching a filter.
/// An empty filter matches every record.
#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<T>>;
}

/// Store a new record. The returned copy carries the id
/// the store assigned.
#[async_trait]
pub trait Insert<T> {
    async fn insert(&self, item: T) -> Result<T>;
}

/// Overwrite a stored record, matched by its id
#[async_trait]
pub trait Update<T> {
    async fn update(&self, item: T) -> Result<T>;
}

/// Fetch exactly one record by key, failing if it is missing
#[async_trait]
pub trait Retrieve<T> {
    type Key;
    async fn retrieve(&self, key: Self::Key) -> Result<T>;
}
