//! Draft persistence — durable key/value storage for onboarding drafts.

pub mod libsql_backend;
pub mod migrations;

use async_trait::async_trait;

use crate::error::StoreError;

pub use libsql_backend::LibSqlDraftStore;

/// Backend-agnostic draft store: string keys to string values.
///
/// The engine is the only writer; the submission coordinator (and an
/// explicit user reset) are the only paths that clear it.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any existing entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the entry under `key`. Returns whether an entry existed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;
}
