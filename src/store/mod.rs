use async_trait::async_trait;

use crate::domain::{WaitlistEmail, WaitlistEntry, WaitlistStatus};
use crate::utils::error_chain_fmt;

mod in_memory;
mod postgres;

pub use in_memory::InMemoryWaitlistStore;
pub use postgres::PostgresWaitlistStore;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("This email is already on the waitlist")]
    DuplicateEmail,
    #[error("Failed to save to database")]
    Database(#[source] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Durable home of waitlist entries.
///
/// `insert` must be atomic with respect to the email uniqueness rule: of two
/// concurrent inserts for the same address exactly one succeeds and the other
/// observes `StoreError::DuplicateEmail`.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Creates a `pending` entry stamped with the store's clock.
    async fn insert(&self, email: &WaitlistEmail) -> Result<(), StoreError>;
    async fn update_status(
        &self,
        email: &WaitlistEmail,
        status: WaitlistStatus,
    ) -> Result<(), StoreError>;
    async fn find(&self, email: &WaitlistEmail) -> Result<Option<WaitlistEntry>, StoreError>;
}
