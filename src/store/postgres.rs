use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, WaitlistStore};
use crate::domain::{WaitlistEmail, WaitlistEntry, WaitlistStatus};

#[derive(Clone)]
pub struct PostgresWaitlistStore {
    pool: PgPool,
}

impl PostgresWaitlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::DuplicateEmail,
        _ => {
            tracing::error!("Failed to execute query: {:?}", e);
            StoreError::Database(e)
        }
    }
}

#[async_trait]
impl WaitlistStore for PostgresWaitlistStore {
    #[tracing::instrument(name = "Persisting waitlist entry to database", skip(self))]
    async fn insert(&self, email: &WaitlistEmail) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO waitlist (id, email, status) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(email.as_ref())
            .bind(WaitlistStatus::Pending.as_ref())
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(())
    }

    #[tracing::instrument(name = "Updating waitlist entry status", skip(self))]
    async fn update_status(
        &self,
        email: &WaitlistEmail,
        status: WaitlistStatus,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE waitlist SET status = $2 WHERE email = $1")
            .bind(email.as_ref())
            .bind(status.as_ref())
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(())
    }

    #[tracing::instrument(name = "Fetching waitlist entry", skip(self))]
    async fn find(&self, email: &WaitlistEmail) -> Result<Option<WaitlistEntry>, StoreError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "SELECT email, status, created_at FROM waitlist WHERE email = $1",
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }
}
