use chrono::{DateTime, Utc};

use super::WaitlistStatus;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaitlistEntry {
    pub email: String,
    #[sqlx(try_from = "String")]
    pub status: WaitlistStatus,
    pub created_at: DateTime<Utc>,
}
