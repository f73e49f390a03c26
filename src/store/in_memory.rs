use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{StoreError, WaitlistStore};
use crate::domain::{WaitlistEmail, WaitlistEntry, WaitlistStatus};

/// Process-local store keyed by the exact email string.
///
/// The map lock is held across the existence check and the insert, which gives
/// the same single-winner behaviour as a unique index.
#[derive(Default)]
pub struct InMemoryWaitlistStore {
    entries: Mutex<HashMap<String, WaitlistEntry>>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, WaitlistEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn insert(&self, email: &WaitlistEmail) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if entries.contains_key(email.as_ref()) {
            return Err(StoreError::DuplicateEmail);
        }

        entries.insert(
            email.as_ref().to_owned(),
            WaitlistEntry {
                email: email.as_ref().to_owned(),
                status: WaitlistStatus::Pending,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn update_status(
        &self,
        email: &WaitlistEmail,
        status: WaitlistStatus,
    ) -> Result<(), StoreError> {
        if let Some(entry) = self.lock().get_mut(email.as_ref()) {
            entry.status = status;
        }
        Ok(())
    }

    async fn find(&self, email: &WaitlistEmail) -> Result<Option<WaitlistEntry>, StoreError> {
        Ok(self.lock().get(email.as_ref()).cloned())
    }
}
