use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tera::Tera;

use crate::domain::{WaitlistEmail, WaitlistStatus};
use crate::notification::{Notifier, SignupNotification};
use crate::store::{StoreError, WaitlistStore};
use crate::utils::error_chain_fmt;

/// How a successful signup ended for the notification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    NotificationDelayed,
}

#[derive(thiserror::Error)]
pub enum JoinError {
    #[error("This email is already on the waitlist")]
    DuplicateEmail,
    #[error(transparent)]
    Persistence(StoreError),
}

impl std::fmt::Debug for JoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for JoinError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            e => Self::Persistence(e),
        }
    }
}

#[derive(Clone)]
pub struct Waitlist {
    store: Arc<dyn WaitlistStore>,
    notifier: Arc<dyn Notifier>,
    templates: Arc<Tera>,
}

impl Waitlist {
    pub fn new(
        store: Arc<dyn WaitlistStore>,
        notifier: Arc<dyn Notifier>,
        templates: Tera,
    ) -> Self {
        Self {
            store,
            notifier,
            templates: Arc::new(templates),
        }
    }

    /// Records `email` and then tries once to announce it.
    ///
    /// Only the insert can fail the call. Once the entry exists the
    /// notification outcome is written to its status and reported through
    /// [`JoinOutcome`].
    #[tracing::instrument(name = "Adding a new waitlist entry", skip(self))]
    pub async fn join(&self, email: WaitlistEmail) -> Result<JoinOutcome, JoinError> {
        self.store.insert(&email).await?;

        let status = match self.notify(&email).await {
            Ok(()) => WaitlistStatus::Completed,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to deliver signup notification");
                WaitlistStatus::EmailFailed
            }
        };

        if let Err(e) = self.store.update_status(&email, status).await {
            tracing::warn!(error = ?e, %status, "Failed to record notification status");
        }

        Ok(match status {
            WaitlistStatus::Completed => JoinOutcome::Joined,
            _ => JoinOutcome::NotificationDelayed,
        })
    }

    #[tracing::instrument(name = "Notifying about a new signup", skip(self))]
    async fn notify(&self, email: &WaitlistEmail) -> Result<(), anyhow::Error> {
        let notification = SignupNotification::render(&self.templates, email, Utc::now())
            .context("Failed to render the signup notification")?;
        self.notifier
            .send(notification.subject, &notification.html_body)
            .await
            .context("Failed to send the signup notification")?;
        Ok(())
    }
}
