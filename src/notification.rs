use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tera::Tera;

use crate::domain::WaitlistEmail;

const NEW_SIGNUP_TEMPLATE: &str = "new_signup.html";
const NEW_SIGNUP_SUBJECT: &str = "New Waitlist Signup";

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("Failed to reach the email API")]
    Request(#[from] reqwest::Error),
    #[error("Email API responded with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers operational messages to the address fixed in configuration.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(
        NEW_SIGNUP_TEMPLATE,
        include_str!("../templates/new_signup.html"),
    )?;
    Ok(tera)
}

#[derive(Debug)]
pub struct SignupNotification {
    pub subject: &'static str,
    pub html_body: String,
}

impl SignupNotification {
    pub fn render(
        templates: &Tera,
        email: &WaitlistEmail,
        signed_up_at: DateTime<Utc>,
    ) -> Result<Self, tera::Error> {
        let mut context = tera::Context::new();
        context.insert("email", email.as_ref());
        context.insert(
            "signed_up_at",
            &signed_up_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        Ok(Self {
            subject: NEW_SIGNUP_SUBJECT,
            html_body: templates.render(NEW_SIGNUP_TEMPLATE, &context)?,
        })
    }
}
