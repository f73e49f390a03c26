use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::notification::{NotifyError, Notifier};

#[derive(Clone)]
pub struct EmailClient {
    base_url: String,
    http_client: reqwest::Client,
    sender: String,
    recipient: String,
    token: Secret<String>,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendEmailRequestBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        recipient: String,
        token: Secret<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            sender,
            recipient,
            token,
            timeout,
        }
    }

    #[tracing::instrument(name = "Sending email", skip(self, html_body))]
    pub async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifyError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequestBody {
            from: &self.sender,
            to: recipient,
            subject,
            html: html_body,
        };

        let response = self
            .http_client
            .post(url)
            .timeout(self.timeout)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailClient {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        self.send_email(&self.recipient, subject, html_body).await
    }
}
