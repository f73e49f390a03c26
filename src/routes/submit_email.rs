use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::domain::WaitlistEmail;
use crate::store::StoreError;
use crate::utils::error_chain_fmt;
use crate::waitlist::{JoinError, JoinOutcome, Waitlist};

const JOINED_MESSAGE: &str = "Successfully joined waitlist";
const NOTIFICATION_DELAYED_WARNING: &str = "Notification delivery delayed";
const FAILED_TO_PROCESS: &str = "Failed to process request";
/// Bodies larger than this are refused with the JSON 500 instead of being buffered.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(serde::Deserialize)]
pub struct SubmitEmailBody {
    email: Option<String>,
}

impl TryFrom<SubmitEmailBody> for WaitlistEmail {
    type Error = String;

    fn try_from(value: SubmitEmailBody) -> Result<Self, Self::Error> {
        WaitlistEmail::parse(value.email.unwrap_or_default())
    }
}

/// Bearer credential expected on submissions; `None` disables the check.
#[derive(Clone)]
pub struct ApiKey(pub Option<Secret<String>>);

impl ApiKey {
    fn authorize(&self, request: &HttpRequest) -> Result<(), SubmitEmailError> {
        let Some(expected) = &self.0 else {
            return Ok(());
        };

        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
            .map(|(_, token)| token.trim_start());

        match presented {
            Some(token) if token == expected.expose_secret() => Ok(()),
            _ => Err(SubmitEmailError::Unauthorized),
        }
    }
}

#[derive(Serialize)]
struct JoinedResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SubmitEmailError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    ValidationError(String),
    #[error("This email is already on the waitlist")]
    DuplicateEmail,
    #[error("Failed to save to database")]
    PersistenceError(#[source] StoreError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubmitEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<JoinError> for SubmitEmailError {
    fn from(e: JoinError) -> Self {
        match e {
            JoinError::DuplicateEmail => Self::DuplicateEmail,
            JoinError::Persistence(e) => Self::PersistenceError(e),
        }
    }
}

impl ResponseError for SubmitEmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ValidationError(_) | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::PersistenceError(_) | Self::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::PersistenceError(_) => ErrorResponse {
                error: FAILED_TO_PROCESS.to_string(),
                details: Some(self.to_string()),
            },
            Self::UnexpectedError(e) => ErrorResponse {
                error: FAILED_TO_PROCESS.to_string(),
                details: Some(format!("{e:#}")),
            },
            _ => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[tracing::instrument(
    name = "Submitting an email to the waitlist",
    skip(request, payload, waitlist, api_key),
    fields(waitlist_email = tracing::field::Empty)
)]
pub async fn submit_email(
    request: HttpRequest,
    payload: web::Payload,
    waitlist: web::Data<Waitlist>,
    api_key: web::Data<ApiKey>,
) -> Result<HttpResponse, SubmitEmailError> {
    api_key.authorize(&request)?;

    let body = payload
        .to_bytes_limited(MAX_BODY_BYTES)
        .await
        .map_err(|_| anyhow::anyhow!("Request body exceeds {MAX_BODY_BYTES} bytes"))?
        .map_err(|e| anyhow::anyhow!("Failed to read the request body: {e}"))?;
    let body: SubmitEmailBody =
        serde_json::from_slice(&body).context("Failed to parse the request body")?;
    let email = WaitlistEmail::try_from(body).map_err(SubmitEmailError::ValidationError)?;
    tracing::Span::current().record("waitlist_email", tracing::field::display(&email));

    let response = match waitlist.join(email).await? {
        JoinOutcome::Joined => JoinedResponse {
            message: JOINED_MESSAGE,
            warning: None,
        },
        JoinOutcome::NotificationDelayed => JoinedResponse {
            message: JOINED_MESSAGE,
            warning: Some(NOTIFICATION_DELAYED_WARNING),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// CORS preflight. The headers themselves are added to every response by the
/// app-wide middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}
