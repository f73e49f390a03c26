mod health;
mod submit_email;

pub use health::health_check;
pub use submit_email::{
    preflight, submit_email, ApiKey, SubmitEmailBody, SubmitEmailError, MAX_BODY_BYTES,
};
