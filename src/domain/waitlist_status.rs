/// Notification-delivery state of a waitlist entry.
///
/// Every entry starts as `Pending` and is moved exactly once, to `Completed`
/// or `EmailFailed`, after the signup notification has been attempted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum WaitlistStatus {
    Pending,
    Completed,
    EmailFailed,
}

impl TryFrom<String> for WaitlistStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
