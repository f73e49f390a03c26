/// An address submitted to the waitlist, kept exactly as provided.
///
/// Only emptiness is rejected: no format check, no trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.is_empty() {
            Err("Email is required".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WaitlistEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
