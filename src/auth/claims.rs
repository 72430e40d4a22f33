use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token payload. Nothing beyond the subject and the validity window is
/// embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub iat: usize,  // Issued at (as UTC timestamp)
    pub exp: usize,  // Expiration time (as UTC timestamp)
}

impl Claims {
    pub fn new(subject_id: &str, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let exp = issued_at + lifetime;

        Self {
            sub: subject_id.to_string(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        }
    }
}
