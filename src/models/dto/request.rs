use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Missing and null fields deserialize as empty strings so the service can
/// answer with its own message instead of a serde error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 50, message = "Username must be 1 to 50 characters long."))]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

impl SignupRequest {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn has_missing_fields(&self) -> bool {
        self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
    }

    /// Trims identity fields and lower-cases the email. The password is
    /// left untouched.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn has_missing_fields(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
