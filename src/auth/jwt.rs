use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
};

/// Outcome of a failed verification. Malformed, tampered, unsigned and
/// expired tokens are deliberately not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is invalid or expired")]
    Invalid,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &SecretString, expiration_minutes: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::default();
        // expiry is exact
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            lifetime: Duration::minutes(expiration_minutes),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, subject_id: &str) -> AppResult<String> {
        self.issue_at(subject_id, Utc::now())
    }

    pub fn issue_at(&self, subject_id: &str, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims::new(subject_id, issued_at, self.lifetime);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    /// Returns the subject id carried by a valid token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                log::debug!("Token rejected: {:?}", e.kind());
                TokenError::Invalid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service() -> TokenService {
        let config = Config::test_config();
        TokenService::new(config.jwt_secret().unwrap(), config.jwt_expiration_minutes)
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();

        let token = tokens.issue("65f0aa11bb22cc33dd44ee55").unwrap();
        assert!(!token.is_empty());

        assert_eq!(
            tokens.verify(&token),
            Ok("65f0aa11bb22cc33dd44ee55".to_string())
        );
    }

    #[test]
    fn test_default_lifetime_is_one_hour() {
        assert_eq!(service().lifetime(), Duration::hours(1));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = service();

        let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(5);
        let token = tokens.issue_at("someone", issued_at).unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_token_just_inside_lifetime_is_valid() {
        let tokens = service();

        let issued_at = Utc::now() - Duration::minutes(59);
        let token = tokens.issue_at("someone", issued_at).unwrap();

        assert_eq!(tokens.verify(&token), Ok("someone".to_string()));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            service().verify("invalid.token.here"),
            Err(TokenError::Invalid)
        );
        assert_eq!(service().verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let other = TokenService::new(&SecretString::from("another_secret".to_string()), 60);
        let token = other.issue("someone").unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let tokens = service();
        let token = tokens.issue("someone").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = {
            let other = tokens.issue("someone-else").unwrap();
            other.split('.').nth(1).unwrap().to_string()
        };
        parts[1] = forged_payload.as_str();
        let forged = parts.join(".");

        assert_eq!(tokens.verify(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn test_unsigned_token_is_invalid() {
        let tokens = service();
        let token = tokens.issue("someone").unwrap();
        let unsigned: String = token.rsplitn(2, '.').nth(1).unwrap().to_string() + ".";

        assert_eq!(tokens.verify(&unsigned), Err(TokenError::Invalid));
    }
}
