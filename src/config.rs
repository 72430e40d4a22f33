use std::{env, path::PathBuf, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub users_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: Option<SecretString>,
    pub jwt_expiration_minutes: i64,
    pub bcrypt_cost: u32,
    pub cors_allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quizcraft".to_string()),
            users_collection: env::var("USERS_COLLECTION").unwrap_or_else(|_| "users".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(SecretString::from),
            jwt_expiration_minutes: env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(60),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }

    /// The signing secret. There is no fallback value: without it no token
    /// can be issued, so startup must fail.
    pub fn jwt_secret(&self) -> AppResult<&SecretString> {
        self.jwt_secret.as_ref().ok_or_else(|| {
            AppError::InternalError("JWT_SECRET is not defined".to_string())
        })
    }

    /// Checks the settings the server cannot run without.
    pub fn validate(&self) -> AppResult<()> {
        let secret = self.jwt_secret()?;

        if secret.expose_secret().len() < 32 {
            log::warn!(
                "JWT_SECRET is only {} bytes; use at least 32 random bytes outside development",
                secret.expose_secret().len()
            );
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::InternalError(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizcraft-test".to_string(),
            users_collection: "users".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: Some(SecretString::from("test_jwt_secret_key".to_string())),
            jwt_expiration_minutes: 60,
            bcrypt_cost: 4,
            cors_allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Settings for the session client that talks to the auth API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub whoami_timeout: Duration,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("QUIZCRAFT_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            whoami_timeout: Duration::from_secs(
                env::var("WHOAMI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            session_file: env::var("QUIZCRAFT_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".quizcraft/session.json")),
        }
    }
}
