#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use quizcraft_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::User,
    repositories::UserRepository,
};

pub const TEST_SECRET: &str = "integration_test_jwt_secret_0123456789";

/// Credential store keyed by hex id, with the same uniqueness rules as the
/// database indexes.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "Email or username already exists.".to_string(),
            ));
        }
        users.insert(user.id_hex(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.username == username || u.email == email))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quizcraft-test".to_string(),
        users_collection: "users".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        jwt_secret: Some(SecretString::from(TEST_SECRET.to_string())),
        jwt_expiration_minutes: 60,
        bcrypt_cost: 4,
        cors_allowed_origin: "http://localhost:5173".to_string(),
    }
}

pub fn test_state(repo: Arc<InMemoryUserRepository>) -> AppState {
    AppState::with_repository(test_config(), repo).expect("test state")
}
