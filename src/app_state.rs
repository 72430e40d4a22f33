use std::sync::Arc;

use crate::{
    auth::TokenService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoUserRepository, UserRepository},
    services::AuthService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db, &config.users_collection));
        user_repository.ensure_indexes().await?;

        Self::with_repository(config, user_repository)
    }

    /// Builds the state around an already constructed credential store.
    /// Fails when no signing secret is configured.
    pub fn with_repository(config: Config, users: Arc<dyn UserRepository>) -> AppResult<Self> {
        let token_service = Arc::new(TokenService::new(
            config.jwt_secret()?,
            config.jwt_expiration_minutes,
        ));
        let auth_service = Arc::new(AuthService::new(
            users,
            token_service.clone(),
            config.bcrypt_cost,
        ));

        Ok(Self {
            auth_service,
            token_service,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_state_requires_secret() {
        let config = Config {
            jwt_secret: None,
            ..Config::test_config()
        };

        let result = AppState::with_repository(config, Arc::new(MockUserRepository::new()));
        assert!(result.is_err());
    }
}
