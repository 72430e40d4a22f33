use std::sync::Arc;

use tokio::sync::OnceCell;
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, AuthenticatedUser, TokenService},
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::normalize_email, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
            UserSummary,
        },
    },
    repositories::UserRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const DUMMY_PASSWORD: &str = "quizcraft-dummy-password";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
    /// Hash checked against on unknown emails so that path costs the same
    /// bcrypt work as a wrong password.
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
            dummy_hash: OnceCell::new(),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<SignupResponse> {
        if request.has_missing_fields() {
            return Err(AppError::ValidationError(
                "Please provide username, email, and password.".to_string(),
            ));
        }

        let request = request.normalized();
        request.validate()?;

        if self
            .users
            .exists_by_username_or_email(&request.username, &request.email)
            .await?
        {
            return Err(AppError::Conflict(
                "Email or username already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let user = self
            .users
            .create(User::new(&request.username, &request.email, password_hash))
            .await?;

        log::info!("Created user '{}' ({})", user.username, user.id_hex());

        Ok(SignupResponse {
            message: "User created successfully.".to_string(),
            user: UserSummary::from(&user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        if request.has_missing_fields() {
            return Err(AppError::ValidationError(
                "Please provide email and password.".to_string(),
            ));
        }

        let email = normalize_email(&request.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_string(), self.bcrypt_cost))
                .await?;
            verify_password(request.password, dummy.clone()).await?;
            log::info!("Login failed: no user for email {}", email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(request.password, user.password_hash.clone()).await? {
            log::info!("Login failed: wrong password for email {}", email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user.id_hex())?;

        Ok(LoginResponse {
            message: "Login successful.".to_string(),
            token,
            user: UserSummary::from(&user),
        })
    }

    /// Resolves the identity attached by the auth middleware to the stored
    /// user it names.
    pub async fn current_user(&self, identity: &AuthenticatedUser) -> AppResult<UserSummary> {
        match self.users.find_by_id(&identity.subject_id).await? {
            Some(user) => Ok(UserSummary::from(user)),
            None => {
                log::info!(
                    "Valid token for subject {} that no longer resolves to a user",
                    identity.subject_id
                );
                Err(AppError::NotFound(
                    "User associated with token not found.".to_string(),
                ))
            }
        }
    }
}
