use crate::{
    client::{
        api::{ApiError, ApiErrorKind, AuthApi},
        guard::{post_login_destination, Location, LOGIN_PATH},
        session::SessionStore,
    },
    models::dto::{LoginRequest, SignupRequest, SignupResponse},
};

pub const EMPTY_LOGIN_FIELDS: &str = "Please enter both email and password.";
pub const EMPTY_SIGNUP_FIELDS: &str = "Please fill in all fields.";

/// Submits the login form. On success the session is updated and the
/// destination to navigate to (with replace semantics) is returned.
pub async fn submit_login(
    api: &dyn AuthApi,
    store: &SessionStore,
    email: &str,
    password: &str,
    from: Option<&Location>,
) -> Result<String, ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::new(ApiErrorKind::Validation, EMPTY_LOGIN_FIELDS));
    }

    let response = api.login(&LoginRequest::new(email, password)).await?;
    store.login(response.token, response.user);

    let destination = post_login_destination(from);
    log::debug!("Login complete, continuing to {}", destination);
    Ok(destination)
}

/// Submits the signup form. Signing up does not log the user in; the
/// client continues to the login view.
pub async fn submit_signup(
    api: &dyn AuthApi,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(SignupResponse, String), ApiError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::new(ApiErrorKind::Validation, EMPTY_SIGNUP_FIELDS));
    }

    let response = api
        .signup(&SignupRequest::new(username, email, password))
        .await?;
    Ok((response, LOGIN_PATH.to_string()))
}

/// Logs out and returns the view to show next.
pub fn logout(store: &SessionStore) -> String {
    store.logout();
    LOGIN_PATH.to_string()
}
