//! Client half of the auth flow: the HTTP client for the auth endpoints,
//! durable token storage, the session store and the route guard.

pub mod api;
pub mod forms;
pub mod guard;
pub mod session;
pub mod storage;

pub use api::{ApiError, ApiErrorKind, ApiResult, AuthApi, HttpAuthApi};
pub use guard::{post_login_destination, GuardDecision, Location, Navigation, RouteGuard, RouteTable, View, LOGIN_PATH};
pub use session::{Session, SessionStore};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage, AUTH_TOKEN_KEY};

#[cfg(test)]
pub use api::MockAuthApi;
