pub mod request;
pub mod response;

pub use request::{LoginRequest, SignupRequest};
pub use response::{LoginResponse, MeResponse, SignupResponse, UserSummary};
