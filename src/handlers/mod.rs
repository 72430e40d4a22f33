pub mod auth_handler;
pub mod health_handler;

use actix_web::{error::InternalError, web, ResponseError};

use crate::{app_state::AppState, errors::AppError};

pub use auth_handler::{login, me, signup};
pub use health_handler::health_check;

/// Registers shared state and every route on an app or test service.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let app_error = AppError::ValidationError(format!("Invalid request body: {}", err));
        let response = app_error.error_response();
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::Data::from(state.token_service.clone()))
        .app_data(json_config)
        .service(health_check)
        .service(
            web::scope("/api/auth")
                .service(signup)
                .service(login)
                .service(me),
        );
}
