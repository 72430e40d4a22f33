use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use env_logger::Env;
use quizcraft_server::{
    app_state::AppState, config::Config, handlers::configure_routes,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(err) => {
            log::error!("Failed to start: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(|cfg| configure_routes(cfg, &state))
    })
    .bind(bind_addr)?
    .run()
    .await
}
