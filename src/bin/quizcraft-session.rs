//! Command-line session client for the auth API.
//!
//! ```text
//! quizcraft-session [status]
//! quizcraft-session login <email> <password> [return-path]
//! quizcraft-session signup <username> <email> <password>
//! quizcraft-session logout
//! quizcraft-session open <path>
//! ```

use env_logger::Env;
use quizcraft_server::{
    client::{
        forms::{logout, submit_login, submit_signup},
        Location, Navigation, RouteTable, SessionStore,
    },
    config::ClientConfig,
};
use tokio_util::sync::CancellationToken;

fn usage() -> ! {
    eprintln!("usage: quizcraft-session [status | login <email> <password> [return-path] | signup <username> <email> <password> | logout | open <path>]");
    std::process::exit(2);
}

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ClientConfig::from_env();
    let store = SessionStore::from_config(&config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let session = store.initialize(&cancel).await;
    let api = quizcraft_server::client::HttpAuthApi::new(&config.api_base_url);

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let code = match args.as_slice() {
        [] | ["status"] => {
            match session.user {
                Some(user) => println!("logged in as {} <{}>", user.username, user.email),
                None => println!("not logged in"),
            }
            0
        }
        ["login", email, password, rest @ ..] => {
            let from = rest.first().map(|p| Location::parse(p));
            match submit_login(&api, &store, email, password, from.as_ref()).await {
                Ok(destination) => {
                    println!("logged in; continue to {}", destination);
                    0
                }
                Err(err) => {
                    eprintln!("{}", err);
                    1
                }
            }
        }
        ["signup", username, email, password] => {
            match submit_signup(&api, username, email, password).await {
                Ok((response, next)) => {
                    println!("{} continue to {}", response.message, next);
                    0
                }
                Err(err) => {
                    eprintln!("{}", err);
                    1
                }
            }
        }
        ["logout"] => {
            println!("logged out; continue to {}", logout(&store));
            0
        }
        ["open", path] => {
            match RouteTable::navigate(path, &store.session()) {
                Navigation::Render(view) => println!("render {:?}", view),
                Navigation::Pending => println!("checking authentication..."),
                Navigation::Redirect { to, from, .. } => {
                    println!("redirect to {} (from {})", to, from.pathname)
                }
                Navigation::NotFound => println!("not found"),
            }
            0
        }
        _ => usage(),
    };

    std::process::exit(code);
}
