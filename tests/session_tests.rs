mod common;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use actix_web::{dev::ServerHandle, App, HttpServer};
use tokio_util::sync::CancellationToken;

use common::{test_state, InMemoryUserRepository};
use quizcraft_server::{
    client::{
        forms::{logout, submit_login, submit_signup},
        ApiErrorKind, AuthApi, FileTokenStorage, HttpAuthApi, Location, Navigation, RouteTable,
        SessionStore, TokenStorage, View, AUTH_TOKEN_KEY,
    },
    handlers::configure_routes,
};

async fn spawn_server() -> (SocketAddr, ServerHandle) {
    let state = test_state(Arc::new(InMemoryUserRepository::new()));

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new().configure(move |cfg| configure_routes(cfg, &state))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind test server");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (addr, handle)
}

fn store_at(api: Arc<HttpAuthApi>, storage: Arc<FileTokenStorage>) -> SessionStore {
    SessionStore::new(api, storage, Duration::from_secs(5))
}

#[actix_web::test]
async fn test_logout_does_not_revoke_token() {
    let (addr, server) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let api = Arc::new(HttpAuthApi::new(&format!("http://{}", addr)));

    submit_signup(api.as_ref(), "alice", "a@x.com", "secret1")
        .await
        .unwrap();

    let store = store_at(api.clone(), Arc::new(FileTokenStorage::new(&path)));
    store.initialize(&CancellationToken::new()).await;
    assert!(!store.is_logged_in());
    assert_eq!(
        RouteTable::navigate("/study", &store.session()),
        Navigation::Redirect {
            to: "/login".to_string(),
            from: Location::new("/study"),
            replace: true,
        }
    );

    let from = Location::new("/study");
    let destination = submit_login(api.as_ref(), &store, "a@x.com", "secret1", Some(&from))
        .await
        .unwrap();
    assert_eq!(destination, "/study");
    assert_eq!(
        RouteTable::navigate(&destination, &store.session()),
        Navigation::Render(View::Study)
    );

    let old_token = store.token().unwrap();
    assert_eq!(logout(&store), "/login");
    assert!(!store.is_logged_in());

    let storage = Arc::new(FileTokenStorage::new(&path));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);

    // a copy of the old token survives logout somewhere; the server still
    // honours it until it expires
    storage.set(AUTH_TOKEN_KEY, &old_token).unwrap();
    let restarted = store_at(api.clone(), storage);
    let session = restarted.initialize(&CancellationToken::new()).await;

    assert!(session.is_logged_in());
    assert_eq!(session.user.unwrap().username, "alice");

    server.stop(true).await;
}

#[actix_web::test]
async fn test_restart_restores_session_from_disk() {
    let (addr, server) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let api = Arc::new(HttpAuthApi::new(&format!("http://{}", addr)));

    submit_signup(api.as_ref(), "bob", "b@x.com", "secret1")
        .await
        .unwrap();
    let store = store_at(api.clone(), Arc::new(FileTokenStorage::new(&path)));
    submit_login(api.as_ref(), &store, "b@x.com", "secret1", None)
        .await
        .unwrap();
    drop(store);

    let restarted = store_at(api.clone(), Arc::new(FileTokenStorage::new(&path)));
    assert!(restarted.is_loading());
    let session = restarted.initialize(&CancellationToken::new()).await;

    assert!(!session.is_loading);
    assert_eq!(session.user.unwrap().email, "b@x.com");

    server.stop(true).await;
}

#[actix_web::test]
async fn test_rejected_token_is_discarded_on_initialize() {
    let (addr, server) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileTokenStorage::new(dir.path().join("session.json")));
    storage.set(AUTH_TOKEN_KEY, "not.a.token").unwrap();
    let api = Arc::new(HttpAuthApi::new(&format!("http://{}", addr)));

    let err = api
        .who_am_i("not.a.token", &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthorized);

    let store = store_at(api, storage.clone());
    let session = store.initialize(&CancellationToken::new()).await;

    assert!(!session.is_logged_in());
    assert!(!session.is_loading);
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);

    server.stop(true).await;
}

#[actix_web::test]
async fn test_client_sees_server_error_codes() {
    let (addr, server) = spawn_server().await;
    let api = HttpAuthApi::new(&format!("http://{}", addr));

    submit_signup(&api, "carol", "c@x.com", "secret1").await.unwrap();

    let conflict = submit_signup(&api, "carol", "c@x.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(conflict.kind, ApiErrorKind::Conflict);
    assert_eq!(conflict.message, "Email or username already exists.");

    let short = submit_signup(&api, "carl", "carl@x.com", "123")
        .await
        .unwrap_err();
    assert_eq!(short.kind, ApiErrorKind::Validation);
    assert_eq!(short.message, "Password must be at least 6 characters long.");

    server.stop(true).await;
}
