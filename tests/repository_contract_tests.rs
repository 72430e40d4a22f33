mod common;

use common::InMemoryUserRepository;
use quizcraft_server::{errors::AppError, models::domain::User, repositories::UserRepository};

fn user(username: &str, email: &str) -> User {
    User::new(username, email, "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string())
}

async fn assert_user_repository_contract(repo: &dyn UserRepository) {
    repo.ensure_indexes().await.unwrap();

    let alice = repo.create(user("alice", "a@x.com")).await.unwrap();

    let by_id = repo.find_by_id(&alice.id_hex()).await.unwrap();
    assert_eq!(by_id.as_ref().map(|u| u.username.as_str()), Some("alice"));

    let by_email = repo.find_by_email("a@x.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(alice.id));

    assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
    assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());

    assert!(repo.exists_by_username_or_email("alice", "other@x.com").await.unwrap());
    assert!(repo.exists_by_username_or_email("other", "a@x.com").await.unwrap());
    assert!(!repo.exists_by_username_or_email("other", "other@x.com").await.unwrap());

    let same_username = repo.create(user("alice", "new@x.com")).await;
    assert!(matches!(same_username, Err(AppError::Conflict(_))));

    let same_email = repo.create(user("alicia", "a@x.com")).await;
    assert!(matches!(same_email, Err(AppError::Conflict(_))));

    repo.create(user("bob", "b@x.com")).await.unwrap();
}

#[actix_web::test]
async fn test_in_memory_user_repository_contract() {
    let repo = InMemoryUserRepository::new();
    assert_user_repository_contract(&repo).await;
    assert_eq!(repo.len().await, 2);
}
