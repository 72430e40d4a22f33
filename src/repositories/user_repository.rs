use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::User,
};

const DUPLICATE_KEY: i32 = 11000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new record. Fails with `Conflict` when the username or
    /// email is already taken.
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(err) if is_duplicate_key(&err) => Err(AppError::Conflict(
                "Email or username already exists.".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let user = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        let existing = self
            .collection
            .find_one(doc! { "$or": [ { "email": email }, { "username": username } ] })
            .await?;
        Ok(existing.is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        for field in ["username", "email"] {
            let options = IndexOptions::builder()
                .unique(true)
                .name(format!("{}_unique", field))
                .build();
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(options)
                .build();

            self.collection.create_index(model).await?;
            log::info!("Created unique index on users.{}", field);
        }

        Ok(())
    }
}
