use actix_web::web;

use crate::errors::AppResult;

/// Hashes on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hashed = web::block(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    let matches = web::block(move || bcrypt::verify(password, &password_hash)).await??;
    Ok(matches)
}
