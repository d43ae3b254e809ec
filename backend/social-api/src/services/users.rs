use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a user. The plaintext password never reaches the store.
    pub async fn register(&self, username: String, email: String, password: &str) -> Result<User> {
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))
}
