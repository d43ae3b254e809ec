use super::{with_timeout, StoreResult, UserRepository};
use crate::models::{NewUser, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

/// PostgreSQL user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (username, email, password)
                VALUES ($1, $2, $3)
                RETURNING id, username, email, password, created_at
                "#,
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, user_id: i64) -> StoreResult<User> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_one(&self.pool),
        )
        .await
    }
}
