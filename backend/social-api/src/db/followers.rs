use super::{with_timeout, FollowerRepository, StoreResult};
use crate::models::UnfollowOutcome;
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

/// PostgreSQL follower edges.
///
/// The `(follower_id, followed_id)` primary key is what keeps edges unique;
/// `follow` never checks for an existing row first.
#[derive(Clone)]
pub struct PgFollowerStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgFollowerStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl FollowerRepository for PgFollowerStore {
    async fn follow(&self, follower_id: i64, followed_id: i64) -> StoreResult<()> {
        with_timeout(
            self.timeout,
            sqlx::query("INSERT INTO followers (follower_id, followed_id) VALUES ($1, $2)")
                .bind(follower_id)
                .bind(followed_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> StoreResult<UnfollowOutcome> {
        let result = with_timeout(
            self.timeout,
            sqlx::query("DELETE FROM followers WHERE follower_id = $1 AND followed_id = $2")
                .bind(follower_id)
                .bind(followed_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(UnfollowOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn following(&self, follower_id: i64) -> StoreResult<Vec<i64>> {
        with_timeout(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "SELECT followed_id FROM followers WHERE follower_id = $1",
            )
            .bind(follower_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
