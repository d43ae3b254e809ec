use super::{with_timeout, CommentRepository, StoreError, StoreResult};
use crate::models::{Comment, NewComment};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgCommentStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CommentRepository for PgCommentStore {
    /// A post deleted after it was resolved reports `NotFound`.
    async fn create(&self, comment: NewComment) -> StoreResult<Comment> {
        let inserted = with_timeout(
            self.timeout,
            sqlx::query_as::<_, Comment>(
                r#"
                INSERT INTO comments (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, user_id, content, created_at
                "#,
            )
            .bind(comment.post_id)
            .bind(comment.user_id)
            .bind(&comment.content)
            .fetch_one(&self.pool),
        )
        .await;

        match inserted {
            Err(err) if err.is_foreign_key_violation() => Err(StoreError::NotFound),
            other => other,
        }
    }

    async fn get_by_post_id(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Comment>(
                r#"
                SELECT id, post_id, user_id, content, created_at
                FROM comments
                WHERE post_id = $1
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(post_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
