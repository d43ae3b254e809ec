/// Database access layer
///
/// This module provides:
/// - Repository traits for users, posts, comments and follower edges
/// - PostgreSQL implementations of those traits
/// - `Storage`, the facade that bundles one implementation of each
///
/// Every PostgreSQL call is bounded by the configured query timeout and
/// translates driver errors into `StoreError`.
pub mod comments;
pub mod followers;
pub mod posts;
pub mod users;

pub use comments::PgCommentStore;
pub use followers::PgFollowerStore;
pub use posts::PgPostStore;
pub use users::PgUserStore;

use crate::models::{
    Comment, FeedQuery, NewComment, NewPost, NewUser, Post, PostWithMetadata, UnfollowOutcome,
    User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default per-query timeout
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL unique violation error code
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL foreign key violation error code
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("resource already exists")]
    Conflict,

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                StoreError::Conflict
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// A referenced row is missing (the insert hit a foreign key).
    pub(crate) fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Database(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
        )
    }
}

/// Run a query future under `limit`; dropping it on expiry cancels the query.
pub(crate) async fn with_timeout<T, F>(limit: Duration, query: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the returned row carries the assigned id and timestamp.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    async fn get_by_id(&self, user_id: i64) -> StoreResult<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> StoreResult<Post>;

    async fn get_by_id(&self, post_id: i64) -> StoreResult<Post>;

    /// Replace title and content. No version check: last write wins.
    async fn update(&self, post: &Post) -> StoreResult<Post>;

    async fn delete(&self, post_id: i64) -> StoreResult<()>;

    /// One page of posts written by any of `authors`, with comment counts.
    async fn feed(&self, authors: Vec<i64>, query: &FeedQuery)
        -> StoreResult<Vec<PostWithMetadata>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> StoreResult<Comment>;

    /// Comments of a post, newest first.
    async fn get_by_post_id(&self, post_id: i64) -> StoreResult<Vec<Comment>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Insert the edge; an existing edge surfaces as `StoreError::Conflict`.
    async fn follow(&self, follower_id: i64, followed_id: i64) -> StoreResult<()>;

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> StoreResult<UnfollowOutcome>;

    /// Identities followed by `follower_id`.
    async fn following(&self, follower_id: i64) -> StoreResult<Vec<i64>>;
}

/// Typed persistence facade: the only writer of persisted state.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub followers: Arc<dyn FollowerRepository>,
}

impl Storage {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        followers: Arc<dyn FollowerRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            followers,
        }
    }

    pub fn postgres(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone(), query_timeout)),
            posts: Arc::new(PgPostStore::new(pool.clone(), query_timeout)),
            comments: Arc::new(PgCommentStore::new(pool.clone(), query_timeout)),
            followers: Arc::new(PgFollowerStore::new(pool, query_timeout)),
        }
    }
}
