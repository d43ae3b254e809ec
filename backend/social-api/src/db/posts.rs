use super::{with_timeout, PostRepository, StoreError, StoreResult};
use crate::models::{FeedQuery, NewPost, Post, PostWithMetadata};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

/// PostgreSQL post store, including the feed query
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgPostStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

/// Escape LIKE wildcards so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build the feed page query.
///
/// Ordering is `(created_at, id)` in the requested direction so that pages
/// are stable across repeated calls; the window is applied after ordering.
pub(crate) fn build_feed_query(authors: Vec<i64>, query: &FeedQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT p.id, p.user_id, p.title, p.content, p.tags, p.created_at, p.updated_at,
               COUNT(c.id) AS comments_count
        FROM posts p
        LEFT JOIN comments c ON c.post_id = p.id
        WHERE p.user_id = ANY("#,
    );
    qb.push_bind(authors).push(")");

    if !query.tags.is_empty() {
        qb.push(" AND p.tags @> ").push_bind(query.tags.clone());
    }

    if let Some(term) = query.search.as_deref() {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(since) = query.since {
        qb.push(" AND p.created_at >= ").push_bind(since);
    }
    if let Some(until) = query.until {
        qb.push(" AND p.created_at <= ").push_bind(until);
    }

    let direction = query.sort.as_sql();
    qb.push(" GROUP BY p.id ORDER BY p.created_at ")
        .push(direction)
        .push(", p.id ")
        .push(direction);

    qb.push(" LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset);

    qb
}

#[async_trait]
impl PostRepository for PgPostStore {
    async fn create(&self, post: NewPost) -> StoreResult<Post> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Post>(
                r#"
                INSERT INTO posts (user_id, title, content, tags)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, title, content, tags, created_at, updated_at
                "#,
            )
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.tags)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, post_id: i64) -> StoreResult<Post> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Post>(
                r#"
                SELECT id, user_id, title, content, tags, created_at, updated_at
                FROM posts
                WHERE id = $1
                "#,
            )
            .bind(post_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(&self, post: &Post) -> StoreResult<Post> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Post>(
                r#"
                UPDATE posts
                SET title = $1, content = $2, updated_at = NOW()
                WHERE id = $3
                RETURNING id, user_id, title, content, tags, created_at, updated_at
                "#,
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn delete(&self, post_id: i64) -> StoreResult<()> {
        let result = with_timeout(
            self.timeout,
            sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(post_id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn feed(&self, authors: Vec<i64>, query: &FeedQuery) -> StoreResult<Vec<PostWithMetadata>> {
        let mut qb = build_feed_query(authors, query);
        with_timeout(
            self.timeout,
            qb.build_query_as::<PostWithMetadata>().fetch_all(&self.pool),
        )
        .await
    }
}
