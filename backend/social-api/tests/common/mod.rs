//! In-memory store for integration tests
//!
//! Implements every repository trait over plain collections so the real
//! actix routes can be exercised without PostgreSQL. Uniqueness, cascade
//! and ordering rules mirror the schema in `migrations/`.
#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use social_api::config::{FeedConfig, SelfFollowPolicy};
use social_api::db::{
    CommentRepository, FollowerRepository, PostRepository, StoreError, StoreResult, Storage,
    UserRepository,
};
use social_api::models::{
    Comment, FeedQuery, NewComment, NewPost, NewUser, Post, PostWithMetadata, SortDirection,
    UnfollowOutcome, User,
};
use social_api::{handlers, AppState};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

pub const CALLER_HEADER: &str = "x-user-id";

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    followers: BTreeSet<(i64, i64)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Controllable clock: every write takes the current instant, then the
/// clock advances by `step`. A zero step gives identical timestamps.
struct Clock {
    now: DateTime<Utc>,
    step: Duration,
}

impl Clock {
    fn tick(&mut self) -> DateTime<Utc> {
        let now = self.now;
        self.now = self.now + self.step;
        now
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<Mutex<Clock>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock: Arc::new(Mutex::new(Clock {
                now: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                step: Duration::seconds(1),
            })),
        }
    }

    pub fn set_clock_step(&self, step: Duration) {
        self.clock.lock().unwrap().step = step;
    }

    fn tick(&self) -> DateTime<Utc> {
        self.clock.lock().unwrap().tick()
    }

    /// Insert a user directly, bypassing password hashing.
    pub fn seed_user(&self, username: &str) -> User {
        let created_at = self.tick();
        let mut tables = self.tables.lock().unwrap();
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "$argon2id$seeded".to_string(),
            created_at,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub fn seed_post(&self, user_id: i64, title: &str, tags: &[&str]) -> Post {
        let created_at = self.tick();
        let mut tables = self.tables.lock().unwrap();
        let post = Post {
            id: tables.next_id(),
            user_id,
            title: title.to_string(),
            content: format!("content of {}", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at,
            updated_at: created_at,
            comments: None,
        };
        tables.posts.insert(post.id, post.clone());
        post
    }

    pub fn edge_count(&self, follower_id: i64, followed_id: i64) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .followers
            .iter()
            .filter(|edge| **edge == (follower_id, followed_id))
            .count()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn storage(&self) -> Storage {
        let store = Arc::new(self.clone());
        Storage::new(store.clone(), store.clone(), store.clone(), store)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let created_at = self.tick();
        let mut tables = self.tables.lock().unwrap();

        if tables
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }

        let user = User {
            id: tables.next_id(),
            username: user.username,
            email: user.email,
            password: user.password_hash,
            created_at,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, user_id: i64) -> StoreResult<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.get(&user_id).cloned().ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: NewPost) -> StoreResult<Post> {
        let created_at = self.tick();
        let mut tables = self.tables.lock().unwrap();
        let post = Post {
            id: tables.next_id(),
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            tags: post.tags,
            created_at,
            updated_at: created_at,
            comments: None,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_by_id(&self, post_id: i64) -> StoreResult<Post> {
        let tables = self.tables.lock().unwrap();
        tables.posts.get(&post_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, post: &Post) -> StoreResult<Post> {
        let updated_at = self.tick();
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.posts.get_mut(&post.id).ok_or(StoreError::NotFound)?;
        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.updated_at = updated_at;
        Ok(stored.clone())
    }

    async fn delete(&self, post_id: i64) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.posts.remove(&post_id).ok_or(StoreError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != post_id);
        Ok(())
    }

    async fn feed(&self, authors: Vec<i64>, query: &FeedQuery) -> StoreResult<Vec<PostWithMetadata>> {
        let tables = self.tables.lock().unwrap();
        let search = query.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| authors.contains(&p.user_id))
            .filter(|p| query.tags.iter().all(|t| p.tags.contains(t)))
            .filter(|p| match &search {
                Some(term) => {
                    p.title.to_lowercase().contains(term) || p.content.to_lowercase().contains(term)
                }
                None => true,
            })
            .filter(|p| query.since.map_or(true, |since| p.created_at >= since))
            .filter(|p| query.until.map_or(true, |until| p.created_at <= until))
            .collect();

        matching.sort_by_key(|p| (p.created_at, p.id));
        if query.sort == SortDirection::Desc {
            matching.reverse();
        }

        Ok(matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|p| PostWithMetadata {
                post: p.clone(),
                comments_count: tables.comments.values().filter(|c| c.post_id == p.id).count()
                    as i64,
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: NewComment) -> StoreResult<Comment> {
        let created_at = self.tick();
        let mut tables = self.tables.lock().unwrap();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::NotFound);
        }

        let comment = Comment {
            id: tables.next_id(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_by_post_id(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.lock().unwrap();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse((c.created_at, c.id)));
        Ok(comments)
    }
}

#[async_trait]
impl FollowerRepository for MemoryStore {
    async fn follow(&self, follower_id: i64, followed_id: i64) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.followers.insert((follower_id, followed_id)) {
            return Err(StoreError::Conflict);
        }
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> StoreResult<UnfollowOutcome> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.followers.remove(&(follower_id, followed_id));
        Ok(UnfollowOutcome::from_rows_affected(removed as u64))
    }

    async fn following(&self, follower_id: i64) -> StoreResult<Vec<i64>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .followers
            .iter()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followed)| *followed)
            .collect())
    }
}

pub fn app_state(store: &MemoryStore, policy: SelfFollowPolicy) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        store.storage(),
        policy,
        FeedConfig::default(),
        "test",
    ))
}

/// Route table plus state, for `App::new().configure(..)`.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state);
        handlers::routes(cfg);
    }
}
