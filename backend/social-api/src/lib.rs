/// social-api library
///
/// Posts, comments, the follower graph and the aggregated feed, served as
/// JSON over HTTP.
///
/// Layout:
/// - `db`: repository traits, PostgreSQL implementations and `Storage`
/// - `services`: follower graph, feed engine, post and user services
/// - `handlers`: HTTP routes and the path-id resolver
/// - `middleware`: caller identity and the request timeout
/// - `error`: `AppError` and its HTTP mapping
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use config::{FeedConfig, SelfFollowPolicy};
use db::Storage;
use services::{FeedEngine, FollowerGraph, PostService, UserService};

/// Shared application state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub users: UserService,
    pub posts: PostService,
    pub graph: FollowerGraph,
    pub feed: FeedEngine,
    pub feed_config: FeedConfig,
    pub env: String,
}

impl AppState {
    pub fn new(
        storage: Storage,
        self_follow: SelfFollowPolicy,
        feed_config: FeedConfig,
        env: impl Into<String>,
    ) -> Self {
        let graph = FollowerGraph::new(storage.followers.clone(), self_follow);

        Self {
            users: UserService::new(storage.users.clone()),
            posts: PostService::new(storage.posts.clone(), storage.comments.clone()),
            feed: FeedEngine::new(graph.clone(), storage.posts.clone()),
            graph,
            feed_config,
            env: env.into(),
            storage,
        }
    }
}
