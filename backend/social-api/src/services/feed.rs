use crate::db::PostRepository;
use crate::error::Result;
use crate::models::{FeedQuery, PostWithMetadata};
use crate::services::FollowerGraph;
use std::sync::Arc;
use tracing::debug;

/// Assembles one page of a user's feed: their own posts plus the posts of
/// everyone they follow.
#[derive(Clone)]
pub struct FeedEngine {
    graph: FollowerGraph,
    posts: Arc<dyn PostRepository>,
}

impl FeedEngine {
    pub fn new(graph: FollowerGraph, posts: Arc<dyn PostRepository>) -> Self {
        Self { graph, posts }
    }

    pub async fn feed(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<PostWithMetadata>> {
        let authors = feed_authors(user_id, self.graph.following(user_id).await?);

        debug!(
            user_id,
            authors = authors.len(),
            limit = query.limit,
            offset = query.offset,
            "Loading feed page"
        );

        Ok(self.posts.feed(authors, query).await?)
    }
}

/// `{user_id} ∪ following`, sorted and without duplicates.
fn feed_authors(user_id: i64, mut following: Vec<i64>) -> Vec<i64> {
    following.push(user_id);
    following.sort_unstable();
    following.dedup();
    following
}
