use crate::db::{CommentRepository, PostRepository};
use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, Post, PostPatch};
use std::sync::Arc;
use tracing::info;

/// Post and comment operations.
///
/// Handlers pass posts that were already resolved by id, so the lookups
/// here only concern follow-up reads (comments) and writes.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn create(&self, post: NewPost) -> Result<Post> {
        let post = self.posts.create(post).await?;
        info!(post_id = post.id, user_id = post.user_id, "Post created");
        Ok(post)
    }

    /// Attach the post's comments, newest first.
    pub async fn with_comments(&self, mut post: Post) -> Result<Post> {
        post.comments = Some(self.comments.get_by_post_id(post.id).await?);
        Ok(post)
    }

    /// Apply a partial update. An empty patch returns the post untouched
    /// without writing.
    pub async fn update(&self, mut post: Post, patch: PostPatch) -> Result<Post> {
        if patch.is_empty() {
            return Ok(post);
        }

        patch.apply_to(&mut post);
        Ok(self.posts.update(&post).await?)
    }

    pub async fn delete(&self, post_id: i64) -> Result<()> {
        self.posts.delete(post_id).await?;
        info!(post_id, "Post deleted");
        Ok(())
    }

    pub async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        Ok(self.comments.create(comment).await?)
    }
}
