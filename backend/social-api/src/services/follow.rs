use crate::config::SelfFollowPolicy;
use crate::db::FollowerRepository;
use crate::error::{AppError, Result};
use crate::models::UnfollowOutcome;
use std::sync::Arc;
use tracing::{debug, info};

/// Directed follow edges between users.
///
/// Uniqueness of an edge is left to the store's constraint: `follow`
/// inserts unconditionally and reports the constraint violation as a
/// conflict instead of checking first.
#[derive(Clone)]
pub struct FollowerGraph {
    followers: Arc<dyn FollowerRepository>,
    policy: SelfFollowPolicy,
}

impl FollowerGraph {
    pub fn new(followers: Arc<dyn FollowerRepository>, policy: SelfFollowPolicy) -> Self {
        Self { followers, policy }
    }

    pub async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        if follower_id == followed_id && self.policy == SelfFollowPolicy::Reject {
            return Err(AppError::BadRequest("users cannot follow themselves".into()));
        }

        self.followers
            .follow(follower_id, followed_id)
            .await
            .map_err(AppError::from)?;

        info!(follower_id, followed_id, "Follow edge created");
        Ok(())
    }

    /// Remove the edge if present. A missing edge is not an error.
    pub async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<UnfollowOutcome> {
        let outcome = self.followers.unfollow(follower_id, followed_id).await?;

        match outcome {
            UnfollowOutcome::Removed => info!(follower_id, followed_id, "Follow edge removed"),
            UnfollowOutcome::NotFollowing => {
                debug!(follower_id, followed_id, "Unfollow without existing edge")
            }
        }

        Ok(outcome)
    }

    pub async fn following(&self, follower_id: i64) -> Result<Vec<i64>> {
        Ok(self.followers.following(follower_id).await?)
    }
}
