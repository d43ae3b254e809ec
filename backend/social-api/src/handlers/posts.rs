/// Post handlers - HTTP endpoints for posts and their comments
use super::resolve::Resolved;
use crate::error::Result;
use crate::middleware::CallerId;
use crate::models::{NewComment, NewPost, Post, PostPatch};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostPayload {
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

/// Create a post owned by the caller
pub async fn create_post(
    state: web::Data<AppState>,
    caller: CallerId,
    payload: web::Json<CreatePostPayload>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let post = state
        .posts
        .create(NewPost {
            user_id: caller.0,
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post with its comments
pub async fn get_post(state: web::Data<AppState>, post: Resolved<Post>) -> Result<HttpResponse> {
    let post = state.posts.with_comments(post.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn update_post(
    state: web::Data<AppState>,
    post: Resolved<Post>,
    payload: web::Json<UpdatePostPayload>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let patch = PostPatch {
        title: payload.title,
        content: payload.content,
    };
    let post = state.posts.update(post.into_inner(), patch).await?;

    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(state: web::Data<AppState>, post: Resolved<Post>) -> Result<HttpResponse> {
    state.posts.delete(post.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Comment on a post as the caller
pub async fn create_comment(
    state: web::Data<AppState>,
    caller: CallerId,
    post: Resolved<Post>,
    payload: web::Json<CreateCommentPayload>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let comment = state
        .posts
        .add_comment(NewComment {
            post_id: post.id,
            user_id: caller.0,
            content: payload.into_inner().content,
        })
        .await?;

    Ok(HttpResponse::Created().json(comment))
}
