/// User handlers - registration, lookup and the follow graph
use super::resolve::Resolved;
use crate::error::Result;
use crate::middleware::CallerId;
use crate::models::User;
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 3, max = 72))]
    pub password: String,
}

pub async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<CreateUserPayload>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let user = state
        .users
        .register(payload.username, payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(user: Resolved<User>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(user.into_inner()))
}

/// The caller starts following the user in the path
pub async fn follow_user(
    state: web::Data<AppState>,
    caller: CallerId,
    target: Resolved<User>,
) -> Result<HttpResponse> {
    state.graph.follow(caller.0, target.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Succeeds whether or not the caller was following the user
pub async fn unfollow_user(
    state: web::Data<AppState>,
    caller: CallerId,
    target: Resolved<User>,
) -> Result<HttpResponse> {
    state.graph.unfollow(caller.0, target.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
