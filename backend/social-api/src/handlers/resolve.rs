/// Resolves the `{id}` path segment to a loaded entity before the handler
/// body runs. Handlers take `Resolved<Post>` or `Resolved<User>` as an
/// argument instead of looking the entity up themselves.
use crate::db::{StoreError, StoreResult, Storage};
use crate::error::AppError;
use crate::models::{Post, User};
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::ops::Deref;

/// Path parameter holding the entity id.
const ID_PARAM: &str = "id";

/// An entity that can be loaded by id through the store facade.
pub trait Resolvable: Sized + 'static {
    const KIND: &'static str;

    fn load(storage: Storage, id: i64) -> LocalBoxFuture<'static, StoreResult<Self>>;
}

impl Resolvable for Post {
    const KIND: &'static str = "post";

    fn load(storage: Storage, id: i64) -> LocalBoxFuture<'static, StoreResult<Self>> {
        Box::pin(async move { storage.posts.get_by_id(id).await })
    }
}

impl Resolvable for User {
    const KIND: &'static str = "user";

    fn load(storage: Storage, id: i64) -> LocalBoxFuture<'static, StoreResult<Self>> {
        Box::pin(async move { storage.users.get_by_id(id).await })
    }
}

/// Parse a raw path identifier. Only positive 64-bit integers are ids.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid id '{}'", raw))),
    }
}

/// Entity resolved from the request path.
#[derive(Debug)]
pub struct Resolved<E>(pub E);

impl<E> Resolved<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> Deref for Resolved<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.0
    }
}

impl<E: Resolvable> FromRequest for Resolved<E> {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .match_info()
            .get(ID_PARAM)
            .ok_or_else(|| AppError::Internal("route has no id segment".to_string()))
            .and_then(parse_id);

        let storage = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.storage.clone())
            .ok_or_else(|| AppError::Internal("application state not configured".to_string()));

        Box::pin(async move {
            let id = id?;
            let storage = storage?;

            match E::load(storage, id).await {
                Ok(entity) => Ok(Resolved(entity)),
                Err(StoreError::NotFound) => {
                    Err(AppError::NotFound(format!("{} {}", E::KIND, id)))
                }
                Err(err) => Err(err.into()),
            }
        })
    }
}
