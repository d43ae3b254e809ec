/// HTTP handlers for social-api
///
/// All routes live under `/v1`. Extractor failures (bad JSON, oversized
/// bodies, malformed query strings) are turned into `AppError::BadRequest`
/// so they share the same error envelope as everything else.
pub mod feed;
pub mod health;
pub mod posts;
pub mod resolve;
pub mod users;

pub use resolve::{parse_id, Resolvable, Resolved};

use crate::error::AppError;
use actix_web::web;

/// Maximum accepted JSON body size
const JSON_LIMIT: usize = 1 << 20;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Register every route on `cfg`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .app_data(json_config())
            .app_data(query_config())
            .route("/health", web::get().to(health::health))
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create_user))
                    // registered before "/{id}" so "feed" is never taken for an id
                    .route("/feed", web::get().to(feed::get_feed))
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}/follow", web::put().to(users::follow_user))
                    .route("/{id}/unfollow", web::put().to(users::unfollow_user)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::patch().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/comments", web::post().to(posts::create_comment)),
            ),
    );
}
