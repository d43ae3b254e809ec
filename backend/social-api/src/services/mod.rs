/// Business logic for social-api
///
/// Services sit between the HTTP handlers and the repositories in
/// `crate::db`. They receive their repositories as trait objects and
/// return `AppError` values; none of them touches an HTTP response.
pub mod feed;
pub mod follow;
pub mod posts;
pub mod users;

pub use feed::FeedEngine;
pub use follow::FollowerGraph;
pub use posts::PostService;
pub use users::UserService;
