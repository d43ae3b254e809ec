//! Follower graph over HTTP and through the service layer.
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::{app_state, configure, MemoryStore, CALLER_HEADER};
use serde_json::{json, Value};
use social_api::config::SelfFollowPolicy;
use social_api::models::UnfollowOutcome;
use social_api::AppError;

#[actix_web::test]
async fn test_second_follow_conflicts_and_keeps_one_edge() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let app = test::init_service(
        App::new().configure(configure(app_state(&store, SelfFollowPolicy::Allow))),
    )
    .await;
    let uri = format!("/v1/users/{}/follow", bob.id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "already exists"}));

    assert_eq!(store.edge_count(alice.id, bob.id), 1);
    assert_eq!(store.edge_count(bob.id, alice.id), 0);
}

#[actix_web::test]
async fn test_unfollow_is_idempotent_over_http() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let app = test::init_service(
        App::new().configure(configure(app_state(&store, SelfFollowPolicy::Allow))),
    )
    .await;

    let unfollow = || {
        test::TestRequest::put()
            .uri(&format!("/v1/users/{}/unfollow", bob.id))
            .insert_header((CALLER_HEADER, alice.id.to_string()))
            .to_request()
    };

    assert_eq!(
        test::call_service(&app, unfollow()).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::put()
        .uri(&format!("/v1/users/{}/follow", bob.id))
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        test::call_service(&app, unfollow()).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(store.edge_count(alice.id, bob.id), 0);
}

#[actix_web::test]
async fn test_unfollow_outcome_distinguishes_removal() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let state = app_state(&store, SelfFollowPolicy::Allow);

    assert_eq!(
        state.graph.unfollow(alice.id, bob.id).await.unwrap(),
        UnfollowOutcome::NotFollowing
    );

    state.graph.follow(alice.id, bob.id).await.unwrap();
    assert_eq!(
        state.graph.unfollow(alice.id, bob.id).await.unwrap(),
        UnfollowOutcome::Removed
    );
    assert_eq!(
        state.graph.unfollow(alice.id, bob.id).await.unwrap(),
        UnfollowOutcome::NotFollowing
    );
}

#[actix_web::test]
async fn test_follow_unknown_user_and_bad_input() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let app = test::init_service(
        App::new().configure(configure(app_state(&store, SelfFollowPolicy::Allow))),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/v1/users/9999/follow")
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/v1/users/not-a-number/follow")
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/v1/users/{}/follow", alice.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_self_follow_allowed_by_default() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let app = test::init_service(
        App::new().configure(configure(app_state(&store, SelfFollowPolicy::Allow))),
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/v1/users/{}/follow", alice.id))
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.edge_count(alice.id, alice.id), 1);
}

#[actix_web::test]
async fn test_self_follow_rejected_by_policy() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let app = test::init_service(
        App::new().configure(configure(app_state(&store, SelfFollowPolicy::Reject))),
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/v1/users/{}/follow", alice.id))
        .insert_header((CALLER_HEADER, alice.id.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.edge_count(alice.id, alice.id), 0);

    let state = app_state(&store, SelfFollowPolicy::Reject);
    assert!(matches!(
        state.graph.follow(alice.id, alice.id).await,
        Err(AppError::BadRequest(_))
    ));
}
