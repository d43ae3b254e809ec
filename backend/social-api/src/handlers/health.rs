use crate::AppState;
use actix_web::{web, HttpResponse};

/// Liveness probe
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "env": state.env,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
