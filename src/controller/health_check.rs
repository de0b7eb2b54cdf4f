use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use crate::controller::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(app_state))
}

/// Liveness plus a glance at what is loaded
async fn get_health_check(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "environment": app_state.config.environment,
        "venues": app_state.venue_store.all().len(),
        "cachedPhotos": app_state.photo_cache.size(),
        "placesConfigured": app_state.config.places_api_key().is_some(),
    }))
}
