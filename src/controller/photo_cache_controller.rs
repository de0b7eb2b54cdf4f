use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use tracing::{info, warn};
use crate::controller::AppState;
use crate::models::photo_cache_entry::VenuePhotoUpdate;
use crate::repositories::photo_cache::PhotoCache;
use crate::repositories::venue_csv::VenueCsvRepo;
use crate::repositories::venue_store::VenueStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_photo_cache).delete(clear_photo_cache))
        .route("/sync", post(sync_photo_cache))
        .route_layer(Extension(app_state.photo_cache))
        .route_layer(Extension(app_state.venue_csv))
        .route_layer(Extension(app_state.venue_store))
}

pub async fn retrieve_photo_cache(
    Extension(photo_cache): Extension<Arc<PhotoCache>>,
) -> impl IntoResponse {
    let entries = photo_cache.export_all();
    Json(json!({
        "size": entries.len(),
        "entries": entries,
    }))
}

pub async fn clear_photo_cache(
    Extension(photo_cache): Extension<Arc<PhotoCache>>,
) -> impl IntoResponse {
    let cleared = photo_cache.size();
    photo_cache.clear();
    info!("Cleared {} photo cache entries", cleared);
    Json(json!({ "cleared": cleared }))
}

/// Writes every cached photo back into the venue CSV, then reloads the venues.
pub async fn sync_photo_cache(
    Extension(photo_cache): Extension<Arc<PhotoCache>>,
    Extension(venue_csv): Extension<Arc<VenueCsvRepo>>,
    Extension(venue_store): Extension<Arc<VenueStore>>,
) -> impl IntoResponse {
    let updates: Vec<VenuePhotoUpdate> = photo_cache
        .export_all()
        .into_iter()
        .map(VenuePhotoUpdate::from)
        .collect();

    let updated = match venue_csv.merge_photo_updates(&updates).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!("Something went wrong syncing the photo cache due to: {:#}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update CSV").into_response();
        }
    };

    if let Err(e) = venue_store.reload().await {
        warn!("Synced photo cache but could not reload venues due to: {}", e);
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "exported": updates.len(),
            "updatedCount": updated,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use crate::controller::test_support::{body_json, test_app};
    use crate::services::places_client::stub::StubPlaces;

    const CSV: &str = "name,address,neighborhood,coordinates\n\
Alinea,1723 N Halsted,Lincoln Park,\"41.9133,-87.6482\"\n\
Au Cheval,800 W Randolph,West Loop,\"41.8846,-87.6477\"\n";

    #[tokio::test]
    async fn lists_and_clears_entries() {
        let app = test_app(CSV, StubPlaces::default()).await;
        app.state.photo_cache.put("Alinea", "1723 N Halsted", "ChIJ-alinea", "r1");

        let listed = body_json(app.get("/api/photo-cache").await).await;
        assert_eq!(listed["size"], 1);
        assert_eq!(listed["entries"][0]["photo_reference"], "r1");
        assert_eq!(listed["entries"][0]["photo_url"], "/api/photo?ref=r1&w=300&h=200");

        let response = app
            .send(Request::delete("/api/photo-cache").body(Body::empty()).unwrap())
            .await;
        assert_eq!(body_json(response).await["cleared"], 1);
        assert_eq!(app.state.photo_cache.size(), 0);
    }

    #[tokio::test]
    async fn sync_writes_cache_into_csv_and_reloads() {
        let app = test_app(CSV, StubPlaces::default()).await;
        app.state.photo_cache.put("Alinea", "1723 N Halsted", "ChIJ-alinea", "r1");
        app.state.photo_cache.put("Gone", "Nowhere", "ChIJ-gone", "r9");

        let response = app
            .send(Request::post("/api/photo-cache/sync").body(Body::empty()).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["exported"], 2);
        assert_eq!(body["updatedCount"], 1);

        let alinea = app.state.venue_store.find("Alinea", None).unwrap();
        assert_eq!(alinea.primary_photo_ref.as_deref(), Some("r1"));
        assert_eq!(alinea.place_id.as_deref(), Some("ChIJ-alinea"));
        assert_eq!(
            alinea.photo_attribution.as_deref(),
            Some("Photo from Google Places API")
        );
    }
}
