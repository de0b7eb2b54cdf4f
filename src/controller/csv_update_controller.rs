use std::sync::Arc;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::models::photo_cache_entry::VenuePhotoUpdate;
use crate::repositories::venue_csv::VenueCsvRepo;
use crate::repositories::venue_store::VenueStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_photo_coverage).post(update_csv_photos))
        .route_layer(Extension(app_state.venue_csv))
        .route_layer(Extension(app_state.venue_store))
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCsvPhotosBody {
    pub photo_data: Vec<VenuePhotoUpdate>,
}

pub async fn update_csv_photos(
    Extension(venue_csv): Extension<Arc<VenueCsvRepo>>,
    Extension(venue_store): Extension<Arc<VenueStore>>,
    body: Result<Json<UpdateCsvPhotosBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return (StatusCode::BAD_REQUEST, "Invalid photo data").into_response();
    };

    let updated = match venue_csv.merge_photo_updates(&body.photo_data).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!("Something went wrong updating the CSV due to: {:#}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update CSV").into_response();
        }
    };

    if let Err(e) = venue_store.reload().await {
        warn!("Updated CSV but could not reload venues due to: {}", e);
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("Updated {} venues with photo data", updated),
            "updatedCount": updated,
        })),
    )
        .into_response()
}

pub async fn retrieve_photo_coverage(
    Extension(venue_csv): Extension<Arc<VenueCsvRepo>>,
) -> impl IntoResponse {
    return match venue_csv.photo_coverage().await {
        Ok(coverage) => (StatusCode::OK, Json(coverage)).into_response(),
        Err(e) => {
            warn!("Something went wrong reading the CSV due to: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read CSV").into_response()
        }
    };
}
