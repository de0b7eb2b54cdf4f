use std::sync::Arc;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::photo_url::PhotoSize;
use crate::repositories::venue_store::VenueStore;
use crate::services::photo_resolver::{PhotoRequest, PhotoResolution, PhotoResolver};
use crate::services::venue_filter::{filter_venues, venue_facets, VenueQuery};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_venues))
        .route("/facets", get(retrieve_facets))
        .route("/reload", post(reload_venues))
        .route("/photo", get(resolve_venue_photo))
        .route_layer(Extension(app_state.venue_store))
        .route_layer(Extension(app_state.photo_resolver))
}

pub async fn list_venues(
    Extension(venue_store): Extension<Arc<VenueStore>>,
    Query(query): Query<VenueQuery>,
) -> impl IntoResponse {
    let venues = venue_store.all();
    let filtered = filter_venues(&venues, &query);

    Json(json!({
        "total": venues.len(),
        "showing": filtered.len(),
        "venues": filtered,
    }))
}

pub async fn retrieve_facets(
    Extension(venue_store): Extension<Arc<VenueStore>>,
) -> impl IntoResponse {
    Json(venue_facets(&venue_store.all()))
}

pub async fn reload_venues(
    Extension(venue_store): Extension<Arc<VenueStore>>,
) -> impl IntoResponse {
    return match venue_store.reload().await {
        Ok(loaded) => (StatusCode::OK, Json(json!({ "loaded": loaded }))).into_response(),
        Err(e) => {
            warn!("Something went wrong loading venues due to: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load venues").into_response()
        }
    };
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VenuePhotoParam {
    pub name: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub photo_ref: Option<String>,
    #[serde(default)]
    pub size: PhotoSize,
}

pub async fn resolve_venue_photo(
    Extension(venue_store): Extension<Arc<VenueStore>>,
    Extension(photo_resolver): Extension<Arc<PhotoResolver>>,
    Query(params): Query<VenuePhotoParam>,
) -> impl IntoResponse {
    let Some(venue_name) = params.name.filter(|name| !name.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing name parameter").into_response();
    };
    let neighborhood = params.neighborhood.filter(|hood| !hood.trim().is_empty());
    let locality = neighborhood
        .clone()
        .or(params.address)
        .unwrap_or_default();

    // Fall back to the reference the CSV carries for this venue
    let csv_photo_ref = params.photo_ref.filter(|r| !r.is_empty()).or_else(|| {
        venue_store
            .find(&venue_name, neighborhood.as_deref())
            .and_then(|venue| venue.primary_photo_ref)
    });

    let resolution = photo_resolver
        .resolve(PhotoRequest {
            venue_name,
            locality,
            csv_photo_ref,
            size: params.size,
        })
        .await;

    return match resolution {
        PhotoResolution::Found { .. } => (StatusCode::OK, Json(resolution)).into_response(),
        PhotoResolution::NotFound => (StatusCode::NOT_FOUND, Json(resolution)).into_response(),
    };
}
