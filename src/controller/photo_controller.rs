use std::sync::Arc;
use axum::body::StreamBody;
use axum::extract::Query;
use axum::http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use serde::Deserialize;
use tracing::warn;
use crate::controller::AppState;
use crate::error::PlacesError;
use crate::services::demo_photo::{is_demo_reference, render_demo_photo};
use crate::services::places_client::{PlacesProvider, UpstreamPhoto};

const DEFAULT_PROXY_WIDTH: u32 = 640;
const DEFAULT_PLACES_PHOTO_WIDTH: u32 = 800;
const EDGE_CACHE_CONTROL: &str = "public, s-maxage=86400, max-age=3600, stale-while-revalidate=86400";
const CLIENT_CACHE_CONTROL: &str = "public, max-age=3600";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/photo", get(proxy_photo))
        .route("/api/google-places-photo", get(proxy_google_places_photo))
        .route_layer(Extension(app_state.places))
}

#[derive(Clone, Deserialize, Debug)]
pub struct PhotoProxyParams {
    #[serde(rename = "ref")]
    pub photo_ref: Option<String>,
    pub w: Option<String>,
    pub h: Option<String>,
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlacesPhotoParams {
    pub photo_ref: Option<String>,
    pub max_width: Option<String>,
    pub max_height: Option<String>,
}

/// `None` when the value is present but not a positive integer.
fn parse_dimension(value: Option<&str>) -> Option<Option<u32>> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Some(None),
        Some(raw) => raw.parse::<u32>().ok().filter(|dim| *dim > 0).map(Some),
    }
}

fn stream_photo(photo: UpstreamPhoto, cache_control: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    let content_type = photo
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));
    if let Some(length) = photo.content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    }

    (StatusCode::OK, headers, StreamBody::new(photo.body)).into_response()
}

pub async fn proxy_photo(
    Extension(places): Extension<Arc<dyn PlacesProvider>>,
    Query(params): Query<PhotoProxyParams>,
) -> impl IntoResponse {
    let Some(photo_ref) = params.photo_ref.filter(|photo_ref| !photo_ref.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing ref").into_response();
    };
    let Some(width) = parse_dimension(params.w.as_deref()) else {
        return (StatusCode::BAD_REQUEST, "Invalid w").into_response();
    };
    let Some(height) = parse_dimension(params.h.as_deref()) else {
        return (StatusCode::BAD_REQUEST, "Invalid h").into_response();
    };
    let width = width.unwrap_or(DEFAULT_PROXY_WIDTH);

    if is_demo_reference(&photo_ref) {
        return (
            StatusCode::OK,
            [(CONTENT_TYPE, "image/svg+xml"), (CACHE_CONTROL, CLIENT_CACHE_CONTROL)],
            render_demo_photo(&photo_ref, width, height),
        )
            .into_response();
    }

    return match places.fetch_photo(&photo_ref, width, height).await {
        Ok(photo) => stream_photo(photo, EDGE_CACHE_CONTROL),
        Err(PlacesError::MissingApiKey) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Google Maps API key not configured").into_response()
        }
        Err(e) => {
            warn!("Photo fetch failed due to: {}", e);
            (StatusCode::BAD_GATEWAY, "Photo fetch failed").into_response()
        }
    };
}

pub async fn proxy_google_places_photo(
    Extension(places): Extension<Arc<dyn PlacesProvider>>,
    Query(params): Query<PlacesPhotoParams>,
) -> impl IntoResponse {
    let Some(photo_ref) = params.photo_ref.filter(|photo_ref| !photo_ref.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing photoRef parameter").into_response();
    };
    let (Some(max_width), Some(max_height)) = (
        parse_dimension(params.max_width.as_deref()),
        parse_dimension(params.max_height.as_deref()),
    ) else {
        return (StatusCode::BAD_REQUEST, "Invalid maxWidth or maxHeight parameter").into_response();
    };

    return match places
        .fetch_photo(&photo_ref, max_width.unwrap_or(DEFAULT_PLACES_PHOTO_WIDTH), max_height)
        .await
    {
        Ok(photo) => stream_photo(photo, CLIENT_CACHE_CONTROL),
        Err(PlacesError::MissingApiKey) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Google Maps API key not configured").into_response()
        }
        Err(e) => {
            warn!("Google Places photo fetch failed due to: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to fetch photo").into_response()
        }
    };
}
