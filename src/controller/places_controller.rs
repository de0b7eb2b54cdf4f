use std::sync::Arc;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::warn;
use crate::controller::AppState;
use crate::error::PlacesError;
use crate::services::places_client::PlacesProvider;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/google-places-search", get(search_places))
        .route("/api/google-places-photos", get(retrieve_place_photos))
        .route_layer(Extension(app_state.places))
}

fn places_error_response(err: PlacesError, failure: &'static str) -> Response {
    match err {
        PlacesError::MissingApiKey => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Google Maps API key not configured").into_response()
        }
        PlacesError::Api { status } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Google Places API error: {}", status),
        )
            .into_response(),
        e => {
            warn!("{} due to: {}", failure, e);
            (StatusCode::BAD_GATEWAY, failure).into_response()
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct SearchPlacesParam {
    pub query: Option<String>,
}

pub async fn search_places(
    Extension(places): Extension<Arc<dyn PlacesProvider>>,
    Query(params): Query<SearchPlacesParam>,
) -> impl IntoResponse {
    let Some(query) = params.query.filter(|query| !query.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing query parameter").into_response();
    };

    return match places.text_search(&query).await {
        Ok(search) => (StatusCode::OK, Json(search)).into_response(),
        Err(e) => places_error_response(e, "Failed to search places"),
    };
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlacePhotosParam {
    pub place_id: Option<String>,
}

pub async fn retrieve_place_photos(
    Extension(places): Extension<Arc<dyn PlacesProvider>>,
    Query(params): Query<PlacePhotosParam>,
) -> impl IntoResponse {
    let Some(place_id) = params.place_id.filter(|place_id| !place_id.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing placeId parameter").into_response();
    };

    return match places.place_photos(&place_id).await {
        Ok(photos) => (StatusCode::OK, Json(photos)).into_response(),
        Err(e) => places_error_response(e, "Failed to get place photos"),
    };
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use crate::controller::test_support::{body_json, body_text, test_app};
    use crate::services::places_client::stub::StubPlaces;

    const CSV: &str = "name,coordinates\n";

    #[tokio::test]
    async fn search_returns_provider_payload() {
        let stub = StubPlaces::default().with_place("Alinea Chicago", "ChIJ-alinea", &["r1"]);
        let app = test_app(CSV, stub).await;

        let response = app.get("/api/google-places-search?query=Alinea%20Chicago").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["results"][0]["place_id"], "ChIJ-alinea");
    }

    #[tokio::test]
    async fn search_without_query_is_a_bad_request() {
        let app = test_app(CSV, StubPlaces::default()).await;

        let response = app.get("/api/google-places-search").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing query parameter");
    }

    #[tokio::test]
    async fn provider_status_errors_are_reported() {
        let app = test_app(CSV, StubPlaces::default()).await;

        let response = app.get("/api/google-places-search?query=nowhere").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Google Places API error: ZERO_RESULTS");
    }

    #[tokio::test]
    async fn photos_lists_photo_references() {
        let stub = StubPlaces::default().with_place("q", "ChIJ-yolk", &["r1", "r2"]);
        let app = test_app(CSV, stub).await;

        let response = app.get("/api/google-places-photos?placeId=ChIJ-yolk").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["photos"][1]["photo_reference"], "r2");
    }

    #[tokio::test]
    async fn photos_without_place_id_is_a_bad_request() {
        let app = test_app(CSV, StubPlaces::default()).await;

        let response = app.get("/api/google-places-photos?placeId=").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing placeId parameter");
    }
}
