use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::photo_cache::PhotoCache;
use crate::repositories::venue_csv::VenueCsvRepo;
use crate::repositories::venue_store::VenueStore;
use crate::services::photo_resolver::PhotoResolver;
use crate::services::places_client::PlacesProvider;

pub mod csv_update_controller;
pub mod health_check;
pub mod photo_cache_controller;
pub mod photo_controller;
pub mod places_controller;
pub mod venue_controller;

/// Process-wide collaborators, built once in `main` and handed to every router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub photo_cache: Arc<PhotoCache>,
    pub places: Arc<dyn PlacesProvider>,
    pub photo_resolver: Arc<PhotoResolver>,
    pub venue_store: Arc<VenueStore>,
    pub venue_csv: Arc<VenueCsvRepo>,
}

impl AppState {
    pub fn new(config: Config, places: Arc<dyn PlacesProvider>) -> Self {
        let photo_cache = Arc::new(PhotoCache::new(config.normalize_cache_keys));
        let photo_resolver = Arc::new(PhotoResolver::new(photo_cache.clone(), places.clone()));
        let venue_store = Arc::new(VenueStore::new(
            config.venues_csv_path.clone(),
            photo_cache.clone(),
        ));
        let venue_csv = Arc::new(VenueCsvRepo::new(config.venues_csv_path.clone()));

        Self {
            config: Arc::new(config),
            photo_cache,
            places,
            photo_resolver,
            venue_store,
            venue_csv,
        }
    }
}

pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let config = app_state.config.clone();
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    let application = router_endpoints(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
            .layer(CompressionLayer::new())
            .layer(
                CorsLayer::new()
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_origin(origins)
                    .allow_headers([CONTENT_TYPE]),
            ),
    );

    let address: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("Invalid bind address")?;
    info!("API server listening on: {} ({})", address, config.environment);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down API server");
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router(app_state.clone()))
        .merge(photo_controller::router(app_state.clone()))
        .merge(places_controller::router(app_state.clone()))
        .nest("/api/venues", venue_controller::router(app_state.clone()))
        .nest("/api/photo-cache", photo_cache_controller::router(app_state.clone()))
        .nest("/api/update-csv-photos", csv_update_controller::router(app_state))
        .fallback(page_not_found_handler)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tempfile::NamedTempFile;
    use tower::ServiceExt;
    use crate::services::places_client::stub::StubPlaces;
    use super::*;

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub places: Arc<StubPlaces>,
        pub csv_file: NamedTempFile,
    }

    pub async fn test_app(csv: &str, places: StubPlaces) -> TestApp {
        let mut csv_file = NamedTempFile::new().unwrap();
        csv_file.write_all(csv.as_bytes()).unwrap();

        let places = Arc::new(places);
        let state = AppState::new(Config::for_tests(csv_file.path().to_path_buf()), places.clone());
        state.venue_store.reload().await.unwrap();

        TestApp {
            router: router_endpoints(state.clone()),
            state,
            places,
            csv_file,
        }
    }

    impl TestApp {
        pub async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        pub async fn get(&self, uri: &str) -> Response {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }
    }

    pub async fn body_bytes(response: Response) -> Vec<u8> {
        hyper::body::to_bytes(response.into_body()).await.unwrap().to_vec()
    }

    pub async fn body_text(response: Response) -> String {
        String::from_utf8(body_bytes(response).await).unwrap()
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn unknown_paths_hit_the_fallback() {
        let app = test_app("name,coordinates\n", StubPlaces::default()).await;

        let response = app.get("/api/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
