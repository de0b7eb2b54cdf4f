use std::time::Duration;
use async_trait::async_trait;
use axum::body::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::warn;
use crate::config::Config;
use crate::error::PlacesError;
use crate::models::places::{PlaceDetailsResponse, PlacePhotos, TextSearchResponse};

const STATUS_OK: &str = "OK";

/// Image bytes relayed from the provider, still streaming.
pub struct UpstreamPhoto {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Text search; fails unless the provider reports `OK`.
    async fn text_search(&self, query: &str) -> Result<TextSearchResponse, PlacesError>;

    /// Photo metadata of one place.
    async fn place_photos(&self, place_id: &str) -> Result<PlacePhotos, PlacesError>;

    async fn fetch_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
        max_height: Option<u32>,
    ) -> Result<UpstreamPhoto, PlacesError>;
}

pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.places_api_key().map(str::to_string),
            base_url: config.places_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.api_key.as_deref().ok_or(PlacesError::MissingApiKey)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PlacesError> {
        let api_key = self.api_key()?;
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(params)
            .query(&[("key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlacesError::UpstreamStatus(response.status()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn text_search(&self, query: &str) -> Result<TextSearchResponse, PlacesError> {
        let search: TextSearchResponse = self
            .get_json("textsearch/json", &[("query", query)])
            .await?;

        if search.status != STATUS_OK {
            warn!(
                "Google Places text search returned {}: {}",
                search.status,
                search.error_message.as_deref().unwrap_or("no message")
            );
            return Err(PlacesError::Api { status: search.status });
        }

        Ok(search)
    }

    async fn place_photos(&self, place_id: &str) -> Result<PlacePhotos, PlacesError> {
        let details: PlaceDetailsResponse = self
            .get_json("details/json", &[("place_id", place_id), ("fields", "photos")])
            .await?;

        if details.status != STATUS_OK {
            warn!(
                "Google Places details returned {}: {}",
                details.status,
                details.error_message.as_deref().unwrap_or("no message")
            );
            return Err(PlacesError::Api { status: details.status });
        }

        Ok(details.result.unwrap_or_default())
    }

    async fn fetch_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
        max_height: Option<u32>,
    ) -> Result<UpstreamPhoto, PlacesError> {
        let api_key = self.api_key()?;
        let max_width = max_width.to_string();
        let mut params = vec![
            ("key", api_key.to_string()),
            ("photoreference", photo_reference.to_string()),
            ("maxwidth", max_width),
        ];
        if let Some(max_height) = max_height {
            params.push(("maxheight", max_height.to_string()));
        }

        // The provider answers with a redirect to the binary; reqwest follows it.
        let response = self
            .http
            .get(format!("{}/photo", self.base_url))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlacesError::UpstreamStatus(response.status()));
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_length = header(CONTENT_LENGTH).and_then(|value| value.parse().ok());

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.without_url()))
            })
            .boxed();

        Ok(UpstreamPhoto {
            content_type,
            content_length,
            body,
        })
    }
}
