use std::collections::HashMap;
use std::sync::Arc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};
use crate::error::PlacesError;
use crate::helpers::photo_url::{proxy_photo_url, resize_photo_url, PhotoSize};
use crate::repositories::photo_cache::{CacheKey, PhotoCache};
use crate::services::places_client::PlacesProvider;

type Lookup = Shared<BoxFuture<'static, Option<String>>>;

#[derive(Clone, Debug)]
pub struct PhotoRequest {
    pub venue_name: String,
    /// Neighborhood, or the address when no neighborhood is known.
    pub locality: String,
    pub csv_photo_ref: Option<String>,
    pub size: PhotoSize,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSource {
    Csv,
    Cache,
    Places,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhotoResolution {
    Found { url: String, source: PhotoSource },
    NotFound,
}

/// Resolves a displayable photo URL for a venue.
///
/// Order: CSV-supplied reference, then the photo cache, then a text search
/// followed by a photo lookup against the places provider. Concurrent callers
/// asking for the same venue share a single provider lookup. Misses are not
/// remembered, so the next call tries the provider again.
pub struct PhotoResolver {
    photo_cache: Arc<PhotoCache>,
    places: Arc<dyn PlacesProvider>,
    in_flight: Arc<Mutex<HashMap<CacheKey, Lookup>>>,
}

impl PhotoResolver {
    pub fn new(photo_cache: Arc<PhotoCache>, places: Arc<dyn PlacesProvider>) -> Self {
        Self {
            photo_cache,
            places,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn resolve(&self, request: PhotoRequest) -> PhotoResolution {
        if let Some(photo_ref) = request.csv_photo_ref.as_deref().filter(|r| !r.is_empty()) {
            return PhotoResolution::Found {
                url: proxy_photo_url(photo_ref, request.size),
                source: PhotoSource::Csv,
            };
        }

        if let Some(cached) = self.photo_cache.get(&request.venue_name, &request.locality) {
            return PhotoResolution::Found {
                url: resize_photo_url(&cached.photo_url, request.size),
                source: PhotoSource::Cache,
            };
        }

        match self.shared_lookup(&request).await {
            Some(photo_ref) => PhotoResolution::Found {
                url: proxy_photo_url(&photo_ref, request.size),
                source: PhotoSource::Places,
            },
            None => PhotoResolution::NotFound,
        }
    }

    /// Joins the lookup already running for this venue, or spawns one. The
    /// lookup runs on its own task, so it completes and fills the cache even
    /// when every caller waiting on it goes away.
    fn shared_lookup(&self, request: &PhotoRequest) -> Lookup {
        let key = self
            .photo_cache
            .cache_key(&request.venue_name, &request.locality);
        let mut in_flight = self.in_flight.lock();
        if let Some(lookup) = in_flight.get(&key) {
            debug!("Joining in-flight photo lookup for {}", request.venue_name);
            return lookup.clone();
        }

        let places = self.places.clone();
        let photo_cache = self.photo_cache.clone();
        let registry = self.in_flight.clone();
        let venue_name = request.venue_name.clone();
        let locality = request.locality.clone();
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let found = match lookup_photo(places.as_ref(), &venue_name, &locality).await {
                Ok(Some((place_id, photo_ref))) => {
                    photo_cache.put(&venue_name, &locality, &place_id, &photo_ref);
                    Some(photo_ref)
                }
                Ok(None) => {
                    warn!("No photo found for {}", venue_name);
                    None
                }
                Err(e) => {
                    warn!("Could not get photo for {} due to: {}", venue_name, e);
                    None
                }
            };
            registry.lock().remove(&task_key);
            found
        });

        let lookup = task
            .map(|joined| match joined {
                Ok(found) => found,
                Err(e) => {
                    warn!("Photo lookup task failed: {}", e);
                    None
                }
            })
            .boxed()
            .shared();

        // The task removes this entry on completion; insert it before the lock is released
        in_flight.insert(key, lookup.clone());
        lookup
    }
}

pub fn search_query(venue_name: &str, locality: &str) -> String {
    format!("{} {} Chicago", venue_name, locality)
}

async fn lookup_photo(
    places: &dyn PlacesProvider,
    venue_name: &str,
    locality: &str,
) -> Result<Option<(String, String)>, PlacesError> {
    let search = places.text_search(&search_query(venue_name, locality)).await?;
    let Some(place) = search.results.into_iter().next() else {
        return Ok(None);
    };

    let photos = places.place_photos(&place.place_id).await?;
    Ok(photos
        .photos
        .into_iter()
        .next()
        .map(|photo| (place.place_id, photo.photo_reference)))
}
