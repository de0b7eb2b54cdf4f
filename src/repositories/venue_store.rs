use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::info;
use crate::error::IngestError;
use crate::models::venue::Venue;
use crate::repositories::photo_cache::PhotoCache;
use crate::services::csv_ingestion::{parse_venues_csv, register_csv_photos};

/// The venues currently being served, as loaded from the venue CSV.
pub struct VenueStore {
    csv_path: PathBuf,
    photo_cache: Arc<PhotoCache>,
    venues: RwLock<Arc<Vec<Venue>>>,
}

impl VenueStore {
    pub fn new(csv_path: PathBuf, photo_cache: Arc<PhotoCache>) -> Self {
        Self {
            csv_path,
            photo_cache,
            venues: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Re-reads the CSV and swaps in the result. CSV-supplied photo
    /// references are registered in the photo cache on the way.
    /// On failure the previously loaded venues stay in place.
    pub async fn reload(&self) -> Result<usize, IngestError> {
        let bytes = tokio::fs::read(&self.csv_path).await?;
        let text = String::from_utf8(bytes)?;
        let venues = parse_venues_csv(&text)?;

        let registered = register_csv_photos(&venues, &self.photo_cache);
        info!(
            "Loaded {} venues from {} ({} with CSV photo references)",
            venues.len(),
            self.csv_path.display(),
            registered
        );

        let count = venues.len();
        *self.venues.write() = Arc::new(venues);
        Ok(count)
    }

    pub fn all(&self) -> Arc<Vec<Venue>> {
        self.venues.read().clone()
    }

    /// First venue with this name, narrowed by neighborhood when one is given.
    pub fn find(&self, name: &str, neighborhood: Option<&str>) -> Option<Venue> {
        self.venues
            .read()
            .iter()
            .find(|venue| {
                venue.name == name
                    && neighborhood.map_or(true, |hood| venue.neighborhood == hood)
            })
            .cloned()
    }
}
