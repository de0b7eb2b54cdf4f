use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PhotoCacheEntry {
    pub venue_name: String,
    pub venue_address: String,
    pub place_id: String,
    pub photo_reference: String,
    pub photo_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

/// One `(venue, photo identity)` pair to merge back into the venue CSV.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct VenuePhotoUpdate {
    pub venue_name: String,
    pub venue_address: String,
    pub place_id: String,
    pub photo_reference: String,
}

impl From<PhotoCacheEntry> for VenuePhotoUpdate {
    fn from(entry: PhotoCacheEntry) -> Self {
        Self {
            venue_name: entry.venue_name,
            venue_address: entry.venue_address,
            place_id: entry.place_id,
            photo_reference: entry.photo_reference,
        }
    }
}
