use std::collections::HashMap;
use parking_lot::RwLock;
use time::OffsetDateTime;
use crate::helpers::photo_url::{proxy_photo_url, PhotoSize};
use crate::models::photo_cache_entry::PhotoCacheEntry;

/// Size baked into every stored `photo_url`; callers resize on read.
pub const CACHED_PHOTO_SIZE: PhotoSize = PhotoSize::Large;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    address: String,
}

/// Process-lifetime memo of resolved venue photos, keyed by venue name and address.
///
/// There is no eviction, bound or TTL. Entries go away only through [`PhotoCache::clear`].
pub struct PhotoCache {
    normalize_keys: bool,
    entries: RwLock<HashMap<CacheKey, PhotoCacheEntry>>,
}

impl PhotoCache {
    pub fn new(normalize_keys: bool) -> Self {
        Self {
            normalize_keys,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Key under which this cache files a venue, normalized when configured to.
    pub fn cache_key(&self, venue_name: &str, venue_address: &str) -> CacheKey {
        if self.normalize_keys {
            CacheKey {
                name: normalize_key_part(venue_name),
                address: normalize_key_part(venue_address),
            }
        } else {
            CacheKey {
                name: venue_name.to_string(),
                address: venue_address.to_string(),
            }
        }
    }

    pub fn has(&self, venue_name: &str, venue_address: &str) -> bool {
        let key = self.cache_key(venue_name, venue_address);
        self.entries.read().contains_key(&key)
    }

    pub fn get(&self, venue_name: &str, venue_address: &str) -> Option<PhotoCacheEntry> {
        let key = self.cache_key(venue_name, venue_address);
        self.entries.read().get(&key).cloned()
    }

    pub fn put(
        &self,
        venue_name: &str,
        venue_address: &str,
        place_id: &str,
        photo_reference: &str,
    ) -> PhotoCacheEntry {
        let key = self.cache_key(venue_name, venue_address);
        let entry = PhotoCacheEntry {
            venue_name: venue_name.to_string(),
            venue_address: venue_address.to_string(),
            place_id: place_id.to_string(),
            photo_reference: photo_reference.to_string(),
            photo_url: proxy_photo_url(photo_reference, CACHED_PHOTO_SIZE),
            last_updated: OffsetDateTime::now_utc(),
        };
        self.entries.write().insert(key, entry.clone());
        entry
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    pub fn export_all(&self) -> Vec<PhotoCacheEntry> {
        let mut entries: Vec<PhotoCacheEntry> = self.entries.read().values().cloned().collect();
        entries.sort_by(|a, b| {
            a.venue_name
                .cmp(&b.venue_name)
                .then_with(|| a.venue_address.cmp(&b.venue_address))
        });
        entries
    }
}

fn normalize_key_part(part: &str) -> String {
    part.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
