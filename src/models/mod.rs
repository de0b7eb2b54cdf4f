pub mod photo_cache_entry;
pub mod places;
pub mod venue;
