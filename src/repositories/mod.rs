pub mod photo_cache;
pub mod venue_csv;
pub mod venue_store;
