pub mod csv_ingestion;
pub mod demo_photo;
pub mod photo_resolver;
pub mod places_client;
pub mod venue_filter;
