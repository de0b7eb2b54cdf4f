pub mod handler_404;
pub mod photo_url;
