use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV could not be tokenized: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the places provider. Display output never carries the API key.
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Google Maps API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("upstream responded with {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Google Places API error: {status}")]
    Api { status: String },
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the request URL, key included, in its Display output
        PlacesError::Http(err.without_url())
    }
}
