use std::path::PathBuf;
use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "127.0.0.1")]
    pub bind_address: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    /// Comma-separated CORS origins.
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    /// Server-side only, never sent to the browser.
    #[clap(env = "GOOGLE_MAPS_API_KEY", long, hide_env_values = true)]
    pub google_maps_api_key: Option<String>,

    #[clap(env, long, default_value = "https://maps.googleapis.com/maps/api/place")]
    pub places_base_url: String,

    #[clap(env, long, default_value = "public/chicago_venues_full_output.csv")]
    pub venues_csv_path: PathBuf,

    /// Trim, lowercase and collapse whitespace in photo cache keys.
    #[clap(env, long)]
    pub normalize_cache_keys: bool,

    #[clap(env, long, default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    #[clap(env, long, default_value_t = 512)]
    pub max_concurrent_requests: usize,
}

impl Config {
    /// The API key, treating a blank value as unset.
    pub fn places_api_key(&self) -> Option<&str> {
        self.google_maps_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
impl Config {
    /// Built field by field so nothing leaks in from the shell environment.
    pub fn for_tests(venues_csv_path: PathBuf) -> Self {
        Config {
            environment: "test".to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            origin_urls: "http://localhost:3000".to_string(),
            google_maps_api_key: Some("test-key".to_string()),
            places_base_url: "http://127.0.0.1:9/maps/api/place".to_string(),
            venues_csv_path,
            normalize_cache_keys: false,
            upstream_timeout_secs: 10,
            max_concurrent_requests: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::parse_from(["chicago-venues", "--google-maps-api-key", "k"]);

        assert_eq!(config.places_base_url, "https://maps.googleapis.com/maps/api/place");
        assert_eq!(config.venues_csv_path, PathBuf::from("public/chicago_venues_full_output.csv"));
        assert!(!config.normalize_cache_keys);
        assert_eq!(config.upstream_timeout_secs, 10);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let mut config = Config::for_tests(PathBuf::from("venues.csv"));
        assert_eq!(config.places_api_key(), Some("test-key"));

        config.google_maps_api_key = Some("   ".to_string());
        assert_eq!(config.places_api_key(), None);

        config.google_maps_api_key = None;
        assert_eq!(config.places_api_key(), None);
    }

    #[test]
    fn test_config_is_fixed() {
        let config = Config::for_tests(PathBuf::from("venues.csv"));

        assert_eq!(config.environment, "test");
        assert!(!config.normalize_cache_keys);
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.venues_csv_path, PathBuf::from("venues.csv"));
    }
}
