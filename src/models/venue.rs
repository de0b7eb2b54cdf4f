use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Venue {
    pub name: String,
    pub venue_type: String,
    pub address: String,
    pub neighborhood: String,
    pub coordinates: String,
    pub latitude: f64,
    pub longitude: f64,
    pub blog_description: String,
    pub general_description: String,
    pub keywords_tags: Vec<String>,
    pub ratings: VenueRatings,
    pub place_id: Option<String>,
    pub primary_photo_ref: Option<String>,
    pub photo_attribution: Option<String>,
    pub processed_at: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct VenueRatings {
    pub yelp: SourceRating,
    pub google_maps: SourceRating,
    pub tripadvisor: SourceRating,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SourceRating {
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub url: Option<String>,
}

impl Venue {
    /// Sub-types of a slash-separated `venue_type`, e.g. "Bar / Restaurant".
    pub fn venue_types(&self) -> impl Iterator<Item = &str> {
        self.venue_type
            .split('/')
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn venue_fixture(name: &str, venue_type: &str, neighborhood: &str) -> Venue {
    Venue {
        name: name.to_string(),
        venue_type: venue_type.to_string(),
        address: format!("{} Address", name),
        neighborhood: neighborhood.to_string(),
        coordinates: "41.8952,-87.6211".to_string(),
        latitude: 41.8952,
        longitude: -87.6211,
        blog_description: String::new(),
        general_description: String::new(),
        keywords_tags: Vec::new(),
        ratings: VenueRatings::default(),
        place_id: None,
        primary_photo_ref: None,
        photo_attribution: None,
        processed_at: String::new(),
    }
}
