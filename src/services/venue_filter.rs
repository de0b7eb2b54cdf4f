use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::models::venue::Venue;

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct VenueQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub venue_type: Option<String>,
    pub neighborhood: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct VenueFacets {
    pub venue_types: Vec<String>,
    pub neighborhoods: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl VenueQuery {
    pub fn matches(&self, venue: &Venue) -> bool {
        if let Some(search) = non_empty(&self.search) {
            if !venue.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        if let Some(venue_type) = non_empty(&self.venue_type) {
            if !venue.venue_types().any(|part| part == venue_type) {
                return false;
            }
        }

        if let Some(neighborhood) = non_empty(&self.neighborhood) {
            if venue.neighborhood != neighborhood {
                return false;
            }
        }

        if let Some(keyword) = non_empty(&self.keyword) {
            let keyword = keyword.to_lowercase();
            if !venue
                .keywords_tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&keyword))
            {
                return false;
            }
        }

        true
    }
}

pub fn filter_venues(venues: &[Venue], query: &VenueQuery) -> Vec<Venue> {
    venues
        .iter()
        .filter(|venue| query.matches(venue))
        .cloned()
        .collect()
}

pub fn venue_facets(venues: &[Venue]) -> VenueFacets {
    let mut venue_types = BTreeSet::new();
    let mut neighborhoods = BTreeSet::new();
    for venue in venues {
        venue_types.extend(venue.venue_types().map(str::to_string));
        if !venue.neighborhood.is_empty() {
            neighborhoods.insert(venue.neighborhood.clone());
        }
    }

    VenueFacets {
        venue_types: venue_types.into_iter().collect(),
        neighborhoods: neighborhoods.into_iter().collect(),
    }
}
