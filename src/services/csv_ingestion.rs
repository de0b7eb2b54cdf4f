use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use crate::error::IngestError;
use crate::models::venue::{SourceRating, Venue, VenueRatings};
use crate::repositories::photo_cache::PhotoCache;

static COORDINATES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.\d+,-?\d+\.\d+").unwrap());

const LATITUDE_COLUMNS: [&str; 2] = ["lat", "latitude"];
const LONGITUDE_COLUMNS: [&str; 4] = ["lng", "lon", "long", "longitude"];

/// Keyword cells arrive either as a JSON array or as a loose comma list.
#[derive(Debug, PartialEq)]
pub enum KeywordTags {
    Json(Vec<String>),
    Delimited(Vec<String>),
}

impl KeywordTags {
    pub fn parse(raw: &str) -> Self {
        if let Ok(tags) = serde_json::from_str::<Vec<String>>(raw.trim()) {
            return KeywordTags::Json(tags);
        }

        KeywordTags::Delimited(
            raw.split(',')
                .map(|tag| tag.replace(['{', '}', '"'], ""))
                .collect(),
        )
    }

    pub fn into_tags(self) -> Vec<String> {
        let tags = match self {
            KeywordTags::Json(tags) | KeywordTags::Delimited(tags) => tags,
        };
        tags.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

pub fn parse_keyword_tags(raw: &str) -> Vec<String> {
    KeywordTags::parse(raw).into_tags()
}

struct CsvRow<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> CsvRow<'a> {
    fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
    }

    fn get(&self, column: &str) -> Option<&'a str> {
        self.column_index(column)
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    fn optional_text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn first_of(&self, columns: &[&str]) -> Option<&'a str> {
        columns.iter().find_map(|column| self.get(column))
    }

    /// First value shaped like `lat,lng`, in column order. Falls back to
    /// separate latitude/longitude columns.
    fn find_coordinates(&self) -> Option<String> {
        let in_one_column = self
            .record
            .iter()
            .find_map(|value| COORDINATES.find(value.trim()))
            .map(|found| found.as_str().to_string());
        if in_one_column.is_some() {
            return in_one_column;
        }

        let lat = self.first_of(&LATITUDE_COLUMNS)?;
        let lng = self.first_of(&LONGITUDE_COLUMNS)?;
        let joined = format!("{},{}", lat, lng);
        COORDINATES
            .find(&joined)
            .map(|found| found.as_str().to_string())
    }

    fn rating(&self, prefix: &str, url_column: &str) -> SourceRating {
        SourceRating {
            rating: parse_rating(self.get(&format!("{}_rating", prefix))),
            review_count: parse_review_count(self.get(&format!("{}_reviews_count", prefix))),
            url: self.optional_text(url_column),
        }
    }
}

/// Parses two finite decimals out of a `lat,lng` string.
pub fn parse_coordinates(coordinates: &str) -> Option<(f64, f64)> {
    let cleaned = coordinates.replace('"', "");
    let mut parts = cleaned.trim().split(',').map(|part| part.trim().parse::<f64>());
    let lat = parts.next()?.ok()?;
    let lng = parts.next()?.ok()?;

    if lat.is_finite() && lng.is_finite() {
        Some((lat, lng))
    } else {
        None
    }
}

pub fn parse_rating(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|rating| rating.is_finite())
}

pub fn parse_review_count(value: Option<&str>) -> Option<u32> {
    let cleaned = value?.trim().replace(',', "");
    cleaned.parse::<u32>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|count| count.is_finite() && *count >= 0.0 && *count <= u32::MAX as f64)
            .map(|count| count.trunc() as u32)
    })
}

fn venue_from_row(row: &CsvRow) -> Option<Venue> {
    let name = row.text("name");
    let Some(coordinates) = row.find_coordinates() else {
        debug!("No coordinates for {}", name);
        return None;
    };
    let Some((latitude, longitude)) = parse_coordinates(&coordinates) else {
        debug!("Invalid coordinates for {}: {}", name, coordinates);
        return None;
    };

    Some(Venue {
        venue_type: row.text("venue_type"),
        address: row.text("address"),
        neighborhood: row.text("neighborhood"),
        coordinates,
        latitude,
        longitude,
        blog_description: row.text("blog_description"),
        general_description: row.text("general_description"),
        keywords_tags: row.get("keywords_tags").map(parse_keyword_tags).unwrap_or_default(),
        ratings: VenueRatings {
            yelp: row.rating("yelp", "yelp_url"),
            google_maps: row.rating("google_maps", "google_maps_url"),
            tripadvisor: row.rating("tripadvisor", "tripadvisor_url"),
        },
        place_id: row.optional_text("gmaps_place_id"),
        primary_photo_ref: row.optional_text("gmaps_primary_photo_ref"),
        photo_attribution: row.optional_text("gmaps_photo_attribution"),
        processed_at: row.text("processed_at"),
        name,
    })
}

/// Turns venue CSV text into venues with valid coordinates.
///
/// Rows without a usable `lat,lng` pair are dropped, never reported as errors.
/// The call only fails when the text cannot be read as CSV at all.
pub fn parse_venues_csv(csv_text: &str) -> Result<Vec<Venue>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut total = 0;
    let mut venues = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        total += 1;

        let row = CsvRow {
            headers: &headers,
            record: &record,
        };
        if let Some(venue) = venue_from_row(&row) {
            venues.push(venue);
        }
    }

    info!("Parsed {} total venues, {} with valid coordinates", total, venues.len());
    Ok(venues)
}

/// Seeds the photo cache with every `(place_id, photo ref)` pair carried by the CSV.
pub fn register_csv_photos(venues: &[Venue], photo_cache: &PhotoCache) -> usize {
    let mut registered = 0;
    for venue in venues {
        if let (Some(place_id), Some(photo_ref)) = (&venue.place_id, &venue.primary_photo_ref) {
            photo_cache.put(&venue.name, &venue.address, place_id, photo_ref);
            registered += 1;
        }
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str = "name,venue_type,address,neighborhood,google_maps_url,coordinates,\
blog_description,general_description,keywords_tags,yelp_rating,google_maps_rating,\
tripadvisor_rating,yelp_url,tripadvisor_url,yelp_reviews_count,google_maps_reviews_count,\
tripadvisor_reviews_count,processed_at,gmaps_place_id,gmaps_primary_photo_ref,gmaps_photo_attribution";

    #[test]
    fn finds_coordinates_in_unnamed_column() {
        let csv = "name,address,location\nGreen Mill,4802 N Broadway,\"41.9689,-87.6598\"\n";

        let venues = parse_venues_csv(csv).unwrap();

        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].coordinates, "41.9689,-87.6598");
        assert_eq!(venues[0].latitude, 41.9689);
        assert_eq!(venues[0].longitude, -87.6598);
    }

    #[test]
    fn joins_separate_lat_lng_columns() {
        let csv = "name,address,lat,lng\nAlinea,123 Main St,41.8952,-87.6211\n";

        let venues = parse_venues_csv(csv).unwrap();

        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].name, "Alinea");
        assert_eq!(venues[0].address, "123 Main St");
        assert_eq!(venues[0].coordinates, "41.8952,-87.6211");
    }

    #[test]
    fn drops_rows_without_valid_coordinates() {
        let csv = "name,coordinates\n\
                   Good,\"41.1,-87.2\"\n\
                   Integers,\"41,-87\"\n\
                   Missing,\n\
                   Words,\"north,west\"\n";

        let venues = parse_venues_csv(csv).unwrap();

        let names: Vec<&str> = venues.iter().map(|venue| venue.name.as_str()).collect();
        assert_eq!(names, vec!["Good"]);
    }

    #[test]
    fn first_matching_column_wins() {
        let csv = "name,a,b\nTwo Pairs,\"41.5,-87.5\",\"42.0,-88.0\"\n";

        let venues = parse_venues_csv(csv).unwrap();

        assert_eq!(venues[0].coordinates, "41.5,-87.5");
    }

    #[test]
    fn skips_blank_lines_and_tolerates_ragged_rows() {
        let csv = "name,coordinates,neighborhood\n\nShort,\"41.1,-87.2\"\n,,\n";

        let venues = parse_venues_csv(csv).unwrap();

        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].neighborhood, "");
    }

    #[test]
    fn maps_every_known_column() {
        let csv = format!(
            "{}\n{}\n",
            FULL_HEADER,
            "Pequod's Pizza,Pizza / Bar,2207 N Clybourn Ave,Lincoln Park,https://maps.example/pequods,\
\"41.9220,-87.6645\",Caramelized crust.,Deep dish institution.,\"[\"\"pizza\"\", \"\" deep dish \"\"]\",\
4.4,4.6,,https://yelp.example/pequods,,\"3,210\",12000,n/a,2024-05-01T10:00:00Z,ChIJ-pequods,AZose-ref,© Google"
        );

        let venues = parse_venues_csv(&csv).unwrap();
        let venue = &venues[0];

        assert_eq!(venue.venue_type, "Pizza / Bar");
        assert_eq!(venue.keywords_tags, vec!["pizza", "deep dish"]);
        assert_eq!(venue.ratings.yelp.rating, Some(4.4));
        assert_eq!(venue.ratings.yelp.review_count, Some(3210));
        assert_eq!(venue.ratings.yelp.url.as_deref(), Some("https://yelp.example/pequods"));
        assert_eq!(venue.ratings.google_maps.rating, Some(4.6));
        assert_eq!(venue.ratings.google_maps.review_count, Some(12000));
        assert_eq!(venue.ratings.google_maps.url.as_deref(), Some("https://maps.example/pequods"));
        assert_eq!(venue.ratings.tripadvisor.rating, None);
        assert_eq!(venue.ratings.tripadvisor.review_count, None);
        assert_eq!(venue.ratings.tripadvisor.url, None);
        assert_eq!(venue.place_id.as_deref(), Some("ChIJ-pequods"));
        assert_eq!(venue.primary_photo_ref.as_deref(), Some("AZose-ref"));
        assert_eq!(venue.photo_attribution.as_deref(), Some("© Google"));
        assert_eq!(venue.processed_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn unparsable_numbers_become_none_not_zero() {
        assert_eq!(parse_rating(Some("not a number")), None);
        assert_eq!(parse_rating(Some("NaN")), None);
        assert_eq!(parse_rating(None), None);
        assert_eq!(parse_rating(Some(" 3.5 ")), Some(3.5));
        assert_eq!(parse_review_count(Some("-4")), None);
        assert_eq!(parse_review_count(Some("")), None);
        assert_eq!(parse_review_count(Some("17.0")), Some(17));
    }

    #[test]
    fn keyword_json_arrays_are_trimmed() {
        assert_eq!(
            KeywordTags::parse(r#"[" brunch ", "patio", ""]"#),
            KeywordTags::Json(vec![" brunch ".into(), "patio".into(), "".into()])
        );
        assert_eq!(parse_keyword_tags(r#"[" brunch ", "patio", ""]"#), vec!["brunch", "patio"]);
    }

    #[test]
    fn keyword_fallback_strips_braces_and_quotes() {
        assert_eq!(parse_keyword_tags(r#"{"jazz", "cocktails"}"#), vec!["jazz", "cocktails"]);
        assert_eq!(parse_keyword_tags("late night, ,dive bar"), vec!["late night", "dive bar"]);
        assert_eq!(parse_keyword_tags("42"), vec!["42"]);
        assert!(parse_keyword_tags("").is_empty());
        assert!(parse_keyword_tags("[]").is_empty());
    }

    #[test]
    fn registers_csv_photo_pairs_in_cache() {
        let csv = "name,address,coordinates,gmaps_place_id,gmaps_primary_photo_ref\n\
                   Yolk,1120 S Michigan,\"41.8680,-87.6240\",ChIJ-yolk,demo_photo_yolk\n\
                   Half,1 Main,\"41.8,-87.6\",ChIJ-half,\n";
        let venues = parse_venues_csv(csv).unwrap();
        let cache = PhotoCache::new(false);

        let registered = register_csv_photos(&venues, &cache);

        assert_eq!(registered, 1);
        let entry = cache.get("Yolk", "1120 S Michigan").unwrap();
        assert_eq!(entry.place_id, "ChIJ-yolk");
        assert_eq!(entry.photo_reference, "demo_photo_yolk");
    }
}
