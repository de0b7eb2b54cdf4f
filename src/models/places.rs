use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the provider's text search. Fields we do not read are kept in
/// `extra` so the search proxy can hand the payload back largely unmodified.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceCandidate {
    pub place_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceDetailsResponse {
    pub status: String,
    pub result: Option<PlacePhotos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlacePhotos {
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Photo {
    pub height: i64,
    #[serde(default)]
    pub html_attributions: Vec<String>,
    pub photo_reference: String,
    pub width: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_search_keeps_unread_fields() {
        let raw = json!({
            "status": "OK",
            "html_attributions": [],
            "results": [{
                "place_id": "ChIJ-alinea",
                "name": "Alinea",
                "rating": 4.7,
            }]
        });

        let parsed: TextSearchResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.results[0].place_id, "ChIJ-alinea");

        let round_tripped = serde_json::to_value(&parsed).unwrap();
        assert_eq!(round_tripped, raw);
    }

    #[test]
    fn zero_results_has_no_candidates() {
        let parsed: TextSearchResponse =
            serde_json::from_value(json!({ "status": "ZERO_RESULTS" })).unwrap();

        assert!(parsed.results.is_empty());
    }
}
