use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const PHOTO_PROXY_PATH: &str = "/api/photo";

static SIZE_PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"w=\d+&h=\d+").unwrap());

/// Display sizes requested by the venue cards, thumbnails and the modal hero.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum PhotoSize {
    #[serde(rename = "sm")]
    Small,
    #[serde(rename = "md")]
    Medium,
    #[default]
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "hero")]
    Hero,
}

impl PhotoSize {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            PhotoSize::Small => (120, 80),
            PhotoSize::Medium => (250, 167),
            PhotoSize::Large => (300, 200),
            PhotoSize::Hero => (800, 600),
        }
    }
}

pub fn proxy_photo_url(photo_ref: &str, size: PhotoSize) -> String {
    let (width, height) = size.dimensions();
    format!(
        "{}?ref={}&w={}&h={}",
        PHOTO_PROXY_PATH,
        urlencoding::encode(photo_ref),
        width,
        height
    )
}

/// Rewrites the `w=..&h=..` pair of a proxy URL. URLs without one come back unchanged.
pub fn resize_photo_url(url: &str, size: PhotoSize) -> String {
    let (width, height) = size.dimensions();
    SIZE_PARAMS
        .replace(url, format!("w={}&h={}", width, height).as_str())
        .into_owned()
}
