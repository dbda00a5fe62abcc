//! Core data types for the recipe catalog.
//!
//! A [`RecipeRecord`] is the full content of one recipe, written wholesale
//! to `data/recipes/<id>.json` on every save. An [`IndexEntry`] is its
//! denormalized summary, kept in the single ordered collection at
//! `data/recipes/index.json` that listing and category views read. The two
//! serialize exactly like the JSON artifacts the site already publishes,
//! so existing data files load unchanged.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Content type used for all persisted JSON artifacts.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A bilingual text pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localized {
    /// Russian text.
    #[serde(default)]
    pub ru: String,

    /// Hebrew text.
    #[serde(default)]
    pub he: String,
}

impl Localized {
    pub fn new(ru: impl Into<String>, he: impl Into<String>) -> Self {
        Self {
            ru: ru.into(),
            he: he.into(),
        }
    }
}

/// An optional price tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Non-negative amount.
    pub amount: f64,

    /// Currency code, e.g. `GEL`.
    pub currency: String,
}

/// One step photo with its bilingual caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepImage {
    /// Storage key of the encoded image.
    pub src: String,

    /// Caption shown under the step.
    pub name: Localized,
}

/// Hero imagery of a record.
///
/// Historical data holds either a single key (the thumbnail fallback the
/// admin tool wrote when no hero shots were uploaded) or an ordered list
/// of keys, so both shapes round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeroImages {
    One(String),
    Many(Vec<String>),
}

impl HeroImages {
    /// Keys in display order.
    pub fn keys(&self) -> Vec<String> {
        match self {
            HeroImages::One(key) => vec![key.clone()],
            HeroImages::Many(keys) => keys.clone(),
        }
    }
}

/// Image set of a full record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroImages>,

    #[serde(default)]
    pub steps: Vec<StepImage>,
}

/// Image subset carried by an index entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Full content for one recipe.
///
/// Created or overwritten wholesale on each save; there is no
/// partial-field update. The `id` is immutable once created and roots the
/// record's key namespace (`data/recipes/<id>.json`,
/// `images/recipes/<id>/...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,

    /// Soft reference into the category list; not enforced.
    pub category: String,

    pub title: Localized,
    pub summary: Localized,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(default)]
    pub images: RecipeImages,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation date stamp, ISO date (`YYYY-MM-DD`).
    pub date: String,
}

/// Denormalized summary of a [`RecipeRecord`].
///
/// Exactly one entry per existing record id lives in the index
/// collection; the collection is authoritative for listing views while
/// the record is authoritative for detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub category: String,
    pub title: Localized,
    pub summary: Localized,

    #[serde(default)]
    pub images: IndexImages,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Serialize a value the way the site's JSON artifacts are formatted
/// (pretty, two-space indent).
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Bytes> {
    let mut out = serde_json::to_vec_pretty(value)?;
    out.push(b'\n');
    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_omit_absent_price_and_thumb() {
        // given
        let record = RecipeRecord {
            id: "khinkali".to_string(),
            category: "mains".to_string(),
            title: Localized::new("Хинкали", "חינקלי"),
            summary: Localized::default(),
            price: None,
            images: RecipeImages::default(),
            tags: vec![],
            date: "2026-08-05".to_string(),
        };

        // when
        let json = serde_json::to_value(&record).unwrap();

        // then
        assert!(json.get("price").is_none());
        assert!(json["images"].get("thumb").is_none());
        assert!(json["images"].get("hero").is_none());
    }

    #[test]
    fn should_round_trip_single_hero_key_as_string() {
        // given
        let images = RecipeImages {
            thumb: Some("images/recipes/r1/thumb.webp".to_string()),
            hero: Some(HeroImages::One("images/recipes/r1/thumb.webp".to_string())),
            steps: vec![],
        };

        // when
        let json = serde_json::to_value(&images).unwrap();
        let back: RecipeImages = serde_json::from_value(json.clone()).unwrap();

        // then
        assert!(json["hero"].is_string());
        assert_eq!(back, images);
    }

    #[test]
    fn should_round_trip_hero_key_list_as_array() {
        // given
        let images = RecipeImages {
            thumb: None,
            hero: Some(HeroImages::Many(vec![
                "images/recipes/r1/hero-1.webp".to_string(),
                "images/recipes/r1/hero-2.webp".to_string(),
            ])),
            steps: vec![],
        };

        // when
        let json = serde_json::to_value(&images).unwrap();
        let back: RecipeImages = serde_json::from_value(json.clone()).unwrap();

        // then
        assert!(json["hero"].is_array());
        assert_eq!(back.hero.unwrap().keys().len(), 2);
    }

    #[test]
    fn should_parse_published_index_entry() {
        // given - the shape the admin tool has always written
        let raw = r#"{
          "id": "khinkali",
          "category": "mains",
          "title": { "ru": "Хинкали", "he": "חינקלי" },
          "summary": { "ru": "Сочные", "he": "עסיסי" },
          "images": { "thumb": "images/recipes/khinkali/thumb.webp" },
          "price": { "amount": 25, "currency": "GEL" },
          "tags": ["dumplings"]
        }"#;

        // when
        let entry: IndexEntry = serde_json::from_str(raw).unwrap();

        // then
        assert_eq!(entry.id, "khinkali");
        assert_eq!(entry.price.as_ref().unwrap().amount, 25.0);
        assert_eq!(
            entry.images.thumb.as_deref(),
            Some("images/recipes/khinkali/thumb.webp")
        );
    }

    #[test]
    fn should_pretty_print_with_trailing_newline() {
        // given
        let entry = Localized::new("а", "א");

        // when
        let bytes = to_pretty_json(&entry).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        // then
        assert!(text.contains("\n  \"ru\""));
        assert!(text.ends_with('\n'));
    }
}
