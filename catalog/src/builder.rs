//! Record and index-patch construction.
//!
//! Pure assembly of a [`RecipeRecord`] and its denormalized [`IndexEntry`]
//! from form input plus the keys the upload orchestrator produced. The
//! fallback chains here decide what listing views show when a role was
//! not uploaded: a record without hero shots falls back to its thumbnail,
//! and an index entry without a thumbnail falls back to the first hero
//! shot. When neither exists both fields stay absent; that is not a save
//! error.

use crate::error::{Error, Result};
use crate::model::{
    HeroImages, IndexEntry, IndexImages, Localized, Price, RecipeImages, RecipeRecord,
};
use crate::upload::UploadedImages;

/// Default currency when a price amount is entered without one.
pub const DEFAULT_CURRENCY: &str = "GEL";

/// Raw form input of one admin save action.
#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub id: String,
    pub category: String,
    pub title_ru: String,
    pub title_he: String,
    pub summary_ru: String,
    pub summary_he: String,
    pub price_amount: Option<f64>,
    pub price_currency: Option<String>,

    /// Comma-separated tag list.
    pub tags: String,

    /// ISO date stamp; stamped with today (UTC) when absent.
    pub date: Option<String>,
}

/// Build the full record and the index patch for one save.
pub fn build_records(form: &RecipeForm, images: &UploadedImages) -> Result<(RecipeRecord, IndexEntry)> {
    let id = form.id.trim();
    let category = form.category.trim();
    if id.is_empty() {
        return Err(Error::Validation("recipe id is required".to_string()));
    }
    if category.is_empty() {
        return Err(Error::Validation("category is required".to_string()));
    }

    let price = match form.price_amount {
        Some(amount) if amount < 0.0 => {
            return Err(Error::Validation(format!(
                "price amount {} is negative",
                amount
            )));
        }
        Some(amount) => Some(Price {
            amount,
            currency: form
                .price_currency
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }),
        None => None,
    };

    let hero = if !images.hero.is_empty() {
        Some(HeroImages::Many(images.hero.clone()))
    } else {
        images.thumb.clone().map(HeroImages::One)
    };

    let index_thumb = images
        .thumb
        .clone()
        .or_else(|| images.hero.first().cloned());

    let title = Localized::new(form.title_ru.clone(), form.title_he.clone());
    let summary = Localized::new(form.summary_ru.clone(), form.summary_he.clone());
    let tags = parse_tags(&form.tags);
    let date = form
        .date
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

    let record = RecipeRecord {
        id: id.to_string(),
        category: category.to_string(),
        title: title.clone(),
        summary: summary.clone(),
        price: price.clone(),
        images: RecipeImages {
            thumb: images.thumb.clone(),
            hero,
            steps: images.steps.clone(),
        },
        tags: tags.clone(),
        date,
    };

    let patch = IndexEntry {
        id: id.to_string(),
        category: category.to_string(),
        title,
        summary,
        images: IndexImages { thumb: index_thumb },
        price,
        tags,
    };

    Ok((record, patch))
}

/// Split a comma-separated tag string, trimming and dropping empties.
/// Duplicates are kept; the catalog has never deduplicated tags.
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
