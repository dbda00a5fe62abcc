//! Upload orchestration for the fixed image roles of a recipe.
//!
//! A recipe carries up to three file groups: one optional thumbnail, an
//! ordered run of hero shots, and an ordered run of step shots with
//! positional bilingual captions. The orchestrator transcodes each file
//! and stores it under a key derived from the recipe id and the file's
//! position, then hands the resulting keys to the record builder.
//!
//! Transcode+store pairs within a group run concurrently up to
//! [`MAX_CONCURRENT_UPLOADS`], but result order is tied to input order,
//! not completion order.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};

use common::ObjectStore;

use crate::error::{Error, Result};
use crate::model::{Localized, StepImage};
use crate::transcode::{self, TranscodeParams, WEBP_CONTENT_TYPE};

/// Transcode parameters for the thumbnail role.
pub const THUMB_PARAMS: TranscodeParams = TranscodeParams {
    quality: 0.9,
    max_width: 800,
};

/// Transcode parameters for hero shots.
pub const HERO_PARAMS: TranscodeParams = TranscodeParams {
    quality: 0.95,
    max_width: 1600,
};

/// Transcode parameters for step shots.
pub const STEP_PARAMS: TranscodeParams = TranscodeParams {
    quality: 0.9,
    max_width: 1600,
};

/// Upper bound on concurrent transcode+store pairs in one orchestration.
pub const MAX_CONCURRENT_UPLOADS: usize = 4;

/// One source file handed to the orchestrator.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub content: Bytes,
}

/// Everything one admin upload action carries.
#[derive(Debug, Clone, Default)]
pub struct UploadPlan {
    pub recipe_id: String,
    pub category: String,
    pub thumb: Option<SourceImage>,
    pub hero: Vec<SourceImage>,
    pub steps: Vec<SourceImage>,

    /// Step captions, matched to step files positionally. A missing
    /// caption at an index yields an empty string, never an error.
    pub captions_ru: Vec<String>,
    pub captions_he: Vec<String>,
}

/// Final stored keys of one upload action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadedImages {
    pub thumb: Option<String>,
    pub hero: Vec<String>,
    pub steps: Vec<StepImage>,
}

/// Sequences transcoding and storage for one recipe's images.
pub struct UploadOrchestrator {
    store: Arc<dyn ObjectStore>,
}

impl UploadOrchestrator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Run the full plan and return the stored keys.
    ///
    /// Any single transcode or store failure aborts the orchestration.
    /// Objects stored by earlier steps of the same invocation are left in
    /// place; there is no rollback.
    pub async fn run(&self, plan: UploadPlan) -> Result<UploadedImages> {
        if plan.recipe_id.trim().is_empty() {
            return Err(Error::Validation("recipe id is required".to_string()));
        }
        if plan.category.trim().is_empty() {
            return Err(Error::Validation("category is required".to_string()));
        }

        let prefix = format!("images/recipes/{}/", plan.recipe_id.trim());

        let thumb = match plan.thumb {
            Some(source) => {
                let key = format!("{}thumb.webp", prefix);
                self.transcode_and_store(source, THUMB_PARAMS, key.clone())
                    .await?;
                Some(key)
            }
            None => None,
        };

        let hero = self
            .store_group(plan.hero, HERO_PARAMS, &prefix, "hero")
            .await?;

        let step_keys = self
            .store_group(plan.steps, STEP_PARAMS, &prefix, "step")
            .await?;
        let steps = step_keys
            .into_iter()
            .enumerate()
            .map(|(i, src)| StepImage {
                src,
                name: Localized {
                    ru: plan.captions_ru.get(i).cloned().unwrap_or_default(),
                    he: plan.captions_he.get(i).cloned().unwrap_or_default(),
                },
            })
            .collect();

        Ok(UploadedImages { thumb, hero, steps })
    }

    /// Transcode and store one ordered group, `<prefix><role>-<i>.webp`
    /// with 1-based `i`. Keys come back in input order regardless of which
    /// upload finishes first.
    async fn store_group(
        &self,
        sources: Vec<SourceImage>,
        params: TranscodeParams,
        prefix: &str,
        role: &str,
    ) -> Result<Vec<String>> {
        let uploads = sources.into_iter().enumerate().map(|(i, source)| {
            let key = format!("{}{}-{}.webp", prefix, role, i + 1);
            async move {
                self.transcode_and_store(source, params, key.clone())
                    .await?;
                Ok::<String, Error>(key)
            }
        });

        stream::iter(uploads)
            .buffered(MAX_CONCURRENT_UPLOADS)
            .try_collect()
            .await
    }

    async fn transcode_and_store(
        &self,
        source: SourceImage,
        params: TranscodeParams,
        key: String,
    ) -> Result<()> {
        let file_name = source.file_name.clone();
        let encoded = tokio::task::spawn_blocking(move || {
            transcode::transcode(&source.content, &source.file_name, &params)
        })
        .await
        .map_err(|e| Error::Internal(format!("transcode task failed: {}", e)))??;

        tracing::debug!(
            key = %key,
            source = %file_name,
            width = encoded.width,
            height = encoded.height,
            "transcoded image"
        );

        self.store
            .put(&key, encoded.content, WEBP_CONTENT_TYPE)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::InMemoryStore;
    use std::io::Cursor;

    fn png_image(width: u32, height: u32) -> SourceImage {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        SourceImage {
            file_name: format!("src-{}x{}.png", width, height),
            content: Bytes::from(out.into_inner()),
        }
    }

    fn orchestrator() -> (Arc<InMemoryStore>, UploadOrchestrator) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), UploadOrchestrator::new(store))
    }

    #[tokio::test]
    async fn should_store_hero_keys_in_input_order() {
        // given
        let (_store, orchestrator) = orchestrator();
        let plan = UploadPlan {
            recipe_id: "khinkali".to_string(),
            category: "mains".to_string(),
            hero: vec![png_image(40, 30), png_image(50, 30), png_image(60, 30)],
            ..Default::default()
        };

        // when
        let out = orchestrator.run(plan).await.unwrap();

        // then
        assert_eq!(
            out.hero,
            vec![
                "images/recipes/khinkali/hero-1.webp".to_string(),
                "images/recipes/khinkali/hero-2.webp".to_string(),
                "images/recipes/khinkali/hero-3.webp".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn should_pair_captions_positionally_with_empty_fallback() {
        // given - three steps, only two Russian captions
        let (_store, orchestrator) = orchestrator();
        let plan = UploadPlan {
            recipe_id: "khinkali".to_string(),
            category: "mains".to_string(),
            steps: vec![png_image(20, 20), png_image(20, 20), png_image(20, 20)],
            captions_ru: vec!["Замесить".to_string(), "Слепить".to_string()],
            captions_he: vec!["ללוש".to_string()],
            ..Default::default()
        };

        // when
        let out = orchestrator.run(plan).await.unwrap();

        // then
        assert_eq!(out.steps.len(), 3);
        assert_eq!(out.steps[0].name.ru, "Замесить");
        assert_eq!(out.steps[1].name.ru, "Слепить");
        assert_eq!(out.steps[2].name.ru, "");
        assert_eq!(out.steps[1].name.he, "");
        assert_eq!(out.steps[2].src, "images/recipes/khinkali/step-3.webp");
    }

    #[tokio::test]
    async fn should_store_thumbnail_under_fixed_key() {
        // given
        let (store, orchestrator) = orchestrator();
        let plan = UploadPlan {
            recipe_id: "khinkali".to_string(),
            category: "mains".to_string(),
            thumb: Some(png_image(1000, 800)),
            ..Default::default()
        };

        // when
        let out = orchestrator.run(plan).await.unwrap();

        // then
        assert_eq!(
            out.thumb.as_deref(),
            Some("images/recipes/khinkali/thumb.webp")
        );
        assert_eq!(
            store.content_type("images/recipes/khinkali/thumb.webp").as_deref(),
            Some(WEBP_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn should_require_id_and_category() {
        // given
        let (_store, orchestrator) = orchestrator();

        // when
        let no_id = orchestrator
            .run(UploadPlan {
                category: "mains".to_string(),
                ..Default::default()
            })
            .await;
        let no_category = orchestrator
            .run(UploadPlan {
                recipe_id: "khinkali".to_string(),
                ..Default::default()
            })
            .await;

        // then
        assert!(matches!(no_id, Err(Error::Validation(_))));
        assert!(matches!(no_category, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn should_abort_on_undecodable_file_leaving_earlier_objects() {
        // given - second hero file is not an image
        let (store, orchestrator) = orchestrator();
        let plan = UploadPlan {
            recipe_id: "khinkali".to_string(),
            category: "mains".to_string(),
            hero: vec![
                png_image(40, 30),
                SourceImage {
                    file_name: "broken.png".to_string(),
                    content: Bytes::from_static(b"not pixels"),
                },
            ],
            ..Default::default()
        };

        // when
        let result = orchestrator.run(plan).await;

        // then
        assert!(matches!(result, Err(Error::Transcode(_))));
        assert_eq!(store.keys(), vec!["images/recipes/khinkali/hero-1.webp".to_string()]);
    }
}
