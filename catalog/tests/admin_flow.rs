//! Integration tests for the full admin workflow against a local root.
//!
//! These tests run the real pipeline (transcode, store, build, save,
//! delete) over a [`LocalStore`] rooted in a temp directory and verify
//! the on-disk layout the site serves statically.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use catalog::builder::{build_records, RecipeForm};
use catalog::upload::{SourceImage, UploadOrchestrator, UploadPlan};
use catalog::CatalogStore;
use common::{LocalStore, ObjectStore};

fn png_image(width: u32, height: u32, name: &str) -> SourceImage {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 60]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode test image");
    SourceImage {
        file_name: name.to_string(),
        content: Bytes::from(out.into_inner()),
    }
}

fn form(id: &str) -> RecipeForm {
    RecipeForm {
        id: id.to_string(),
        category: "mains".to_string(),
        title_ru: "Хинкали".to_string(),
        title_he: "חינקלי".to_string(),
        summary_ru: "Сочные грузинские".to_string(),
        summary_he: "כיסוני בצק".to_string(),
        price_amount: Some(25.0),
        price_currency: Some("GEL".to_string()),
        tags: "dumplings, georgian".to_string(),
        date: Some("2026-08-05".to_string()),
    }
}

#[tokio::test]
async fn upload_save_delete_round_trip_on_local_root() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store: Arc<LocalStore> = Arc::new(LocalStore::new(temp_dir.path()));

    // Upload: thumbnail plus two hero shots and two captioned steps
    let plan = UploadPlan {
        recipe_id: "khinkali".to_string(),
        category: "mains".to_string(),
        thumb: Some(png_image(1200, 900, "thumb.jpg")),
        hero: vec![
            png_image(2000, 1500, "hero-a.jpg"),
            png_image(1800, 1200, "hero-b.jpg"),
        ],
        steps: vec![png_image(900, 600, "s1.jpg"), png_image(900, 600, "s2.jpg")],
        captions_ru: vec!["Замесить тесто".to_string(), "Слепить".to_string()],
        captions_he: vec!["ללוש".to_string()],
    };
    let images = UploadOrchestrator::new(store.clone())
        .run(plan)
        .await
        .expect("Failed to upload");

    assert_eq!(
        images.hero,
        vec![
            "images/recipes/khinkali/hero-1.webp".to_string(),
            "images/recipes/khinkali/hero-2.webp".to_string(),
        ]
    );
    assert!(temp_dir
        .path()
        .join("images/recipes/khinkali/thumb.webp")
        .is_file());
    assert!(temp_dir
        .path()
        .join("images/recipes/khinkali/step-2.webp")
        .is_file());

    // Thumbnail is capped at 800 wide
    let thumb_bytes = std::fs::read(temp_dir.path().join("images/recipes/khinkali/thumb.webp"))
        .expect("Failed to read thumb");
    let thumb = image::load_from_memory(&thumb_bytes).expect("Failed to decode thumb");
    assert_eq!((thumb.width(), thumb.height()), (800, 600));

    // Save the record and index patch
    let (record, patch) = build_records(&form("khinkali"), &images).expect("Failed to build");
    let (worker, handle) = CatalogStore::new(store.clone());
    tokio::spawn(worker.run());
    handle
        .save(record.clone(), patch)
        .await
        .expect("Failed to save");

    let record_path = temp_dir.path().join("data/recipes/khinkali.json");
    assert!(record_path.is_file());
    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&record_path).unwrap()).unwrap();
    assert_eq!(on_disk["title"]["ru"], "Хинкали");
    assert_eq!(on_disk["price"]["amount"], 25.0);
    assert_eq!(on_disk["images"]["steps"][1]["name"]["ru"], "Слепить");
    assert_eq!(on_disk["images"]["steps"][1]["name"]["he"], "");

    let index_path = temp_dir.path().join("data/recipes/index.json");
    let index: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&index_path).unwrap()).unwrap();
    assert_eq!(index.as_array().unwrap().len(), 1);
    assert_eq!(index[0]["id"], "khinkali");
    assert_eq!(index[0]["images"]["thumb"], "images/recipes/khinkali/thumb.webp");

    // Delete with images
    handle
        .delete("khinkali", true)
        .await
        .expect("Failed to delete");
    assert!(!record_path.is_file());
    assert!(!temp_dir.path().join("images/recipes/khinkali").exists());
    let index: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&index_path).unwrap()).unwrap();
    assert_eq!(index.as_array().unwrap().len(), 0);

    // Deleting again is still success
    handle
        .delete("khinkali", true)
        .await
        .expect("Second delete should be idempotent");
}

#[tokio::test]
async fn resave_updates_index_entry_in_place() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(LocalStore::new(temp_dir.path()));
    let (worker, handle) = CatalogStore::new(store.clone());
    tokio::spawn(worker.run());

    // Three recipes saved without images
    for id in ["borscht", "khinkali", "lobio"] {
        let (record, patch) =
            build_records(&form(id), &Default::default()).expect("Failed to build");
        handle.save(record, patch).await.expect("Failed to save");
    }

    // Re-save the middle one with a different category
    let mut updated = form("khinkali");
    updated.category = "dumplings".to_string();
    let (record, patch) = build_records(&updated, &Default::default()).expect("Failed to build");
    handle.save(record, patch).await.expect("Failed to re-save");

    let index: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("data/recipes/index.json")).unwrap(),
    )
    .unwrap();
    let ids: Vec<&str> = index
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["borscht", "khinkali", "lobio"]);
    assert_eq!(index[1]["category"], "dumplings");
}

#[tokio::test]
async fn record_without_hero_shots_falls_back_to_thumbnail() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(LocalStore::new(temp_dir.path()));

    let plan = UploadPlan {
        recipe_id: "lobio".to_string(),
        category: "mains".to_string(),
        thumb: Some(png_image(600, 400, "lobio.png")),
        ..Default::default()
    };
    let images = UploadOrchestrator::new(store.clone())
        .run(plan)
        .await
        .expect("Failed to upload");
    let (record, patch) = build_records(&form("lobio"), &images).expect("Failed to build");

    let (worker, handle) = CatalogStore::new(store);
    tokio::spawn(worker.run());
    handle.save(record, patch).await.expect("Failed to save");

    let on_disk: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("data/recipes/lobio.json")).unwrap(),
    )
    .unwrap();
    // A lone thumbnail serializes as the hero string, not a list
    assert_eq!(on_disk["images"]["hero"], "images/recipes/lobio/thumb.webp");
}

#[tokio::test]
async fn traversal_keys_never_touch_the_root() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = LocalStore::new(temp_dir.path().join("root"));

    let result = store.delete("../../etc/passwd").await;
    assert!(result.is_err());

    let result = store
        .put("../outside.txt", Bytes::from_static(b"escape"), "text/plain")
        .await;
    assert!(result.is_err());
    assert!(!temp_dir.path().join("outside.txt").exists());
}
