mod common;

use bytes::Bytes;

use common::{Harness, eventually, png_request};
use gallery_core::config::StorageConfig;
use gallery_core::error::ErrorKind;
use gallery_core::traits::TransformOptions;
use gallery_core::types::pagination::PageRequest;
use gallery_database::store::MediaStore;
use gallery_entity::media::UpdateMediaAsset;
use gallery_service::UploadRequest;
use uuid::Uuid;

#[tokio::test]
async fn test_upload_round_trip() {
    let h = Harness::new();
    let (user, ctx) = h.register("ada").await;

    let mut req = png_request("Sunset", "sunset.PNG");
    req.tags = "beach, Sun ,beach".to_string();
    let asset = h.uploads.upload(&ctx, req).await.unwrap();

    assert_eq!(asset.owner_id, user.id);
    assert!(h.objects.contains(&asset.remote_ref));
    assert!(asset.remote_ref.starts_with("images/"));
    assert_eq!((asset.width, asset.height), (4, 3));
    assert_eq!(asset.format, "png");
    assert_eq!(asset.tags, "beach, Sun");
    assert!(asset.is_public);
    assert_eq!(h.store.media_count().await, 1);

    h.uploads.delete(&ctx, asset.id).await.unwrap();

    assert_eq!(h.store.media_count().await, 0);
    assert_eq!(h.objects.delete_attempts(), vec![asset.remote_ref.clone()]);
    assert!(!h.objects.contains(&asset.remote_ref));
}

#[tokio::test]
async fn test_blank_title_falls_back_to_filename() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;

    let asset = h.uploads.upload(&ctx, png_request("  ", "cat.png")).await.unwrap();
    assert_eq!(asset.title, "cat.png");
}

#[tokio::test]
async fn test_invalid_extension_never_reaches_remote() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;

    let err = h
        .uploads
        .upload(&ctx, png_request("Notes", "notes.txt"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidFileType);
    assert_eq!(h.objects.upload_attempts(), 0);
}

#[tokio::test]
async fn test_oversized_file_never_reaches_remote() {
    let h = Harness::with_storage(StorageConfig {
        max_upload_size_bytes: 16,
        ..StorageConfig::default()
    });
    let (_, ctx) = h.register("ada").await;

    let err = h
        .uploads
        .upload(&ctx, png_request("Big", "big.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FileTooLarge);
    assert_eq!(h.objects.upload_attempts(), 0);
}

#[tokio::test]
async fn test_undecodable_image_is_invalid_file_type() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;

    let req = UploadRequest {
        data: Bytes::from_static(b"definitely not a png"),
        ..png_request("Fake", "fake.png")
    };
    let err = h.uploads.upload(&ctx, req).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidFileType);
    assert_eq!(h.store.media_count().await, 0);
}

#[tokio::test]
async fn test_remote_failure_persists_nothing() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    h.objects.fail_uploads(true);

    let err = h
        .uploads
        .upload(&ctx, png_request("Sunset", "sunset.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UploadFailed);
    assert_eq!(h.store.media_count().await, 0);
    assert!(h.objects.delete_attempts().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_triggers_one_compensating_delete() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    h.store.fail_media_creates(true);

    let err = h
        .uploads
        .upload(&ctx, png_request("Sunset", "sunset.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(h.objects.upload_attempts(), 1);
    assert_eq!(h.objects.delete_attempts().len(), 1);
    assert_eq!(h.objects.object_count(), 0);
    assert_eq!(h.store.media_count().await, 0);
}

#[tokio::test]
async fn test_failed_compensating_delete_keeps_original_error() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    h.store.fail_media_creates(true);
    h.objects.fail_deletes(true);

    let err = h
        .uploads
        .upload(&ctx, png_request("Sunset", "sunset.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(h.objects.delete_attempts().len(), 1);
    assert_eq!(h.objects.object_count(), 1);
}

#[tokio::test]
async fn test_delete_survives_remote_outage() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    let asset = h.upload_png(&ctx, "Sunset").await;
    h.objects.fail_deletes(true);

    h.uploads.delete(&ctx, asset.id).await.unwrap();

    assert_eq!(h.objects.delete_attempts().len(), 1);
    assert_eq!(h.store.media_count().await, 0);
}

#[tokio::test]
async fn test_non_owner_gets_forbidden_and_missing_gets_not_found() {
    let h = Harness::new();
    let (_, owner) = h.register("ada").await;
    let (_, other) = h.register("grace").await;
    let asset = h.upload_png(&owner, "Sunset").await;

    let err = h.uploads.delete(&other, asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(h.objects.delete_attempts().is_empty());

    let err = h
        .media
        .update(&other, asset.id, UpdateMediaAsset::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let missing = Uuid::new_v4();
    let err = h.uploads.delete(&owner, missing).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = h
        .media
        .update(&other, missing, UpdateMediaAsset::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_owner_update() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    let asset = h.upload_png(&ctx, "Sunset").await;

    let updated = h
        .media
        .update(
            &ctx,
            asset.id,
            UpdateMediaAsset {
                title: Some("Dusk".to_string()),
                is_public: Some(false),
                ..UpdateMediaAsset::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Dusk");
    assert!(!updated.is_public);
    assert_eq!(updated.remote_ref, asset.remote_ref);

    let err = h
        .media
        .update(
            &ctx,
            asset.id,
            UpdateMediaAsset {
                title: Some("   ".to_string()),
                ..UpdateMediaAsset::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_private_asset_hidden_from_others() {
    let h = Harness::new();
    let (_, owner) = h.register("ada").await;
    let (_, other) = h.register("grace").await;

    let mut req = png_request("Secret", "secret.png");
    req.is_public = Some(false);
    let asset = h.uploads.upload(&owner, req).await.unwrap();

    assert!(h.media.get(Some(owner.user_id), asset.id).await.is_ok());

    let err = h.media.get(Some(other.user_id), asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = h.media.get(None, asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let public = h.media.list_public(PageRequest::default()).await.unwrap();
    assert_eq!(public.total, 0);
    let mine = h.media.list_mine(&owner, PageRequest::default()).await.unwrap();
    assert_eq!(mine.total, 1);
}

#[tokio::test]
async fn test_reads_count_views_in_background() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    let asset = h.upload_png(&ctx, "Sunset").await;

    h.media.get(None, asset.id).await.unwrap();
    h.media.get(None, asset.id).await.unwrap();

    let store = h.store.clone();
    let counted = eventually(|| {
        let store = store.clone();
        async move {
            MediaStore::find_by_id(&*store, asset.id)
                .await
                .unwrap()
                .is_some_and(|a| a.view_count == 2)
        }
    })
    .await;
    assert!(counted);
}

#[tokio::test]
async fn test_search_and_tags() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;

    let mut beach = png_request("Sunset at the beach", "a.png");
    beach.tags = "travel, beach".to_string();
    h.uploads.upload(&ctx, beach).await.unwrap();

    let mut city = png_request("Skyline", "b.png");
    city.tags = "travel, city".to_string();
    h.uploads.upload(&ctx, city).await.unwrap();

    let found = h.media.search_public("BEACH", PageRequest::default()).await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].title, "Sunset at the beach");

    let tagged = h.media.by_tags("travel", PageRequest::default()).await.unwrap();
    assert_eq!(tagged.total, 2);
    assert_eq!(tagged.items[0].title, "Skyline");

    let both = h.media.by_tags("Travel,city", PageRequest::default()).await.unwrap();
    assert_eq!(both.total, 1);

    let err = h.media.by_tags(" , ", PageRequest::default()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_transform_url() {
    let h = Harness::new();
    let (_, ctx) = h.register("ada").await;
    let asset = h.upload_png(&ctx, "Sunset").await;

    let url = h
        .media
        .transform_url(
            None,
            asset.id,
            &TransformOptions {
                width: Some(200),
                height: None,
                crop: None,
            },
        )
        .await
        .unwrap();
    assert!(url.contains(&asset.remote_ref));

    let err = h
        .media
        .transform_url(
            None,
            asset.id,
            &TransformOptions {
                width: Some(0),
                ..TransformOptions::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}
