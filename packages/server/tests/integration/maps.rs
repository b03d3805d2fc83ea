use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use server::entity::{map, map_country};
use uuid::Uuid;

use crate::common::{MapUpload, TestApp, routes};

const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

#[tokio::test]
async fn upload_stores_blob_under_content_key() {
    let app = TestApp::spawn().await;

    let map_id = app.create_map(&MapUpload::default()).await;

    let res = app.get(&routes::map(&map_id)).await;
    assert_eq!(res.status, 200, "get_map failed: {}", res.text);
    assert_eq!(res.str_field("sha256"), ABC_SHA256);
    assert_eq!(res.str_field("source"), "OSM");
    assert_eq!(res.str_field("region"), "AFR");

    let today = Utc::now().format("%Y/%m/%d");
    let expected_key = format!("maps/{today}/{ABC_SHA256}.png");
    assert_eq!(res.str_field("fileKey"), expected_key);

    let image_url = res.str_field("imageUrl");
    assert!(image_url.ends_with(&expected_key), "unexpected link {image_url}");
    let (status, bytes) = app.fetch_bytes(&image_url).await;
    assert_eq!(status, 200);
    assert_eq!(bytes, b"abc");
}

#[tokio::test]
async fn invalid_region_is_rejected_before_storage() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(&MapUpload {
            region: "XXX",
            ..Default::default()
        })
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert!(res.text.contains("region"), "message should name the field: {}", res.text);
    assert!(app.stored_objects().is_empty());
    assert_eq!(map::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_country_is_rejected_before_storage() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(&MapUpload {
            countries: &["KE", "ZZ"],
            ..Default::default()
        })
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert!(app.stored_objects().is_empty());
}

#[tokio::test]
async fn invalid_country_is_rejected_before_file_is_read() {
    // The file alone would trip the size limit; the country code must be
    // rejected first.
    let app = TestApp::spawn_with(|storage| storage.max_blob_size = 8).await;

    let res = app
        .upload(&MapUpload {
            countries: &["ZZ"],
            bytes: &[7u8; 64],
            ..Default::default()
        })
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert_eq!(res.body["message"], "invalid country: ZZ");
    assert!(app.stored_objects().is_empty());
}

#[tokio::test]
async fn invalid_region_is_rejected_before_file_is_read() {
    let app = TestApp::spawn_with(|storage| storage.max_blob_size = 8).await;

    let res = app
        .upload(&MapUpload {
            region: "XXX",
            bytes: &[7u8; 64],
            ..Default::default()
        })
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "invalid region: XXX");
}

#[tokio::test]
async fn missing_metadata_field_is_rejected() {
    let app = TestApp::spawn().await;

    let part = reqwest::multipart::Part::bytes(b"abc".to_vec())
        .file_name("map.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("source", "OSM")
        .text("region", "AFR")
        .part("file", part);
    let res = app
        .client
        .post(app.url(routes::MAPS))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    assert!(app.stored_objects().is_empty());
}

#[tokio::test]
async fn identical_uploads_share_one_object() {
    let app = TestApp::spawn().await;
    let upload = MapUpload {
        bytes: b"same image bytes",
        ..Default::default()
    };

    let first = app.create_map(&upload).await;
    let second = app.create_map(&upload).await;
    assert_ne!(first, second);

    let first_key = app.get(&routes::map(&first)).await.str_field("fileKey");
    let second_key = app.get(&routes::map(&second)).await.str_field("fileKey");
    assert_eq!(first_key, second_key);
    assert_eq!(app.stored_objects().len(), 1);
}

#[tokio::test]
async fn countries_are_recorded_once_each() {
    let app = TestApp::spawn().await;

    let map_id = app
        .create_map(&MapUpload {
            countries: &["UG", "KE", "UG"],
            ..Default::default()
        })
        .await;

    let res = app.get(&routes::map(&map_id)).await;
    assert_eq!(res.body["countries"], json!(["KE", "UG"]));

    let id = Uuid::parse_str(&map_id).unwrap();
    let rows = map_country::Entity::find()
        .filter(map_country::Column::MapId.eq(id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn comma_separated_countries_are_accepted() {
    let app = TestApp::spawn().await;

    let map_id = app
        .create_map(&MapUpload {
            countries: &["KE,TZ"],
            ..Default::default()
        })
        .await;

    let res = app.get(&routes::map(&map_id)).await;
    assert_eq!(res.body["countries"], json!(["KE", "TZ"]));
}

#[tokio::test]
async fn extension_follows_content_type() {
    let app = TestApp::spawn().await;

    let map_id = app
        .create_map(&MapUpload {
            file_name: "map.jpg",
            mime: "image/jpeg",
            ..Default::default()
        })
        .await;

    let key = app.get(&routes::map(&map_id)).await.str_field("fileKey");
    assert!(key.ends_with(".jpg"), "unexpected key {key}");
}

#[tokio::test]
async fn oversize_upload_is_rejected() {
    let app = TestApp::spawn_with(|storage| storage.max_blob_size = 8).await;

    let res = app
        .upload(&MapUpload {
            bytes: b"more than eight bytes",
            ..Default::default()
        })
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert!(app.stored_objects().is_empty());
}

#[tokio::test]
async fn get_unknown_map_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::map(&Uuid::now_v7().to_string())).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");
}

#[tokio::test]
async fn malformed_map_id_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::map("not-a-uuid")).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn metadata_update_replaces_fields() {
    let app = TestApp::spawn().await;
    let map_id = app.create_map(&MapUpload::default()).await;

    let res = app
        .put_json(
            &routes::map_metadata(&map_id),
            &json!({"source": "WFP", "region": "EUR", "category": "FIRE"}),
        )
        .await;
    assert_eq!(res.status, 204, "update failed: {}", res.text);

    let res = app.get(&routes::map(&map_id)).await;
    assert_eq!(res.str_field("source"), "WFP");
    assert_eq!(res.str_field("region"), "EUR");
    assert_eq!(res.str_field("category"), "FIRE");
    assert_eq!(res.str_field("sha256"), ABC_SHA256);
}

#[tokio::test]
async fn metadata_update_rejects_unknown_code() {
    let app = TestApp::spawn().await;
    let map_id = app.create_map(&MapUpload::default()).await;

    let res = app
        .put_json(
            &routes::map_metadata(&map_id),
            &json!({"source": "WFP", "region": "MARS", "category": "FIRE"}),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");

    let res = app.get(&routes::map(&map_id)).await;
    assert_eq!(res.str_field("region"), "AFR");
}

#[tokio::test]
async fn metadata_update_rejects_invalid_json() {
    let app = TestApp::spawn().await;
    let map_id = app.create_map(&MapUpload::default()).await;

    let res = app.put_raw(&routes::map_metadata(&map_id), "{not json").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn metadata_update_for_unknown_map_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .put_json(
            &routes::map_metadata(&Uuid::now_v7().to_string()),
            &json!({"source": "WFP", "region": "EUR", "category": "FIRE"}),
        )
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");
}

#[tokio::test]
async fn lookups_list_default_codes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::LOOKUPS).await;
    assert_eq!(res.status, 200);
    let regions = res.body["regions"].as_array().unwrap();
    assert!(regions.contains(&json!("AFR")));
    let countries = res.body["countries"].as_array().unwrap();
    assert!(countries.contains(&json!("KE")));
}
