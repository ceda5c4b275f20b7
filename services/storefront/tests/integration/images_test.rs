use axum::http::{StatusCode, header};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;

use crate::helpers::Harness;

fn png(name: &str) -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name(name)
        .mime_type("image/png")
}

fn names(body: &Value) -> Vec<String> {
    body["images"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["name"].as_str().map(str::to_owned))
        .collect()
}

#[tokio::test]
async fn should_list_files_and_skip_folders() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.put_object("images", "first.jpg", &[0; 2048]);
    h.backend.put_object("images", "second.jpg", b"abc");
    h.backend.put_object("images", "archive/old.jpg", b"abc");

    let resp = h
        .server
        .get("/owner/images")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["bucket"], "images");
    assert_eq!(body["count"], 2);
    assert_eq!(names(&body), vec!["second.jpg", "first.jpg"]);
    let first = &body["images"][1];
    assert_eq!(first["size_kb"], "2.0");
    assert!(
        first["url"]
            .as_str()
            .unwrap()
            .ends_with("/storage/v1/object/public/images/first.jpg")
    );
}

#[tokio::test]
async fn should_grow_count_by_number_of_uploaded_files() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.put_object("images", "existing.jpg", b"abc");

    let form = MultipartForm::new()
        .add_part("files", png("one.png"))
        .add_part("files", png("two.PNG"))
        .add_text("note", "ignored");
    let resp = h
        .server
        .post("/owner/images")
        .add_header(header::COOKIE, session.cookie_header())
        .multipart(form)
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["count"], 3);
    assert_eq!(body["success"], "Successfully uploaded 2 image(s)");

    let stored = h.backend.object_paths("images");
    assert_eq!(stored.len(), 3);
    assert!(stored[0].ends_with(".PNG"));
    assert!(stored[1].ends_with(".png"));
    assert_eq!(
        h.backend
            .object_content_type("images", &stored[0])
            .as_deref(),
        Some("image/png")
    );
}

fn is_generated_name(name: &str) -> bool {
    let Some((stem, ext)) = name.split_once('.') else {
        return false;
    };
    let Some((millis, suffix)) = stem.split_once('-') else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 7
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        && !ext.is_empty()
        && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[tokio::test]
async fn should_keep_generated_name_for_hostile_file_name() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.put_object("images", "existing.jpg", b"abc");

    let resp = h
        .server
        .post("/owner/images")
        .add_header(header::COOKIE, session.cookie_header())
        .multipart(
            MultipartForm::new().add_part("files", png("a./%2e%2e/site_assets/hero_0_evil")),
        )
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["count"], 2);
    let stored = h.backend.object_paths("images");
    assert_eq!(stored.len(), 2);
    assert!(is_generated_name(&stored[0]), "unexpected object name {}", stored[0]);
    assert!(h.backend.object_paths("site_assets").is_empty());
    assert!(
        h.backend
            .calls()
            .iter()
            .filter(|c| c.starts_with("POST /storage/v1/object/images/"))
            .all(|c| !c["POST /storage/v1/object/images/".len()..].contains('/'))
    );
}

#[tokio::test]
async fn should_reject_upload_without_files() {
    let h = Harness::start().await;
    let (_, session) = h.owner();

    let resp = h
        .server
        .post("/owner/images")
        .add_header(header::COOKIE, session.cookie_header())
        .multipart(MultipartForm::new().add_text("note", "no files"))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "MISSING_FILE");
    assert!(h.backend.object_paths("images").is_empty());
}

#[tokio::test]
async fn should_report_storage_rejection() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.reject_uploads(true);

    let resp = h
        .server
        .post("/owner/images")
        .add_header(header::COOKIE, session.cookie_header())
        .multipart(MultipartForm::new().add_part("files", png("one.png")))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>();
    assert_eq!(body["kind"], "BACKEND_ERROR");
    assert_eq!(
        body["message"],
        "new row violates row-level security policy"
    );
}

#[tokio::test]
async fn should_drop_deleted_image_from_listing() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.put_object("images", "keep.jpg", b"abc");
    h.backend.put_object("images", "gone.jpg", b"abc");

    let resp = h
        .server
        .delete("/owner/images/gone.jpg")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["success"], "Successfully deleted gone.jpg");
    assert_eq!(names(&body), vec!["keep.jpg"]);
    assert_eq!(h.backend.object_paths("images"), vec!["keep.jpg"]);
}

#[tokio::test]
async fn should_reject_nested_delete_target() {
    let h = Harness::start().await;
    let (_, session) = h.owner();
    h.backend.put_object("images", "archive/old.jpg", b"abc");

    let resp = h
        .server
        .delete("/owner/images/archive%2Fold.jpg")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "INVALID_UPLOAD");
    assert_eq!(h.backend.object_paths("images"), vec!["archive/old.jpg"]);
}
