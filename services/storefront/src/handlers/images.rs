use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::error::StorefrontError;
use crate::handlers::multipart::read_files;
use crate::handlers::session::Owner;
use crate::state::AppState;
use crate::usecase::images::{
    DeleteImageUseCase, ImageEntry, ListImagesUseCase, UploadImagesUseCase,
};

#[derive(Debug, Serialize)]
pub struct ImageTile {
    pub name: String,
    pub url: String,
    pub size_kb: Option<String>,
    pub created_at: Option<String>,
}

impl From<ImageEntry> for ImageTile {
    fn from(e: ImageEntry) -> Self {
        Self {
            name: e.name,
            url: e.url,
            size_kb: e.size_kb,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImagesPage {
    pub bucket: String,
    pub count: usize,
    pub images: Vec<ImageTile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

async fn page(
    state: &AppState,
    token: &str,
    success: Option<String>,
    hide: Option<&str>,
) -> Result<ImagesPage, StorefrontError> {
    let bucket = state.config.images_bucket.clone();
    let usecase = ListImagesUseCase {
        storage: state.storage(Some(token)),
        bucket: bucket.clone(),
    };
    let images: Vec<ImageTile> = usecase
        .execute()
        .await?
        .into_iter()
        .filter(|e| Some(e.name.as_str()) != hide)
        .map(ImageTile::from)
        .collect();
    Ok(ImagesPage {
        bucket,
        count: images.len(),
        images,
        success,
    })
}

// ── GET /owner/images ────────────────────────────────────────────────────────

pub async fn images_page(
    owner: Owner,
    State(state): State<AppState>,
) -> (CookieJar, Result<Json<ImagesPage>, StorefrontError>) {
    let result = page(&state, &owner.signed_in.access_token, None, None)
        .await
        .map(Json);
    (owner.jar, result)
}

// ── POST /owner/images ───────────────────────────────────────────────────────

pub async fn upload_images(
    owner: Owner,
    State(state): State<AppState>,
    multipart: Multipart,
) -> (CookieJar, Result<Json<ImagesPage>, StorefrontError>) {
    let token = owner.signed_in.access_token.as_str();
    let result = async {
        let files = read_files(multipart).await?;
        let usecase = UploadImagesUseCase {
            storage: state.storage(Some(token)),
            bucket: state.config.images_bucket.clone(),
        };
        let count = usecase.execute(files).await?;
        let success = format!("Successfully uploaded {count} image(s)");
        page(&state, token, Some(success), None).await.map(Json)
    }
    .await;
    (owner.jar, result)
}

// ── DELETE /owner/images/{name} ──────────────────────────────────────────────

pub async fn delete_image(
    owner: Owner,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> (CookieJar, Result<Json<ImagesPage>, StorefrontError>) {
    let token = owner.signed_in.access_token.as_str();
    let result = async {
        let usecase = DeleteImageUseCase {
            storage: state.storage(Some(token)),
            bucket: state.config.images_bucket.clone(),
        };
        usecase.execute(&name).await?;
        let success = format!("Successfully deleted {name}");
        page(&state, token, Some(success), Some(&name))
            .await
            .map(Json)
    }
    .await;
    (owner.jar, result)
}
