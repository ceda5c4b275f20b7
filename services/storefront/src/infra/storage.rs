use anyhow::Context as _;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use harati_domain::pagination::ListOptions;

use crate::domain::repository::StoragePort;
use crate::domain::types::StoredObject;
use crate::error::StorefrontError;
use crate::infra::supabase::{SupabaseClient, check};

#[derive(Clone)]
pub struct SupabaseStorage {
    pub client: SupabaseClient,
    pub bearer: Option<String>,
}

#[derive(Serialize)]
struct ListBody<'a> {
    prefix: &'a str,
    #[serde(flatten)]
    options: &'a ListOptions,
}

impl StoragePort for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorefrontError> {
        let url = self
            .client
            .object_endpoint(&format!("/storage/v1/object/{bucket}"), path)?;
        let resp = self
            .client
            .request(Method::POST, url, self.bearer.as_deref())
            .header("x-upsert", "false")
            .header("cache-control", "max-age=3600")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("upload {bucket}/{path}"))?;
        check(resp).await?;
        Ok(())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<StoredObject>, StorefrontError> {
        let url = self
            .client
            .endpoint(&format!("/storage/v1/object/list/{bucket}"))?;
        let options = options.clone().clamped();
        let resp = self
            .client
            .request(Method::POST, url, self.bearer.as_deref())
            .json(&ListBody {
                prefix,
                options: &options,
            })
            .send()
            .await
            .with_context(|| format!("list {bucket}"))?;
        let objects = check(resp)
            .await?
            .json::<Vec<StoredObject>>()
            .await
            .with_context(|| format!("decode {bucket} listing"))?;
        Ok(objects)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorefrontError> {
        let url = self
            .client
            .endpoint(&format!("/storage/v1/object/{bucket}"))?;
        let resp = self
            .client
            .request(Method::DELETE, url, self.bearer.as_deref())
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .with_context(|| format!("remove from {bucket}"))?;
        check(resp).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.client
            .public_link(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }
}
