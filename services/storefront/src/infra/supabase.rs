//! Shared HTTP plumbing for the hosted backend.
//!
//! Every call carries the project `apikey` header and a bearer token: the
//! signed-in user's access token when there is one, the anon key otherwise.

use anyhow::Context as _;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use crate::error::StorefrontError;

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("parse backend url {base_url}"))?;
        let http = Client::builder().build().context("build http client")?;
        Ok(Self {
            http,
            base,
            anon_key: anon_key.to_owned(),
        })
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Absolute URL for a backend path such as `/rest/v1/profiles`.
    pub fn endpoint(&self, path: &str) -> Result<Url, StorefrontError> {
        Ok(self
            .base
            .join(path)
            .with_context(|| format!("join backend path {path}"))?)
    }

    /// [`endpoint`](Self::endpoint) for `path` followed by an object path whose
    /// `/`-separated segments are percent-encoded one by one.
    pub fn object_endpoint(&self, path: &str, object_path: &str) -> Result<Url, StorefrontError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("backend url cannot carry a path"))?
            .pop_if_empty()
            .extend(object_path.split('/'));
        Ok(url)
    }

    /// Same as [`endpoint`](Self::endpoint) but infallible for display-only URLs.
    pub fn public_link(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    pub fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

/// Pass 2xx responses through; turn anything else into [`StorefrontError::Backend`].
pub async fn check(resp: Response) -> Result<Response, StorefrontError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.context("read backend error body")?;
    Err(StorefrontError::Backend {
        status: status.as_u16(),
        message: backend_message(&body),
    })
}

/// Human-readable message from a backend error body.
///
/// The auth, rest and storage APIs each use a different field name; the raw
/// body is the fallback.
pub fn backend_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_owned();
    };
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|field| json.get(field).and_then(Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| body.to_owned())
}
