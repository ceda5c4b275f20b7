//! Relational data API repositories.

use anyhow::Context as _;
use reqwest::Method;
use serde_json::{Value, json};
use url::Url;

use harati_domain::id::UserId;
use harati_domain::pagination::Sort;
use harati_domain::profile::Profile;
use harati_domain::role::Role;
use harati_domain::settings::{SettingKey, SettingRow};

use crate::domain::repository::{ProfileRepository, SettingsRepository};
use crate::error::StorefrontError;
use crate::infra::supabase::{SupabaseClient, check};

// ── Query builder ────────────────────────────────────────────────────────────

/// Filter/order/limit pairs in the data API's query syntax.
///
/// ```text
/// Query::new().select("*").eq("id", "42").limit(1)
///   -> select=*&id=eq.42&limit=1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.pairs.push((column.into(), format!("eq.{value}")));
        self
    }

    pub fn in_list<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((column.into(), format!("in.({joined})")));
        self
    }

    pub fn order(mut self, column: &str, sort: Sort) -> Self {
        self.pairs
            .push(("order".into(), format!("{column}.{}", sort.as_str())));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.pairs.push(("limit".into(), n.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut q = url.query_pairs_mut();
        for (k, v) in &self.pairs {
            q.append_pair(k, v);
        }
    }
}

async fn get_rows<T: serde::de::DeserializeOwned>(
    client: &SupabaseClient,
    bearer: Option<&str>,
    table: &str,
    query: Query,
) -> Result<Vec<T>, StorefrontError> {
    let mut url = client.endpoint(&format!("/rest/v1/{table}"))?;
    query.apply(&mut url);
    let resp = client
        .request(Method::GET, url, bearer)
        .send()
        .await
        .with_context(|| format!("select from {table}"))?;
    let rows = check(resp)
        .await?
        .json::<Vec<T>>()
        .await
        .with_context(|| format!("decode {table} rows"))?;
    Ok(rows)
}

// ── Profile repository ───────────────────────────────────────────────────────

/// Profiles read and written with the viewer's own token so row policies apply.
#[derive(Clone)]
pub struct RestProfileRepository {
    pub client: SupabaseClient,
    pub bearer: Option<String>,
}

impl ProfileRepository for RestProfileRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, StorefrontError> {
        let rows = get_rows::<Profile>(
            &self.client,
            self.bearer.as_deref(),
            "profiles",
            Query::new().select("*").eq("id", id).limit(1),
        )
        .await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Profile>, StorefrontError> {
        get_rows(
            &self.client,
            self.bearer.as_deref(),
            "profiles",
            Query::new().select("*").order("created_at", Sort::Desc),
        )
        .await
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), StorefrontError> {
        let mut url = self.client.endpoint("/rest/v1/profiles")?;
        Query::new().eq("id", id).apply(&mut url);
        let resp = self
            .client
            .request(Method::PATCH, url, self.bearer.as_deref())
            .header("Prefer", "return=minimal")
            .json(&json!({ "role": role }))
            .send()
            .await
            .context("update profile role")?;
        check(resp).await?;
        Ok(())
    }
}

// ── Settings repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RestSettingsRepository {
    pub client: SupabaseClient,
    pub bearer: Option<String>,
}

impl SettingsRepository for RestSettingsRepository {
    async fn fetch(&self, keys: &[SettingKey]) -> Result<Vec<SettingRow>, StorefrontError> {
        get_rows(
            &self.client,
            self.bearer.as_deref(),
            "site_settings",
            Query::new()
                .select("*")
                .in_list("key", keys.iter().map(|k| k.as_str())),
        )
        .await
    }

    async fn upsert(&self, key: SettingKey, value: &Value) -> Result<(), StorefrontError> {
        let url = self.client.endpoint("/rest/v1/site_settings")?;
        let resp = self
            .client
            .request(Method::POST, url, self.bearer.as_deref())
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&json!({ "key": key.as_str(), "value": value }))
            .send()
            .await
            .with_context(|| format!("upsert setting {}", key.as_str()))?;
        check(resp).await?;
        Ok(())
    }
}
