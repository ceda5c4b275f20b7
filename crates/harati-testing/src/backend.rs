//! In-process stand-in for the hosted backend.
//!
//! Speaks the subset of the auth, data and storage HTTP APIs the storefront
//! uses, on a random local port. State lives behind a mutex so tests can seed
//! it and inspect what the service did.
//!
//! Row policies are approximated: profile reads need a signed-in caller,
//! profile updates and settings writes need an owner.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use harati_auth_types::token::inspect_access_token;
use harati_domain::role::Role;

use crate::auth::{
    ACCESS_TOKEN_TTL, TEST_ANON_KEY, TEST_JWT_SECRET, TestSession, mint_access_token, now_secs,
};

// ── State ────────────────────────────────────────────────────────────────────

struct User {
    id: Uuid,
    email: String,
    password: String,
    full_name: Option<String>,
}

struct ProfileRow {
    id: Uuid,
    email: String,
    full_name: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
}

impl ProfileRow {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "full_name": self.full_name,
            "role": self.role,
            "avatar_url": null,
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

struct StoredObject {
    path: String,
    id: Uuid,
    size: usize,
    content_type: String,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Default)]
struct BackendState {
    users: Vec<User>,
    profiles: Vec<ProfileRow>,
    refresh_tokens: HashMap<String, Uuid>,
    revoked: Vec<String>,
    settings: Vec<(String, Value)>,
    buckets: HashMap<String, Vec<StoredObject>>,
    calls: Vec<String>,
    autoconfirm: bool,
    auth_down: bool,
    reject_setting: Option<String>,
    reject_uploads: bool,
    seq: u64,
}

impl BackendState {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Strictly increasing timestamps so `created_at` ordering is deterministic.
    fn next_timestamp(&mut self) -> (u64, DateTime<Utc>) {
        let seq = self.next_seq();
        (seq, Utc::now() + Duration::milliseconds(seq as i64))
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn role_of(&self, id: Uuid) -> Option<Role> {
        self.profiles.iter().find(|p| p.id == id).map(|p| p.role)
    }

    fn issue_session(&mut self, user_id: Uuid) -> TestSession {
        let email = self.user(user_id).map(|u| u.email.clone());
        let access_token =
            mint_access_token(user_id, email.as_deref(), now_secs() + ACCESS_TOKEN_TTL);
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        self.refresh_tokens.insert(refresh_token.clone(), user_id);
        TestSession {
            access_token,
            refresh_token,
        }
    }

    fn user_json(&self, id: Uuid) -> Value {
        match self.user(id) {
            Some(u) => json!({
                "id": u.id,
                "aud": "authenticated",
                "role": "authenticated",
                "email": u.email,
                "user_metadata": { "full_name": u.full_name },
            }),
            None => Value::Null,
        }
    }

    fn session_json(&mut self, user_id: Uuid) -> Value {
        let session = self.issue_session(user_id);
        json!({
            "access_token": session.access_token,
            "token_type": "bearer",
            "expires_in": ACCESS_TOKEN_TTL,
            "refresh_token": session.refresh_token,
            "user": self.user_json(user_id),
        })
    }

    /// Signed-in caller behind the bearer token, if any.
    fn caller(&self, headers: &HeaderMap) -> Option<Uuid> {
        let token = bearer(headers)?;
        if self.revoked.iter().any(|t| t == token) {
            return None;
        }
        let info = inspect_access_token(token, TEST_JWT_SECRET).ok()?;
        self.user(info.user_id).map(|u| u.id)
    }

    fn caller_is_owner(&self, headers: &HeaderMap) -> bool {
        self.caller(headers)
            .and_then(|id| self.role_of(id))
            .is_some_and(Role::is_owner)
    }
}

type Shared = Arc<Mutex<BackendState>>;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

// ── Handle ───────────────────────────────────────────────────────────────────

/// Running mock backend. Dropping it does not stop the server; it lives as
/// long as the test runtime.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            autoconfirm: true,
            ..Default::default()
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock backend stopped");
        });
        Self { addr, state }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register an account and its profile row.
    pub fn add_user(&self, email: &str, password: &str, full_name: Option<&str>, role: Role) -> Uuid {
        let mut s = self.lock();
        let id = Uuid::new_v4();
        let (_, created_at) = s.next_timestamp();
        s.users.push(User {
            id,
            email: email.to_owned(),
            password: password.to_owned(),
            full_name: full_name.map(str::to_owned),
        });
        s.profiles.push(ProfileRow {
            id,
            email: email.to_owned(),
            full_name: full_name.map(str::to_owned),
            role,
            created_at,
        });
        id
    }

    /// Live session for an existing user.
    pub fn sign_in(&self, user_id: Uuid) -> TestSession {
        self.lock().issue_session(user_id)
    }

    /// Session whose access token has expired but whose refresh token works.
    pub fn expired_session(&self, user_id: Uuid) -> TestSession {
        let mut session = self.sign_in(user_id);
        session.access_token = mint_access_token(user_id, None, now_secs() - 3600);
        session
    }

    pub fn refresh_token_valid(&self, refresh_token: &str) -> bool {
        self.lock().refresh_tokens.contains_key(refresh_token)
    }

    pub fn remove_profile(&self, id: Uuid) {
        self.lock().profiles.retain(|p| p.id != id);
    }

    pub fn role_of(&self, id: Uuid) -> Option<Role> {
        self.lock().role_of(id)
    }

    pub fn put_setting(&self, key: &str, value: Value) {
        let mut s = self.lock();
        s.settings.retain(|(k, _)| k != key);
        s.settings.push((key.to_owned(), value));
    }

    pub fn setting(&self, key: &str) -> Option<Value> {
        self.lock()
            .settings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn put_object(&self, bucket: &str, path: &str, bytes: &[u8]) {
        let mut s = self.lock();
        let (seq, created_at) = s.next_timestamp();
        s.buckets.entry(bucket.to_owned()).or_default().push(StoredObject {
            path: path.to_owned(),
            id: Uuid::new_v4(),
            size: bytes.len(),
            content_type: "application/octet-stream".to_owned(),
            created_at,
            seq,
        });
    }

    /// Object paths in a bucket, newest first.
    pub fn object_paths(&self, bucket: &str) -> Vec<String> {
        let s = self.lock();
        let mut objects: Vec<_> = s
            .buckets
            .get(bucket)
            .map(|b| b.iter().map(|o| (o.seq, o.path.clone())).collect())
            .unwrap_or_default();
        objects.sort_by(|a, b| b.0.cmp(&a.0));
        objects.into_iter().map(|(_, p)| p).collect()
    }

    pub fn object_content_type(&self, bucket: &str, path: &str) -> Option<String> {
        self.lock()
            .buckets
            .get(bucket)?
            .iter()
            .find(|o| o.path == path)
            .map(|o| o.content_type.clone())
    }

    /// `"METHOD /path"` for every request received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn set_autoconfirm(&self, on: bool) {
        self.lock().autoconfirm = on;
    }

    pub fn set_auth_down(&self, down: bool) {
        self.lock().auth_down = down;
    }

    /// Reject upserts of one settings key.
    pub fn reject_setting(&self, key: &str) {
        self.lock().reject_setting = Some(key.to_owned());
    }

    pub fn reject_uploads(&self, on: bool) {
        self.lock().reject_uploads = on;
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/health", get(health))
        .route("/rest/v1/profiles", get(list_profiles).patch(update_profile))
        .route("/rest/v1/site_settings", get(list_settings).post(upsert_setting))
        .route("/storage/v1/object/list/{bucket}", post(list_objects))
        .route("/storage/v1/object/{bucket}", delete(remove_objects))
        .route("/storage/v1/object/{bucket}/{*path}", post(upload_object))
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state)
}

/// Record the call and require the project `apikey`.
async fn gate(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let line = format!("{} {}", req.method(), req.uri().path());
    state.lock().unwrap().calls.push(line);
    let key = req.headers().get("apikey").and_then(|v| v.to_str().ok());
    if key != Some(TEST_ANON_KEY) {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Invalid API key" }),
        );
    }
    next.run(req).await
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SignUpBody {
    email: String,
    password: String,
    #[serde(default)]
    data: Option<Value>,
}

async fn signup(State(state): State<Shared>, Json(body): Json<SignUpBody>) -> Response {
    let mut s = state.lock().unwrap();
    if s.users.iter().any(|u| u.email == body.email) {
        return reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "code": 422, "error_code": "user_already_exists", "msg": "User already registered" }),
        );
    }
    if body.password.len() < 6 {
        return reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "code": 422, "error_code": "weak_password", "msg": "Password should be at least 6 characters." }),
        );
    }
    let full_name = body
        .data
        .as_ref()
        .and_then(|d| d.get("full_name"))
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);
    let id = Uuid::new_v4();
    let (_, created_at) = s.next_timestamp();
    s.users.push(User {
        id,
        email: body.email.clone(),
        password: body.password,
        full_name: full_name.clone(),
    });
    s.profiles.push(ProfileRow {
        id,
        email: body.email,
        full_name,
        role: Role::Consumer,
        created_at,
    });
    if s.autoconfirm {
        let session = s.session_json(id);
        reply(StatusCode::OK, session)
    } else {
        reply(StatusCode::OK, s.user_json(id))
    }
}

#[derive(Deserialize)]
struct GrantQuery {
    grant_type: String,
}

async fn token(
    State(state): State<Shared>,
    Query(q): Query<GrantQuery>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default();
    let invalid = |description: &str| {
        reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_grant", "error_description": description }),
        )
    };
    match q.grant_type.as_str() {
        "password" => {
            let (email, password) = (field("email"), field("password"));
            let Some(id) = s
                .users
                .iter()
                .find(|u| u.email == email && u.password == password)
                .map(|u| u.id)
            else {
                return invalid("Invalid login credentials");
            };
            let session = s.session_json(id);
            reply(StatusCode::OK, session)
        }
        "refresh_token" => {
            let Some(id) = s.refresh_tokens.remove(field("refresh_token")) else {
                return invalid("Invalid Refresh Token: Refresh Token Not Found");
            };
            let session = s.session_json(id);
            reply(StatusCode::OK, session)
        }
        other => reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "unsupported_grant_type", "error_description": format!("unsupported grant type {other}") }),
        ),
    }
}

async fn user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    match s.caller(&headers) {
        Some(id) => reply(StatusCode::OK, s.user_json(id)),
        None => reply(
            StatusCode::UNAUTHORIZED,
            json!({ "code": 401, "msg": "invalid JWT: unable to parse or verify signature" }),
        ),
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    let Some(id) = s.caller(&headers) else {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "code": 401, "msg": "invalid JWT" }),
        );
    };
    if let Some(token) = bearer(&headers) {
        s.revoked.push(token.to_owned());
    }
    s.refresh_tokens.retain(|_, owner| *owner != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn health(State(state): State<Shared>) -> Response {
    if state.lock().unwrap().auth_down {
        return reply(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "message": "auth unavailable" }),
        );
    }
    reply(
        StatusCode::OK,
        json!({ "name": "GoTrue", "description": "mock" }),
    )
}

// ── Data ─────────────────────────────────────────────────────────────────────

fn eq_filter<'a>(q: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
    q.get(column)?.strip_prefix("eq.")
}

async fn list_profiles(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let s = state.lock().unwrap();
    if s.caller(&headers).is_none() {
        return reply(StatusCode::OK, json!([]));
    }
    let mut rows: Vec<&ProfileRow> = s
        .profiles
        .iter()
        .filter(|p| eq_filter(&q, "id").is_none_or(|id| p.id.to_string() == id))
        .collect();
    match q.get("order").map(String::as_str) {
        Some("created_at.desc") => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some("created_at.asc") => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        _ => {}
    }
    if let Some(limit) = q.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }
    reply(
        StatusCode::OK,
        Value::Array(rows.iter().map(|p| p.to_json()).collect()),
    )
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if !s.caller_is_owner(&headers) {
        return reply(
            StatusCode::FORBIDDEN,
            json!({ "code": "42501", "message": "permission denied for table profiles" }),
        );
    }
    let Some(role) = body
        .get("role")
        .and_then(Value::as_str)
        .and_then(|r| r.parse::<Role>().ok())
    else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "code": "22P02", "message": "invalid input value for enum user_role" }),
        );
    };
    let target = eq_filter(&q, "id").map(str::to_owned);
    for p in s.profiles.iter_mut() {
        if target.as_deref() == Some(p.id.to_string().as_str()) {
            p.role = role;
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_settings(
    State(state): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let s = state.lock().unwrap();
    let keys: Option<Vec<&str>> = q
        .get("key")
        .and_then(|f| f.strip_prefix("in.("))
        .and_then(|f| f.strip_suffix(')'))
        .map(|list| list.split(',').collect());
    let rows: Vec<Value> = s
        .settings
        .iter()
        .filter(|(k, _)| keys.as_ref().is_none_or(|ks| ks.contains(&k.as_str())))
        .map(|(k, v)| json!({ "key": k, "value": v }))
        .collect();
    reply(StatusCode::OK, Value::Array(rows))
}

async fn upsert_setting(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    let key = body
        .get("key")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    if !s.caller_is_owner(&headers) || s.reject_setting.as_deref() == Some(key.as_str()) {
        return reply(
            StatusCode::FORBIDDEN,
            json!({
                "code": "42501",
                "message": "new row violates row-level security policy for table \"site_settings\"",
            }),
        );
    }
    let value = body.get("value").cloned().unwrap_or(Value::Null);
    s.settings.retain(|(k, _)| *k != key);
    s.settings.push((key, value));
    StatusCode::CREATED.into_response()
}

// ── Storage ──────────────────────────────────────────────────────────────────

async fn upload_object(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((bucket, path)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let mut s = state.lock().unwrap();
    if s.caller(&headers).is_none() || s.reject_uploads {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "statusCode": "403", "error": "Unauthorized", "message": "new row violates row-level security policy" }),
        );
    }
    let exists = s
        .buckets
        .get(&bucket)
        .is_some_and(|b| b.iter().any(|o| o.path == path));
    if exists {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "statusCode": "409", "error": "Duplicate", "message": "The resource already exists" }),
        );
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();
    let (seq, created_at) = s.next_timestamp();
    let id = Uuid::new_v4();
    s.buckets.entry(bucket.clone()).or_default().push(StoredObject {
        path: path.clone(),
        id,
        size: body.len(),
        content_type,
        created_at,
        seq,
    });
    reply(
        StatusCode::OK,
        json!({ "Key": format!("{bucket}/{path}"), "Id": id }),
    )
}

#[derive(Deserialize)]
struct ListBody {
    #[serde(default)]
    prefix: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

fn default_limit() -> usize {
    100
}

async fn list_objects(
    State(state): State<Shared>,
    Path(bucket): Path<String>,
    Json(body): Json<ListBody>,
) -> Response {
    let s = state.lock().unwrap();
    let prefix = body.prefix.trim_matches('/');
    let mut objects: Vec<&StoredObject> = s
        .buckets
        .get(&bucket)
        .map(|b| b.iter().collect())
        .unwrap_or_default();
    objects.sort_by(|a, b| b.seq.cmp(&a.seq));

    let mut folders: Vec<String> = Vec::new();
    let mut entries: Vec<Value> = Vec::new();
    for o in objects {
        let rest = if prefix.is_empty() {
            o.path.as_str()
        } else {
            match o.path.strip_prefix(prefix).and_then(|r| r.strip_prefix('/')) {
                Some(rest) => rest,
                None => continue,
            }
        };
        match rest.split_once('/') {
            Some((folder, _)) => {
                if !folders.iter().any(|f| f == folder) {
                    folders.push(folder.to_owned());
                    entries.push(json!({ "name": folder, "id": null, "metadata": null }));
                }
            }
            None => entries.push(json!({
                "name": rest,
                "id": o.id,
                "created_at": o.created_at.to_rfc3339(),
                "metadata": { "size": o.size, "mimetype": o.content_type },
            })),
        }
    }
    let page: Vec<Value> = entries
        .into_iter()
        .skip(body.offset)
        .take(body.limit)
        .collect();
    reply(StatusCode::OK, Value::Array(page))
}

#[derive(Deserialize)]
struct RemoveBody {
    prefixes: Vec<String>,
}

async fn remove_objects(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(bucket): Path<String>,
    Json(body): Json<RemoveBody>,
) -> Response {
    let mut s = state.lock().unwrap();
    if s.caller(&headers).is_none() {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "statusCode": "403", "error": "Unauthorized", "message": "new row violates row-level security policy" }),
        );
    }
    let mut removed = Vec::new();
    if let Some(objects) = s.buckets.get_mut(&bucket) {
        objects.retain(|o| {
            let hit = body.prefixes.contains(&o.path);
            if hit {
                removed.push(json!({ "name": o.path, "bucket_id": bucket }));
            }
            !hit
        });
    }
    reply(StatusCode::OK, Value::Array(removed))
}
