//! An in-process stand-in for Tableau Server's REST API.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tableauctl::{AuthCredentials, SettlePolicy, TableauClient};
use tokio::net::TcpListener;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct FakeState {
    /// token -> site id
    pub tokens: HashMap<String, String>,
    /// (id, name)
    pub users: Vec<(String, String)>,
    /// (id, name)
    pub groups: Vec<(String, String)>,
    /// (group id, user id)
    pub members: Vec<(String, String)>,
    pub workbooks: Vec<Value>,
    /// workbook id -> connections
    pub connections: HashMap<String, Vec<Value>>,
    /// User ids whose group membership requests fail with a 500.
    pub broken_users: HashSet<String>,
    pub reject_sign_in: bool,
    /// When set, sign-in echoes this as the site's `contentUrl`.
    pub canonical_content_url: Option<String>,
    /// "METHOD /path?query" for every request received.
    pub requests: Vec<String>,
    pub next_id: u32,
}

impl FakeState {
    pub fn with_user(mut self, id: &str, name: &str) -> Self {
        self.users.push((id.to_string(), name.to_string()));
        self
    }

    pub fn with_group(mut self, id: &str, name: &str) -> Self {
        self.groups.push((id.to_string(), name.to_string()));
        self
    }

    pub fn with_member(mut self, group_id: &str, user_id: &str) -> Self {
        self.members
            .push((group_id.to_string(), user_id.to_string()));
        self
    }

    pub fn with_workbook(mut self, workbook: Value, connections: Vec<Value>) -> Self {
        let id = workbook["id"].as_str().unwrap_or_default().to_string();
        self.workbooks.push(workbook);
        self.connections.insert(id, connections);
        self
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl FakeServer {
    pub async fn start(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/2.5/auth/signin", post(sign_in))
            .route("/api/2.5/auth/signout", post(sign_out))
            .route("/api/2.5/sites", get(list_sites))
            .route("/api/2.5/sites/:site_id", get(query_site))
            .route("/api/2.5/sites/:site_id/views", get(list_views))
            .route("/api/2.5/sites/:site_id/workbooks", get(list_workbooks))
            .route(
                "/api/2.5/sites/:site_id/workbooks/:workbook_id/connections",
                get(list_connections),
            )
            .route(
                "/api/2.5/sites/:site_id/users",
                get(list_users).post(add_user),
            )
            .route("/api/2.5/sites/:site_id/users/:user_id", get(query_user))
            .route(
                "/api/2.5/sites/:site_id/groups",
                get(list_groups).post(create_group),
            )
            .route(
                "/api/2.5/sites/:site_id/groups/:group_id/users",
                post(add_member),
            )
            .route("/legacy/ping", get(legacy_ping))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake server");
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client with no settle pause or pacing, so tests stay fast.
    pub fn client(&self) -> TableauClient {
        TableauClient::new(&self.url(), AuthCredentials::new(USERNAME, PASSWORD))
            .expect("valid url")
            .with_settle_policy(SettlePolicy::Immediate)
            .with_connection_pacing(Duration::ZERO)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.starts_with(prefix))
            .count()
    }

    pub fn active_tokens(&self) -> usize {
        self.state.lock().unwrap().tokens.len()
    }

    pub fn members(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().members.clone()
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    state.lock().unwrap().requests.push(line);
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": {"summary": message}}))).into_response()
}

/// Checks the auth header and, when given, that the token belongs to `site_id`.
fn authorize(state: &FakeState, headers: &HeaderMap, site_id: Option<&str>) -> Result<(), Response> {
    let token = headers
        .get("x-tableau-auth")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "missing token"))?;
    let token_site = state
        .tokens
        .get(token)
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "invalid token"))?;
    match site_id {
        Some(site_id) if site_id != token_site => {
            Err(error(StatusCode::FORBIDDEN, "token is for another site"))
        }
        _ => Ok(()),
    }
}

fn site_id_for(content_url: &str) -> String {
    if content_url.is_empty() {
        "site-default".to_string()
    } else {
        format!("site-{}", content_url.to_lowercase())
    }
}

async fn sign_in(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let credentials = &body["credentials"];
    if state.reject_sign_in
        || credentials["name"] != USERNAME
        || credentials["password"] != PASSWORD
    {
        return error(StatusCode::UNAUTHORIZED, "bad credentials");
    }

    let content_url = credentials["site"]["contentUrl"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let site_id = site_id_for(&content_url);
    let token = state.next_id("token");
    state.tokens.insert(token.clone(), site_id.clone());

    let content_url = state.canonical_content_url.clone().unwrap_or(content_url);
    Json(json!({
        "credentials": {
            "token": token,
            "site": {"id": site_id, "contentUrl": content_url},
            "user": {"id": "admin-id"}
        }
    }))
    .into_response()
}

async fn sign_out(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, None) {
        return response;
    }
    if let Some(token) = headers.get("x-tableau-auth").and_then(|v| v.to_str().ok()) {
        state.tokens.remove(token);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_sites(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, None) {
        return response;
    }
    Json(json!({
        "sites": {"site": [
            {"id": "site-default", "contentUrl": ""},
            {"id": "site-sales", "contentUrl": "Sales"}
        ]}
    }))
    .into_response()
}

async fn query_site(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().unwrap();
    if query.get("key").map(String::as_str) == Some("contentUrl") {
        if let Err(response) = authorize(&state, &headers, None) {
            return response;
        }
        return Json(json!({
            "site": {"id": site_id_for(&site_id), "contentUrl": site_id}
        }))
        .into_response();
    }

    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    Json(json!({"site": {"id": site_id}})).into_response()
}

async fn list_views(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    Json(json!({"views": {"view": [{"id": "view-1", "name": "Overview"}]}})).into_response()
}

async fn list_workbooks(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    Json(json!({
        "pagination": {
            "pageNumber": "1",
            "pageSize": "1000",
            "totalAvailable": state.workbooks.len().to_string()
        },
        "workbooks": {"workbook": state.workbooks}
    }))
    .into_response()
}

async fn list_connections(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((site_id, workbook_id)): Path<(String, String)>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    match state.connections.get(&workbook_id) {
        Some(connections) => {
            Json(json!({"connections": {"connection": connections}})).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "no such workbook"),
    }
}

async fn list_users(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    let users: Vec<Value> = state
        .users
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    Json(json!({"users": {"user": users}})).into_response()
}

async fn query_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((site_id, user_id)): Path<(String, String)>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    match state.users.iter().find(|(id, _)| *id == user_id) {
        Some((id, name)) => Json(json!({"user": {"id": id, "name": name}})).into_response(),
        None => error(StatusCode::NOT_FOUND, "no such user"),
    }
}

async fn add_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    let name = body["user"]["name"].as_str().unwrap_or_default().to_string();
    let site_role = body["user"]["siteRole"].clone();
    if name == "explode" {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    }
    if state
        .users
        .iter()
        .any(|(_, existing)| existing.eq_ignore_ascii_case(&name))
    {
        return error(StatusCode::CONFLICT, "user already exists");
    }

    let id = state.next_id("user");
    state.users.push((id.clone(), name.clone()));
    (
        StatusCode::CREATED,
        Json(json!({"user": {"id": id, "name": name, "siteRole": site_role}})),
    )
        .into_response()
}

async fn list_groups(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    let groups: Vec<Value> = state
        .groups
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    Json(json!({"groups": {"group": groups}})).into_response()
}

async fn create_group(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    let name = body["group"]["name"].as_str().unwrap_or_default().to_string();
    if state
        .groups
        .iter()
        .any(|(_, existing)| existing.eq_ignore_ascii_case(&name))
    {
        return error(StatusCode::CONFLICT, "group already exists");
    }

    let id = state.next_id("group");
    state.groups.push((id.clone(), name.clone()));
    (
        StatusCode::CREATED,
        Json(json!({"group": {"id": id, "name": name}})),
    )
        .into_response()
}

async fn add_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((site_id, group_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers, Some(&site_id)) {
        return response;
    }
    let user_id = body["user"]["id"].as_str().unwrap_or_default().to_string();
    if !state.groups.iter().any(|(id, _)| *id == group_id) {
        return error(StatusCode::NOT_FOUND, "no such group");
    }
    if state.broken_users.contains(&user_id) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    }
    if state
        .members
        .iter()
        .any(|(group, user)| *group == group_id && *user == user_id)
    {
        return error(StatusCode::CONFLICT, "already a member");
    }

    state.members.push((group_id, user_id.clone()));
    Json(json!({"user": {"id": user_id}})).into_response()
}

async fn legacy_ping(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let authorized = headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .and_then(|cookie| cookie.strip_prefix("workgroup_session_id="))
        .is_some_and(|token| state.tokens.contains_key(token));
    if authorized {
        "pong".into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "no session cookie")
    }
}
