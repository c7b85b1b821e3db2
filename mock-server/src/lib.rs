use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub archived: bool,
}

#[derive(Deserialize)]
pub struct NewNote {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub archived: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteFilter {
    pub tag: Option<String>,
    pub archived: Option<bool>,
    pub limit: Option<usize>,
}

/// What `/echo` saw of the incoming request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

/// Notes keyed by id, plus insertion order so listings are stable.
#[derive(Default)]
pub struct Store {
    notes: HashMap<Uuid, Note>,
    order: Vec<Uuid>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/health", get(health))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note)
                .put(replace_note)
                .patch(patch_note)
                .delete(delete_note),
        )
        .route("/echo", any(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_notes(State(db): State<Db>, Query(filter): Query<NoteFilter>) -> Json<Vec<Note>> {
    let store = db.read().await;
    let notes = store
        .order
        .iter()
        .filter_map(|id| store.notes.get(id))
        .filter(|note| filter.archived.map_or(true, |archived| note.archived == archived))
        .filter(|note| {
            filter
                .tag
                .as_ref()
                .map_or(true, |tag| note.tags.iter().any(|t| t == tag))
        })
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(notes)
}

async fn create_note(
    State(db): State<Db>,
    Json(input): Json<NewNote>,
) -> (StatusCode, Json<Note>) {
    let note = Note {
        id: Uuid::new_v4(),
        title: input.title,
        body: input.body,
        tags: input.tags,
        archived: input.archived,
    };
    tracing::debug!(id = %note.id, "note created");
    let mut store = db.write().await;
    store.order.push(note.id);
    store.notes.insert(note.id, note.clone());
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Note>, StatusCode> {
    let store = db.read().await;
    store.notes.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewNote>,
) -> Result<Json<Note>, StatusCode> {
    let mut store = db.write().await;
    let note = store.notes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    note.title = input.title;
    note.body = input.body;
    note.tags = input.tags;
    note.archived = input.archived;
    Ok(Json(note.clone()))
}

async fn patch_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<NotePatch>,
) -> Result<Json<Note>, StatusCode> {
    let mut store = db.write().await;
    let note = store.notes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        note.title = title;
    }
    if let Some(body) = input.body {
        note.body = body;
    }
    if let Some(tags) = input.tags {
        note.tags = tags;
    }
    if let Some(archived) = input.archived {
        note.archived = archived;
    }
    Ok(Json(note.clone()))
}

async fn delete_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.notes.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.order.retain(|kept| *kept != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Echo>, StatusCode> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?)
    };
    Ok(Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    }))
}
