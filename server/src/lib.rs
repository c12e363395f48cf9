use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sift_core::loader::{load_stopwords, load_text_dir};
use sift_core::{
    Analyzer, AnalyzerConfig, DocId, Document, Hit, InvertedIndex, QueryMode, SearchError, StemmerKind,
    StopwordSource,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Result cap used when a search request does not pass `k`.
pub const DEFAULT_TOP: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIndexRequest {
    pub name: String,
    pub directory: PathBuf,
    #[serde(default)]
    pub stopwords_path: Option<PathBuf>,
    #[serde(default)]
    pub stemmer: StemmerKind,
    #[serde(flatten)]
    pub config: AnalyzerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub documents: usize,
    pub terms: usize,
}

impl IndexInfo {
    fn of(index: &InvertedIndex) -> Self {
        Self { name: index.name().to_string(), documents: index.document_count(), terms: index.vocabulary_size() }
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub mode: QueryMode,
    pub k: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: QueryMode,
    pub took_s: f64,
    /// Boolean: all matches. Vector: candidates with a nonzero score.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub text: String,
}

impl SearchHit {
    fn new(doc_id: DocId, document: &Document, score: Option<f64>) -> Self {
        Self {
            doc_id,
            score,
            external_id: document.external_id().map(str::to_string),
            text: document.relevant_text().into_owned(),
        }
    }

    fn from_hit(hit: &Hit<'_>, score: Option<f64>) -> Self {
        Self::new(hit.id, hit.document, score)
    }
}

/// One executed query. `doc_ids` keeps the rank order of the results.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub query: String,
    pub mode: QueryMode,
    pub doc_ids: Vec<DocId>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ReplayResponse {
    pub entry: HistoryEntry,
    pub results: Vec<SearchHit>,
}

/// Error body `{"error": ...}` with a status derived from the failure.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into() }
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self { status: StatusCode::CONFLICT, message: message.into() }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ApiError {}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = match &err {
            SearchError::MalformedQuery(_) | SearchError::MissingStemmer => StatusCode::BAD_REQUEST,
            SearchError::Io(_) | SearchError::Json(_) => StatusCode::BAD_REQUEST,
            SearchError::DocumentOutOfRange { .. } => StatusCode::NOT_FOUND,
            SearchError::AlreadyIndexed | SearchError::NotIndexed => StatusCode::CONFLICT,
        };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// One registered index with the queries run against it (newest entry first).
/// Dropping the entry drops its history.
pub struct IndexEntry {
    pub index: InvertedIndex,
    history: RwLock<Vec<HistoryEntry>>,
}

impl IndexEntry {
    fn new(index: InvertedIndex) -> Self {
        Self { index, history: RwLock::new(Vec::new()) }
    }

    fn record(&self, entry: HistoryEntry) {
        self.history.write().insert(0, entry);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().clone()
    }
}

#[derive(Default)]
pub struct AppState {
    indexes: RwLock<HashMap<String, Arc<IndexEntry>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built index. Names are unique.
    pub fn insert(&self, index: InvertedIndex) -> Result<IndexInfo, ApiError> {
        let mut indexes = self.indexes.write();
        if indexes.contains_key(index.name()) {
            return Err(ApiError::conflict(format!("index '{}' already exists", index.name())));
        }
        let info = IndexInfo::of(&index);
        indexes.insert(info.name.clone(), Arc::new(IndexEntry::new(index)));
        Ok(info)
    }

    pub fn get(&self, name: &str) -> Result<Arc<IndexEntry>, ApiError> {
        self.indexes.read().get(name).cloned().ok_or_else(|| ApiError::not_found(format!("no index named '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indexes.read().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.indexes.write().remove(name).is_some()
    }
}

/// Load every file of the request's directory and index it. Blocking.
///
/// Without a stopwords file no stopwords are filtered.
pub fn build_index(request: &CreateIndexRequest) -> sift_core::Result<InvertedIndex> {
    let stopwords = match &request.stopwords_path {
        Some(path) => load_stopwords(path)?,
        None => StopwordSource::none(),
    };
    let stemmer = request.config.perform_stemming.then(|| request.stemmer.build());
    let analyzer = Analyzer::new(request.config, stemmer, &stopwords)?;

    let mut index = InvertedIndex::new(request.name.clone(), analyzer);
    index.index(load_text_dir(&request.directory)?)?;
    Ok(index)
}

pub fn build_app(state: Arc<AppState>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/indexes", get(list_indexes).post(create_index))
        .route("/indexes/:name", axum::routing::delete(delete_index))
        .route("/indexes/:name/search", get(search_handler))
        .route("/indexes/:name/history", get(history_handler))
        .route("/indexes/:name/history/:n", get(replay_handler))
        .route("/indexes/:name/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn list_indexes(State(state): State<Arc<AppState>>) -> Json<Vec<IndexInfo>> {
    let mut infos: Vec<IndexInfo> = state.indexes.read().values().map(|entry| IndexInfo::of(&entry.index)).collect();
    infos.sort_by(|a, b| a.name.cmp(&b.name));
    Json(infos)
}

async fn create_index(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateIndexRequest>,
) -> Result<(StatusCode, Json<IndexInfo>), ApiError> {
    if state.contains(&request.name) {
        return Err(ApiError::conflict(format!("index '{}' already exists", request.name)));
    }
    let index = tokio::task::spawn_blocking(move || build_index(&request))
        .await
        .map_err(|err| ApiError::internal(format!("indexing task failed: {err}")))??;
    let info = state.insert(index)?;
    tracing::info!(index = %info.name, documents = info.documents, "index created");
    Ok((StatusCode::CREATED, Json(info)))
}

async fn delete_index(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Result<StatusCode, ApiError> {
    if state.remove(&name) {
        tracing::info!(index = %name, "index deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("no index named '{name}'")))
    }
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let entry = state.get(&name)?;
    let index = &entry.index;
    let query = sift_core::Query::new(params.q.clone(), params.k.unwrap_or(DEFAULT_TOP));

    let start = std::time::Instant::now();
    let (total_hits, results) = match params.mode {
        QueryMode::Boolean => {
            let found = index.boolean_search(&query)?;
            (found.total, found.documents.iter().map(|hit| SearchHit::from_hit(hit, None)).collect::<Vec<_>>())
        }
        QueryMode::Vector => {
            let found = index.vector_search(&query)?;
            let hits = found
                .documents
                .iter()
                .zip(&found.scores)
                .map(|(hit, score)| SearchHit::from_hit(hit, Some(*score)))
                .collect();
            (found.nonzero, hits)
        }
    };
    let took_s = start.elapsed().as_secs_f64();

    entry.record(HistoryEntry {
        query: params.q.clone(),
        mode: params.mode,
        doc_ids: results.iter().map(|hit| hit.doc_id).collect(),
        timestamp: now_rfc3339(),
    });

    Ok(Json(SearchResponse { query: params.q, mode: params.mode, took_s, total_hits, results }))
}

async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(state.get(&name)?.history()))
}

/// Re-materialize the documents of a past query, in their original rank order.
async fn replay_handler(
    State(state): State<Arc<AppState>>,
    Path((name, n)): Path<(String, usize)>,
) -> Result<Json<ReplayResponse>, ApiError> {
    let indexed = state.get(&name)?;
    let entry = indexed
        .history()
        .into_iter()
        .nth(n)
        .ok_or_else(|| ApiError::not_found(format!("no history entry {n} for index '{name}'")))?;
    let results = indexed
        .index
        .get_documents_by_ids(&entry.doc_ids)?
        .into_iter()
        .zip(&entry.doc_ids)
        .map(|(document, &doc_id)| SearchHit::new(doc_id, document, None))
        .collect();
    Ok(Json(ReplayResponse { entry, results }))
}

pub async fn doc_handler(
    State(state): State<Arc<AppState>>,
    Path((name, doc_id)): Path<(String, DocId)>,
) -> Result<Json<SearchHit>, ApiError> {
    let entry = state.get(&name)?;
    let document = entry.index.get_documents_by_ids(&[doc_id])?.into_iter().next();
    match document {
        Some(document) => Ok(Json(SearchHit::new(doc_id, document, None))),
        None => Err(ApiError::not_found(format!("document {doc_id} not found"))),
    }
}

fn now_rfc3339() -> String {
    let now = time::OffsetDateTime::now_utc();
    now.format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "cannot format timestamp as RFC 3339");
        now.unix_timestamp().to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let ts = now_rfc3339();
        assert!(ts.contains('T'), "{ts}");
        assert!(ts.ends_with('Z'), "{ts}");
        assert!(ts.starts_with(|c: char| c.is_ascii_digit()), "{ts}");
    }
}
