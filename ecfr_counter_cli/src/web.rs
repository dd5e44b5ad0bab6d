//! HTTP surface: the ledger download, a refresh trigger, and word search.
//!
//! Refreshes are serialized behind a mutex so two requests never append to
//! the ledger or rewrite the cache at the same time, and run on their own
//! task so they always finish once started.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use ecfr_counter_lib::search::{search_word_occurrences, DEFAULT_PER_PAGE};
use ecfr_counter_lib::{refresh, Client, CounterError, PipelineConfig};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>eCFR word counts</title></head>
<body>
<h1>eCFR word counts</h1>
<ul>
<li><a href="/word_counts.csv">word_counts.csv</a></li>
<li><a href="/refresh_graph">Refresh counts</a></li>
<li><form action="/search"><input name="query" placeholder="word"> <button>Search</button></form></li>
</ul>
</body>
</html>
"#;

pub struct AppState {
    config: PipelineConfig,
    client: Arc<Client>,
    refresh_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: PipelineConfig, client: Arc<Client>) -> Self {
        Self {
            config,
            client,
            refresh_lock: Mutex::new(()),
        }
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/word_counts.csv", get(word_counts_csv))
        .route("/refresh_graph", get(refresh_graph))
        .route("/search", get(search))
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn word_counts_csv(State(state): State<Arc<AppState>>) -> Response {
    let path = &state.config.ledger_path;
    match tokio::fs::read(path).await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "word_counts.csv not found").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read ledger").into_response()
        }
    }
}

/// The run is spawned so a client that disconnects mid-refresh does not
/// cancel it; the ledger and cache are still written.
async fn refresh_graph(State(state): State<Arc<AppState>>) -> Response {
    let run = tokio::spawn(async move {
        let _guard = state.refresh_lock.lock().await;
        refresh(&state.config, Arc::clone(&state.client)).await
    });

    let outcome = match run.await {
        Ok(outcome) => outcome,
        Err(e) => Err(CounterError::Task(e.to_string())),
    };
    match outcome {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "message": "CSV file updated successfully",
                "report": report,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": format!("Error: {}", e) })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    per_page: Option<u32>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    match search_word_occurrences(&state.client, &params.query, per_page).await {
        Ok(summary) => Json(summary).into_response(),
        Err(CounterError::InvalidInput(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": format!("Error: {}", msg) })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "message": format!("Error: {}", e) })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::path::Path;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_in(dir: &Path, base_url: &str) -> PipelineConfig {
        let mut config = PipelineConfig {
            base_url: base_url.to_string(),
            agencies_path: dir.join("agencies_data.json"),
            cache_path: dir.join("processed_dates.json"),
            ledger_path: dir.join("word_counts.csv"),
            as_of: Some("2024-05-31".to_string()),
            ..PipelineConfig::default()
        };
        config.retry.backoff_unit = Duration::from_millis(1);
        config
    }

    fn app(config: PipelineConfig) -> Router {
        let client = Arc::new(Client::with_base_url(&config.base_url).unwrap());
        router(Arc::new(AppState::new(config, client)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn index_links_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(config_in(dir.path(), "http://127.0.0.1:9")), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/word_counts.csv"));
    }

    #[tokio::test]
    async fn missing_ledger_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get(
            app(config_in(dir.path(), "http://127.0.0.1:9")),
            "/word_counts.csv",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ledger_is_served_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "http://127.0.0.1:9");
        std::fs::write(
            &config.ledger_path,
            "Agency,Slug,Title,Chapter,Word Count\nEPA,epa,40,I,10\n",
        )
        .unwrap();

        let (status, body) = get(app(config), "/word_counts.csv").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().ends_with("EPA,epa,40,I,10\n"));
    }

    #[tokio::test]
    async fn refresh_success_reports_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/versioner/v1/full/2024-05-31/title-40.xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<DOC><P>one two three</P></DOC>"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), &server.uri());
        std::fs::write(
            &config.agencies_path,
            r#"[{"name": "EPA", "slug": "epa", "cfr_references": [{"title": 40, "chapter": "I", "latest_amended_on": "2024-01-01"}]}]"#,
        )
        .unwrap();
        let ledger_path = config.ledger_path.clone();

        let (status, body) = get_json(app(config), "/refresh_graph").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "CSV file updated successfully");
        assert_eq!(body["report"]["results_written"], 1);

        let ledger = std::fs::read_to_string(ledger_path).unwrap();
        assert!(ledger.ends_with("EPA,epa,40,I,3\n"));
    }

    #[tokio::test]
    async fn refresh_without_snapshot_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_json(
            app(config_in(dir.path(), "http://127.0.0.1:9")),
            "/refresh_graph",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn dropped_refresh_request_still_writes_ledger() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/versioner/v1/full/2024-05-31/title-40.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<DOC><P>one two three</P></DOC>")
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), &server.uri());
        std::fs::write(
            &config.agencies_path,
            r#"[{"name": "EPA", "slug": "epa", "cfr_references": [{"title": 40, "chapter": "I", "latest_amended_on": "2024-01-01"}]}]"#,
        )
        .unwrap();
        let ledger_path = config.ledger_path.clone();
        let cache_path = config.cache_path.clone();

        let request = Request::builder()
            .uri("/refresh_graph")
            .body(Body::empty())
            .unwrap();
        let early =
            tokio::time::timeout(Duration::from_millis(50), app(config).oneshot(request)).await;
        assert!(early.is_err(), "request should still be running when dropped");

        let mut waited = Duration::ZERO;
        while !cache_path.exists() && waited < Duration::from_secs(5) {
            tokio::time::sleep(Duration::from_millis(50)).await;
            waited += Duration::from_millis(50);
        }

        assert!(cache_path.exists());
        let ledger = std::fs::read_to_string(ledger_path).unwrap();
        assert!(ledger.ends_with("EPA,epa,40,I,3\n"));
    }

    #[tokio::test]
    async fn search_counts_occurrences() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/v1/results"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"results": [{"full_text_excerpt": "an <strong>audit</strong> of the audit"}], "meta": {}}"#,
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (status, body) =
            get_json(app(config_in(dir.path(), &server.uri())), "/search?query=audit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "audit");
        assert_eq!(body["occurrences"], 2);
    }

    #[tokio::test]
    async fn search_without_query_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) =
            get_json(app(config_in(dir.path(), "http://127.0.0.1:9")), "/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
