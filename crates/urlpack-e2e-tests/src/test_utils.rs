use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use eyre::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use urlpack_lib::config::{AccessPathDef, Config};

/// Number of failures `/flaky/{name}` returns before it starts succeeding.
pub const FLAKY_FAILURES: usize = 2;

#[derive(Default)]
struct ServerState {
    hits: Mutex<HashMap<String, usize>>,
}

impl ServerState {
    fn record(&self, key: String) -> usize {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key).or_default();
        *count += 1;
        *count
    }
}

/// A local HTTP server standing in for remote hosts and proxies.
///
/// Routes:
/// - `/files/{name}`: 200 `text/plain` with body `content of {name}`
/// - `/missing/{name}`: 404
/// - `/blocked/{name}`: 403, but served by `/proxy`
/// - `/flaky/{name}`: 503 for the first [`FLAKY_FAILURES`] requests, then 200
/// - `/slow`: answers after 3 seconds
/// - `/image.jpg`, `/image.png`: a 5x4 image
/// - `/proxy?url=...`: serves `/blocked/` targets as `proxied {name}`, 502 for anything else
pub struct TestServer {
    pub base_url: String,
    state: Arc<ServerState>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(ServerState::default());
        let app = Router::new()
            .route("/files/{name}", get(files))
            .route("/missing/{name}", get(missing))
            .route("/blocked/{name}", get(blocked))
            .route("/flaky/{name}", get(flaky))
            .route("/slow", get(slow))
            .route("/image.jpg", get(jpeg))
            .route("/image.png", get(png))
            .route("/proxy", get(proxy))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { base_url, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests received for `path` (without query string).
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or_default()
    }

    pub fn proxy_access_path(&self) -> AccessPathDef {
        AccessPathDef::new("local-proxy", self.url("/proxy?url={encoded_url}"))
    }
}

/// Fast retries, short timeouts and no public proxies.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.fetch.timeout_secs = 2;
    config.retry.max_retries = 1;
    config.retry.base_delay_ms = 1;
    config.use_default_access_paths = false;
    config
}

pub fn encoded_image(format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 50) as u8, (y * 60) as u8, 120]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("in-memory image encoding");
    bytes
}

/// Settings matching [`create_test_config`], as a config file.
pub const TEST_CONFIG_YAML: &str = "\
fetch:
  timeout_secs: 2
retry:
  max_retries: 1
  base_delay_ms: 1
use_default_access_paths: false
";

/// Temp dir holding `list.txt` with `input` and `config.yaml` with [`TEST_CONFIG_YAML`].
pub fn setup_test_environment(input: &str) -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;

    std::fs::write(temp_dir.path().join("list.txt"), input)?;
    std::fs::write(temp_dir.path().join("config.yaml"), TEST_CONFIG_YAML)?;

    Ok(temp_dir)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("urlpack_lib=debug,urlpack_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

async fn files(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    state.record(format!("/files/{name}"));
    ([(CONTENT_TYPE, "text/plain")], format!("content of {name}")).into_response()
}

async fn missing(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    state.record(format!("/missing/{name}"));
    StatusCode::NOT_FOUND.into_response()
}

async fn blocked(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    state.record(format!("/blocked/{name}"));
    StatusCode::FORBIDDEN.into_response()
}

async fn flaky(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    let hits = state.record(format!("/flaky/{name}"));
    if hits <= FLAKY_FAILURES {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    ([(CONTENT_TYPE, "text/plain")], format!("finally {name}")).into_response()
}

async fn slow(State(state): State<Arc<ServerState>>) -> Response {
    state.record("/slow".to_string());
    tokio::time::sleep(Duration::from_secs(3)).await;
    ([(CONTENT_TYPE, "text/plain")], "too late").into_response()
}

async fn jpeg(State(state): State<Arc<ServerState>>) -> Response {
    state.record("/image.jpg".to_string());
    ([(CONTENT_TYPE, "image/jpeg")], encoded_image(ImageFormat::Jpeg)).into_response()
}

async fn png(State(state): State<Arc<ServerState>>) -> Response {
    state.record("/image.png".to_string());
    ([(CONTENT_TYPE, "image/png")], encoded_image(ImageFormat::Png)).into_response()
}

async fn proxy(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/proxy".to_string());
    let target = params.get("url").cloned().unwrap_or_default();
    match target.split_once("/blocked/") {
        Some((_, name)) => {
            ([(CONTENT_TYPE, "text/plain")], format!("proxied {name}")).into_response()
        }
        None => StatusCode::BAD_GATEWAY.into_response(),
    }
}
