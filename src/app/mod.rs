mod state;
mod ticker;
mod ui;

use crate::upload::{ArtifactKind, ProcessClient, SelectedFile, DEFAULT_BASE_URL};
use eframe::egui;
use state::UploadState;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{info, warn};

pub struct BylawUploader {
    state: UploadState,
    client: ProcessClient,
}

impl BylawUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        info!("Starting Bylaw Parser client");
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            state: UploadState::default(),
            client: ProcessClient::new(base_url),
        }
    }

    /// Candidate files from the picker and from drops both land here.
    pub fn select_path(&mut self, path: &Path) {
        if self.state.is_uploading() {
            return;
        }

        let candidate = SelectedFile::from_path(path);
        if self.state.select_candidate(candidate) {
            info!("Selected {}", path.display());
        } else {
            warn!("Rejected non-PDF selection: {}", path.display());
        }
    }

    pub fn start_upload(&mut self) {
        let Some(file) = self.state.begin_upload() else {
            return;
        };
        info!("Uploading {} for processing", file.name);

        let client = self.client.clone();
        let (sender, receiver) = channel();
        self.state.attach_submission(receiver);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let outcome = rt.block_on(client.submit(&file));
            let _ = sender.send(outcome);
        });
    }

    /// Resolve an artifact kind to its openable URL, or nothing when no
    /// result is present.
    pub fn artifact_request(&self, kind: ArtifactKind) -> Option<String> {
        self.state
            .outcome()
            .map(|outcome| self.client.artifact_url(outcome.locator(kind)))
    }

    pub fn download(&self, kind: ArtifactKind) {
        let Some(url) = self.artifact_request(kind) else {
            return;
        };
        info!("Opening {} artifact: {}", kind.label(), url);
        if let Err(e) = open::that(&url) {
            warn!("Failed to open {} download: {}", kind.label(), e);
        }
    }

    pub fn reset(&mut self) {
        info!("Resetting for another upload");
        self.state.reset();
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.state.is_dragging = false;
            // First entry wins, matching the single-file input it replaces.
            if let Some(path) = dropped.first().and_then(|f| f.path.clone()) {
                self.select_path(&path);
            }
            return;
        }

        self.state.is_dragging = ctx.input(|i| !i.raw.hovered_files.is_empty());
    }
}

impl eframe::App for BylawUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drops(ctx);

        if self.state.poll() {
            ctx.request_repaint();
        }
        if self.state.is_uploading() {
            // Keep frames coming while waiting on the worker and the ticker.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        self.render(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Phase;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::net::SocketAddr;

    fn spawn_server(router: Router) -> SocketAddr {
        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap())
            .serve(router.into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    fn pdf_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("bylaw.pdf");
        std::fs::write(&path, b"%PDF-1.4 fixture").unwrap();
        path
    }

    async fn wait_for_completion(app: &mut BylawUploader) {
        for _ in 0..200 {
            app.state.poll();
            if !app.state.is_uploading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("submission never completed");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn full_lifecycle_select_submit_download_reset() {
        async fn process() -> Json<Value> {
            Json(json!({
                "job_id": "3f1a",
                "status": "success",
                "sections_count": 12,
                "translated_count": 10,
                "download_urls": {"extracted": "/a", "translated": "/b"}
            }))
        }
        let addr = spawn_server(Router::new().route("/api/process", post(process)));
        let dir = tempfile::tempdir().unwrap();
        let pdf = pdf_fixture(&dir);

        let mut app = BylawUploader::with_base_url(format!("http://{addr}"));
        app.select_path(&pdf);
        assert!(app.state.can_submit());

        app.start_upload();
        assert!(app.state.is_uploading());
        assert!(app.artifact_request(ArtifactKind::Extracted).is_none());

        wait_for_completion(&mut app).await;

        let outcome = app.state.outcome().expect("submission should succeed");
        assert_eq!(outcome.stats_line(), "12 sections extracted, 10 translated");

        // Retrieval for the two kinds works in either order, without
        // touching controller state.
        let translated = app.artifact_request(ArtifactKind::Translated).unwrap();
        let extracted = app.artifact_request(ArtifactKind::Extracted).unwrap();
        assert_eq!(extracted, format!("http://{addr}/a"));
        assert_eq!(translated, format!("http://{addr}/b"));
        assert!(app.state.outcome().is_some());

        app.reset();
        assert!(matches!(app.state.phase(), Phase::Idle));
        assert!(app.artifact_request(ArtifactKind::Extracted).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rejected_submission_surfaces_detail_and_allows_retry() {
        async fn reject() -> (StatusCode, Json<Value>) {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "Only PDF files are supported"})),
            )
        }
        let addr = spawn_server(Router::new().route("/api/process", post(reject)));
        let dir = tempfile::tempdir().unwrap();
        let pdf = pdf_fixture(&dir);

        let mut app = BylawUploader::with_base_url(format!("http://{addr}"));
        app.select_path(&pdf);
        app.start_upload();
        wait_for_completion(&mut app).await;

        assert_eq!(
            app.state.error_message(),
            Some("Only PDF files are supported")
        );
        assert!(app.state.can_submit(), "the file is retained for a retry");
    }

    #[test]
    fn retrieval_without_result_is_a_no_op() {
        let app = BylawUploader::with_base_url(DEFAULT_BASE_URL);
        assert!(app.artifact_request(ArtifactKind::Extracted).is_none());
        app.download(ArtifactKind::Translated);
    }

    #[test]
    fn upload_without_selection_is_a_no_op() {
        let mut app = BylawUploader::with_base_url(DEFAULT_BASE_URL);
        app.start_upload();
        assert!(!app.state.is_uploading());
    }

    #[test]
    fn selection_is_ignored_while_uploading() {
        let mut app = BylawUploader::with_base_url(DEFAULT_BASE_URL);
        app.state
            .select_candidate(SelectedFile::from_path(Path::new("bylaw.pdf")));
        app.state.begin_upload().unwrap();

        app.select_path(Path::new("other.pdf"));
        assert_eq!(app.state.selected_file().unwrap().name, "bylaw.pdf");
    }
}
