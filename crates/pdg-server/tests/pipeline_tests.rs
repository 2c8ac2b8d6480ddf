//! Ingestion pipeline failure-mode tests
//!
//! A fault-injecting store wrapper drives the pipeline into each failure
//! class and asserts the consistency goals: commit is never attempted after
//! a write failure, nothing staged becomes visible, the batch writer is
//! never reached when extraction fails, and the scratch workspace is swept
//! on every exit path.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pdg_dsu::{ArraySsi, CollectionKey, DataUnit, DsuStore, MemoryDsuStore, Ssi, StoreError};
use pdg_server::{config::DsuConfig, features};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;

// ============================================================================
// Fault-injecting store
// ============================================================================

#[derive(Clone, Copy)]
enum FailMode {
    None,
    /// Fail the n-th write_file call (1-based).
    WriteAt(usize),
    /// Fail commit_batch.
    Commit,
}

#[derive(Clone)]
struct FlakyStore {
    inner: MemoryDsuStore,
    mode: FailMode,
    begins: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
}

impl FlakyStore {
    fn new(mode: FailMode) -> Self {
        Self {
            inner: MemoryDsuStore::new(),
            mode,
            begins: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            commits: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl DsuStore for FlakyStore {
    async fn create(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError> {
        let unit = self.inner.create(ssi).await?;
        Ok(Box::new(FlakyUnit {
            inner: unit,
            mode: self.mode,
            begins: self.begins.clone(),
            writes: self.writes.clone(),
            commits: self.commits.clone(),
        }))
    }

    async fn load(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError> {
        self.inner.load(ssi).await
    }
}

struct FlakyUnit {
    inner: Box<dyn DataUnit>,
    mode: FailMode,
    begins: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
}

#[async_trait]
impl DataUnit for FlakyUnit {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.read_file(path).await
    }

    async fn begin_batch(&mut self) -> Result<(), StoreError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        self.inner.begin_batch().await
    }

    async fn write_file(&mut self, path: &str, contents: Vec<u8>) -> Result<(), StoreError> {
        let call = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if let FailMode::WriteAt(n) = self.mode {
            if call == n {
                return Err(StoreError::Backend("injected write failure".to_string()));
            }
        }
        self.inner.write_file(path, contents).await
    }

    async fn commit_batch(&mut self) -> Result<(), StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if matches!(self.mode, FailMode::Commit) {
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }
        self.inner.commit_batch().await
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn create_test_app(store: FlakyStore) -> (Router, DsuConfig, TempDir) {
    let scratch = TempDir::new().unwrap();
    let config = DsuConfig {
        scratch_dir: scratch.path().to_path_buf(),
        ..DsuConfig::default()
    };

    let state = features::FeatureState::new(Arc::new(store), config.clone());
    (features::router(state), config, scratch)
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

async fn post_upload(app: &Router, uri: &str, body: Vec<u8>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn scratch_is_empty(scratch: &TempDir) -> bool {
    std::fs::read_dir(scratch.path()).unwrap().next().is_none()
}

fn test_ssi(config: &DsuConfig, codes: &[&str]) -> Ssi {
    let key = CollectionKey::new(codes.iter().map(|c| c.to_string())).unwrap();
    ArraySsi::derive(&config.domain, &key, None).unwrap()
}

// ============================================================================
// Failure classes
// ============================================================================

#[tokio::test]
async fn test_write_failure_aborts_without_partial_commit() {
    let store = FlakyStore::new(FailMode::WriteAt(2));
    let (app, config, scratch) = create_test_app(store.clone());
    let archive = build_zip(&[("a.txt", b"alpha"), ("b.txt", b"beta"), ("c.txt", b"gamma")]);

    let (status, body) = post_upload(&app, "/array?arr=111,222", archive).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body.contains("write extracted files"),
        "unexpected message: {body}"
    );

    // The loop aborted at the failing write; the remaining file was never
    // attempted and commit was never called.
    assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);

    // No partial content is observable: the unit exists but holds nothing.
    let unit = store.load(&test_ssi(&config, &["111", "222"])).await.unwrap();
    assert!(unit.read_file("/a.txt").await.is_err());

    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_commit_failure_leaves_nothing_visible() {
    let store = FlakyStore::new(FailMode::Commit);
    let (app, config, scratch) = create_test_app(store.clone());
    let archive = build_zip(&[("a.txt", b"alpha")]);

    let (status, body) = post_upload(&app, "/array?arr=111", archive).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("anchor"), "unexpected message: {body}");

    assert_eq!(store.commits.load(Ordering::SeqCst), 1);

    let unit = store.load(&test_ssi(&config, &["111"])).await.unwrap();
    assert!(unit.read_file("/a.txt").await.is_err());

    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_extraction_failure_never_reaches_batch_writer() {
    let store = FlakyStore::new(FailMode::None);
    let (app, _config, scratch) = create_test_app(store.clone());

    let (status, body) = post_upload(&app, "/array?arr=111", b"corrupt".to_vec()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("extract"), "unexpected message: {body}");

    assert_eq!(store.begins.load(Ordering::SeqCst), 0);
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);

    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_success_writes_in_listed_order_then_commits_once() {
    let store = FlakyStore::new(FailMode::None);
    let (app, config, scratch) = create_test_app(store.clone());
    let archive = build_zip(&[("b.txt", b"beta"), ("a.txt", b"alpha")]);

    let (status, body) = post_upload(&app, "/array?arr=111,222", archive).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    assert_eq!(store.begins.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    assert_eq!(store.commits.load(Ordering::SeqCst), 1);

    let unit = store.load(&test_ssi(&config, &["111", "222"])).await.unwrap();
    assert_eq!(unit.read_file("/a.txt").await.unwrap(), b"alpha");
    assert_eq!(unit.read_file("/b.txt").await.unwrap(), b"beta");

    assert!(scratch_is_empty(&scratch));
}
