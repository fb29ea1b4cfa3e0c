use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use health_score::client::gui::app::HealthScoreApp;
use health_score::client::models::app_state::AnalysisPhase;
use health_score::client::models::health::{HealthResult, Score};
use health_score::client::models::messages::Message;
use health_score::client::models::upload::{UploadError, UploadFile, UploadSource};
use health_score::client::services::analyzer::{AnalysisError, IngredientAnalyzer, PlaceholderAnalyzer};
use health_score::client::services::file_loader;
use iced::Application;

/// Analyzer double that returns a canned outcome and counts calls.
struct FakeAnalyzer {
    outcome: Result<HealthResult, AnalysisError>,
    calls: AtomicUsize,
}

impl FakeAnalyzer {
    fn new(outcome: Result<HealthResult, AnalysisError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl IngredientAnalyzer for FakeAnalyzer {
    async fn analyze(&self, _image: Arc<[u8]>, _mime_type: &str) -> Result<HealthResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn drink_result() -> HealthResult {
    HealthResult::new(
        Score::new(75).unwrap(),
        ["Water", "Sugar", "Natural Flavors", "Citric Acid", "Vitamin C"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}

/// Drives the window through `update`, running the analysis commands it schedules.
struct Page {
    app: HealthScoreApp,
}

impl Page {
    fn new(analyzer: Arc<dyn IngredientAnalyzer>) -> Self {
        Self {
            app: HealthScoreApp::new_with(analyzer),
        }
    }

    fn send(&mut self, message: Message) {
        let _ = self.app.update(message);
    }

    async fn finish_analysis(&mut self) {
        let file = self.app.state.pending.clone().expect("an analysis is in flight");
        let outcome = self.app.analyzer.analyze(file.shared_bytes(), file.mime_type()).await;
        self.send(Message::AnalysisFinished(outcome));
    }

    /// A loaded file arriving from a drop. Returns whether an analysis ran.
    async fn drop_file(&mut self, file: UploadFile) -> bool {
        self.send(Message::FileLoaded {
            source: UploadSource::Drop,
            result: Ok(file),
        });
        if !self.app.state.is_loading() {
            return false;
        }
        self.finish_analysis().await;
        true
    }
}

#[tokio::test]
async fn dropping_a_png_shows_an_excellent_score() {
    let analyzer = FakeAnalyzer::new(Ok(drink_result()));
    let mut page = Page::new(analyzer.clone());

    let png = UploadFile::new("drink.png", "image/png", vec![0u8; 2_000_000]);
    assert!(page.drop_file(png).await);

    assert!(page.app.upload.has_preview());
    assert!(!page.app.state.is_loading());
    let card = page.app.state.result().expect("score panel data").card();
    assert_eq!(card.label(), "Excellent");
    assert_eq!(card.ingredient_count(), 5);
    assert_eq!(
        card.ingredients,
        ["Water", "Sugar", "Natural Flavors", "Citric Acid", "Vitamin C"]
    );
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropping_a_text_file_never_renders_a_score() {
    let analyzer = FakeAnalyzer::new(Ok(drink_result()));
    let mut page = Page::new(analyzer.clone());

    let txt = UploadFile::new("notes.txt", "text/plain", b"sugar, water".to_vec());
    assert!(!page.drop_file(txt).await);

    assert!(page.app.state.result().is_none());
    assert!(!page.app.state.is_loading());
    assert!(!page.app.upload.has_preview());
    assert_eq!(
        page.app.upload.error().map(|e| e.to_string()).as_deref(),
        Some("Please upload an image file")
    );
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_analysis_can_be_retried() {
    let failing = FakeAnalyzer::new(Err(AnalysisError::BackendUnavailable("connection refused".into())));
    let mut page = Page::new(failing.clone());

    let png = UploadFile::new("label.png", "image/png", vec![7u8; 1024]);
    assert!(page.drop_file(png).await);
    assert!(!page.app.state.is_loading());
    assert!(matches!(page.app.state.phase, AnalysisPhase::Failed(AnalysisError::BackendUnavailable(_))));
    assert!(page.app.state.result().is_none());

    let working = FakeAnalyzer::new(Ok(drink_result()));
    page.app.analyzer = working.clone();
    page.send(Message::RetryAnalysis);
    assert!(page.app.state.is_loading());
    assert_eq!(page.app.state.pending.as_ref().map(|f| f.size()), Some(1024));
    page.finish_analysis().await;

    assert_eq!(page.app.state.phase, AnalysisPhase::Done);
    assert_eq!(page.app.state.result().map(|r| r.score.value()), Some(75));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(working.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_uploads_do_not_leak_previews() {
    let mut page = Page::new(FakeAnalyzer::new(Ok(drink_result())));
    let stats = page.app.upload.preview_stats();

    for i in 0..10 {
        let file = UploadFile::new(format!("label-{}.jpg", i), "image/jpeg", vec![i as u8; 64]);
        assert!(page.drop_file(file).await);
    }
    assert_eq!(stats.created(), 10);
    assert_eq!(stats.released(), 9);
    assert_eq!(stats.live(), 1);

    page.send(Message::ClearUpload);
    assert_eq!(stats.live(), 0);
    page.send(Message::ClearUpload);
    assert_eq!(stats.released(), 10);

    drop(page);
    assert_eq!(stats.released(), 10);
}

#[tokio::test(start_paused = true)]
async fn placeholder_result_arrives_after_two_seconds() {
    let mut page = Page::new(Arc::new(PlaceholderAnalyzer::default()));
    let started = tokio::time::Instant::now();

    let png = UploadFile::new("drink.png", "image/png", vec![0u8; 4096]);
    assert!(page.drop_file(png).await);

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(page.app.state.result(), Some(&drink_result()));
}

#[tokio::test]
async fn oversized_drop_is_rejected_without_reading_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.png");
    std::fs::File::create(&path).unwrap().set_len(512 * 1024 * 1024).unwrap();

    let analyzer = FakeAnalyzer::new(Ok(drink_result()));
    let mut page = Page::new(analyzer.clone());
    let result = file_loader::inspect(path).await;
    page.send(Message::FileInspected {
        source: UploadSource::Drop,
        result,
    });

    assert!(matches!(page.app.upload.error(), Some(UploadError::TooLarge { .. })));
    assert!(!page.app.upload.has_preview());
    assert!(!page.app.state.is_loading());
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
}
