use log::{info, warn};

use crate::client::gui::views::logger::{LogLevel, LogMessage};
use crate::client::models::health::HealthResult;
use crate::client::models::upload::UploadFile;
use crate::client::services::analyzer::AnalysisError;

const MAX_LOG_ENTRIES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Processing,
    Done,
    Failed(AnalysisError),
}

/// Page-level state: whether an analysis is running and what it produced.
#[derive(Debug, Clone, Default)]
pub struct HealthAppState {
    pub phase: AnalysisPhase,
    pub result: Option<HealthResult>,
    /// File of the current or last failed analysis, kept for retry.
    pub pending: Option<UploadFile>,
    pub logger: Vec<LogMessage>,
}

impl HealthAppState {
    pub fn is_loading(&self) -> bool {
        self.phase == AnalysisPhase::Processing
    }

    pub fn result(&self) -> Option<&HealthResult> {
        self.result.as_ref()
    }

    pub fn failure(&self) -> Option<&AnalysisError> {
        match &self.phase {
            AnalysisPhase::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn can_retry(&self) -> bool {
        self.failure().is_some() && self.pending.is_some()
    }

    /// Starts an analysis for `file`. Returns the file to send to the analyzer,
    /// or `None` when one is already in flight.
    pub fn begin(&mut self, file: UploadFile) -> Option<UploadFile> {
        if self.is_loading() {
            warn!("analysis already in progress, ignoring {}", file.name());
            self.log(LogLevel::Warning, format!("Still analysing, {} was not submitted", file.name()));
            return None;
        }
        info!("analysing {} ({} bytes)", file.name(), file.size());
        self.log(LogLevel::Info, format!("Analysing {}...", file.name()));
        self.phase = AnalysisPhase::Processing;
        self.pending = Some(file.clone());
        Some(file)
    }

    /// Re-submits the file whose analysis failed.
    pub fn retry(&mut self) -> Option<UploadFile> {
        if !self.can_retry() {
            return None;
        }
        let file = self.pending.take()?;
        self.begin(file)
    }

    pub fn finish(&mut self, outcome: Result<HealthResult, AnalysisError>) {
        if !self.is_loading() {
            warn!("analysis result arrived with no analysis in progress");
            return;
        }
        match outcome {
            Ok(result) => {
                info!("analysis done: score {} ({})", result.score, result.score.band());
                self.log(
                    LogLevel::Success,
                    format!("Health score ready: {} ({})", result.score, result.score.band()),
                );
                self.result = Some(result);
                self.pending = None;
                self.phase = AnalysisPhase::Done;
            }
            Err(e) => {
                warn!("analysis failed: {}", e);
                self.log(LogLevel::Error, format!("Analysis failed: {}", e));
                self.phase = AnalysisPhase::Failed(e);
            }
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logger.push(LogMessage {
            level,
            message: message.into(),
        });
        if self.logger.len() > MAX_LOG_ENTRIES {
            let excess = self.logger.len() - MAX_LOG_ENTRIES;
            self.logger.drain(..excess);
        }
    }
}
