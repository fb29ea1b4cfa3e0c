use std::path::PathBuf;

use crate::client::models::health::HealthResult;
use crate::client::models::upload::{DragEvent, UploadCandidate, UploadError, UploadFile, UploadSource};
use crate::client::services::analyzer::AnalysisError;

#[derive(Debug, Clone)]
pub enum Message {
    // Upload panel input
    Drag(DragEvent),
    FileDropped(PathBuf),
    OpenFilePicker,
    FilePicked(Option<PathBuf>),
    FileInspected { source: UploadSource, result: Result<UploadCandidate, UploadError> },
    FileLoaded { source: UploadSource, result: Result<UploadFile, UploadError> },
    ClearUpload,
    // Raised by the upload panel for each accepted file
    ImageUploaded(UploadFile),
    // Analysis
    AnalysisFinished(Result<HealthResult, AnalysisError>),
    RetryAnalysis,
    ClearLog,
}
