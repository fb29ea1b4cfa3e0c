use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::client::services::preview_store::{PreviewHandle, PreviewStats, PreviewStore};

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// An image (or would-be image) picked by the user, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        self.bytes.clone()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload an image file")]
    NotAnImage { mime_type: String },
    #[error("Image size should be less than 5MB")]
    TooLarge { size: u64 },
    #[error("Could not read {name}: {reason}")]
    Unreadable { name: String, reason: String },
}

/// A file on disk described by its metadata only; nothing has been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

fn check(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if !mime_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }
    Ok(())
}

/// Checks run on every candidate file, whichever way it arrived.
pub fn validate(file: &UploadFile) -> Result<(), UploadError> {
    check(file.mime_type(), file.size())
}

/// Same checks as [`validate`], from metadata, before the bytes are read.
pub fn validate_candidate(candidate: &UploadCandidate) -> Result<(), UploadError> {
    check(&candidate.mime_type, candidate.size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop,
}

impl DragState {
    pub fn next(self, event: DragEvent) -> DragState {
        match event {
            DragEvent::Enter | DragEvent::Over => DragState::Dragging,
            DragEvent::Leave | DragEvent::Drop => DragState::Idle,
        }
    }
}

/// Where a candidate file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    Drop,
    Picker,
}

impl fmt::Display for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSource::Drop => write!(f, "drop"),
            UploadSource::Picker => write!(f, "picker"),
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadState {
    pub drag: DragState,
    pub preview: Option<PreviewHandle>,
    pub error: Option<UploadError>,
    /// Name shown in the file input; cleared so the same file can be picked again.
    pub selection: Option<String>,
}

impl UploadState {
    pub fn drag_active(&self) -> bool {
        self.drag == DragState::Dragging
    }
}

/// Upload panel state machine. `on_upload` turns an accepted file into the
/// caller's message; it runs at most once per accepted file.
pub struct UploadPanel<M> {
    state: UploadState,
    previews: PreviewStore,
    on_upload: Box<dyn Fn(UploadFile) -> M>,
}

impl<M> UploadPanel<M> {
    pub fn new(on_upload: impl Fn(UploadFile) -> M + 'static) -> Self {
        Self {
            state: UploadState::default(),
            previews: PreviewStore::new(),
            on_upload: Box::new(on_upload),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn preview_stats(&self) -> Arc<PreviewStats> {
        self.previews.stats()
    }

    pub fn has_preview(&self) -> bool {
        self.state.preview.is_some()
    }

    pub fn error(&self) -> Option<&UploadError> {
        self.state.error.as_ref()
    }

    pub fn can_clear(&self, is_loading: bool) -> bool {
        self.has_preview() && !is_loading
    }

    pub fn drag(&mut self, event: DragEvent) {
        self.state.drag = self.state.drag.next(event);
    }

    /// A file dropped on the panel. Ends the drag, then validates.
    pub fn drop_file(&mut self, file: UploadFile, is_loading: bool) -> Option<M> {
        self.drag(DragEvent::Drop);
        self.receive(file, UploadSource::Drop, is_loading)
    }

    /// A file chosen through the picker.
    pub fn select_file(&mut self, file: UploadFile, is_loading: bool) -> Option<M> {
        self.receive(file, UploadSource::Picker, is_loading)
    }

    /// Screens a file by its metadata. Returns true when its bytes should be
    /// loaded and handed to [`receive`](Self::receive).
    pub fn screen(&mut self, candidate: &UploadCandidate, source: UploadSource, is_loading: bool) -> bool {
        if is_loading {
            debug!("ignoring {} from {} while analysis is pending", candidate.name, source);
            return false;
        }
        if let Err(e) = validate_candidate(candidate) {
            warn!("rejected {} from {} before reading: {:?}", candidate.name, source, e);
            self.state.error = Some(e);
            return false;
        }
        true
    }

    pub fn receive(&mut self, file: UploadFile, source: UploadSource, is_loading: bool) -> Option<M> {
        if is_loading {
            debug!("ignoring {} from {} while analysis is pending", file.name(), source);
            return None;
        }

        if let Err(e) = validate(&file) {
            warn!("rejected {} from {}: {:?}", file.name(), source, e);
            self.state.error = Some(e);
            return None;
        }

        if let Some(previous) = self.state.preview.take() {
            self.previews.release(previous);
        }
        self.state.preview = Some(self.previews.create(&file));
        self.state.selection = Some(file.name().to_string());
        self.state.error = None;
        info!("accepted {} ({} bytes) from {}", file.name(), file.size(), source);

        Some((self.on_upload)(file))
    }

    /// Reports a file that could not be loaded at all.
    pub fn report(&mut self, error: UploadError) {
        warn!("upload failed: {}", error);
        self.state.error = Some(error);
    }

    /// Returns false when there was nothing to clear or a load is pending.
    pub fn clear(&mut self, is_loading: bool) -> bool {
        if !self.can_clear(is_loading) {
            return false;
        }
        self.release_preview();
        self.state.error = None;
        self.state.selection = None;
        true
    }

    fn release_preview(&mut self) {
        if let Some(handle) = self.state.preview.take() {
            self.previews.release(handle);
        }
    }
}

impl<M> Drop for UploadPanel<M> {
    fn drop(&mut self) {
        self.release_preview();
    }
}

impl<M> fmt::Debug for UploadPanel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPanel")
            .field("state", &self.state)
            .field("live_previews", &self.previews.live())
            .finish()
    }
}
