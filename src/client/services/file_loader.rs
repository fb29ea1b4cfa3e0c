use std::path::{Path, PathBuf};

use log::debug;
use tokio::io::AsyncReadExt;

use crate::client::models::upload::{UploadCandidate, UploadError, UploadFile, MAX_UPLOAD_BYTES};

const OCTET_STREAM: &str = "application/octet-stream";

/// Image types the picker offers and the drop zone advertises: label, extensions, MIME type.
pub const IMAGE_TYPES: &[(&str, &[&str], &str)] = &[
    ("PNG", &["png"], "image/png"),
    ("JPEG", &["jpg", "jpeg"], "image/jpeg"),
    ("GIF", &["gif"], "image/gif"),
    ("WebP", &["webp"], "image/webp"),
    ("BMP", &["bmp"], "image/bmp"),
    ("TIFF", &["tif", "tiff"], "image/tiff"),
    ("SVG", &["svg"], "image/svg+xml"),
];

pub fn image_extensions() -> Vec<&'static str> {
    IMAGE_TYPES.iter().flat_map(|(_, exts, _)| exts.iter().copied()).collect()
}

/// "PNG, JPEG, ... or SVG"
pub fn image_types_hint() -> String {
    let labels: Vec<&str> = IMAGE_TYPES.iter().map(|(label, _, _)| *label).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

/// MIME type from the file extension, the way a browser labels a picked file.
pub fn mime_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) else {
        return OCTET_STREAM;
    };
    if let Some((_, _, mime)) = IMAGE_TYPES.iter().find(|(_, exts, _)| exts.contains(&ext.as_str())) {
        return *mime;
    }
    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        _ => OCTET_STREAM,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn unreadable(name: &str, err: std::io::Error) -> UploadError {
    UploadError::Unreadable {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

/// Describes a file from its metadata without reading its contents.
pub async fn inspect(path: PathBuf) -> Result<UploadCandidate, UploadError> {
    let name = display_name(&path);
    let metadata = tokio::fs::metadata(&path).await.map_err(|e| unreadable(&name, e))?;
    if !metadata.is_file() {
        return Err(UploadError::Unreadable {
            name,
            reason: "not a regular file".to_string(),
        });
    }
    let mime_type = mime_for_path(&path).to_string();
    debug!("inspected {} ({} bytes, {})", path.display(), metadata.len(), mime_type);
    Ok(UploadCandidate {
        path,
        name,
        mime_type,
        size: metadata.len(),
    })
}

/// Reads a screened candidate into an [`UploadFile`].
///
/// At most one byte past the upload limit is read, so a file that grew after
/// [`inspect`] still fails the panel's size check without being loaded whole.
pub async fn load_upload(candidate: UploadCandidate) -> Result<UploadFile, UploadError> {
    let file = tokio::fs::File::open(&candidate.path)
        .await
        .map_err(|e| unreadable(&candidate.name, e))?;
    let mut bytes = Vec::with_capacity(candidate.size.min(MAX_UPLOAD_BYTES) as usize);
    let mut reader = file.take(MAX_UPLOAD_BYTES + 1);
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| unreadable(&candidate.name, e))?;
    debug!("loaded {} ({} bytes)", candidate.name, bytes.len());
    Ok(UploadFile::new(candidate.name, candidate.mime_type, bytes))
}

/// Opens the native picker filtered to images. `None` when the user cancels.
pub async fn pick_image() -> Option<PathBuf> {
    let extensions = image_extensions();
    rfd::AsyncFileDialog::new()
        .set_title("Upload Ingredient List")
        .add_filter("Images", extensions.as_slice())
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::upload::{UploadPanel, UploadSource};

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("label.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("label.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("label.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("archive")), OCTET_STREAM);
    }

    #[test]
    fn picker_hint_and_mime_table_agree() {
        let exts = image_extensions();
        assert_eq!(exts, ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "svg"]);
        for ext in &exts {
            let path = PathBuf::from(format!("label.{}", ext));
            assert!(mime_for_path(&path).starts_with("image/"), "{} is not an image type", ext);
        }
        assert_eq!(image_types_hint(), "PNG, JPEG, GIF, WebP, BMP, TIFF or SVG");
    }

    #[tokio::test]
    async fn loads_file_contents_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

        let candidate = inspect(path).await.unwrap();
        assert_eq!(candidate.size, 8);
        let file = load_upload(candidate).await.unwrap();
        assert_eq!(file.name(), "label.png");
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(file.size(), 8);
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect(dir.path().join("gone.png")).await.unwrap_err();
        assert!(matches!(err, UploadError::Unreadable { ref name, .. } if name == "gone.png"));
    }

    #[tokio::test]
    async fn directories_are_not_uploads() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(inspect(dir.path().to_path_buf()).await, Err(UploadError::Unreadable { .. })));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        std::fs::File::create(&path).unwrap().set_len(256 * 1024 * 1024).unwrap();

        let candidate = inspect(path).await.unwrap();
        assert_eq!(candidate.size, 256 * 1024 * 1024);

        let mut panel = UploadPanel::new(|file: UploadFile| file);
        assert!(!panel.screen(&candidate, UploadSource::Drop, false));
        assert_eq!(
            panel.error().map(|e| e.to_string()).as_deref(),
            Some("Image size should be less than 5MB")
        );
    }

    #[tokio::test]
    async fn reads_stop_just_past_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grown.png");
        std::fs::File::create(&path).unwrap().set_len(64 * 1024 * 1024).unwrap();

        let mut candidate = inspect(path).await.unwrap();
        candidate.size = 1024;
        let file = load_upload(candidate).await.unwrap();
        assert_eq!(file.size(), MAX_UPLOAD_BYTES + 1);

        let mut panel = UploadPanel::new(|file: UploadFile| file);
        assert!(panel.select_file(file, false).is_none());
        assert!(matches!(panel.error(), Some(UploadError::TooLarge { .. })));
    }
}
