//! Reading media files from disk into uploads.

use std::path::Path;

use vigil_core::{ContentType, MediaUpload};

/// Reads a file into an upload, guessing its MIME type from the extension.
pub fn load_upload(path: &Path) -> std::io::Result<MediaUpload> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string());

    Ok(MediaUpload::new(file_name, mime_type, bytes))
}

/// Maps a MIME type to a media content type.
pub fn infer_content_type(mime_type: Option<&str>) -> Option<ContentType> {
    match mime_type?.split('/').next()? {
        "image" => Some(ContentType::Image),
        "video" => Some(ContentType::Video),
        "audio" => Some(ContentType::Audio),
        _ => None,
    }
}
