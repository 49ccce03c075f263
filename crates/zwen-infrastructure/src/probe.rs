//! Builds attachment metadata from files on disk.

use std::fs;
use std::path::Path;
use zwen_core::attachment::{Attachment, AttachmentKind};
use zwen_core::error::{Result, ZwenError};

/// Reads name, size and guessed MIME type of the file at `path`.
///
/// Only metadata is read; the contents are never opened.
pub fn probe_attachment(path: &Path, kind: AttachmentKind) -> Result<Attachment> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(ZwenError::not_found("file", path.display().to_string()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ZwenError::not_found("file", path.display().to_string()))?;

    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    Ok(Attachment {
        name,
        size_bytes: metadata.len(),
        mime_type,
        kind,
    })
}
