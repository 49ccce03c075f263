//! Attachment model.
//!
//! Attachments are metadata only: a name, a size and a MIME type. Contents
//! are never read or stored.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// How an attachment was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttachmentKind {
    /// A document from the file picker.
    File,
    /// An image from the image picker.
    Image,
    /// A photo taken with the camera.
    Camera,
}

impl AttachmentKind {
    /// Noun used in assistant replies ("your photo").
    pub fn noun(&self) -> &'static str {
        match self {
            AttachmentKind::File => "file",
            AttachmentKind::Image => "image",
            AttachmentKind::Camera => "photo",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, AttachmentKind::Image | AttachmentKind::Camera)
    }
}

/// A file or photo attached to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Original file name
    pub name: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// MIME type, when known
    pub mime_type: Option<String>,
    pub kind: AttachmentKind,
}

impl Attachment {
    /// Upper-cased extension, or the whole name when there is no dot.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }

    /// One-line description shown on the upload card.
    pub fn describe(&self) -> String {
        let size = format_file_size(self.size_bytes);
        let mime = self.mime_type.as_deref().unwrap_or("Unknown Type");
        match self.kind {
            AttachmentKind::File => format!("{} • {} File • {}", size, self.extension(), mime),
            AttachmentKind::Image => format!("{} • Image • {}", size, mime),
            AttachmentKind::Camera => format!("{} • Camera Photo • {}", size, mime),
        }
    }
}

/// Formats a byte count as `"0 Bytes"`, `"512 Bytes"`, `"1.5 KB"`, ...
///
/// At most two decimals are kept and trailing zeros are dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AttachmentKind::from_str("Camera").unwrap(), AttachmentKind::Camera);
        assert_eq!(AttachmentKind::from_str("file").unwrap(), AttachmentKind::File);
        assert!(AttachmentKind::from_str("video").is_err());
        assert_eq!(AttachmentKind::Image.to_string(), "image");
    }

    #[test]
    fn test_describe() {
        let doc = Attachment {
            name: "report.final.pdf".to_string(),
            size_bytes: 2048,
            mime_type: Some("application/pdf".to_string()),
            kind: AttachmentKind::File,
        };
        assert_eq!(doc.describe(), "2 KB • PDF File • application/pdf");

        let photo = Attachment {
            name: "IMG_0001.jpg".to_string(),
            size_bytes: 1536,
            mime_type: Some("image/jpeg".to_string()),
            kind: AttachmentKind::Camera,
        };
        assert_eq!(photo.describe(), "1.5 KB • Camera Photo • image/jpeg");

        let unknown = Attachment {
            name: "README".to_string(),
            size_bytes: 10,
            mime_type: None,
            kind: AttachmentKind::File,
        };
        assert_eq!(unknown.describe(), "10 Bytes • README File • Unknown Type");
    }
}
