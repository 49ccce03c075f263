//! Attachment validation and acknowledgement.

use zwen_core::attachment::{Attachment, AttachmentKind};
use zwen_core::error::{Result, ZwenError};

/// Rejects attachments larger than `max_bytes`.
pub fn validate_attachment(attachment: &Attachment, max_bytes: u64) -> Result<()> {
    if attachment.size_bytes > max_bytes {
        return Err(ZwenError::AttachmentTooLarge {
            size: attachment.size_bytes,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// The assistant's reply once an upload has been processed.
pub fn acknowledgement(kind: AttachmentKind) -> String {
    format!(
        "I've successfully processed your {}! You can now ask me questions about it or request analysis! 📁✨",
        kind.noun()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(size_bytes: u64) -> Attachment {
        Attachment {
            name: "scan.pdf".to_string(),
            size_bytes,
            mime_type: Some("application/pdf".to_string()),
            kind: AttachmentKind::File,
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validate_attachment(&attachment(100), 100).is_ok());
        assert_eq!(
            validate_attachment(&attachment(101), 100).unwrap_err(),
            ZwenError::AttachmentTooLarge {
                size: 101,
                limit: 100
            }
        );
    }

    #[test]
    fn test_acknowledgement_names_the_kind() {
        assert!(acknowledgement(AttachmentKind::Camera).contains("your photo!"));
        assert!(acknowledgement(AttachmentKind::Image).contains("your image!"));
        assert!(acknowledgement(AttachmentKind::File).contains("your file!"));
    }
}
