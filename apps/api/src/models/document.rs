//! Input adapter boundary. Binary formats (PDF, DOCX) are extracted upstream;
//! this type only accepts text that is already plain.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const ACCEPTED_MEDIA_TYPES: &[&str] = &["text/plain", "text/markdown", "text/x-markdown"];

/// Which side of the comparison a document is; used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::JobDescription => "job description",
        }
    }
}

/// An immutable résumé or job-description text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub text: String,
}

impl Document {
    /// Wraps text, rejecting input with no visible characters.
    pub fn from_text(kind: DocumentKind, text: impl Into<String>) -> Result<Self, AppError> {
        let text = text.into();
        require_text(kind, &text)?;
        Ok(Document { kind, text })
    }

    /// Decodes a request body. `media_type` is the raw Content-Type header, if any.
    pub fn from_bytes(
        kind: DocumentKind,
        bytes: &[u8],
        media_type: Option<&str>,
    ) -> Result<Self, AppError> {
        if let Some(media_type) = media_type {
            let essence = media_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !ACCEPTED_MEDIA_TYPES.contains(&essence.as_str()) {
                return Err(AppError::UnsupportedFormat(format!(
                    "{} must be plain text, got '{essence}'",
                    kind.label()
                )));
            }
        }

        let text = std::str::from_utf8(bytes).map_err(|e| {
            AppError::InvalidInput(format!("{} is not valid UTF-8 text: {e}", kind.label()))
        })?;
        Self::from_text(kind, text)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Errors when `text` is empty or whitespace only.
pub fn require_text(kind: DocumentKind, text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} text cannot be empty",
            kind.label()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_accepted() {
        let doc =
            Document::from_bytes(DocumentKind::Resume, b"Jane Roe\nSkills", Some("text/plain; charset=utf-8"))
                .unwrap();
        assert_eq!(doc.text, "Jane Roe\nSkills");
        assert_eq!(doc.word_count(), 3);
    }

    #[test]
    fn test_missing_media_type_accepted() {
        assert!(Document::from_bytes(DocumentKind::JobDescription, b"Rust role", None).is_ok());
    }

    #[test]
    fn test_pdf_rejected_as_unsupported() {
        let err = Document::from_bytes(DocumentKind::Resume, b"%PDF-1.7", Some("application/pdf"))
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_utf8_is_input_error() {
        let err = Document::from_bytes(DocumentKind::Resume, &[0xff, 0xfe, 0x00], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_blank_text_is_input_error() {
        let err = Document::from_text(DocumentKind::JobDescription, "  \n ").unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.contains("job description")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
