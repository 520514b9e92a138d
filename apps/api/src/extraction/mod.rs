//! Resume text extraction.
//!
//! The upload is written to a scoped temp file, decoded according to its
//! extension, and the temp file is removed when the guard drops, whichever
//! branch ran and whether or not decoding failed. Decoding runs on the
//! blocking pool; PDF parsing in particular is CPU-bound.
//!
//! Decode failures are returned to the caller, not swallowed.

use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

pub mod docx;
pub mod pdf;

/// Returned for legacy `.doc` uploads, which are not decoded.
pub const DOC_PLACEHOLDER: &str = "DOC file format detected. Processing as text.";
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Decoding strategy, chosen from the upload's filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Doc,
    Txt,
    Unsupported,
}

impl ResumeFormat {
    /// Case-insensitive suffix match on the declared filename.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            ResumeFormat::Pdf
        } else if lower.ends_with(".docx") {
            ResumeFormat::Docx
        } else if lower.ends_with(".doc") {
            ResumeFormat::Doc
        } else if lower.ends_with(".txt") {
            ResumeFormat::Txt
        } else {
            ResumeFormat::Unsupported
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => ".pdf",
            ResumeFormat::Docx => ".docx",
            ResumeFormat::Doc => ".doc",
            ResumeFormat::Txt => ".txt",
            ResumeFormat::Unsupported => ".upload",
        }
    }
}

/// Extracts plain text from an uploaded resume.
pub async fn extract_text(file_name: &str, bytes: Bytes) -> Result<String, ExtractionError> {
    let format = ResumeFormat::from_file_name(file_name);
    debug!(file_name, ?format, size = bytes.len(), "Extracting resume text");

    let scratch_dir = std::env::temp_dir();
    tokio::task::spawn_blocking(move || extract_in(format, &bytes, &scratch_dir))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}

/// Synchronous core of [`extract_text`]; the temp file lives in `scratch_dir`
/// only for the duration of this call.
pub fn extract_in(
    format: ResumeFormat,
    bytes: &[u8],
    scratch_dir: &Path,
) -> Result<String, ExtractionError> {
    let scratch = persist_upload(bytes, format, scratch_dir)?;

    match format {
        ResumeFormat::Pdf => pdf::extract_pages(scratch.path()),
        ResumeFormat::Docx => docx::extract_document_text(scratch.path()),
        ResumeFormat::Doc => {
            // TODO: decode legacy OLE2 .doc files instead of returning the placeholder.
            warn!("Legacy .doc upload; content was not extracted");
            Ok(DOC_PLACEHOLDER.to_string())
        }
        ResumeFormat::Txt => {
            let raw = std::fs::read(scratch.path())?;
            Ok(decode_utf8_dropping_invalid(&raw))
        }
        ResumeFormat::Unsupported => Ok(UNSUPPORTED_FORMAT.to_string()),
    }
}

fn persist_upload(
    bytes: &[u8],
    format: ResumeFormat,
    scratch_dir: &Path,
) -> Result<NamedTempFile, ExtractionError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(format.suffix())
        .tempfile_in(scratch_dir)?;
    scratch.write_all(bytes)?;
    scratch.flush()?;
    Ok(scratch)
}

/// UTF-8 decode that skips invalid byte sequences instead of substituting
/// U+FFFD or failing.
pub fn decode_utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(&String::from_utf8_lossy(valid));
                // error_len() is None for a sequence truncated at end of input.
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_format_from_file_name_is_case_insensitive() {
        assert_eq!(ResumeFormat::from_file_name("cv.pdf"), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_file_name("CV.PDF"), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_file_name("cv.Docx"), ResumeFormat::Docx);
        assert_eq!(ResumeFormat::from_file_name("cv.doc"), ResumeFormat::Doc);
        assert_eq!(ResumeFormat::from_file_name("notes.TXT"), ResumeFormat::Txt);
        assert_eq!(ResumeFormat::from_file_name("cv.xyz"), ResumeFormat::Unsupported);
        assert_eq!(ResumeFormat::from_file_name(""), ResumeFormat::Unsupported);
        assert_eq!(ResumeFormat::from_file_name("pdf"), ResumeFormat::Unsupported);
    }

    #[tokio::test]
    async fn test_txt_passes_through_unchanged() {
        let text = extract_text("resume.txt", Bytes::from_static(b"Hello"))
            .await
            .unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_unsupported_extension_returns_message() {
        let text = extract_text("resume.xyz", Bytes::from_static(b"whatever"))
            .await
            .unwrap();
        assert_eq!(text, "Unsupported file format");
    }

    #[tokio::test]
    async fn test_doc_returns_placeholder() {
        let text = extract_text("resume.doc", Bytes::from_static(b"\xD0\xCF\x11\xE0"))
            .await
            .unwrap();
        assert_eq!(text, DOC_PLACEHOLDER);
    }

    #[test]
    fn test_invalid_utf8_bytes_are_dropped() {
        assert_eq!(decode_utf8_dropping_invalid(b"Hel\xFFlo"), "Hello");
        assert_eq!(decode_utf8_dropping_invalid(b"caf\xC3\xA9"), "café");
        assert_eq!(decode_utf8_dropping_invalid(b"ok\xE2\x82"), "ok");
        assert_eq!(decode_utf8_dropping_invalid(b""), "");
    }

    #[test]
    fn test_scratch_file_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let text = extract_in(ResumeFormat::Txt, b"I know Go", dir.path()).unwrap();

        assert_eq!(text, "I know Go");
        assert!(scratch_files(dir.path()).is_empty());
    }

    #[test]
    fn test_scratch_file_removed_after_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_in(ResumeFormat::Docx, b"definitely not a zip", dir.path());

        assert!(matches!(result, Err(ExtractionError::Docx(_))));
        assert!(scratch_files(dir.path()).is_empty());
    }

    #[test]
    fn test_scratch_file_removed_for_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        extract_in(ResumeFormat::Unsupported, b"data", dir.path()).unwrap();
        assert!(scratch_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_an_error() {
        let result = extract_text("resume.pdf", Bytes::from_static(b"%PDF-garbage")).await;
        assert!(result.is_err());
    }
}
