//! File upload encoding
//!
//! Uploaded files travel to the endpoint as a `data:` URL string in the
//! `message` field, next to the original file name. Reading and encoding run
//! off the UI thread.

use crate::error::ChatError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};

/// A file read from disk and encoded for the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// File name without its directory
    pub filename: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// Read `path` and encode it as a data URL.
/// Encoding runs on the blocking pool so large files do not stall the runtime.
pub async fn read_encoded(path: PathBuf) -> Result<EncodedFile, ChatError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ChatError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "Encoding upload");
    let encoded = tokio::task::spawn_blocking(move || encode_bytes(&path, &bytes)).await?;
    Ok(encoded)
}

/// Encode already-read file contents
pub fn encode_bytes(path: &Path, bytes: &[u8]) -> EncodedFile {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    EncodedFile {
        data_url: to_data_url(mime_type(path), bytes),
        filename,
    }
}

/// Build a base64 data URL
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Best-effort MIME type from the file extension
fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("text/plain", b"hi"), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_encode_bytes_uses_file_name_and_extension() {
        let encoded = encode_bytes(Path::new("/tmp/docs/Report.PDF"), b"%PDF");
        assert_eq!(encoded.filename, "Report.PDF");
        assert_eq!(encoded.data_url, "data:application/pdf;base64,JVBERg==");
    }

    #[tokio::test]
    async fn test_read_encoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();

        let encoded = read_encoded(path).await.unwrap();
        assert_eq!(encoded.filename, "notes.txt");
        assert_eq!(encoded.data_url, "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(mime_type(Path::new("blob.xyz")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_encoded(dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(err, ChatError::FileRead { .. }));
    }
}
