//! Document intake
//!
//! Turns an uploaded byte buffer into plain text. The file kind comes only
//! from the filename suffix; the bytes are never sniffed.

pub mod pdf;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use crate::types::{AppError, AppResult};
use crate::utils::validate_file_size;

/// File kinds the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Txt,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(FileKind::Pdf),
            "txt" => Some(FileKind::Txt),
            _ => None,
        }
    }

    /// Kind of `filename`, or `None` when the suffix is missing or unknown
    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Txt => "txt",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased text after the last `.`, or `None` if there is no `.`
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Raw upload as handed over by the presentation layer
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Text pulled out of one upload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    filename: String,
    kind: FileKind,
    source_len: usize,
    text: String,
}

impl ExtractedDocument {
    pub fn new(filename: impl Into<String>, kind: FileKind, source_len: usize, text: String) -> Self {
        Self {
            filename: filename.into(),
            kind,
            source_len,
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Size of the uploaded bytes this text came from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Upload boundary checks: size first, then the suffix against `supported`.
///
/// Runs before any extraction so oversize or unsupported files never reach a parser.
pub fn validate_upload(file: &UploadedFile, max_size_mb: u64, supported: &[String]) -> AppResult<FileKind> {
    if !validate_file_size(file.size(), max_size_mb) {
        return Err(AppError::FileTooLarge {
            size_bytes: file.size(),
            max_mb: max_size_mb,
        });
    }

    let ext = file_extension(&file.filename)
        .ok_or_else(|| AppError::UnsupportedFileKind(file.filename.clone()))?;

    if !supported.iter().any(|s| s == &ext) {
        return Err(AppError::UnsupportedFileKind(ext));
    }

    FileKind::from_extension(&ext).ok_or(AppError::UnsupportedFileKind(ext))
}

/// Extract plain text from `file`, choosing the parser by filename suffix
pub fn extract(file: &UploadedFile) -> AppResult<ExtractedDocument> {
    let kind = FileKind::from_filename(&file.filename).ok_or_else(|| {
        AppError::UnsupportedFileKind(
            file_extension(&file.filename).unwrap_or_else(|| file.filename.clone()),
        )
    })?;

    debug!(filename = %file.filename, kind = %kind, bytes = file.size(), "Extracting text");

    let text = match kind {
        FileKind::Txt => extract_txt(&file.bytes)?,
        FileKind::Pdf => pdf::extract_text(&file.bytes)?,
    };

    info!(
        filename = %file.filename,
        kind = %kind,
        chars = text.chars().count(),
        "Document text extracted"
    );

    Ok(ExtractedDocument::new(file.filename.clone(), kind, file.size(), text))
}

fn extract_txt(bytes: &[u8]) -> AppResult<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}
