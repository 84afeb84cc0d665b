//! Receiving uploaded schedule files
//!
//! The receiver only packages bytes for the pipeline. The configured
//! extension is what the upload form offers for selection; a file that
//! does not carry it is still passed on and left to the parser.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Nessun file caricato.")]
    NoFile,
}

/// An uploaded file held in memory for one pipeline run
#[derive(Clone, PartialEq, Eq)]
pub struct RawUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RawUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Identity of this upload: SHA-256 over the file name and contents
    pub fn id(&self) -> UploadId {
        let mut hasher = Sha256::new();
        hasher.update((self.filename.len() as u64).to_le_bytes());
        hasher.update(self.filename.as_bytes());
        hasher.update(&self.bytes);
        UploadId(format!("{:x}", hasher.finalize()))
    }

    /// Lowercased extension of the declared file name
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for RawUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Hex digest identifying an upload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(String);

impl UploadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which files the upload form offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Recognized file extension, without the leading dot
    pub extension: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
        }
    }
}

impl UploadPolicy {
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    /// Value for the `accept` attribute of the file input
    pub fn accept_attribute(&self) -> String {
        format!(".{}", self.extension)
    }

    /// Whether the declared name carries the recognized extension
    pub fn matches(&self, upload: &RawUpload) -> bool {
        upload.extension().as_deref() == Some(self.extension.as_str())
    }

    /// Hand an upload downstream, or report that none was chosen.
    ///
    /// An empty file counts as no file.
    pub fn accept(&self, upload: Option<RawUpload>) -> Result<RawUpload, UploadError> {
        let upload = match upload {
            Some(upload) if !upload.is_empty() => upload,
            _ => return Err(UploadError::NoFile),
        };

        if !self.matches(&upload) {
            warn!(
                "Upload {} does not have the .{} extension, passing it on anyway",
                upload.filename, self.extension
            );
        }
        debug!("Accepted upload {} ({} bytes)", upload.filename, upload.len());

        Ok(upload)
    }
}
