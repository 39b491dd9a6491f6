//! Uploaded evidence and its base64 transport encoding.
//!
//! The encoder does not validate MIME type or size. Callers hand over
//! uploads that were already accepted.

use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::enums::MediaKind;
use crate::errors::CoreError;

/// MIME type used when the upload's extension is not recognised.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// An uploaded photo or video held in memory for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub kind: MediaKind,
    pub mime: String,
    pub file_name: Option<String>,
    bytes: Arc<[u8]>,
}

impl Evidence {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        Self {
            kind: MediaKind::from_mime(&mime),
            mime,
            file_name: None,
            bytes: bytes.into(),
        }
    }

    /// Build evidence from an uploaded file, inferring the MIME type from
    /// its extension.
    pub fn from_upload(path: &Path, bytes: impl Into<Arc<[u8]>>) -> Self {
        let mut evidence = Self::new(bytes, mime_for_path(path));
        evidence.file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
        evidence
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.kind == MediaKind::Image
    }

    /// `data:` URI carrying the encoded bytes.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Inline image URI, or `None` for video evidence.
    #[must_use]
    pub fn inline_image(&self) -> Option<String> {
        self.is_image().then(|| self.data_uri())
    }
}

/// Encode raw bytes as standard base64. `None` in means "no image" out.
#[must_use]
pub fn encode(bytes: Option<&[u8]>) -> Option<String> {
    bytes.map(|b| STANDARD.encode(b))
}

/// Decode text produced by [`encode`] back into the original bytes.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if the text is not valid standard base64.
pub fn decode(text: &str) -> Result<Vec<u8>, CoreError> {
    Ok(STANDARD.decode(text)?)
}

/// MIME type for an upload path, by extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => DEFAULT_MIME,
    }
}
