//! Declared content-type classification.
//!
//! Only the client-supplied `Content-Type` of the multipart part is inspected; file
//! contents are never sniffed.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Common validation errors for uploaded parts
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing content type for {kind} upload")]
    MissingContentType { kind: AssetKind },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<&'static str>,
    },
}

/// Which kind of asset a multipart field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Thumbnail,
    Video,
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetKind::Thumbnail => write!(f, "thumbnail"),
            AssetKind::Video => write!(f, "video"),
        }
    }
}

/// An accepted content type and the file extension it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaClass {
    pub content_type: &'static str,
    pub extension: &'static str,
}

const THUMBNAIL_TYPES: &[MediaClass] = &[
    MediaClass {
        content_type: "image/jpeg",
        extension: "jpg",
    },
    MediaClass {
        content_type: "image/png",
        extension: "png",
    },
];

const VIDEO_TYPES: &[MediaClass] = &[MediaClass {
    content_type: "video/mp4",
    extension: "mp4",
}];

impl AssetKind {
    pub fn allowed(&self) -> &'static [MediaClass] {
        match self {
            AssetKind::Thumbnail => THUMBNAIL_TYPES,
            AssetKind::Video => VIDEO_TYPES,
        }
    }
}

/// Strip parameters (e.g. `; charset=binary`) and lowercase a MIME type.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Check a declared content type against the allow-list for `kind`.
pub fn classify(kind: AssetKind, declared: Option<&str>) -> Result<MediaClass, ValidationError> {
    let declared = declared
        .map(normalize_mime_type)
        .filter(|ct| !ct.is_empty())
        .ok_or(ValidationError::MissingContentType { kind })?;

    kind.allowed()
        .iter()
        .find(|class| class.content_type == declared)
        .copied()
        .ok_or_else(|| ValidationError::InvalidContentType {
            content_type: declared,
            allowed: kind.allowed().iter().map(|c| c.content_type).collect(),
        })
}
