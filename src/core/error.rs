//! Error types for EXIF operations
//!
//! This module defines all error types used throughout the crate.

use crate::types::ifd::{ExifType, IfdName};
use thiserror::Error;

fn join_ifds(ifds: &[IfdName]) -> String {
    ifds.iter()
        .map(|ifd| ifd.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_ifd(ifd: &Option<IfdName>) -> String {
    match ifd {
        Some(ifd) => format!(" in {}", ifd),
        None => String::new(),
    }
}

/// Error types for EXIF operations
#[derive(Debug, Error)]
pub enum ExifError {
    /// Tag id is not part of the registry
    #[error("Tag ID '{0}' is invalid and not part of the EXIF specification")]
    InvalidTagId(u16),

    /// Tag name is not part of the registry
    #[error("Invalid tag name '{0}'")]
    InvalidTagName(String),

    /// Value does not match the wire type declared for its tag
    #[error("Invalid value for tag '{name}' ({tag_id}) of type {exif_type}: {detail}")]
    TagType {
        /// Tag id
        tag_id: u16,
        /// Registered tag name
        name: String,
        /// Declared wire type
        exif_type: ExifType,
        /// What is wrong with the value
        detail: String,
    },

    /// Tag is known but absent from the store
    #[error("Tag {tag_id} not found{}", describe_ifd(ifd))]
    TagNotFound {
        /// Tag id
        tag_id: u16,
        /// Directory searched, if the lookup was exact
        ifd: Option<IfdName>,
    },

    /// Bare-id lookup matched entries in more than one directory
    #[error("Tag {tag_id} is ambiguous, present in: {}", join_ifds(ifds))]
    AmbiguousTag {
        /// Tag id
        tag_id: u16,
        /// Every directory holding the tag
        ifds: Vec<IfdName>,
    },

    /// Store key does not match the entry being inserted
    #[error("Key ({}, {}) does not match entry ({}, {})", expected.0, expected.1, found.0, found.1)]
    KeyMismatch {
        /// Key the caller supplied
        expected: (u16, IfdName),
        /// Key carried by the entry
        found: (u16, IfdName),
    },

    /// A display rule cannot render the value it was given
    #[error("Cannot format tag '{name}': {detail}")]
    Format {
        /// Tag name
        name: String,
        /// Reason
        detail: String,
    },

    /// Binary rendering mode is not one of bytes, hex or base64
    #[error("Unsupported binary format '{0}', expected one of 'bytes', 'hex', 'base64'")]
    UnsupportedBinaryFormat(String),

    /// Configuration is structurally valid JSON but semantically wrong
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a codec collaborator
    #[error("Codec error: {0}")]
    Codec(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExifError {
    /// Wrap an arbitrary codec failure
    pub fn codec<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ExifError::Codec(err.into())
    }
}

/// Result type alias for EXIF operations
pub type ExifResult<T> = Result<T, ExifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExifError::InvalidTagId(9999);
        assert!(err.to_string().contains("is invalid"));

        let err = ExifError::InvalidTagName("Nope".to_string());
        assert_eq!(err.to_string(), "Invalid tag name 'Nope'");
    }

    #[test]
    fn test_tag_type_display() {
        let err = ExifError::TagType {
            tag_id: 33434,
            name: "ExposureTime".to_string(),
            exif_type: ExifType::Rational,
            detail: "denominator cannot be zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for tag 'ExposureTime' (33434) of type RATIONAL: denominator cannot be zero"
        );
    }

    #[test]
    fn test_lookup_errors_display() {
        let err = ExifError::TagNotFound {
            tag_id: 271,
            ifd: Some(IfdName::Ifd0),
        };
        assert_eq!(err.to_string(), "Tag 271 not found in IFD0");

        let err = ExifError::TagNotFound {
            tag_id: 271,
            ifd: None,
        };
        assert_eq!(err.to_string(), "Tag 271 not found");

        let err = ExifError::AmbiguousTag {
            tag_id: 271,
            ifds: vec![IfdName::Ifd0, IfdName::Exif],
        };
        assert_eq!(err.to_string(), "Tag 271 is ambiguous, present in: IFD0, Exif");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let exif_err: ExifError = io_err.into();
        assert!(matches!(exif_err, ExifError::Io(_)));
    }

    #[test]
    fn test_codec_error_wrapping() {
        let err = ExifError::codec("segment truncated");
        assert_eq!(err.to_string(), "Codec error: segment truncated");
    }
}
