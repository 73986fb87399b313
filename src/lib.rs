//! # ExifKit
//!
//! Typed EXIF tag handling: a registry of known tags, validation of values
//! against their declared wire types, human-readable formatting, and a
//! per-file tag store.
//!
//! Binary JPEG/TIFF parsing is left to an [`ExifCodec`] implementation;
//! this crate works on the per-directory tag maps a codec produces.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use exifkit::{ExifMetadata, IfdName, TagRegistry, ValueFormatter};
//!
//! let registry = Arc::new(TagRegistry::builtin()?);
//! let formatter = Arc::new(ValueFormatter::builtin()?);
//! let mut meta = ExifMetadata::new(registry, formatter);
//!
//! meta.write_tag("Make", "Canon", None)?;
//! meta.write_tag("ExposureTime", (1_i64, 100_i64), None)?;
//!
//! assert_eq!(meta.read_tag("Make", None)?.as_str(), Some("Canon"));
//! assert_eq!(meta.read_tag_formatted("ExposureTime", None, None)?, "1/100s");
//! assert!(meta.store().contains(33434, IfdName::Exif));
//! # Ok::<(), exifkit::ExifError>(())
//! ```

pub mod core;
pub mod types;

pub use crate::core::{
    validate, BinaryFormat, DisplayKind, DisplayRule, ExifCodec, ExifError, ExifMetadata,
    ExifResult, RawIfdMap, TagEntry, TagFilter, TagKey, TagRegistry, TagStore, TagSummary,
    ValueFormatter,
};
pub use crate::types::{ExifType, IfdCategory, IfdName, RawValue, Rational, SRational, TagValue};
