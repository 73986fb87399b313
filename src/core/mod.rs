//! EXIF Core module
//!
//! This module contains the tag registry, value validation and formatting,
//! and the per-file tag store built on top of them.

pub mod codec;
pub mod entry;
pub mod error;
pub mod formatting;
pub mod metadata;
pub mod registry;
pub mod store;
pub mod validation;

pub use codec::{ExifCodec, RawIfdMap};
pub use entry::{TagEntry, TagSummary};
pub use error::{ExifError, ExifResult};
pub use formatting::{
    format_bytes, format_coordinates, format_decimal, format_f_number, format_fraction,
    format_lens_info, format_map, format_percent, format_shutter_speed, BinaryFormat,
    DisplayKind, DisplayRule, FormatRuleConfig, FormattingConfig, ValueFormatter,
};
pub use metadata::{ExifMetadata, TagFilter};
pub use registry::{RegistryConfig, RegistryEntry, RegistryEntryConfig, TagKey, TagRegistry};
pub use store::TagStore;
pub use validation::validate;
