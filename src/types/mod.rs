//! EXIF value types
//!
//! This module defines directory names, wire types, and the value shapes
//! stored in EXIF tags.

pub mod ifd;
pub mod value;

pub use ifd::{ExifType, IfdCategory, IfdName};
pub use value::{RawValue, Rational, SRational, TagValue};
