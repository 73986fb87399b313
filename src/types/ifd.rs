//! Directory and wire type enumerations
//!
//! EXIF groups tags into Image File Directories (IFDs). The registry
//! configuration uses a coarser set of categories where `Image` covers
//! both the main image (IFD0) and the thumbnail (IFD1).

use crate::core::error::ExifError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of an Image File Directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IfdName {
    /// Main image directory
    #[serde(rename = "IFD0")]
    Ifd0,
    /// Thumbnail image directory
    #[serde(rename = "IFD1")]
    Ifd1,
    /// Camera specific Exif sub-directory
    Exif,
    /// GPS sub-directory
    #[serde(rename = "GPS")]
    Gps,
    /// Interoperability sub-directory
    Interop,
}

impl IfdName {
    /// All directories, in storage order
    pub const ALL: [IfdName; 5] = [
        IfdName::Ifd0,
        IfdName::Ifd1,
        IfdName::Exif,
        IfdName::Gps,
        IfdName::Interop,
    ];

    /// Get the canonical directory name
    pub fn as_str(&self) -> &'static str {
        match self {
            IfdName::Ifd0 => "IFD0",
            IfdName::Ifd1 => "IFD1",
            IfdName::Exif => "Exif",
            IfdName::Gps => "GPS",
            IfdName::Interop => "Interop",
        }
    }

    /// Get the registry category this directory draws its tags from
    pub fn category(&self) -> IfdCategory {
        match self {
            IfdName::Ifd0 | IfdName::Ifd1 => IfdCategory::Image,
            IfdName::Exif => IfdCategory::Exif,
            IfdName::Gps => IfdCategory::Gps,
            IfdName::Interop => IfdCategory::Interop,
        }
    }
}

impl fmt::Display for IfdName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfdName {
    type Err = ExifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IfdName::ALL
            .into_iter()
            .find(|ifd| ifd.as_str() == s)
            .ok_or_else(|| ExifError::Config(format!("Unknown IFD name '{}'", s)))
    }
}

/// Top-level tag category of the registry configuration
///
/// The derived ordering is the resolution order used when a tag id is
/// listed under more than one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IfdCategory {
    /// Main and thumbnail image tags (IFD0 / IFD1)
    Image,
    /// Exif sub-directory tags
    Exif,
    /// GPS tags
    #[serde(rename = "GPS")]
    Gps,
    /// Interoperability tags
    Interop,
}

impl IfdCategory {
    /// Categories in resolution order
    pub const ORDER: [IfdCategory; 4] = [
        IfdCategory::Image,
        IfdCategory::Exif,
        IfdCategory::Gps,
        IfdCategory::Interop,
    ];

    /// Directory a tag of this category lands in when no thumbnail is requested
    pub fn default_ifd(&self) -> IfdName {
        match self {
            IfdCategory::Image => IfdName::Ifd0,
            IfdCategory::Exif => IfdName::Exif,
            IfdCategory::Gps => IfdName::Gps,
            IfdCategory::Interop => IfdName::Interop,
        }
    }
}

/// EXIF wire type of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExifType {
    /// NUL terminated text
    Ascii,
    /// 8-bit unsigned integers
    Byte,
    /// 16-bit unsigned integers
    Short,
    /// 32-bit unsigned integers
    Long,
    /// Pairs of 32-bit unsigned integers
    Rational,
    /// Pairs of 32-bit signed integers
    #[serde(rename = "SRATIONAL")]
    SRational,
    /// Floating point values
    Float,
    /// Uninterpreted bytes
    Undefined,
}

impl ExifType {
    /// Get the wire type name as written in the registry configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ExifType::Ascii => "ASCII",
            ExifType::Byte => "BYTE",
            ExifType::Short => "SHORT",
            ExifType::Long => "LONG",
            ExifType::Rational => "RATIONAL",
            ExifType::SRational => "SRATIONAL",
            ExifType::Float => "FLOAT",
            ExifType::Undefined => "UNDEFINED",
        }
    }

    /// Inclusive upper bound for the unsigned integer types
    pub fn integer_bound(&self) -> Option<u64> {
        match self {
            ExifType::Byte => Some(u8::MAX as u64),
            ExifType::Short => Some(u16::MAX as u64),
            ExifType::Long => Some(u32::MAX as u64),
            _ => None,
        }
    }
}

impl fmt::Display for ExifType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
