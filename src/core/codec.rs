//! Codec seam
//!
//! Reading and writing the binary metadata segment of an image belongs to a
//! codec. This crate only consumes the per-directory maps a codec produces
//! and hands the same shape back for encoding.

use crate::core::error::ExifResult;
use crate::types::ifd::IfdName;
use crate::types::value::RawValue;
use std::collections::BTreeMap;

/// Raw tag values grouped by directory, as exchanged with a codec
pub type RawIfdMap = BTreeMap<IfdName, BTreeMap<u16, RawValue>>;

/// Binary EXIF encoder and decoder
///
/// Implementations decode ASCII payloads to text before handing them over
/// and leave every other payload unchanged. Failures are reported as
/// [`ExifError::Codec`](crate::ExifError::Codec) and are not interpreted
/// further.
pub trait ExifCodec {
    /// Decode a metadata segment into per-directory raw values
    fn decode(&self, bytes: &[u8]) -> ExifResult<RawIfdMap>;

    /// Encode per-directory raw values into a metadata segment
    fn encode(&self, ifds: &RawIfdMap) -> ExifResult<Vec<u8>>;
}
