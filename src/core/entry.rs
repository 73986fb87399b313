//! Validated tag entries

use crate::core::error::ExifResult;
use crate::core::formatting::{BinaryFormat, ValueFormatter};
use crate::core::registry::TagRegistry;
use crate::core::validation::validate;
use crate::types::ifd::{ExifType, IfdName};
use crate::types::value::{RawValue, TagValue};
use serde::Serialize;

/// One tag present in a file: id, directory and a value checked against the
/// registry
///
/// The only way to build an entry is through validation, so an entry always
/// holds a value of the wire type its tag declares.
#[derive(Debug, Clone, PartialEq)]
pub struct TagEntry {
    id: u16,
    ifd: IfdName,
    value: TagValue,
}

impl TagEntry {
    /// Validate `value` for tag `id` and build the entry
    ///
    /// The declared type is looked up in the category of `ifd` first, so ids
    /// shared between GPS and Interop get the right type.
    pub fn new(
        registry: &TagRegistry,
        id: u16,
        value: impl Into<RawValue>,
        ifd: IfdName,
    ) -> ExifResult<Self> {
        let registered = registry.entry_in(id, Some(ifd))?;
        let value = validate(id, &registered.name, registered.exif_type, &value.into())?;
        Ok(Self { id, ifd, value })
    }

    /// Tag id
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Directory the entry belongs to
    pub fn ifd(&self) -> IfdName {
        self.ifd
    }

    /// Store key of the entry
    pub fn key(&self) -> (u16, IfdName) {
        (self.id, self.ifd)
    }

    /// Validated value
    pub fn value(&self) -> &TagValue {
        &self.value
    }

    /// Consume the entry and return its value
    pub fn into_value(self) -> TagValue {
        self.value
    }

    /// Registered name of the tag
    pub fn name<'r>(&self, registry: &'r TagRegistry) -> ExifResult<&'r str> {
        registry.resolve_name(self.id, Some(self.ifd))
    }

    /// Declared wire type of the tag
    pub fn exif_type(&self, registry: &TagRegistry) -> ExifResult<ExifType> {
        Ok(registry.entry_in(self.id, Some(self.ifd))?.exif_type)
    }

    /// Human-readable value
    pub fn format(
        &self,
        formatter: &ValueFormatter,
        registry: &TagRegistry,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<String> {
        formatter.format_entry(registry, self, binary_format)
    }

    /// Serializable view of the entry, with the value rendered for display
    pub fn summary(
        &self,
        formatter: &ValueFormatter,
        registry: &TagRegistry,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<TagSummary> {
        Ok(TagSummary {
            id: self.id,
            name: self.name(registry)?.to_string(),
            value: self.format(formatter, registry, binary_format)?,
            ifd: self.ifd,
        })
    }
}

/// Plain view of a tag entry for listings and serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    /// Tag id
    pub id: u16,
    /// Registered tag name
    pub name: String,
    /// Formatted value
    pub value: String,
    /// Directory
    pub ifd: IfdName,
}
