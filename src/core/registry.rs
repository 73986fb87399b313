//! EXIF tag registry
//!
//! The registry is the closed catalogue of known tags: id, canonical name,
//! wire type, and the category (directory group) each tag belongs to.
//! It is loaded once and read-only afterwards; share it with `Arc`.

use crate::core::error::{ExifError, ExifResult};
use crate::types::ifd::{ExifType, IfdCategory, IfdName};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

const BUILTIN_REGISTRY: &str = include_str!("../../conf/registry.json");

/// One tag description as written in the registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntryConfig {
    /// Canonical tag name
    pub name: String,
    /// Declared wire type
    #[serde(rename = "type")]
    pub exif_type: ExifType,
}

impl RegistryEntryConfig {
    /// Create a new entry description
    pub fn new(name: impl Into<String>, exif_type: ExifType) -> Self {
        Self {
            name: name.into(),
            exif_type,
        }
    }
}

/// Registry configuration: tag descriptions grouped by category
///
/// The JSON form is `{"Image": {"271": {"name": "Make", "type": "ASCII"}}, ...}`.
pub type RegistryConfig = BTreeMap<IfdCategory, BTreeMap<u16, RegistryEntryConfig>>;

/// A registered tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Tag id
    pub tag_id: u16,
    /// Canonical tag name
    pub name: String,
    /// Declared wire type
    pub exif_type: ExifType,
    /// Category the tag is listed under
    pub category: IfdCategory,
}

/// Key used to look up a tag: either its numeric id or its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey<'a> {
    /// Numeric tag id
    Id(u16),
    /// Canonical tag name
    Name(&'a str),
}

impl From<u16> for TagKey<'_> {
    fn from(id: u16) -> Self {
        TagKey::Id(id)
    }
}

impl<'a> From<&'a str> for TagKey<'a> {
    fn from(name: &'a str) -> Self {
        TagKey::Name(name)
    }
}

impl<'a> From<&'a String> for TagKey<'a> {
    fn from(name: &'a String) -> Self {
        TagKey::Name(name.as_str())
    }
}

impl fmt::Display for TagKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Id(id) => write!(f, "{}", id),
            TagKey::Name(name) => f.write_str(name),
        }
    }
}

/// Catalogue of all known EXIF tags
#[derive(Debug, Clone)]
pub struct TagRegistry {
    categories: BTreeMap<IfdCategory, BTreeMap<u16, RegistryEntry>>,
    name_to_id: HashMap<String, u16>,
    name_to_type: HashMap<String, ExifType>,
    names: Vec<String>,
}

impl TagRegistry {
    /// Build a registry from a configuration
    ///
    /// # Returns
    ///
    /// Returns an error if a name is bound to two different ids or two
    /// different wire types. The same id may appear under several categories.
    pub fn from_config(config: RegistryConfig) -> ExifResult<Self> {
        let mut categories = BTreeMap::new();
        let mut name_to_id: HashMap<String, u16> = HashMap::new();
        let mut name_to_type: HashMap<String, ExifType> = HashMap::new();
        let mut names = Vec::new();

        for (category, tags) in config {
            let mut entries = BTreeMap::new();
            for (tag_id, tag) in tags {
                if tag.name.is_empty() {
                    return Err(ExifError::Config(format!(
                        "Tag {} in {:?} has an empty name",
                        tag_id, category
                    )));
                }
                match name_to_id.get(&tag.name) {
                    Some(&existing) if existing != tag_id => {
                        return Err(ExifError::Config(format!(
                            "Tag name '{}' is bound to both {} and {}",
                            tag.name, existing, tag_id
                        )));
                    }
                    Some(_) => {}
                    None => {
                        name_to_id.insert(tag.name.clone(), tag_id);
                        names.push(tag.name.clone());
                    }
                }
                match name_to_type.get(&tag.name) {
                    Some(&existing) if existing != tag.exif_type => {
                        return Err(ExifError::Config(format!(
                            "Tag name '{}' is declared as both {} and {}",
                            tag.name, existing, tag.exif_type
                        )));
                    }
                    Some(_) => {}
                    None => {
                        name_to_type.insert(tag.name.clone(), tag.exif_type);
                    }
                }
                entries.insert(
                    tag_id,
                    RegistryEntry {
                        tag_id,
                        name: tag.name,
                        exif_type: tag.exif_type,
                        category,
                    },
                );
            }
            categories.insert(category, entries);
        }

        log::debug!("Loaded EXIF registry with {} tag names", names.len());

        Ok(Self {
            categories,
            name_to_id,
            name_to_type,
            names,
        })
    }

    /// Parse a registry from its JSON configuration
    pub fn from_json_str(s: &str) -> ExifResult<Self> {
        let config: RegistryConfig = serde_json::from_str(s)?;
        Self::from_config(config)
    }

    /// Load a registry from a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> ExifResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load the registry shipped with the crate
    pub fn builtin() -> ExifResult<Self> {
        Self::from_json_str(BUILTIN_REGISTRY)
    }

    /// All tag names, in category order then id order
    pub fn tag_names(&self) -> Vec<&str> {
        self.names.iter().map(|s| s.as_str()).collect()
    }

    /// Every registered entry, in category order then id order
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.categories.values().flat_map(|tags| tags.values())
    }

    /// Number of distinct tag names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if a tag id is registered under any category
    pub fn contains_id(&self, tag_id: u16) -> bool {
        self.categories.values().any(|tags| tags.contains_key(&tag_id))
    }

    /// Check if a tag name is registered
    pub fn contains_name(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    fn validate_key(&self, key: TagKey<'_>) -> ExifResult<()> {
        match key {
            TagKey::Id(id) if !self.contains_id(id) => Err(ExifError::InvalidTagId(id)),
            TagKey::Name(name) if !self.contains_name(name) => {
                Err(ExifError::InvalidTagName(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// First entry for an id in category order
    fn first_entry(&self, tag_id: u16) -> ExifResult<&RegistryEntry> {
        IfdCategory::ORDER
            .iter()
            .filter_map(|category| self.categories.get(category))
            .find_map(|tags| tags.get(&tag_id))
            .ok_or(ExifError::InvalidTagId(tag_id))
    }

    /// Resolve a tag name or id to its id
    pub fn resolve_id<'a>(&self, key: impl Into<TagKey<'a>>) -> ExifResult<u16> {
        match key.into() {
            TagKey::Id(id) => {
                self.validate_key(TagKey::Id(id))?;
                Ok(id)
            }
            TagKey::Name(name) => self
                .name_to_id
                .get(name)
                .copied()
                .ok_or_else(|| ExifError::InvalidTagName(name.to_string())),
        }
    }

    /// Resolve a tag name or id to its canonical name
    ///
    /// # Arguments
    ///
    /// * `key` - The tag id or name
    /// * `ifd` - Directory hint. Only consulted for ids listed under several
    ///   categories; IFD0 and IFD1 both read the `Image` category.
    pub fn resolve_name<'a>(
        &self,
        key: impl Into<TagKey<'a>>,
        ifd: Option<IfdName>,
    ) -> ExifResult<&str> {
        match key.into() {
            TagKey::Name(name) => self
                .name_to_id
                .get_key_value(name)
                .map(|(stored, _)| stored.as_str())
                .ok_or_else(|| ExifError::InvalidTagName(name.to_string())),
            TagKey::Id(id) => Ok(self.entry_in(id, ifd)?.name.as_str()),
        }
    }

    /// Get the registry entry for an id, preferring the category of `ifd`
    ///
    /// Falls back to category order when the id is not listed under the
    /// hinted category.
    pub fn entry_in(&self, tag_id: u16, ifd: Option<IfdName>) -> ExifResult<&RegistryEntry> {
        if let Some(entry) = ifd
            .and_then(|ifd| self.categories.get(&ifd.category()))
            .and_then(|tags| tags.get(&tag_id))
        {
            return Ok(entry);
        }
        self.first_entry(tag_id)
    }

    /// Get the declared wire type of a tag
    pub fn type_of<'a>(&self, key: impl Into<TagKey<'a>>) -> ExifResult<ExifType> {
        match key.into() {
            TagKey::Name(name) => self
                .name_to_type
                .get(name)
                .copied()
                .ok_or_else(|| ExifError::InvalidTagName(name.to_string())),
            TagKey::Id(id) => Ok(self.first_entry(id)?.exif_type),
        }
    }

    /// Every directory a tag naturally lives in, in resolution order
    pub fn ifds_of<'a>(&self, key: impl Into<TagKey<'a>>) -> ExifResult<Vec<IfdName>> {
        let key = key.into();
        self.validate_key(key)?;

        Ok(IfdCategory::ORDER
            .iter()
            .filter(|category| {
                self.categories.get(*category).is_some_and(|tags| match key {
                    TagKey::Id(id) => tags.contains_key(&id),
                    TagKey::Name(name) => tags.values().any(|tag| tag.name == name),
                })
            })
            .map(|category| category.default_ifd())
            .collect())
    }

    /// Get the directory a tag is written to
    ///
    /// With `thumbnail` set the answer is always IFD1. Otherwise categories
    /// are searched in the order Image (IFD0), Exif, GPS, Interop and the
    /// first match wins; a warning is logged when more than one matches.
    pub fn ifd_of<'a>(&self, key: impl Into<TagKey<'a>>, thumbnail: bool) -> ExifResult<IfdName> {
        let key = key.into();
        self.validate_key(key)?;

        if thumbnail {
            return Ok(IfdName::Ifd1);
        }

        let found = self.ifds_of(key)?;
        if found.len() > 1 {
            log::warn!("Tag {} found in multiple IFDs: {:?}", key, found);
        }
        found
            .first()
            .copied()
            .ok_or_else(|| ExifError::Config(format!("Could not find IFD for tag '{}'", key)))
    }
}
