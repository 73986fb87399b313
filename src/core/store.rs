//! Per-file tag storage
//!
//! A [`TagStore`] holds the validated entries of one file keyed by
//! `(tag_id, ifd)`. The same id may legitimately sit in several directories
//! (IFD0 and IFD1 both carry image tags), so lookups by bare id detect
//! ambiguity instead of picking a winner.

use crate::core::codec::RawIfdMap;
use crate::core::entry::TagEntry;
use crate::core::error::{ExifError, ExifResult};
use crate::core::registry::TagRegistry;
use crate::types::ifd::IfdName;
use crate::types::value::RawValue;
use std::collections::BTreeMap;

/// Validated tag entries of one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    entries: BTreeMap<(u16, IfdName), TagEntry>,
}

impl TagStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every raw value and build a store
    ///
    /// The load is all-or-nothing: the first unknown id or invalid value
    /// fails the whole call.
    pub fn from_raw(registry: &TagRegistry, raw: &RawIfdMap) -> ExifResult<Self> {
        let mut entries = BTreeMap::new();
        for (&ifd, tags) in raw {
            for (&tag_id, value) in tags {
                let entry = TagEntry::new(registry, tag_id, value.clone(), ifd)?;
                entries.insert((tag_id, ifd), entry);
            }
        }
        log::debug!("Loaded {} tags from {} directories", entries.len(), raw.len());
        Ok(Self { entries })
    }

    /// Flatten the store into per-directory raw values for encoding
    ///
    /// Directories without entries are left out.
    pub fn to_raw(&self) -> RawIfdMap {
        let mut raw = RawIfdMap::new();
        for (&(tag_id, ifd), entry) in &self.entries {
            raw.entry(ifd)
                .or_default()
                .insert(tag_id, RawValue::from(entry.value()));
        }
        raw
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the entry at `(tag_id, ifd)`
    ///
    /// # Returns
    ///
    /// The replaced entry, if any. Fails with [`ExifError::KeyMismatch`] when
    /// the entry was built for a different id or directory.
    pub fn set(&mut self, tag_id: u16, ifd: IfdName, entry: TagEntry) -> ExifResult<Option<TagEntry>> {
        if entry.key() != (tag_id, ifd) {
            return Err(ExifError::KeyMismatch {
                expected: (tag_id, ifd),
                found: entry.key(),
            });
        }
        Ok(self.entries.insert((tag_id, ifd), entry))
    }

    /// Insert or replace an entry under its own key
    pub fn insert(&mut self, entry: TagEntry) -> Option<TagEntry> {
        self.entries.insert(entry.key(), entry)
    }

    /// Check if an entry exists at `(tag_id, ifd)`
    pub fn contains(&self, tag_id: u16, ifd: IfdName) -> bool {
        self.entries.contains_key(&(tag_id, ifd))
    }

    /// Exact lookup
    pub fn get_exact(&self, tag_id: u16, ifd: IfdName) -> ExifResult<&TagEntry> {
        self.entries
            .get(&(tag_id, ifd))
            .ok_or(ExifError::TagNotFound {
                tag_id,
                ifd: Some(ifd),
            })
    }

    /// Directories holding an entry for `tag_id`
    pub fn ifds_of(&self, tag_id: u16) -> Vec<IfdName> {
        self.entries
            .keys()
            .filter(|(id, _)| *id == tag_id)
            .map(|&(_, ifd)| ifd)
            .collect()
    }

    /// Lookup by bare id
    ///
    /// Succeeds only when exactly one directory holds the tag. Several
    /// matches fail with [`ExifError::AmbiguousTag`] naming each directory.
    pub fn get_by_id(&self, tag_id: u16) -> ExifResult<&TagEntry> {
        let mut matches = self
            .entries
            .range((tag_id, IfdName::Ifd0)..=(tag_id, IfdName::Interop));
        match (matches.next(), matches.next()) {
            (None, _) => Err(ExifError::TagNotFound { tag_id, ifd: None }),
            (Some((_, entry)), None) => Ok(entry),
            (Some(_), Some(_)) => Err(ExifError::AmbiguousTag {
                tag_id,
                ifds: self.ifds_of(tag_id),
            }),
        }
    }

    /// Remove the entry at `(tag_id, ifd)`
    ///
    /// Absence is reported as [`ExifError::TagNotFound`].
    pub fn delete(&mut self, tag_id: u16, ifd: IfdName) -> ExifResult<TagEntry> {
        self.entries
            .remove(&(tag_id, ifd))
            .ok_or(ExifError::TagNotFound {
                tag_id,
                ifd: Some(ifd),
            })
    }

    /// Iterate over entries in `(tag_id, ifd)` order
    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.values()
    }
}

impl<'a> IntoIterator for &'a TagStore {
    type Item = &'a TagEntry;
    type IntoIter = std::collections::btree_map::Values<'a, (u16, IfdName), TagEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
