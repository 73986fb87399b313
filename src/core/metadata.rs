//! Per-file EXIF working object
//!
//! [`ExifMetadata`] owns the [`TagStore`] of one file and shares the
//! registry and formatter with every other file being processed. Tag keys
//! may be ids or names; when no directory is given, the tag's natural
//! directory from the registry is used.

use crate::core::codec::{ExifCodec, RawIfdMap};
use crate::core::entry::{TagEntry, TagSummary};
use crate::core::error::{ExifError, ExifResult};
use crate::core::formatting::{BinaryFormat, ValueFormatter};
use crate::core::registry::{TagKey, TagRegistry};
use crate::core::store::TagStore;
use crate::types::ifd::IfdName;
use crate::types::value::{RawValue, TagValue};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Selection of entries for listings
///
/// An empty filter selects everything.
#[derive(Debug, Clone, Default)]
pub struct TagFilter<'a> {
    tags: Option<Vec<TagKey<'a>>>,
    ifd: Option<IfdName>,
}

impl<'a> TagFilter<'a> {
    /// Create a filter that selects every entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Only select the given tags
    pub fn with_tags<I, K>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TagKey<'a>>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Only select entries of one directory
    pub fn with_ifd(mut self, ifd: IfdName) -> Self {
        self.ifd = Some(ifd);
        self
    }
}

/// EXIF metadata of one file
#[derive(Debug, Clone)]
pub struct ExifMetadata {
    registry: Arc<TagRegistry>,
    formatter: Arc<ValueFormatter>,
    store: TagStore,
}

impl ExifMetadata {
    /// Create metadata with no tags
    pub fn new(registry: Arc<TagRegistry>, formatter: Arc<ValueFormatter>) -> Self {
        Self {
            registry,
            formatter,
            store: TagStore::new(),
        }
    }

    /// Build metadata from raw per-directory values
    ///
    /// Fails on the first unknown tag or invalid value; nothing is kept.
    pub fn from_raw(
        registry: Arc<TagRegistry>,
        formatter: Arc<ValueFormatter>,
        raw: &RawIfdMap,
    ) -> ExifResult<Self> {
        let store = TagStore::from_raw(&registry, raw)?;
        Ok(Self {
            registry,
            formatter,
            store,
        })
    }

    /// Decode a metadata segment with `codec` and validate its tags
    pub fn load<C>(
        registry: Arc<TagRegistry>,
        formatter: Arc<ValueFormatter>,
        codec: &C,
        bytes: &[u8],
    ) -> ExifResult<Self>
    where
        C: ExifCodec + ?Sized,
    {
        let raw = codec.decode(bytes)?;
        Self::from_raw(registry, formatter, &raw)
    }

    /// Flatten the tags into per-directory raw values
    pub fn to_raw(&self) -> RawIfdMap {
        self.store.to_raw()
    }

    /// Encode the tags with `codec`
    pub fn save<C>(&self, codec: &C) -> ExifResult<Vec<u8>>
    where
        C: ExifCodec + ?Sized,
    {
        let raw = self.to_raw();
        log::debug!("Encoding {} tags in {} directories", self.store.len(), raw.len());
        codec.encode(&raw)
    }

    /// Shared tag registry
    pub fn registry(&self) -> &Arc<TagRegistry> {
        &self.registry
    }

    /// Shared value formatter
    pub fn formatter(&self) -> &Arc<ValueFormatter> {
        &self.formatter
    }

    /// Underlying tag store
    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Number of tags present
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if no tags are present
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Resolve a key to its id and the directory it is read from or written to
    fn locate(&self, key: TagKey<'_>, ifd: Option<IfdName>) -> ExifResult<(u16, IfdName)> {
        let tag_id = self.registry.resolve_id(key)?;
        let ifd = match ifd {
            Some(ifd) => ifd,
            None => self.registry.ifd_of(tag_id, false)?,
        };
        Ok((tag_id, ifd))
    }

    /// Validate and set a tag, replacing any previous value
    ///
    /// # Arguments
    ///
    /// * `key` - Tag id or name
    /// * `value` - New value, checked against the tag's declared type
    /// * `ifd` - Target directory; defaults to the tag's natural directory
    pub fn write_tag<'a>(
        &mut self,
        key: impl Into<TagKey<'a>>,
        value: impl Into<RawValue>,
        ifd: Option<IfdName>,
    ) -> ExifResult<()> {
        let entry = self.build_entry(key.into(), value.into(), ifd)?;
        self.store.insert(entry);
        Ok(())
    }

    fn build_entry(
        &self,
        key: TagKey<'_>,
        value: RawValue,
        ifd: Option<IfdName>,
    ) -> ExifResult<TagEntry> {
        let (tag_id, ifd) = self.locate(key, ifd)?;
        TagEntry::new(&self.registry, tag_id, value, ifd)
    }

    /// Set several tags at once
    ///
    /// Every value is validated before any is stored, so a single bad key
    /// or value leaves the metadata untouched.
    pub fn write_tags<'a, I, K, V>(&mut self, tags: I, ifd: Option<IfdName>) -> ExifResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<TagKey<'a>>,
        V: Into<RawValue>,
    {
        let entries = tags
            .into_iter()
            .map(|(key, value)| self.build_entry(key.into(), value.into(), ifd))
            .collect::<ExifResult<Vec<_>>>()?;
        for entry in entries {
            self.store.insert(entry);
        }
        Ok(())
    }

    /// Remove a tag if present
    ///
    /// # Returns
    ///
    /// Whether an entry was removed. Unknown keys are still an error.
    pub fn delete_tag<'a>(
        &mut self,
        key: impl Into<TagKey<'a>>,
        ifd: Option<IfdName>,
    ) -> ExifResult<bool> {
        let (tag_id, ifd) = self.locate(key.into(), ifd)?;
        self.remove_present(tag_id, ifd)
    }

    fn remove_present(&mut self, tag_id: u16, ifd: IfdName) -> ExifResult<bool> {
        if !self.store.contains(tag_id, ifd) {
            return Ok(false);
        }
        self.store.delete(tag_id, ifd)?;
        Ok(true)
    }

    /// Remove several tags, skipping absent ones
    ///
    /// All keys are resolved before anything is removed.
    ///
    /// # Returns
    ///
    /// Number of entries removed
    pub fn delete_tags<'a, I, K>(&mut self, tags: I, ifd: Option<IfdName>) -> ExifResult<usize>
    where
        I: IntoIterator<Item = K>,
        K: Into<TagKey<'a>>,
    {
        let keys = tags
            .into_iter()
            .map(|key| self.locate(key.into(), ifd))
            .collect::<ExifResult<Vec<_>>>()?;
        let mut removed = 0;
        for (tag_id, ifd) in keys {
            if self.remove_present(tag_id, ifd)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry(&self, key: TagKey<'_>, ifd: Option<IfdName>) -> ExifResult<&TagEntry> {
        let (tag_id, ifd) = self.locate(key, ifd)?;
        self.store.get_exact(tag_id, ifd)
    }

    /// Get the value of a tag
    ///
    /// Fails with [`ExifError::TagNotFound`] when the tag is known but
    /// absent from the directory.
    pub fn read_tag<'a>(
        &self,
        key: impl Into<TagKey<'a>>,
        ifd: Option<IfdName>,
    ) -> ExifResult<&TagValue> {
        Ok(self.entry(key.into(), ifd)?.value())
    }

    /// Get the human-readable value of a tag
    pub fn read_tag_formatted<'a>(
        &self,
        key: impl Into<TagKey<'a>>,
        ifd: Option<IfdName>,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<String> {
        let entry = self.entry(key.into(), ifd)?;
        entry.format(&self.formatter, &self.registry, binary_format)
    }

    /// Read several tags into a map keyed by tag name
    ///
    /// With `skip_missing` absent tags are left out of the result; otherwise
    /// the first absent tag fails the call.
    pub fn read_tags<'a, I, K>(
        &self,
        tags: I,
        ifd: Option<IfdName>,
        skip_missing: bool,
    ) -> ExifResult<BTreeMap<String, TagValue>>
    where
        I: IntoIterator<Item = K>,
        K: Into<TagKey<'a>>,
    {
        self.collect_tags(tags, ifd, skip_missing, |entry| Ok(entry.value().clone()))
    }

    /// Read several tags as human-readable strings, keyed by tag name
    pub fn read_tags_formatted<'a, I, K>(
        &self,
        tags: I,
        ifd: Option<IfdName>,
        binary_format: Option<BinaryFormat>,
        skip_missing: bool,
    ) -> ExifResult<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = K>,
        K: Into<TagKey<'a>>,
    {
        self.collect_tags(tags, ifd, skip_missing, |entry| {
            entry.format(&self.formatter, &self.registry, binary_format)
        })
    }

    fn collect_tags<'a, I, K, T, F>(
        &self,
        tags: I,
        ifd: Option<IfdName>,
        skip_missing: bool,
        read: F,
    ) -> ExifResult<BTreeMap<String, T>>
    where
        I: IntoIterator<Item = K>,
        K: Into<TagKey<'a>>,
        F: Fn(&TagEntry) -> ExifResult<T>,
    {
        let mut result = BTreeMap::new();
        for key in tags {
            let key = key.into();
            let (tag_id, ifd) = self.locate(key, ifd)?;
            let name = self.registry.resolve_name(tag_id, Some(ifd))?;
            match self.store.get_exact(tag_id, ifd) {
                Ok(entry) => {
                    result.insert(name.to_string(), read(entry)?);
                }
                Err(ExifError::TagNotFound { .. }) if skip_missing => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(result)
    }

    /// Entries selected by `filter`, with their tag names, in store order
    ///
    /// A tag present in several directories appears once per directory.
    pub fn tags(&self, filter: &TagFilter<'_>) -> ExifResult<Vec<(&str, &TagEntry)>> {
        let wanted: Option<BTreeSet<u16>> = match &filter.tags {
            Some(keys) => Some(
                keys.iter()
                    .map(|&key| self.registry.resolve_id(key))
                    .collect::<ExifResult<_>>()?,
            ),
            None => None,
        };

        self.store
            .iter()
            .filter(|entry| wanted.as_ref().map_or(true, |ids| ids.contains(&entry.id())))
            .filter(|entry| filter.ifd.map_or(true, |ifd| entry.ifd() == ifd))
            .map(|entry| Ok((entry.name(&self.registry)?, entry)))
            .collect()
    }

    /// Serializable summaries of the entries selected by `filter`
    pub fn summaries(
        &self,
        filter: &TagFilter<'_>,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<Vec<TagSummary>> {
        self.tags(filter)?
            .into_iter()
            .map(|(_, entry)| entry.summary(&self.formatter, &self.registry, binary_format))
            .collect()
    }

    /// Every tag name the registry knows
    pub fn tag_names(&self) -> Vec<&str> {
        self.registry.tag_names()
    }
}
