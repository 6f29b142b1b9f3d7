//! Labelled indexes routed by type code.
//!
//! An [`IndexRepository`] owns every index defined for one object store. Each
//! index carries a label and the [`TypeCode`] whose structures it holds.
//! [`add_fs`](IndexRepository::add_fs) routes a structure to every index of
//! its type; the type hierarchy is resolved elsewhere, so routing is by exact
//! type code.
//!
//! ```
//! use fsindex_common::{FsId, FsRef, TypeCode};
//! use fsindex_core::{FsComparator, IndexRepository};
//!
//! let token = TypeCode::new(1);
//! let mut repo = IndexRepository::new();
//! repo.define_bag("all-tokens", token)?;
//! repo.define_sorted("tokens-by-id", token, FsComparator::by_key(|f: &FsRef| f.id))?;
//!
//! assert_eq!(repo.add_fs(FsRef::new(FsId::new(7), token)), 2);
//! assert_eq!(repo.index("all-tokens")?.len(), 1);
//! # Ok::<(), fsindex_common::Error>(())
//! ```

use fsindex_common::collections::{FsMap, fs_map};
use fsindex_common::utils::strings::{closest_label, suggestion_hint};
use fsindex_common::{Error, FeatureStructure, Result, TypeCode};
use smallvec::SmallVec;

use crate::comparator::FsComparator;
use crate::config::{ConfigError, IndexConfig};
use crate::index::{FsIndex, IndexKind};

/// Most types carry only a handful of indexes.
type Routes = SmallVec<[usize; 4]>;

#[derive(Debug)]
struct Entry<T> {
    label: String,
    type_code: TypeCode,
    index: FsIndex<T>,
}

/// All indexes defined over one object store.
#[derive(Debug)]
pub struct IndexRepository<T> {
    config: IndexConfig,
    entries: Vec<Entry<T>>,
    by_label: FsMap<String, usize>,
    by_type: FsMap<TypeCode, Routes>,
}

impl<T: FeatureStructure + Clone> IndexRepository<T> {
    /// Creates an empty repository with default sizing.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Creates an empty repository whose indexes are built from `config`.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is out of range.
    pub fn with_config(config: IndexConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            by_label: fs_map(),
            by_type: fs_map(),
        }
    }

    /// The configuration new indexes are built from.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Defines a bag index over `type_code`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateIndex`] if `label` is taken.
    pub fn define_bag(&mut self, label: &str, type_code: TypeCode) -> Result<()> {
        let index = FsIndex::bag(&self.config);
        self.define(label, type_code, index)
    }

    /// Defines an ordered index over `type_code`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateIndex`] if `label` is taken.
    pub fn define_sorted(
        &mut self,
        label: &str,
        type_code: TypeCode,
        comparator: FsComparator<T>,
    ) -> Result<()> {
        let index = FsIndex::ordered(comparator, &self.config);
        self.define(label, type_code, index)
    }

    fn define(&mut self, label: &str, type_code: TypeCode, index: FsIndex<T>) -> Result<()> {
        if self.by_label.contains_key(label) {
            return Err(Error::DuplicateIndex(label.to_string()));
        }
        let slot = self.entries.len();
        tracing::debug!(label, %type_code, kind = %index.kind(), "defining index");
        self.entries.push(Entry {
            label: label.to_string(),
            type_code,
            index,
        });
        self.by_label.insert(label.to_string(), slot);
        self.by_type.entry(type_code).or_default().push(slot);
        Ok(())
    }

    fn slot(&self, label: &str) -> Result<usize> {
        self.by_label.get(label).copied().ok_or_else(|| {
            let labels: Vec<&str> = self.labels().collect();
            Error::UnknownIndex {
                label: label.to_string(),
                hint: suggestion_hint(closest_label(label, &labels)),
            }
        })
    }

    /// The index defined under `label`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownIndex`], with a suggestion when a label is close.
    pub fn index(&self, label: &str) -> Result<&FsIndex<T>> {
        let slot = self.slot(label)?;
        Ok(&self.entries[slot].index)
    }

    /// The index defined under `label`, mutably.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownIndex`], with a suggestion when a label is close.
    pub fn index_mut(&mut self, label: &str) -> Result<&mut FsIndex<T>> {
        let slot = self.slot(label)?;
        Ok(&mut self.entries[slot].index)
    }

    /// The kind and type code of the index under `label`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownIndex`] if no index has that label.
    pub fn describe(&self, label: &str) -> Result<(IndexKind, TypeCode)> {
        let entry = &self.entries[self.slot(label)?];
        Ok((entry.index.kind(), entry.type_code))
    }

    /// Labels in definition order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    /// Indexes holding structures of `type_code`, with their labels.
    pub fn indexes_for(&self, type_code: TypeCode) -> impl Iterator<Item = (&str, &FsIndex<T>)> + '_ {
        self.routes(type_code).iter().map(|&slot| {
            let entry = &self.entries[slot];
            (entry.label.as_str(), &entry.index)
        })
    }

    fn routes(&self, type_code: TypeCode) -> &[usize] {
        self.by_type
            .get(&type_code)
            .map(|routes| routes.as_slice())
            .unwrap_or_default()
    }

    /// Number of defined indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no index is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `fs` to every index for its type. Returns how many indexes
    /// changed.
    pub fn add_fs(&mut self, fs: T) -> usize {
        let routes = self
            .by_type
            .get(&fs.type_code())
            .cloned()
            .unwrap_or_default();
        if routes.is_empty() {
            tracing::debug!(id = %fs.id(), type_code = %fs.type_code(), "no index for type");
            return 0;
        }
        routes
            .iter()
            .filter(|&&slot| self.entries[slot].index.insert(fs.clone()))
            .count()
    }

    /// Removes `fs` from every index for its type. Returns how many indexes
    /// held it.
    pub fn remove_fs(&mut self, fs: &T) -> usize {
        let routes = self
            .by_type
            .get(&fs.type_code())
            .cloned()
            .unwrap_or_default();
        routes
            .iter()
            .filter(|&&slot| self.entries[slot].index.remove(fs))
            .count()
    }

    /// Returns true if any index for its type holds `fs`.
    #[must_use]
    pub fn contains_fs(&self, fs: &T) -> bool {
        self.routes(fs.type_code())
            .iter()
            .any(|&slot| self.entries[slot].index.contains(fs))
    }

    /// Empties every index. Definitions are kept.
    pub fn flush(&mut self) {
        tracing::debug!(indexes = self.entries.len(), "flushing all indexes");
        for entry in &mut self.entries {
            entry.index.clear();
        }
    }
}

impl<T: FeatureStructure + Clone> Default for IndexRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}
