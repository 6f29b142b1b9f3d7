//! Index configuration.

use std::fmt;

/// Errors from [`IndexConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_load_percent` must lie within 10..=90.
    LoadFactorOutOfRange(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFactorOutOfRange(percent) => write!(
                f,
                "max_load_percent must be between {} and {}, got {percent}",
                IndexConfig::MIN_LOAD_PERCENT,
                IndexConfig::MAX_LOAD_PERCENT
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Sizing and tuning for newly created indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Expected number of elements in a bag index. The hash table is sized so
    /// this many elements fit without a resize.
    pub bag_initial_capacity: usize,

    /// Initial capacity of an ordered index's backing array.
    pub ordered_initial_capacity: usize,

    /// Fill ratio of the identity hash table, counting removed-slot markers,
    /// above which the table is rebuilt.
    pub max_load_percent: u8,
}

impl IndexConfig {
    /// Lowest accepted `max_load_percent`.
    pub const MIN_LOAD_PERCENT: u8 = 10;
    /// Highest accepted `max_load_percent`. Linear probing needs free slots.
    pub const MAX_LOAD_PERCENT: u8 = 90;

    /// Sets the expected bag index size.
    #[must_use]
    pub fn with_bag_capacity(mut self, capacity: usize) -> Self {
        self.bag_initial_capacity = capacity;
        self
    }

    /// Sets the initial ordered index capacity.
    #[must_use]
    pub fn with_ordered_capacity(mut self, capacity: usize) -> Self {
        self.ordered_initial_capacity = capacity;
        self
    }

    /// Sets the hash table fill ratio.
    #[must_use]
    pub fn with_max_load_percent(mut self, percent: u8) -> Self {
        self.max_load_percent = percent;
        self
    }

    /// Checks the configuration for values the indexes cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFactorOutOfRange`] if `max_load_percent`
    /// is outside 10..=90.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_LOAD_PERCENT..=Self::MAX_LOAD_PERCENT).contains(&self.max_load_percent) {
            return Err(ConfigError::LoadFactorOutOfRange(self.max_load_percent));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            bag_initial_capacity: 16,
            ordered_initial_capacity: 16,
            max_load_percent: 50,
        }
    }
}
