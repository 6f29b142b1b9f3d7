//! Open-addressed hash set keyed by feature structure identity.
//!
//! Backing store of [`BagIndex`](super::BagIndex). Identifiers are already
//! uniformly distributed integers handed out in sequence, so the identifier
//! itself is the hash: slot = `id & mask`, with linear probing on collision.
//!
//! Removal leaves a marker in the slot so probe chains stay intact. Markers
//! count towards the fill ratio; once live elements plus markers cross the
//! configured load the table is rebuilt, doubling if live elements alone
//! justify it and otherwise at the same size to purge the markers.
//!
//! Positions are slot numbers. A rebuild moves elements to new slots, so a
//! position taken before a rebuild is meaningless afterwards; every rebuild
//! bumps [`generation`](IdentityHashSet::generation) so holders of live
//! positions can tell. Cursors never see this because they traverse a
//! snapshot, which is never rebuilt.

use fsindex_common::{FeatureStructure, FsId};

use super::position::{Position, PositionalStore};

/// Smallest table ever allocated.
const MIN_TABLE_SIZE: usize = 16;

/// Default fill ratio, in percent.
const DEFAULT_LOAD_PERCENT: u8 = 50;

#[derive(Debug, Clone)]
enum Slot<T> {
    Empty,
    Removed,
    Occupied(T),
}

/// A set of feature structures with no two sharing an identifier.
#[derive(Debug, Clone)]
pub struct IdentityHashSet<T> {
    slots: Vec<Slot<T>>,
    /// Live elements.
    len: usize,
    /// Slots holding a removal marker.
    removed: usize,
    /// Table size `clear` shrinks back to.
    initial_table_size: usize,
    max_load_percent: u8,
    /// Bumped whenever elements move to new slots.
    generation: u64,
}

impl<T: FeatureStructure + Clone> IdentityHashSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a set that holds `capacity` elements without rebuilding.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_load(capacity, DEFAULT_LOAD_PERCENT)
    }

    /// Creates a set that holds `capacity` elements without rebuilding at
    /// the given fill ratio. The ratio is clamped to 10..=90.
    #[must_use]
    pub fn with_load(capacity: usize, max_load_percent: u8) -> Self {
        let max_load_percent = max_load_percent.clamp(10, 90);
        let table_size = table_size_for(capacity, max_load_percent);
        Self {
            slots: empty_slots(table_size),
            len: 0,
            removed: 0,
            initial_table_size: table_size,
            max_load_percent,
            generation: 0,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the set holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the table.
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Maximum fill ratio, in percent, before the table is rebuilt.
    #[must_use]
    pub fn max_load_percent(&self) -> u8 {
        self.max_load_percent
    }

    /// Number of times the table has been resized or rehashed.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// An empty set with this set's initial size and fill ratio. It counts
    /// as a rebuild of this one.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            slots: empty_slots(self.initial_table_size),
            len: 0,
            removed: 0,
            initial_table_size: self.initial_table_size,
            max_load_percent: self.max_load_percent,
            generation: self.generation + 1,
        }
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    fn home_slot(&self, id: FsId) -> usize {
        // Truncation on 32-bit targets is fine: only the low bits are used.
        (id.as_u64() as usize) & self.mask()
    }

    /// Probes for `id`. `Ok(slot)` if present, otherwise `Err(slot)` with the
    /// slot an insertion should use (the first marker on the chain, if any).
    fn probe(&self, id: FsId) -> Result<usize, usize> {
        let mask = self.mask();
        let mut slot = self.home_slot(id);
        let mut first_removed = None;

        // The table always keeps at least one empty slot, so this terminates.
        loop {
            match &self.slots[slot] {
                Slot::Empty => return Err(first_removed.unwrap_or(slot)),
                Slot::Removed => {
                    first_removed.get_or_insert(slot);
                }
                Slot::Occupied(fs) if fs.id() == id => return Ok(slot),
                Slot::Occupied(_) => {}
            }
            slot = (slot + 1) & mask;
        }
    }

    /// Adds `fs` unless a structure with the same identifier is present.
    ///
    /// Returns true if the set changed.
    pub fn insert(&mut self, fs: T) -> bool {
        if self.probe(fs.id()).is_ok() {
            return false;
        }
        self.reserve_one();

        let Err(slot) = self.probe(fs.id()) else {
            return false;
        };
        if matches!(self.slots[slot], Slot::Removed) {
            self.removed -= 1;
        }
        self.slots[slot] = Slot::Occupied(fs);
        self.len += 1;
        true
    }

    /// Removes the structure with `fs`'s identifier. Returns true if present.
    pub fn remove(&mut self, fs: &T) -> bool {
        self.take(fs.id()).is_some()
    }

    /// Removes and returns the structure with identifier `id`.
    pub fn take(&mut self, id: FsId) -> Option<T> {
        let slot = self.probe(id).ok()?;
        let Slot::Occupied(fs) = std::mem::replace(&mut self.slots[slot], Slot::Removed) else {
            return None;
        };
        self.len -= 1;
        self.removed += 1;
        Some(fs)
    }

    /// Returns true if a structure with `fs`'s identifier is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.probe(fs.id()).is_ok()
    }

    /// Returns the stored structure with identifier `id`.
    #[must_use]
    pub fn get(&self, id: FsId) -> Option<&T> {
        match self.probe(id) {
            Ok(slot) => self.occupied(slot),
            Err(_) => None,
        }
    }

    /// Removes every element and shrinks the table back to its initial size.
    pub fn clear(&mut self) {
        if self.slots.len() > self.initial_table_size {
            self.slots = empty_slots(self.initial_table_size);
            self.generation += 1;
        } else {
            self.slots.fill_with(|| Slot::Empty);
        }
        self.len = 0;
        self.removed = 0;
    }

    /// Iterates over the elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(fs) => Some(fs),
            _ => None,
        })
    }

    #[inline]
    fn occupied(&self, slot: usize) -> Option<&T> {
        match self.slots.get(slot) {
            Some(Slot::Occupied(fs)) => Some(fs),
            _ => None,
        }
    }

    /// Makes room for one more element, rebuilding the table if the fill
    /// ratio (live plus markers) would exceed the limit.
    fn reserve_one(&mut self) {
        let limit = self.slots.len() * usize::from(self.max_load_percent);
        if (self.len + self.removed + 1) * 100 <= limit {
            return;
        }
        // Grow only if live elements alone would keep the table over half
        // the limit after purging the markers.
        let new_size = if (self.len + 1) * 200 > limit {
            self.slots.len() * 2
        } else {
            self.slots.len()
        };
        self.rebuild(new_size);
    }

    fn rebuild(&mut self, new_size: usize) {
        tracing::trace!(
            from = self.slots.len(),
            to = new_size,
            len = self.len,
            removed = self.removed,
            generation = self.generation + 1,
            "rebuilding identity hash table"
        );
        let old = std::mem::replace(&mut self.slots, empty_slots(new_size));
        self.removed = 0;
        self.generation += 1;
        let mask = self.mask();
        for slot in old {
            if let Slot::Occupied(fs) = slot {
                let mut target = self.home_slot(fs.id());
                while !matches!(self.slots[target], Slot::Empty) {
                    target = (target + 1) & mask;
                }
                self.slots[target] = Slot::Occupied(fs);
            }
        }
    }
}

impl<T: FeatureStructure + Clone> Default for IdentityHashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FeatureStructure + Clone> PositionalStore<T> for IdentityHashSet<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn first_position(&self) -> Position {
        self.next_occupied_from(0)
    }

    fn last_position(&self) -> Position {
        self.previous_occupied_from(self.slots.len())
    }

    fn next_position(&self, pos: Position) -> Position {
        match pos.index() {
            Some(slot) => self.next_occupied_from(slot + 1),
            None => self.first_position(),
        }
    }

    fn previous_position(&self, pos: Position) -> Position {
        match pos.index() {
            Some(slot) => self.previous_occupied_from(slot.min(self.slots.len())),
            None => Position::INVALID,
        }
    }

    fn get_at(&self, pos: Position) -> Option<&T> {
        pos.index().and_then(|slot| self.occupied(slot))
    }

    fn seek(&self, fs: &T) -> Position {
        match self.probe(fs.id()) {
            Ok(slot) => Position::at(slot),
            Err(_) => Position::INVALID,
        }
    }
}

impl<T: FeatureStructure + Clone> IdentityHashSet<T> {
    /// First occupied slot at or after `start`, or the past-the-end position.
    fn next_occupied_from(&self, start: usize) -> Position {
        (start..self.slots.len())
            .find(|&slot| self.occupied(slot).is_some())
            .map_or(Position::at(self.slots.len()), Position::at)
    }

    /// Last occupied slot strictly before `end`, or [`Position::INVALID`].
    fn previous_occupied_from(&self, end: usize) -> Position {
        (0..end)
            .rev()
            .find(|&slot| self.occupied(slot).is_some())
            .map_or(Position::INVALID, Position::at)
    }
}

fn table_size_for(capacity: usize, max_load_percent: u8) -> usize {
    let needed = capacity.saturating_mul(100) / usize::from(max_load_percent) + 1;
    needed.next_power_of_two().max(MIN_TABLE_SIZE)
}

fn empty_slots<T>(size: usize) -> Vec<Slot<T>> {
    let mut slots = Vec::with_capacity(size);
    slots.resize_with(size, || Slot::Empty);
    slots
}
