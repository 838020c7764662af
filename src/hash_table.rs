//! The table core: an open-addressing slot array with tombstone deletion.
//!
//! Probing uses a perturbed sequence over the full 64-bit hash. Starting from
//! `i = perturb = hash`, slot `i & mask` is examined, then `perturb >>= 5` and
//! `i = 5 * i + 1 + perturb`. Once `perturb` reaches zero the recurrence
//! `i -> 5 * i + 1` cycles through every slot of a power-of-two array, so any
//! probe eventually reaches an empty slot. The same sequence is used by
//! insertion, lookup, deletion, resizing and validation.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use crate::error::InsertError;
use crate::error::TableError;
use crate::key_ops::KeyOps;
use crate::key_ops::PtrKeys;
use crate::key_ops::StrKeys;
use crate::key_ops::borrow_key;

/// Default minimum number of slots in a table.
pub const MIN_CAPACITY: usize = 8;

/// Largest number of used (live plus tombstone) slots allowed for a capacity.
#[inline(always)]
pub(crate) fn max_load(capacity: usize) -> usize {
    ((capacity as u128 * 2) / 3) as usize
}

/// Smallest slot count whose load bound admits `live` entries.
#[inline(always)]
fn min_capacity_for(live: usize) -> usize {
    (live as u128 * 3).div_ceil(2) as usize
}

#[inline(always)]
fn round_capacity(min_capacity: usize) -> Result<usize, TableError> {
    min_capacity
        .max(1)
        .checked_next_power_of_two()
        .ok_or(TableError::CapacityOverflow)
}

/// One entry of the slot array.
pub(crate) enum Slot<K, V> {
    /// Never occupied since the last resize. Terminates every probe.
    Empty,
    /// A live entry. `hash` caches the key's hash so resizes never rehash.
    Occupied { hash: u64, key: K, value: V },
    /// A deleted entry. Skipped by probes, reusable by inserts.
    Tombstone,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

fn alloc_slots<K, V>(capacity: usize) -> Result<Box<[Slot<K, V>]>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots.into_boxed_slice())
}

/// The probe sequence for one hash over an array of `mask + 1` slots.
pub(crate) struct Probe {
    index: u64,
    perturb: u64,
    mask: usize,
}

impl Probe {
    #[inline(always)]
    pub(crate) fn new(hash: u64, mask: usize) -> Self {
        Probe {
            index: hash,
            perturb: hash,
            mask,
        }
    }

    #[inline(always)]
    pub(crate) fn next_slot(&mut self) -> usize {
        let slot = self.index as usize & self.mask;
        self.perturb >>= 5;
        self.index = self
            .index
            .wrapping_mul(5)
            .wrapping_add(1)
            .wrapping_add(self.perturb);
        slot
    }
}

/// Where a probe for a key ended without finding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Vacancy {
    /// The first tombstone on the probe path, else the terminating empty slot.
    pub(crate) index: usize,
    pub(crate) tombstone: bool,
}

/// First empty slot on the probe path of `hash`. Only valid on arrays
/// without tombstones or matching keys, i.e. while rebuilding.
fn vacant_index<K, V>(slots: &[Slot<K, V>], hash: u64) -> usize {
    let mut probe = Probe::new(hash, slots.len() - 1);
    loop {
        let index = probe.next_slot();
        if matches!(slots[index], Slot::Empty) {
            return index;
        }
    }
}

/// Result of [`KeyTable::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted<V> {
    /// A new entry was created; the key was copied into the table.
    New,
    /// The key was already present; its previous value is returned and the
    /// stored key is kept.
    Replaced(V),
}

impl<V> Inserted<V> {
    /// Returns `true` if a new entry was created.
    pub fn is_new(&self) -> bool {
        matches!(self, Inserted::New)
    }

    /// Returns the replaced value, if any.
    pub fn into_previous(self) -> Option<V> {
        match self {
            Inserted::New => None,
            Inserted::Replaced(value) => Some(value),
        }
    }
}

/// A hash table whose key semantics come from a [`KeyOps`] capability set.
///
/// The table owns a power-of-two array of slots, each empty, occupied or a
/// tombstone. It owns every key copy it holds; values are moved in and out
/// by the caller. After any insertion at most two thirds of the slots are in
/// use (live entries plus tombstones) and the table grows ahead of time to
/// keep it that way. Deletion leaves a tombstone and never shrinks the
/// table; an explicit [`resize`] compacts it.
///
/// Dropping the table passes every stored key to
/// [`KeyOps::release_key`] exactly once.
///
/// The table performs no internal synchronization. Share it across threads
/// behind a single lock, e.g. `SharedTable`.
///
/// [`resize`]: KeyTable::resize
///
/// ## Example
///
/// ```rust
/// use keyops_hash::Inserted;
/// use keyops_hash::KeyTable;
/// use keyops_hash::StrKeys;
///
/// let mut names = KeyTable::with_capacity(4, StrKeys).unwrap();
/// assert_eq!(names.insert("alpha", 1).unwrap(), Inserted::New);
/// assert_eq!(names.insert("beta", 2).unwrap(), Inserted::New);
/// assert_eq!(names.insert("alpha", 3).unwrap(), Inserted::Replaced(1));
///
/// assert_eq!(names.count(), 2);
/// assert_eq!(names.lookup("alpha"), Some(&3));
/// assert!(names.delete("beta"));
/// assert!(!names.contains_key("beta"));
/// names.validate().unwrap();
/// ```
pub struct KeyTable<O: KeyOps, V> {
    pub(crate) ops: O,
    pub(crate) slots: Box<[Slot<O::Owned, V>]>,
    pub(crate) live: usize,
    pub(crate) tombstones: usize,
    pub(crate) floor: usize,
}

impl<O, V> Debug for KeyTable<O, V>
where
    O: KeyOps,
    O::Key: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        struct Entries<'a, O: KeyOps, V>(&'a KeyTable<O, V>);

        impl<O, V> Debug for Entries<'_, O, V>
        where
            O: KeyOps,
            O::Key: Debug,
            V: Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("KeyTable")
            .field("live", &self.live)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|w| {
                        w.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Tombstone => "xx".to_string(),
                                Slot::Occupied { hash, .. } => format!("{:02x}", hash >> 56),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect::<Vec<String>>(),
            )
            .field("entries", &Entries(self))
            .finish()
    }
}

impl<O: KeyOps, V> Drop for KeyTable<O, V> {
    fn drop(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied { key, .. } = mem::take(slot) {
                self.ops.release_key(key);
            }
        }
    }
}

impl<O: KeyOps, V> KeyTable<O, V> {
    /// Creates an empty table with the minimum capacity.
    pub fn new(ops: O) -> Result<Self, TableError> {
        Self::with_capacity(0, ops)
    }

    /// Creates an empty table.
    ///
    /// The capacity is the smallest power of two that is at least
    /// `max(capacity_hint, MIN_CAPACITY)`. A hint of zero selects the
    /// minimum.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let table: KeyTable<StrKeys, u32> = KeyTable::with_capacity(100, StrKeys).unwrap();
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity_hint: usize, ops: O) -> Result<Self, TableError> {
        Self::with_floor(capacity_hint, MIN_CAPACITY, ops)
    }

    /// Creates an empty table whose capacity never drops below `floor` slots.
    ///
    /// The floor applies to creation, growth and explicit resizes; a floor of
    /// zero is treated as one.
    pub fn with_floor(capacity_hint: usize, floor: usize, ops: O) -> Result<Self, TableError> {
        let floor = floor.max(1);
        let capacity = round_capacity(capacity_hint.max(floor))?;
        Ok(KeyTable {
            ops,
            slots: alloc_slots(capacity)?,
            live: 0,
            tombstones: 0,
            floor,
        })
    }

    /// Returns the capability set this table was created with.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Returns the number of live entries.
    pub fn count(&self) -> usize {
        self.live
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the minimum number of slots.
    pub fn floor(&self) -> usize {
        self.floor
    }

    #[inline(always)]
    pub(crate) fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Core probe: the occupied slot holding `key`, or where it would go.
    pub(crate) fn find_slot(&self, hash: u64, key: &O::Key) -> Result<usize, Vacancy> {
        let mut probe = Probe::new(hash, self.mask());
        let mut first_tombstone = None;
        loop {
            let index = probe.next_slot();
            match &self.slots[index] {
                Slot::Empty => {
                    return Err(match first_tombstone {
                        Some(index) => Vacancy {
                            index,
                            tombstone: true,
                        },
                        None => Vacancy {
                            index,
                            tombstone: false,
                        },
                    });
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied {
                    hash: stored_hash,
                    key: stored_key,
                    ..
                } => {
                    if *stored_hash == hash && self.ops.compare(key, borrow_key::<O>(stored_key)) {
                        return Ok(index);
                    }
                }
            }
        }
    }

    #[inline]
    fn find(&self, key: &O::Key) -> Option<usize> {
        let hash = self.ops.hash(key);
        self.find_slot(hash, key).ok()
    }

    /// Inserts `value` under `key`.
    ///
    /// If an equal key is present its value is replaced and the stored key is
    /// kept; no key is copied or released. Otherwise the key is copied with
    /// [`KeyOps::copy_key`] into the first tombstone on its probe path, or into
    /// the empty slot that ended the probe.
    ///
    /// When filling an empty slot would break the two-thirds load bound, the
    /// table is resized first. If that resize fails the table is unmodified and
    /// the value comes back inside the [`InsertError`]; the entry is never
    /// placed past the bound. Reusing a tombstone never resizes.
    ///
    /// The automatic resize is sized from the live entries alone, to the next
    /// power of two of at least `2 * (len() + 1)` slots and never below the
    /// floor. After heavy delete churn the rebuilt array can therefore be
    /// smaller than the one it replaces.
    ///
    /// If [`KeyOps::copy_key`] panics the table keeps its previous contents,
    /// though a resize that preceded the copy stays in effect.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let mut table = KeyTable::new(StrKeys).unwrap();
    /// assert!(table.insert("key", 1).unwrap().is_new());
    /// assert_eq!(table.insert("key", 2).unwrap().into_previous(), Some(1));
    /// assert_eq!(table.count(), 1);
    /// ```
    pub fn insert(&mut self, key: &O::Key, value: V) -> Result<Inserted<V>, InsertError<V>> {
        let hash = self.ops.hash(key);
        let vacancy = match self.find_slot(hash, key) {
            Ok(index) => match self.slots[index].value_mut() {
                Some(stored) => return Ok(Inserted::Replaced(mem::replace(stored, value))),
                None => unreachable!("probe matched a slot without a live entry"),
            },
            Err(vacancy) => vacancy,
        };

        let index = if vacancy.tombstone {
            vacancy.index
        } else if self.live + self.tombstones + 1 > max_load(self.capacity()) {
            if let Err(error) = self.grow() {
                return Err(InsertError::new(error, value));
            }
            vacant_index(&self.slots, hash)
        } else {
            vacancy.index
        };

        // Counters change only after user code has returned.
        let key = self.ops.copy_key(key);
        if matches!(self.slots[index], Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.slots[index] = Slot::Occupied { hash, key, value };
        self.live += 1;
        Ok(Inserted::New)
    }

    /// Returns a reference to the value stored under `key`.
    pub fn lookup(&self, key: &O::Key) -> Option<&V> {
        let index = self.find(key)?;
        self.slots[index].value()
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn lookup_mut(&mut self, key: &O::Key) -> Option<&mut V> {
        let index = self.find(key)?;
        self.slots[index].value_mut()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &O::Key) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key`, returning `true` if an entry was removed.
    pub fn delete(&mut self, key: &O::Key) -> bool {
        self.remove(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// The stored key is passed to [`KeyOps::release_key`] and the slot
    /// becomes a tombstone. Absent keys leave the table unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let mut table = KeyTable::new(StrKeys).unwrap();
    /// table.insert("key", 7).unwrap();
    /// assert_eq!(table.remove("key"), Some(7));
    /// assert_eq!(table.remove("key"), None);
    /// assert_eq!(table.tombstones(), 1);
    /// ```
    pub fn remove(&mut self, key: &O::Key) -> Option<V> {
        let index = self.find(key)?;
        self.vacate(index)
    }

    fn vacate(&mut self, index: usize) -> Option<V> {
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { key, value, .. } => {
                self.live -= 1;
                self.tombstones += 1;
                self.ops.release_key(key);
                Some(value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Rebuilds the slot array with at least `min_capacity` slots.
    ///
    /// The new capacity is the smallest power of two no smaller than the
    /// request, the floor, or what the live entries need to stay within the
    /// load bound; smaller requests are raised. Entries are moved without
    /// copying or releasing keys and every tombstone is discarded, so this
    /// also compacts a table after many deletions.
    ///
    /// On failure the table is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let mut table = KeyTable::with_capacity(1024, StrKeys).unwrap();
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    /// table.delete("b");
    ///
    /// table.resize(0).unwrap();
    /// assert_eq!(table.capacity(), 8);
    /// assert_eq!(table.tombstones(), 0);
    /// assert_eq!(table.lookup("a"), Some(&1));
    /// ```
    pub fn resize(&mut self, min_capacity: usize) -> Result<(), TableError> {
        let required = min_capacity
            .max(self.floor)
            .max(min_capacity_for(self.live));
        self.rebuild(required)
    }

    #[cold]
    fn grow(&mut self) -> Result<(), TableError> {
        let required = self
            .live
            .checked_add(1)
            .and_then(|n| n.checked_mul(2))
            .ok_or(TableError::CapacityOverflow)?;
        self.rebuild(required.max(self.floor))
    }

    fn rebuild(&mut self, min_capacity: usize) -> Result<(), TableError> {
        let capacity = round_capacity(min_capacity)?;
        let mut slots = alloc_slots(capacity)?;

        let old = mem::replace(&mut self.slots, Box::default());
        for slot in old.into_vec() {
            if let Slot::Occupied { hash, key, value } = slot {
                let index = vacant_index(&slots, hash);
                slots[index] = Slot::Occupied { hash, key, value };
            }
        }

        self.slots = slots;
        self.tombstones = 0;
        Ok(())
    }

    /// Calls `visitor` with every live entry, in slot order.
    ///
    /// The order is unrelated to insertion order and may change across
    /// resizes. To delete the visited entry while walking, use [`retain`].
    ///
    /// [`retain`]: KeyTable::retain
    pub fn walk(&self, mut visitor: impl FnMut(&O::Key, &V)) {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Returns an iterator over live entries, in slot order.
    pub fn iter(&self) -> Iter<'_, O, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.live,
        }
    }

    /// Walks every live entry and deletes those for which `keep` returns
    /// `false`. Deleted keys are released and leave tombstones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let mut table = KeyTable::new(StrKeys).unwrap();
    /// for (i, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
    ///     table.insert(name, i).unwrap();
    /// }
    /// table.retain(|_, value| *value % 2 == 0);
    /// assert_eq!(table.count(), 2);
    /// assert!(table.contains_key("c"));
    /// assert!(!table.contains_key("d"));
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&O::Key, &mut V) -> bool) {
        for index in 0..self.slots.len() {
            let drop_entry = match &mut self.slots[index] {
                Slot::Occupied { key, value, .. } => !keep(borrow_key::<O>(key), value),
                _ => false,
            };
            if drop_entry {
                self.vacate(index);
            }
        }
    }

    /// Number of probe steps needed to reach `index` from `hash`.
    #[cfg(any(test, feature = "stats"))]
    fn probe_distance(&self, hash: u64, index: usize) -> usize {
        let mut probe = Probe::new(hash, self.mask());
        let mut distance = 0;
        while probe.next_slot() != index {
            distance += 1;
        }
        distance
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Bin `i` counts the live entries found after `i` probe steps, so bin 0
    /// holds the entries sitting in their home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = alloc::vec::Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = self.probe_distance(*hash, index);
                if bins.len() <= distance {
                    bins.resize(distance + 1, 0);
                }
                bins[distance] += 1;
            }
        }
        ProbeHistogram { bins }
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let histogram = self.probe_histogram();
        let total_probes: usize = histogram
            .bins
            .iter()
            .enumerate()
            .map(|(distance, count)| (distance + 1) * count)
            .sum();

        DebugStats {
            live: self.live,
            tombstones: self.tombstones,
            capacity,
            max_load: max_load(capacity),
            load_factor: self.live as f64 / capacity as f64,
            slot_utilization: (self.live + self.tombstones) as f64 / capacity as f64,
            longest_probe: histogram.bins.len().saturating_sub(1),
            mean_probe: if self.live == 0 {
                0.0
            } else {
                total_probes as f64 / self.live as f64
            },
            total_bytes: capacity * core::mem::size_of::<Slot<O::Owned, V>>(),
        }
    }
}

impl<V> KeyTable<StrKeys, V> {
    /// Creates an empty table with owned text keys.
    pub fn with_str_keys(capacity_hint: usize) -> Result<Self, TableError> {
        Self::with_capacity(capacity_hint, StrKeys)
    }
}

impl<T: ?Sized, V> KeyTable<PtrKeys<T>, V> {
    /// Creates an empty table with address-identity keys.
    pub fn with_ptr_keys(capacity_hint: usize) -> Result<Self, TableError> {
        Self::with_capacity(capacity_hint, PtrKeys::new())
    }
}

impl<'a, O: KeyOps, V> IntoIterator for &'a KeyTable<O, V>
where
    O: 'a,
{
    type Item = (&'a O::Key, &'a V);
    type IntoIter = Iter<'a, O, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live entries of a [`KeyTable`], in slot order.
pub struct Iter<'a, O: KeyOps, V> {
    slots: core::slice::Iter<'a, Slot<O::Owned, V>>,
    remaining: usize,
}

impl<'a, O, V> Iterator for Iter<'a, O, V>
where
    O: KeyOps + 'a,
{
    type Item = (&'a O::Key, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value, .. } = slot {
                self.remaining -= 1;
                return Some((borrow_key::<O>(key), value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, O, V> ExactSizeIterator for Iter<'a, O, V> where O: KeyOps + 'a {}

/// Utilization statistics for table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub live: usize,
    /// Number of tombstones
    pub tombstones: usize,
    /// Total number of slots
    pub capacity: usize,
    /// Maximum number of used slots before the table grows
    pub max_load: usize,
    /// Live entries over slots
    pub load_factor: f64,
    /// Live entries plus tombstones over slots
    pub slot_utilization: f64,
    /// Largest number of probe steps needed to reach a live entry
    pub longest_probe: usize,
    /// Average number of slots examined to find a live entry
    pub mean_probe: f64,
    /// Bytes held by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.live,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {} live + {} tombstones, limit {} ({:.2}% utilization)",
            self.live,
            self.tombstones,
            self.max_load,
            self.slot_utilization * 100.0
        );
        println!(
            "Probes: longest {}, mean {:.2}",
            self.longest_probe, self.mean_probe
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Probe length histogram. Bin `i` counts entries found after `i` steps.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Entry counts per probe distance.
    pub bins: alloc::vec::Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = *self.bins.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    _ => '▉',
                };
                bar.push(ch);
            }
            bar
        };

        for (i, &count) in self.bins.iter().enumerate() {
            println!("{:>2} | {} ({})", i, make_bar(count), count);
        }
    }
}
