//! Consistency checking for [`KeyTable`].

use core::fmt::Display;

use crate::hash_table::KeyTable;
use crate::hash_table::Slot;
use crate::hash_table::max_load;
use crate::key_ops::KeyOps;
use crate::key_ops::borrow_key;

/// A broken table invariant found by [`KeyTable::validate`].
///
/// Normal operations never produce these; they indicate a table bug, memory
/// corruption, or a [`KeyOps`] whose `hash` and `compare` disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The slot count is not a power of two.
    CapacityNotPowerOfTwo {
        /// Number of slots.
        capacity: usize,
    },
    /// The slot count is below the table's floor.
    CapacityBelowFloor {
        /// Number of slots.
        capacity: usize,
        /// Configured minimum.
        floor: usize,
    },
    /// The cached live count disagrees with the occupied slots.
    LiveCountMismatch {
        /// Counter kept by the table.
        cached: usize,
        /// Occupied slots found by scanning.
        actual: usize,
    },
    /// The cached tombstone count disagrees with the tombstone slots.
    TombstoneCountMismatch {
        /// Counter kept by the table.
        cached: usize,
        /// Tombstone slots found by scanning.
        actual: usize,
    },
    /// Live entries plus tombstones exceed two thirds of the slots.
    LoadBoundExceeded {
        /// Live entries plus tombstones.
        used: usize,
        /// Largest allowed value of `used`.
        max: usize,
    },
    /// A slot's cached hash differs from the hash of its key.
    StaleHash {
        /// Slot index.
        slot: usize,
        /// Hash cached in the slot.
        cached: u64,
        /// Hash recomputed from the key.
        actual: u64,
    },
    /// Probing for a slot's key does not lead back to that slot, either
    /// because an equal key sits earlier on the path or because the probe
    /// chain is broken by an empty slot.
    ProbeMismatch {
        /// Slot index.
        slot: usize,
        /// Where the probe resolved instead, if it found a matching key.
        resolved: Option<usize>,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::CapacityNotPowerOfTwo { capacity } => {
                write!(f, "capacity {capacity} is not a power of two")
            }
            ValidationError::CapacityBelowFloor { capacity, floor } => {
                write!(f, "capacity {capacity} is below floor {floor}")
            }
            ValidationError::LiveCountMismatch { cached, actual } => {
                write!(f, "live count {cached} but {actual} occupied slots")
            }
            ValidationError::TombstoneCountMismatch { cached, actual } => {
                write!(f, "tombstone count {cached} but {actual} tombstone slots")
            }
            ValidationError::LoadBoundExceeded { used, max } => {
                write!(f, "{used} used slots exceeds load bound {max}")
            }
            ValidationError::StaleHash {
                slot,
                cached,
                actual,
            } => write!(
                f,
                "slot {slot} caches hash {cached:#018x} but key hashes to {actual:#018x}"
            ),
            ValidationError::ProbeMismatch {
                slot,
                resolved: Some(other),
            } => write!(f, "key in slot {slot} resolves to slot {other}"),
            ValidationError::ProbeMismatch {
                slot,
                resolved: None,
            } => write!(f, "key in slot {slot} is unreachable by probing"),
        }
    }
}

impl core::error::Error for ValidationError {}

impl<O: KeyOps, V> KeyTable<O, V> {
    /// Checks the table's internal consistency.
    ///
    /// Recounts live entries and tombstones, checks the capacity and load
    /// bounds, and re-probes every stored key to confirm it resolves to its
    /// own slot. Has no side effects; intended for tests and debugging.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use keyops_hash::KeyTable;
    /// # use keyops_hash::StrKeys;
    /// #
    /// let mut table = KeyTable::new(StrKeys).unwrap();
    /// for name in ["a", "b", "c"] {
    ///     table.insert(name, ()).unwrap();
    /// }
    /// table.delete("b");
    /// assert_eq!(table.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        let capacity = self.slots.len();
        if !capacity.is_power_of_two() {
            return Err(ValidationError::CapacityNotPowerOfTwo { capacity });
        }
        if capacity < self.floor {
            return Err(ValidationError::CapacityBelowFloor {
                capacity,
                floor: self.floor,
            });
        }

        let mut live = 0;
        let mut tombstones = 0;
        for slot in self.slots.iter() {
            match slot {
                Slot::Empty => {}
                Slot::Occupied { .. } => live += 1,
                Slot::Tombstone => tombstones += 1,
            }
        }
        if live != self.live {
            return Err(ValidationError::LiveCountMismatch {
                cached: self.live,
                actual: live,
            });
        }
        if tombstones != self.tombstones {
            return Err(ValidationError::TombstoneCountMismatch {
                cached: self.tombstones,
                actual: tombstones,
            });
        }

        let used = live + tombstones;
        if used > max_load(capacity) {
            return Err(ValidationError::LoadBoundExceeded {
                used,
                max: max_load(capacity),
            });
        }

        for (index, slot) in self.slots.iter().enumerate() {
            let Slot::Occupied { hash, key, .. } = slot else {
                continue;
            };
            let key = borrow_key::<O>(key);

            let actual = self.ops.hash(key);
            if actual != *hash {
                return Err(ValidationError::StaleHash {
                    slot: index,
                    cached: *hash,
                    actual,
                });
            }

            match self.find_slot(*hash, key) {
                Ok(found) if found == index => {}
                Ok(found) => {
                    return Err(ValidationError::ProbeMismatch {
                        slot: index,
                        resolved: Some(found),
                    });
                }
                Err(_) => {
                    return Err(ValidationError::ProbeMismatch {
                        slot: index,
                        resolved: None,
                    });
                }
            }
        }

        Ok(())
    }
}
