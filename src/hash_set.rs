use core::fmt::Debug;

use crate::error::InsertError;
use crate::error::TableError;
use crate::hash_table::KeyTable;
use crate::key_ops::KeyOps;
use crate::key_ops::PtrKeys;
use crate::validate::ValidationError;

/// A set of keys stored in a [`KeyTable`] with `()` values.
///
/// Key semantics, growth, tombstones and key ownership are exactly those of
/// the underlying table.
///
/// # Examples
///
/// ```rust
/// use keyops_hash::KeySet;
/// use keyops_hash::PtrKeys;
///
/// let a = String::from("same");
/// let b = String::from("same");
///
/// let mut seen = KeySet::new(PtrKeys::new()).unwrap();
/// assert!(seen.insert(&(&a as *const String)).unwrap());
/// assert!(seen.insert(&(&b as *const String)).unwrap());
/// assert!(!seen.insert(&(&a as *const String)).unwrap());
/// assert_eq!(seen.len(), 2);
/// ```
pub struct KeySet<O: KeyOps> {
    table: KeyTable<O, ()>,
}

impl<O> PartialEq for KeySet<O>
where
    O: KeyOps,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|k| other.contains(k))
    }
}

impl<O> Debug for KeySet<O>
where
    O: KeyOps,
    O::Key: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<O: KeyOps> KeySet<O> {
    /// Creates an empty set with the minimum capacity.
    pub fn new(ops: O) -> Result<Self, TableError> {
        Self::with_capacity(0, ops)
    }

    /// Creates an empty set with room for at least `capacity_hint` slots.
    pub fn with_capacity(capacity_hint: usize, ops: O) -> Result<Self, TableError> {
        Ok(Self {
            table: KeyTable::with_capacity(capacity_hint, ops)?,
        })
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Adds `key`, returning `true` if it was not already present.
    pub fn insert(&mut self, key: &O::Key) -> Result<bool, TableError> {
        self.table
            .insert(key, ())
            .map(|inserted| inserted.is_new())
            .map_err(InsertError::into_error)
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(&self, key: &O::Key) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &O::Key) -> bool {
        self.table.delete(key)
    }

    /// Keeps only the keys for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&O::Key) -> bool) {
        self.table.retain(|key, _| keep(key));
    }

    /// Rebuilds the underlying table; see [`KeyTable::resize`].
    pub fn resize(&mut self, min_capacity: usize) -> Result<(), TableError> {
        self.table.resize(min_capacity)
    }

    /// Returns an iterator over the keys, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &O::Key> + '_ {
        self.table.iter().map(|(key, _)| key)
    }

    /// Checks the underlying table; see [`KeyTable::validate`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.table.validate()
    }
}

impl<T: ?Sized> KeySet<PtrKeys<T>> {
    /// Creates an empty set of object addresses.
    pub fn with_ptr_keys(capacity_hint: usize) -> Result<Self, TableError> {
        Self::with_capacity(capacity_hint, PtrKeys::new())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;
    use crate::key_ops::StrKeys;

    #[test]
    fn insert_contains_remove() {
        let mut set = KeySet::new(StrKeys).unwrap();
        assert!(set.insert("a").unwrap());
        assert!(set.insert("b").unwrap());
        assert!(!set.insert("a").unwrap());
        assert_eq!(set.len(), 2);

        assert!(set.contains("a"));
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert!(!set.contains("a"));
        assert_eq!(set.len(), 1);
        set.validate().unwrap();
    }

    #[test]
    fn deduplicates_by_address() {
        let objects: Vec<String> = (0..20).map(|_| "same".to_string()).collect();
        let mut set = KeySet::with_ptr_keys(4).unwrap();
        for object in &objects {
            assert!(set.insert(&(object as *const String)).unwrap());
        }
        for object in &objects {
            assert!(!set.insert(&(object as *const String)).unwrap());
        }
        assert_eq!(set.len(), 20);
        set.validate().unwrap();
    }

    #[test]
    fn equality_ignores_order() {
        let mut a = KeySet::new(StrKeys).unwrap();
        let mut b = KeySet::with_capacity(64, StrKeys).unwrap();
        for i in 0..10 {
            a.insert(&i.to_string()).unwrap();
        }
        for i in (0..10).rev() {
            b.insert(&i.to_string()).unwrap();
        }
        assert!(a == b);
        b.remove("3");
        assert!(a != b);
    }

    #[test]
    fn retain_and_resize() {
        let mut set = KeySet::new(StrKeys).unwrap();
        for i in 0..30 {
            set.insert(&i.to_string()).unwrap();
        }
        set.retain(|key| key.len() == 1);
        assert_eq!(set.len(), 10);

        set.resize(0).unwrap();
        assert_eq!(set.capacity(), 16);
        let mut keys: Vec<&str> = set.iter().collect();
        keys.sort_unstable();
        assert_eq!(keys, ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert_eq!(alloc::format!("{:?}", KeySet::new(StrKeys).unwrap()), "{}");
    }
}
