//! A mutex-guarded façade for sharing one table between threads.
//!
//! The table itself has no internal locking. `SharedTable` serializes every
//! operation behind a single `std::sync::Mutex`, so a resize can never race
//! with a concurrent lookup.

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::error::InsertError;
use crate::hash_table::Inserted;
use crate::hash_table::KeyTable;
use crate::key_ops::KeyOps;

/// One [`KeyTable`] behind one lock.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use keyops_hash::KeyTable;
/// use keyops_hash::SharedTable;
///
/// let registry = Arc::new(SharedTable::new(KeyTable::with_str_keys(0).unwrap()));
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let registry = Arc::clone(&registry);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 registry.insert(&format!("{t}-{i}"), i).unwrap();
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(registry.count(), 400);
/// ```
pub struct SharedTable<O: KeyOps, V> {
    inner: Mutex<KeyTable<O, V>>,
}

impl<O: KeyOps, V> SharedTable<O, V> {
    /// Wraps `table`.
    pub fn new(table: KeyTable<O, V>) -> Self {
        SharedTable {
            inner: Mutex::new(table),
        }
    }

    // Table operations update their counters before or after calling user
    // key code, never across it, so a poisoned table is still consistent.
    fn lock(&self) -> MutexGuard<'_, KeyTable<O, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the table.
    pub fn with<R>(&self, f: impl FnOnce(&mut KeyTable<O, V>) -> R) -> R {
        f(&mut self.lock())
    }

    /// See [`KeyTable::insert`].
    pub fn insert(&self, key: &O::Key, value: V) -> Result<Inserted<V>, InsertError<V>> {
        self.lock().insert(key, value)
    }

    /// See [`KeyTable::contains_key`].
    pub fn contains_key(&self, key: &O::Key) -> bool {
        self.lock().contains_key(key)
    }

    /// See [`KeyTable::delete`].
    pub fn delete(&self, key: &O::Key) -> bool {
        self.lock().delete(key)
    }

    /// See [`KeyTable::remove`].
    pub fn remove(&self, key: &O::Key) -> Option<V> {
        self.lock().remove(key)
    }

    /// See [`KeyTable::count`].
    pub fn count(&self) -> usize {
        self.lock().count()
    }

    /// Returns the table, consuming the lock.
    pub fn into_inner(self) -> KeyTable<O, V> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: KeyOps, V: Clone> SharedTable<O, V> {
    /// Returns a clone of the value stored under `key`.
    pub fn lookup_cloned(&self, key: &O::Key) -> Option<V> {
        self.lock().lookup(key).cloned()
    }
}
