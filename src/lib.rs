#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;

pub mod hash_table;

/// A presence-only set built on [`KeyTable`].
///
/// This module provides a `KeySet` that stores keys with `()` values and is
/// typically used with [`PtrKeys`] to deduplicate live objects by address.
pub mod hash_set;

/// Key capability sets.
///
/// A [`KeyOps`] value tells a table how to hash, compare, copy and release
/// its keys. Pointer-identity, owned text, borrowed text and fully generic
/// variants are provided.
pub mod key_ops;

#[cfg(feature = "std")]
pub mod shared;

mod validate;

pub use error::InsertError;
pub use error::TableError;
pub use hash_set::KeySet;
pub use hash_table::Inserted;
pub use hash_table::KeyTable;
pub use key_ops::BorrowedStrKeys;
pub use key_ops::FnKeys;
pub use key_ops::Hashed;
pub use key_ops::KeyOps;
pub use key_ops::PtrKeys;
pub use key_ops::StrKeys;
#[cfg(feature = "std")]
pub use shared::SharedTable;
pub use validate::ValidationError;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`Hashed::new`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`Hashed::new`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
