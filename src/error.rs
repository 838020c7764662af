//! Error types returned by table operations.
//!
//! Failures are reported through return values only; the table never panics,
//! aborts or logs on these paths.

use alloc::collections::TryReserveError;
use core::fmt::Debug;
use core::fmt::Display;

/// The backing slot array could not be sized or acquired.
///
/// Operations that fail with this error leave the table exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The requested capacity has no representable power of two.
    CapacityOverflow,
    /// The allocator refused the slot array.
    Alloc(TryReserveError),
}

impl Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TableError::CapacityOverflow => f.write_str("hash table capacity overflow"),
            TableError::Alloc(e) => write!(f, "failed to allocate hash table slots: {e}"),
        }
    }
}

impl core::error::Error for TableError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TableError::CapacityOverflow => None,
            TableError::Alloc(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for TableError {
    fn from(e: TryReserveError) -> Self {
        TableError::Alloc(e)
    }
}

/// An insertion that could not grow the table.
///
/// The table is unmodified and the value that was being inserted is handed
/// back to the caller.
pub struct InsertError<V> {
    error: TableError,
    value: V,
}

impl<V> InsertError<V> {
    pub(crate) fn new(error: TableError, value: V) -> Self {
        InsertError { error, value }
    }

    /// Returns the underlying allocation error.
    pub fn error(&self) -> &TableError {
        &self.error
    }

    /// Returns the value that was not inserted.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Discards the value and returns the allocation error.
    pub fn into_error(self) -> TableError {
        self.error
    }
}

impl<V> Debug for InsertError<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<V> Display for InsertError<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "insert failed: {}", self.error)
    }
}

impl<V> core::error::Error for InsertError<V> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::error::Error;

    use super::*;

    fn reserve_failure() -> TryReserveError {
        let mut v: Vec<u64> = Vec::new();
        match v.try_reserve_exact(usize::MAX) {
            Err(e) => e,
            Ok(()) => unreachable!("reserving usize::MAX elements cannot succeed"),
        }
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            TableError::CapacityOverflow.to_string(),
            "hash table capacity overflow"
        );
        let alloc = TableError::from(reserve_failure());
        assert!(
            alloc
                .to_string()
                .starts_with("failed to allocate hash table slots")
        );
        assert!(alloc.source().is_some());
    }

    #[test]
    fn insert_error_hands_value_back() {
        let err = InsertError::new(TableError::CapacityOverflow, "payload");
        assert_eq!(err.error(), &TableError::CapacityOverflow);
        assert_eq!(err.to_string(), "insert failed: hash table capacity overflow");
        assert!(err.source().is_some());
        assert_eq!(err.into_value(), "payload");
    }
}
