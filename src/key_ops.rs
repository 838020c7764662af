use alloc::boxed::Box;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::marker::PhantomData;

/// The capability set that defines key semantics for one table instance.
///
/// `Key` is the form a key is probed with and `Owned` is the form the table
/// stores. A table calls [`copy_key`] exactly once when it accepts a new key
/// and [`release_key`] exactly once when that key leaves the table, either
/// through deletion or when the table is dropped. Replacing the value of an
/// existing key calls neither.
///
/// `hash` must be a pure function of the key and consistent with `compare`:
/// keys that compare equal must hash equal.
///
/// [`copy_key`]: KeyOps::copy_key
/// [`release_key`]: KeyOps::release_key
///
/// # Examples
///
/// ```rust
/// use keyops_hash::KeyOps;
/// use keyops_hash::KeyTable;
///
/// /// Case-insensitive ASCII keys.
/// struct NoCase;
///
/// impl KeyOps for NoCase {
///     type Key = str;
///     type Owned = Box<str>;
///
///     fn hash(&self, key: &str) -> u64 {
///         key.bytes()
///             .fold(0xcbf29ce484222325, |h, b| {
///                 (h ^ b.to_ascii_lowercase() as u64).wrapping_mul(0x100000001b3)
///             })
///     }
///
///     fn compare(&self, key1: &str, key2: &str) -> bool {
///         key1.eq_ignore_ascii_case(key2)
///     }
///
///     fn copy_key(&self, key: &str) -> Box<str> {
///         key.into()
///     }
/// }
///
/// let mut table = KeyTable::new(NoCase).unwrap();
/// table.insert("Alpha", 1).unwrap();
/// assert_eq!(table.lookup("ALPHA"), Some(&1));
/// ```
pub trait KeyOps {
    /// The borrowed key form used for probing.
    type Key: ?Sized;
    /// The key form owned by the table.
    type Owned: Borrow<Self::Key>;

    /// Returns the hash of `key`.
    fn hash(&self, key: &Self::Key) -> u64;

    /// Returns `true` if both keys are equivalent.
    fn compare(&self, key1: &Self::Key, key2: &Self::Key) -> bool;

    /// Produces the table's own copy of a newly accepted key.
    fn copy_key(&self, key: &Self::Key) -> Self::Owned;

    /// Releases a key that is leaving the table.
    fn release_key(&self, key: Self::Owned) {
        drop(key);
    }
}

impl<O> KeyOps for &O
where
    O: KeyOps + ?Sized,
{
    type Key = O::Key;
    type Owned = O::Owned;

    #[inline]
    fn hash(&self, key: &Self::Key) -> u64 {
        (**self).hash(key)
    }

    #[inline]
    fn compare(&self, key1: &Self::Key, key2: &Self::Key) -> bool {
        (**self).compare(key1, key2)
    }

    #[inline]
    fn copy_key(&self, key: &Self::Key) -> Self::Owned {
        (**self).copy_key(key)
    }

    #[inline]
    fn release_key(&self, key: Self::Owned) {
        (**self).release_key(key)
    }
}

#[inline(always)]
pub(crate) fn borrow_key<O: KeyOps + ?Sized>(owned: &O::Owned) -> &O::Key {
    <O::Owned as Borrow<O::Key>>::borrow(owned)
}

/// String digest used by the text key variants.
///
/// Multiplicative hash in the style of CPython's classic string hash; the
/// empty string hashes to zero.
pub fn hash_str(key: &str) -> u64 {
    let bytes = key.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return 0;
    };

    let mut hash = (first as u64) << 7;
    for &byte in rest {
        hash = hash.wrapping_mul(1_000_003) ^ byte as u64;
    }
    hash ^ bytes.len() as u64
}

/// Identity keys: raw addresses hashed by their address bits.
///
/// Two distinct objects are always distinct keys, whatever their contents.
/// Copying and releasing are no-ops; the caller keeps the pointees alive for
/// as long as it relies on the addresses being unique.
pub struct PtrKeys<T: ?Sized>(PhantomData<fn(*const T)>);

impl<T: ?Sized> PtrKeys<T> {
    /// Creates the identity capability set.
    pub const fn new() -> Self {
        PtrKeys(PhantomData)
    }
}

impl<T: ?Sized> Default for PtrKeys<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for PtrKeys<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for PtrKeys<T> {}

impl<T: ?Sized> Debug for PtrKeys<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PtrKeys")
    }
}

impl<T: ?Sized> KeyOps for PtrKeys<T> {
    type Key = *const T;
    type Owned = *const T;

    #[inline]
    fn hash(&self, key: &*const T) -> u64 {
        key.addr() as u64
    }

    #[inline]
    fn compare(&self, key1: &*const T, key2: &*const T) -> bool {
        core::ptr::addr_eq(*key1, *key2)
    }

    #[inline]
    fn copy_key(&self, key: &*const T) -> *const T {
        *key
    }

    #[inline]
    fn release_key(&self, _key: *const T) {}
}

/// Owned text keys: every accepted key is duplicated into a `Box<str>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrKeys;

impl KeyOps for StrKeys {
    type Key = str;
    type Owned = Box<str>;

    #[inline]
    fn hash(&self, key: &str) -> u64 {
        hash_str(key)
    }

    #[inline]
    fn compare(&self, key1: &str, key2: &str) -> bool {
        key1 == key2
    }

    #[inline]
    fn copy_key(&self, key: &str) -> Box<str> {
        Box::from(key)
    }
}

/// Borrowed text keys whose lifetime is managed by the caller.
///
/// Keys are stored as given, without copying, and must outlive the table.
/// Lookups therefore also take `&'a str` keys.
pub struct BorrowedStrKeys<'a>(PhantomData<&'a str>);

impl<'a> BorrowedStrKeys<'a> {
    /// Creates the borrowed text capability set.
    pub const fn new() -> Self {
        BorrowedStrKeys(PhantomData)
    }
}

impl Default for BorrowedStrKeys<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BorrowedStrKeys<'_> {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for BorrowedStrKeys<'_> {}

impl Debug for BorrowedStrKeys<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BorrowedStrKeys")
    }
}

impl<'a> KeyOps for BorrowedStrKeys<'a> {
    type Key = &'a str;
    type Owned = &'a str;

    #[inline]
    fn hash(&self, key: &&'a str) -> u64 {
        hash_str(key)
    }

    #[inline]
    fn compare(&self, key1: &&'a str, key2: &&'a str) -> bool {
        key1 == key2
    }

    #[inline]
    fn copy_key(&self, key: &&'a str) -> &'a str {
        *key
    }
}

/// Generic keys through the standard `Hash` and `Eq` traits.
///
/// Keys are hashed with the configured [`BuildHasher`] and copied with
/// `Clone`.
pub struct Hashed<K, S> {
    hash_builder: S,
    _key: PhantomData<fn(&K)>,
}

impl<K, S> Hashed<K, S> {
    /// Creates the capability set with the given hasher builder.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Hashed {
            hash_builder,
            _key: PhantomData,
        }
    }

    /// Returns a reference to the hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K> Hashed<K, crate::DefaultHashBuilder> {
    /// Creates the capability set with the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, S: Default> Default for Hashed<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S: Clone> Clone for Hashed<K, S> {
    fn clone(&self) -> Self {
        Self::with_hasher(self.hash_builder.clone())
    }
}

impl<K, S> Debug for Hashed<K, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hashed").finish_non_exhaustive()
    }
}

impl<K, S> KeyOps for Hashed<K, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    type Key = K;
    type Owned = K;

    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    #[inline]
    fn compare(&self, key1: &K, key2: &K) -> bool {
        key1 == key2
    }

    #[inline]
    fn copy_key(&self, key: &K) -> K {
        key.clone()
    }
}

/// Fully generic keys: all four operations supplied as function pointers.
pub struct FnKeys<K> {
    /// Hash function.
    pub hash: fn(&K) -> u64,
    /// Equivalence relation consistent with `hash`.
    pub compare: fn(&K, &K) -> bool,
    /// Produces the stored copy of a new key.
    pub copy_key: fn(&K) -> K,
    /// Consumes a stored key leaving the table.
    pub release_key: fn(K),
}

impl<K> FnKeys<K> {
    /// Creates a capability set from its four operations.
    pub const fn new(
        hash: fn(&K) -> u64,
        compare: fn(&K, &K) -> bool,
        copy_key: fn(&K) -> K,
        release_key: fn(K),
    ) -> Self {
        FnKeys {
            hash,
            compare,
            copy_key,
            release_key,
        }
    }
}

impl<K> Clone for FnKeys<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for FnKeys<K> {}

impl<K> Debug for FnKeys<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnKeys").finish_non_exhaustive()
    }
}

impl<K> KeyOps for FnKeys<K> {
    type Key = K;
    type Owned = K;

    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn compare(&self, key1: &K, key2: &K) -> bool {
        (self.compare)(key1, key2)
    }

    #[inline]
    fn copy_key(&self, key: &K) -> K {
        (self.copy_key)(key)
    }

    #[inline]
    fn release_key(&self, key: K) {
        (self.release_key)(key)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::hash::Hasher;

    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipBuilder;

    impl BuildHasher for SipBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(7, 11)
        }
    }

    #[test]
    fn str_hash_matches_reference_values() {
        assert_eq!(hash_str(""), 0);
        // 'a' << 7, then xor with length 1.
        assert_eq!(hash_str("a"), (97u64 << 7) ^ 1);
        let expected = ((97u64 << 7).wrapping_mul(1_000_003) ^ 98) ^ 2;
        assert_eq!(hash_str("ab"), expected);
        assert_ne!(hash_str("ab"), hash_str("ba"));
    }

    #[test]
    fn str_keys_copy_and_compare_by_content() {
        let ops = StrKeys;
        let owned: Box<str> = ops.copy_key("alpha");
        let source = String::from("alpha");
        assert!(ops.compare(&owned, &source));
        assert_eq!(ops.hash(&owned), ops.hash(&source));
        assert!(!ops.compare("alpha", "Alpha"));
    }

    #[test]
    fn ptr_keys_compare_by_address() {
        let a = [1u32, 2];
        let b = [1u32, 2];
        let ops = PtrKeys::<[u32; 2]>::new();
        let pa: *const [u32; 2] = &a;
        let pb: *const [u32; 2] = &b;

        assert!(ops.compare(&pa, &pa));
        assert!(!ops.compare(&pa, &pb));
        assert_eq!(ops.hash(&pa), pa.addr() as u64);
        assert_eq!(ops.copy_key(&pa), pa);
    }

    #[test]
    fn ptr_keys_accept_unsized_pointees() {
        let text = "shared";
        let ops = PtrKeys::<str>::new();
        let p: *const str = text;
        assert!(ops.compare(&p, &p));
        assert_eq!(ops.hash(&p), text.as_ptr().addr() as u64);
    }

    #[test]
    fn hashed_uses_builder() {
        let ops: Hashed<u64, SipBuilder> = Hashed::with_hasher(SipBuilder);
        let mut h = SipHasher::new_with_keys(7, 11);
        42u64.hash(&mut h);
        assert_eq!(ops.hash(&42), h.finish());
        assert!(ops.compare(&42, &42));
        assert_eq!(ops.copy_key(&42), 42);
    }

    #[test]
    fn fn_keys_dispatch_to_supplied_functions() {
        let ops = FnKeys::new(
            |k: &u32| *k as u64 * 3,
            |a: &u32, b: &u32| a == b,
            |k: &u32| *k,
            |_: u32| {},
        );
        assert_eq!(ops.hash(&5), 15);
        assert!(ops.compare(&5, &5));
        assert_eq!(ops.copy_key(&9), 9);
        ops.release_key(9);
    }

    #[test]
    fn borrowed_str_keys_store_without_copying() {
        let text = String::from("kept");
        let ops = BorrowedStrKeys::new();
        let key: &str = &text;
        let stored = ops.copy_key(&key);
        assert!(core::ptr::eq(stored, key));
        assert_eq!(ops.hash(&key), hash_str("kept"));
    }
}
