//! ChainedHashMap: bucket array of `Chain`s routed by a pluggable key hash.

use crate::chain::{self, Chain};
use crate::error::CapacityError;
use crate::hash::{HashFunction, KeyHasher};
use crate::reentrancy::ReentrancyCheck;
use core::borrow::Borrow;
use core::fmt;
use log::{debug, trace};

#[derive(Debug)]
pub struct ChainedHashMap<K, V, H = HashFunction> {
    hasher: H,
    buckets: Vec<Chain<K, V>>, // never empty
    len: usize,
    reentrancy: ReentrancyCheck,
}

fn new_buckets<K, V>(capacity: usize) -> Result<Vec<Chain<K, V>>, CapacityError> {
    if capacity == 0 {
        return Err(CapacityError::Zero);
    }
    Ok((0..capacity).map(|_| Chain::new()).collect())
}

#[inline]
fn route<H: KeyHasher + ?Sized>(hasher: &H, key: &str, capacity: usize) -> usize {
    (hasher.hash_key(key) % capacity as u64) as usize
}

impl<K, V> ChainedHashMap<K, V>
where
    K: AsRef<str> + Eq,
{
    /// A map with `capacity` buckets using the default code point sum.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        Self::with_hasher(capacity, HashFunction::default())
    }
}

/// Borrowing iterator in bucket order, head-to-tail within a bucket.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Chain<K, V>>,
    current: Option<chain::Iter<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(item);
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: AsRef<str> + Eq,
    H: KeyHasher,
{
    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, CapacityError> {
        let buckets = new_buckets(capacity)?;
        trace!("created chained map with {} buckets", capacity);
        Ok(Self {
            hasher,
            buckets,
            len: 0,
            reentrancy: ReentrancyCheck::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Bucket that `q` routes to under the current capacity.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        let _g = self.reentrancy.enter("bucket_index");
        self.index_of(q.as_ref())
    }

    fn index_of(&self, key: &str) -> usize {
        route(&self.hasher, key, self.buckets.len())
    }

    /// Insert or overwrite. Returns the previous value on overwrite, in which
    /// case `len` is unchanged. Never resizes.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("put");
        let idx = self.index_of(key.as_ref());
        let chain = &mut self.buckets[idx];
        if let Some(slot) = chain.find_mut(&key) {
            return Some(core::mem::replace(slot, value));
        }
        chain.add_front(key, value);
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let idx = self.index_of(q.as_ref());
        self.buckets[idx].find(q)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let idx = self.index_of(q.as_ref());
        self.buckets[idx].find_mut(q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        let idx = self.index_of(q.as_ref());
        self.buckets[idx].find(q).is_some()
    }

    /// Remove `q` if present. Absent keys are a no-op returning `None`.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsRef<str> + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let idx = self.index_of(q.as_ref());
        let (_, value) = self.buckets[idx].remove_entry(q)?;
        self.len -= 1;
        Some(value)
    }

    /// Drop every entry. Capacity and hasher are kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        trace!("clearing {} entries from {} buckets", self.len, self.buckets.len());
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Rehash every entry into `new_capacity` buckets.
    ///
    /// Target buckets are computed against the live table first; if the
    /// hasher panics the map is untouched. Entries then move (bucket order,
    /// head-to-tail, each added at its new chain's front) into a freshly
    /// allocated bucket array, which replaces the old one. Entries are moved,
    /// never cloned, and no user code runs once the old buckets are detached.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), CapacityError> {
        let _g = self.reentrancy.enter("resize");
        let mut fresh = new_buckets(new_capacity)?;

        let targets: Vec<usize> = self
            .buckets
            .iter()
            .flat_map(Chain::iter)
            .map(|(k, _)| route(&self.hasher, k.as_ref(), new_capacity))
            .collect();
        debug_assert_eq!(targets.len(), self.len);

        let old_capacity = self.buckets.len();
        let old = core::mem::take(&mut self.buckets);
        let entries = old.into_iter().flat_map(IntoIterator::into_iter);
        for ((key, value), idx) in entries.zip(targets) {
            fresh[idx].add_front(key, value);
        }

        debug!(
            "resized chained map from {} to {} buckets ({} entries)",
            old_capacity, new_capacity, self.len
        );
        self.buckets = fresh;
        Ok(())
    }

    /// Number of buckets whose chain is empty.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|c| c.is_empty()).count()
    }

    /// `len / capacity` as a ratio, the caller's signal for `resize`.
    pub fn table_load(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Snapshot of every entry in bucket order, head-to-tail within a bucket.
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// The bucket array, indexed by bucket.
    pub fn chains(&self) -> &[Chain<K, V>] {
        &self.buckets
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let total: usize = self.buckets.iter().map(Chain::len).sum();
        assert_eq!(total, self.len, "len must equal the sum of chain lengths");
        for (idx, chain) in self.buckets.iter().enumerate() {
            for (k, _) in chain.iter() {
                assert_eq!(self.index_of(k.as_ref()), idx, "entry in foreign bucket");
            }
        }
        assert_eq!(self.reentrancy.active(), None);
    }
}

impl<'a, K, V, H> IntoIterator for &'a ChainedHashMap<K, V, H>
where
    K: AsRef<str> + Eq,
    H: KeyHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One `"<index>: <chain>"` line per bucket, ascending.
impl<K, V, H> fmt::Display for ChainedHashMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{}: {}", idx, chain)?;
        }
        Ok(())
    }
}
