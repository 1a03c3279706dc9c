use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::iter::FusedIterator;

use log::debug;
use log::trace;

use crate::error::TableError;
use crate::hash_fn::GoldenRatio;
use crate::hash_fn::HashFunction;

/// Bucket count used by [`HashTable::new`] and [`HashTable::with_hash_fn`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Shrinking never takes the bucket count below this.
pub const MIN_CAPACITY: usize = 16;

/// Number of bins reported by [`HashTable::chain_histogram`].
#[cfg(any(test, feature = "stats"))]
pub const HISTOGRAM_BINS: usize = 8;

/// Growth fires when the load factor, counted before the new entry, reaches
/// 3/4.
#[inline(always)]
fn needs_grow(populated: usize, capacity: usize) -> bool {
    populated * 4 >= capacity * 3
}

/// Shrink fires at a load factor of 1/4 or less, counted after the removal.
#[inline(always)]
fn needs_shrink(populated: usize, capacity: usize) -> bool {
    populated > 0 && populated * 4 <= capacity && capacity > MIN_CAPACITY
}

fn empty_buckets(capacity: usize) -> Vec<Bucket> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Bucket::default);
    buckets
}

/// One chain node. `prev` and `next` index into the owning bucket's
/// `entries`.
#[derive(Debug, Clone, Copy)]
struct Entry {
    key: i32,
    value: i32,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A chain head plus storage for every node in the chain.
///
/// Storage order is unrelated to chain order; only `head` and the links
/// define the chain.
#[derive(Debug, Clone, Default)]
struct Bucket {
    head: Option<usize>,
    entries: Vec<Entry>,
}

impl Bucket {
    #[inline(always)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_front(&mut self, key: i32, value: i32) {
        let index = self.entries.len();
        self.entries.push(Entry {
            key,
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            self.entries[head].prev = Some(index);
        }
        self.head = Some(index);
    }

    /// Storage index of the first node matching `key`, walking from the head.
    fn position(&self, key: i32) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let entry = &self.entries[index];
            if entry.key == key {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Unlinks and returns the node stored at `index`.
    ///
    /// The last node in storage is swapped into the hole, so its neighbors
    /// (or the head) are pointed at its new index before returning.
    fn unlink(&mut self, index: usize) -> Entry {
        let Entry { prev, next, .. } = self.entries[index];
        match prev {
            Some(prev) => self.entries[prev].next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            self.entries[next].prev = prev;
        }

        let removed = self.entries.swap_remove(index);

        if index < self.entries.len() {
            let Entry { prev, next, .. } = self.entries[index];
            match prev {
                Some(prev) => self.entries[prev].next = Some(index),
                None => self.head = Some(index),
            }
            if let Some(next) = next {
                self.entries[next].prev = Some(index);
            }
        }

        removed
    }

    fn clear(&mut self) {
        self.head = None;
        self.entries.clear();
    }

    fn chain(&self) -> Chain<'_> {
        Chain {
            entries: &self.entries,
            cursor: self.head,
            remaining: self.entries.len(),
        }
    }
}

/// Chain length statistics for a [`HashTable`].
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct ChainStats {
    /// Number of entries in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets with at least one entry
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Bucket utilization (occupied_buckets / capacity)
    pub bucket_utilization: f64,
}

#[cfg(any(test, feature = "stats"))]
impl ChainStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Chain Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest chain: {} entries", self.longest_chain);
    }
}

/// Counts of buckets by chain length.
///
/// Bin `i` counts buckets holding exactly `i` entries, except the last bin,
/// which also collects every longer chain.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// The raw bin counts.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let last = self.bins.len() - 1;
        println!("chain histogram ({} buckets):", self.bins.iter().sum::<usize>());
        for (len, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            let label = if len == last {
                alloc::format!("{:>2}+", len)
            } else {
                alloc::format!("{:>3}", len)
            };
            println!("{} | {} ({})", label, "█".repeat(width), count);
        }
    }
}

/// A hash table from `i32` keys to `i32` values using separate chaining.
///
/// Each bucket heads a doubly linked chain. New entries always go to the front
/// of their chain and keys are **not** deduplicated: inserting a key that is
/// already present shadows the older entry rather than replacing it, and
/// removing the newer entry makes the older one visible again. Every resize
/// reverses the order of entries sharing a chain, so after one the oldest
/// duplicate is the visible one.
///
/// The bucket count doubles before an insert that would find the table at
/// a load factor of 3/4 or more, and halves (never below [`MIN_CAPACITY`])
/// after a removal that leaves it at 1/4 or less.
///
/// ## Example
///
/// ```rust
/// # use chain_hash::HashTable;
/// # use chain_hash::TableError;
/// #
/// let mut table = HashTable::new();
/// table.insert(5, 50);
/// table.insert(15, 150);
/// table.insert(25, 250);
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get(15), Ok(150));
///
/// table.remove(15).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get(15), Err(TableError::KeyNotFound(15)));
/// ```
#[derive(Clone)]
pub struct HashTable<H = GoldenRatio> {
    buckets: Vec<Bucket>,
    populated: usize,
    hash_fn: H,
}

impl HashTable<GoldenRatio> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets and the
    /// golden-ratio hash.
    pub fn new() -> Self {
        Self::with_hash_fn(GoldenRatio)
    }

    /// Creates an empty table with `capacity` buckets and the golden-ratio
    /// hash.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidArgument`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// #
    /// let table = HashTable::with_capacity(64).unwrap();
    /// assert_eq!(table.capacity(), 64);
    /// assert!(HashTable::with_capacity(0).is_err());
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hash_fn(capacity, GoldenRatio)
    }
}

impl<H> Default for HashTable<H>
where
    H: HashFunction + Default,
{
    fn default() -> Self {
        Self::with_hash_fn(H::default())
    }
}

impl<H> HashTable<H>
where
    H: HashFunction,
{
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets using
    /// `hash_fn`.
    pub fn with_hash_fn(hash_fn: H) -> Self {
        Self {
            buckets: empty_buckets(DEFAULT_CAPACITY),
            populated: 0,
            hash_fn,
        }
    }

    /// Creates an empty table with `capacity` buckets using `hash_fn`.
    ///
    /// A capacity below [`MIN_CAPACITY`] is kept until the table grows;
    /// shrinking never returns below [`MIN_CAPACITY`].
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidArgument`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// #
    /// let table = HashTable::with_capacity_and_hash_fn(4, |key: i32| key as u32).unwrap();
    /// assert_eq!(table.capacity(), 4);
    /// ```
    pub fn with_capacity_and_hash_fn(capacity: usize, hash_fn: H) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidArgument("capacity must be positive"));
        }

        Ok(Self {
            buckets: empty_buckets(capacity),
            populated: 0,
            hash_fn,
        })
    }

    /// Returns the hash function.
    pub fn hash_fn(&self) -> &H {
        &self.hash_fn
    }

    /// Returns the number of entries, counting shadowed duplicates.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    #[inline(always)]
    fn bucket_index(&self, key: i32) -> usize {
        self.hash_fn.hash(key) as usize % self.buckets.len()
    }

    /// Inserts `key -> value` at the front of the key's chain.
    ///
    /// An existing entry for `key` is kept and shadowed. If the table is at a
    /// load factor of 3/4 or more before the insert, the bucket count doubles
    /// first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(7, 1);
    /// table.insert(7, 2);
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get(7), Ok(2));
    ///
    /// table.remove(7).unwrap();
    /// assert_eq!(table.get(7), Ok(1));
    /// ```
    pub fn insert(&mut self, key: i32, value: i32) {
        if needs_grow(self.populated, self.capacity()) {
            self.resize(self.capacity() * 2);
        }

        self.link(key, value);
    }

    /// Links a new entry without checking the load factor.
    fn link(&mut self, key: i32, value: i32) {
        let index = self.bucket_index(key);
        self.buckets[index].push_front(key, value);
        self.populated += 1;
    }

    /// Returns the most recently inserted value for `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if no entry matches.
    pub fn get(&self, key: i32) -> Result<i32, TableError> {
        self.find(key).ok_or(TableError::KeyNotFound(key))
    }

    /// Returns the most recently inserted value for `key`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(-3, 30);
    /// assert_eq!(table.find(-3), Some(30));
    /// assert_eq!(table.find(3), None);
    /// ```
    pub fn find(&self, key: i32) -> Option<i32> {
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket
            .position(key)
            .map(|index| bucket.entries[index].value)
    }

    /// Returns `true` if any entry has `key`.
    pub fn contains_key(&self, key: i32) -> bool {
        self.find(key).is_some()
    }

    /// Removes the most recently inserted entry for `key` and returns its
    /// value.
    ///
    /// Older duplicates of `key` stay in the table. If the removal leaves the
    /// table non-empty at a load factor of 1/4 or less, the bucket count halves
    /// (not below [`MIN_CAPACITY`]).
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if no entry matches; the table is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// # use chain_hash::TableError;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(1, 10);
    /// assert_eq!(table.remove(1), Ok(10));
    /// assert_eq!(table.remove(1), Err(TableError::KeyNotFound(1)));
    /// ```
    pub fn remove(&mut self, key: i32) -> Result<i32, TableError> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.position(key).ok_or(TableError::KeyNotFound(key))?;
        let removed = bucket.unlink(position);
        self.populated -= 1;

        if needs_shrink(self.populated, self.capacity()) {
            let new_capacity = (self.capacity() / 2).max(MIN_CAPACITY);
            trace!(
                "shrinking hash table: {} entries in {} buckets",
                self.populated,
                self.capacity()
            );
            self.resize(new_capacity);
        }

        Ok(removed.value)
    }

    /// Removes every entry, keeping the bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Rebuilds the table with `new_capacity` buckets.
    ///
    /// Old buckets are visited in index order and each chain from head to
    /// tail, linking every entry at the front of its new chain. Entries that
    /// share a new bucket therefore come out in reverse order, which flips
    /// which duplicate of a key is visible. Migration goes through `link`,
    /// which never checks the load factor, so a resize cannot trigger
    /// another one.
    #[cold]
    fn resize(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > 0);

        let old_capacity = self.capacity();
        let old_buckets = core::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        let migrating = core::mem::replace(&mut self.populated, 0);

        for bucket in &old_buckets {
            for (key, value) in bucket.chain() {
                self.link(key, value);
            }
        }

        debug_assert_eq!(self.populated, migrating);
        debug!(
            "resized hash table from {} to {} buckets ({} entries)",
            old_capacity, new_capacity, migrating
        );
    }

    /// Returns the chain of bucket `index`, head to tail, or `None` if
    /// `index` is out of range.
    pub fn bucket(&self, index: usize) -> Option<Chain<'_>> {
        self.buckets.get(index).map(Bucket::chain)
    }

    /// Enumerates non-empty buckets in index order with their chains.
    ///
    /// Each chain yields `(key, value)` from head (most recent) to tail. The
    /// iterator is lazy and can be cloned to restart from the same point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity_and_hash_fn(4, |key: i32| key as u32).unwrap();
    /// table.insert(1, 10);
    /// table.insert(5, 50);
    /// table.insert(2, 20);
    ///
    /// let dump: Vec<(usize, Vec<(i32, i32)>)> = table
    ///     .dump()
    ///     .map(|(index, chain)| (index, chain.collect()))
    ///     .collect();
    /// assert_eq!(dump, [(1, vec![(5, 50), (1, 10)]), (2, vec![(2, 20)])]);
    /// ```
    pub fn dump(&self) -> Dump<'_> {
        Dump {
            buckets: &self.buckets,
            index: 0,
        }
    }

    /// Iterates every `(key, value)` in dump order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            dump: self.dump(),
            chain: None,
            remaining: self.populated,
        }
    }

    /// Returns chain length statistics.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_stats(&self) -> ChainStats {
        let occupied_buckets = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Bucket::len).max().unwrap_or(0);

        ChainStats {
            populated: self.populated,
            capacity: self.capacity(),
            occupied_buckets,
            longest_chain,
            load_factor: self.load_factor(),
            bucket_utilization: occupied_buckets as f64 / self.capacity() as f64,
        }
    }

    /// Returns a histogram of chain lengths with [`HISTOGRAM_BINS`] bins.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let mut bins = alloc::vec![0usize; HISTOGRAM_BINS];
        for bucket in &self.buckets {
            bins[bucket.len().min(HISTOGRAM_BINS - 1)] += 1;
        }
        ChainHistogram { bins }
    }
}

impl<H> Debug for HashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("size", &self.populated)
            .field("capacity", &self.buckets.len())
            .field(
                "buckets",
                &Dump {
                    buckets: &self.buckets,
                    index: 0,
                },
            )
            .finish()
    }
}

/// One line per non-empty bucket: `Bucket 1: (9:90) (1:10)`.
impl<H> Display for HashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = Dump {
            buckets: &self.buckets,
            index: 0,
        };
        for (index, chain) in dump {
            write!(f, "Bucket {}:", index)?;
            for (key, value) in chain {
                write!(f, " ({}:{})", key, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<H> Extend<(i32, i32)> for HashTable<H>
where
    H: HashFunction,
{
    fn extend<I: IntoIterator<Item = (i32, i32)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl FromIterator<(i32, i32)> for HashTable<GoldenRatio> {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, H> IntoIterator for &'a HashTable<H>
where
    H: HashFunction,
{
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The entries of one bucket, head to tail.
///
/// Created by [`HashTable::bucket`] and [`HashTable::dump`].
#[derive(Clone)]
pub struct Chain<'a> {
    entries: &'a [Entry],
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = &self.entries[self.cursor?];
        self.cursor = entry.next;
        self.remaining -= 1;
        Some((entry.key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chain<'_> {}

impl FusedIterator for Chain<'_> {}

impl Debug for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Non-empty buckets of a [`HashTable`] in index order.
///
/// Created by [`HashTable::dump`].
#[derive(Clone)]
pub struct Dump<'a> {
    buckets: &'a [Bucket],
    index: usize,
}

impl<'a> Iterator for Dump<'a> {
    type Item = (usize, Chain<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.buckets.len() {
            let index = self.index;
            self.index += 1;

            let bucket = &self.buckets[index];
            if !bucket.is_empty() {
                return Some((index, bucket.chain()));
            }
        }

        None
    }
}

impl FusedIterator for Dump<'_> {}

impl Debug for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.clone()).finish()
    }
}

/// All `(key, value)` pairs of a [`HashTable`] in dump order.
///
/// Created by [`HashTable::iter`].
#[derive(Clone)]
pub struct Iter<'a> {
    dump: Dump<'a>,
    chain: Option<Chain<'a>>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(pair);
            }

            let (_, chain) = self.dump.next()?;
            self.chain = Some(chain);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
