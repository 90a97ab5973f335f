//! chained-hashmap: a single-threaded separate-chaining hash map with
//! pluggable string hash functions and caller-driven resizing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small map whose bucket routing is fully observable, so the
//!   effect of a hash function and a capacity on chain density can be
//!   inspected and tuned by the caller.
//! - Layers:
//!   - Chain<K, V>: one bucket's singly linked list. Nodes live in a slot
//!     arena and link to their successor by slot key; the head is the most
//!     recently added entry.
//!   - ChainedHashMap<K, V, H>: a non-empty array of Chains indexed by
//!     `hash(key) % capacity`, owning the `KeyHasher` and the entry count.
//!
//! Constraints
//! - Single-threaded: no locking and no atomicity across calls. The map is
//!   `Send` so callers that need sharing can put it behind a `Mutex`.
//! - Keys are string-like (`K: AsRef<str> + Eq`); lookups accept borrowed
//!   forms (store `String`, query with `&str`).
//! - Keys are unique across the whole table. Only `put` adds entries and it
//!   overwrites on a hit, so chains never need their own duplicate check.
//! - No implicit growth. `table_load()` reports density and the caller
//!   decides when to `resize`.
//!
//! Resizing
//! - Every entry's new bucket is computed before the live buckets are
//!   touched. Entries then move into a freshly allocated bucket array in
//!   bucket order, head-to-tail, each added at its new chain's front, and
//!   the new array replaces the old one.
//! - The hasher is kept across resizes and must be pure.
//!
//! Reentrancy
//! - Routing calls user code (`KeyHasher`, `AsRef<str>`, `Eq`). In debug
//!   builds each key-routing or mutating entry point records its name and
//!   a nested call into the same map panics; release builds compile the
//!   check away.
//!
//! Notes and non-goals
//! - No ordering guarantees beyond bucket order and chain order.
//! - Capacity of zero is rejected with `CapacityError::Zero`; absence of a
//!   key is reported with `Option`, never an error.
//! - The `Display` dump (`"<index>: [(k, v) -> ...]"` per bucket) is for
//!   people, not parsers.

pub mod chain;
mod chained_hash_map;
mod chained_hash_map_proptest;
mod error;
mod hash;
mod reentrancy;

// Public surface
pub use chain::Chain;
pub use chained_hash_map::{ChainedHashMap, Iter};
pub use error::{CapacityError, UnknownHashFunction};
pub use hash::{codepoint_sum, weighted_codepoint_sum, HashFunction, KeyHasher};
