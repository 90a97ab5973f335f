//! Chain: one bucket's singly linked list, stored in a slot arena.
//!
//! Nodes live in a `SlotMap` and link to their successor by slot key, so the
//! list owns every entry without raw pointers. The head is the most recently
//! added entry; iteration runs head-to-tail.
//!
//! Each chain owns its own arena. An empty chain holds none, so a fresh
//! table of C buckets costs only the bucket array; the arena is created by
//! the first `add_front` and released when the chain empties through
//! `remove` or `clear`. While entries remain, the arena keeps its peak
//! size.

use core::borrow::Borrow;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub struct Chain<K, V> {
    // Created by the first `add_front`, dropped again once the chain empties.
    nodes: Option<SlotMap<DefaultKey, Node<K, V>>>,
    head: Option<DefaultKey>,
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Chain<K, V> {
    /// An empty chain. Does not allocate.
    pub const fn new() -> Self {
        Self {
            nodes: None,
            head: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.as_ref().map_or(0, SlotMap::len)
    }
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Link a new entry in as the head. Does not check for an existing
    /// entry with the same key; the table only calls this on a miss.
    pub fn add_front(&mut self, key: K, value: V) {
        let next = self.head;
        let nodes = self.nodes.get_or_insert_with(SlotMap::with_key);
        let slot = nodes.insert(Node { key, value, next });
        self.head = Some(slot);
    }

    fn position<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let nodes = self.nodes.as_ref()?;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = nodes.get(slot)?;
            if node.key.borrow() == q {
                return Some(slot);
            }
            cursor = node.next;
        }
        None
    }

    /// First entry (from the head) whose key equals `q`.
    pub fn find<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slot = self.position(q)?;
        let node = self.nodes.as_ref()?.get(slot)?;
        Some((&node.key, &node.value))
    }

    /// Writable form of `find`; the table's overwrite path goes through here.
    pub fn find_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slot = self.position(q)?;
        let node = self.nodes.as_mut()?.get_mut(slot)?;
        Some(&mut node.value)
    }

    /// Unlink the entry for `q`, returning whether one was removed.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.remove_entry(q).is_some()
    }

    /// Unlink the entry for `q` and hand back the owned pair.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let removed = self.unlink(q)?;
        if self.head.is_none() {
            self.nodes = None;
        }
        Some((removed.key, removed.value))
    }

    fn unlink<Q>(&mut self, q: &Q) -> Option<Node<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let nodes = self.nodes.as_mut()?;
        let head = self.head?;
        let head_node = nodes.get(head)?;
        if head_node.key.borrow() == q {
            let node = nodes.remove(head)?;
            self.head = node.next;
            return Some(node);
        }

        let mut prev = head;
        let mut cursor = head_node.next;
        while let Some(slot) = cursor {
            let node = nodes.get(slot)?;
            if node.key.borrow() == q {
                let next = node.next;
                if let Some(p) = nodes.get_mut(prev) {
                    p.next = next;
                }
                return nodes.remove(slot);
            }
            prev = slot;
            cursor = node.next;
        }
        None
    }

    /// Drop every entry and release the arena.
    pub fn clear(&mut self) {
        self.nodes = None;
        self.head = None;
    }

    /// Head-to-tail iteration.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.nodes.as_ref(),
            cursor: self.head,
            remaining: self.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_arena(&self) -> bool {
        self.nodes.is_some()
    }
}

/// Borrowing head-to-tail iterator over a `Chain`.
pub struct Iter<'a, K, V> {
    nodes: Option<&'a SlotMap<DefaultKey, Node<K, V>>>,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.nodes?.get(slot)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Consuming head-to-tail iterator; yields owned pairs.
pub struct IntoIter<K, V> {
    chain: Chain<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.chain.head?;
        let node = self.chain.nodes.as_mut()?.remove(slot)?;
        self.chain.head = node.next;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.chain.len();
        (n, Some(n))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for Chain<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

impl<'a, K, V> IntoIterator for &'a Chain<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders `[(k1, v1) -> (k2, v2)]`, head first.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for Chain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "({}, {})", k, v)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(c: &Chain<String, i32>) -> Vec<&str> {
        c.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn chain_of(ks: &[&str]) -> Chain<String, i32> {
        let mut c = Chain::new();
        for (i, k) in ks.iter().enumerate() {
            c.add_front((*k).to_string(), i as i32);
        }
        c
    }

    /// Invariant: `add_front` makes the newest entry the head and bumps `len`.
    #[test]
    fn add_front_orders_newest_first() {
        let mut c: Chain<String, i32> = Chain::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);

        c.add_front("a".to_string(), 1);
        c.add_front("b".to_string(), 2);
        c.add_front("c".to_string(), 3);
        assert_eq!(keys(&c), ["c", "b", "a"]);
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
    }

    /// Invariant: `find` returns the matching pair; `find_mut` writes through
    /// to the stored value; absent keys yield `None`.
    #[test]
    fn find_and_find_mut() {
        let mut c = chain_of(&["a", "b", "c"]);
        assert_eq!(c.find("b"), Some((&"b".to_string(), &1)));
        assert!(c.find("z").is_none());

        *c.find_mut("b").expect("b present") = 40;
        assert_eq!(c.find("b").map(|(_, v)| *v), Some(40));
        assert!(c.find_mut("z").is_none());
        assert_eq!(c.len(), 3);
    }

    /// Invariant: removing the head promotes its successor.
    #[test]
    fn remove_head() {
        let mut c = chain_of(&["a", "b", "c"]);
        assert!(c.remove("c"));
        assert_eq!(keys(&c), ["b", "a"]);
        assert_eq!(c.len(), 2);
    }

    /// Invariant: removing from the middle or the tail splices the
    /// predecessor to the successor.
    #[test]
    fn remove_middle_and_tail() {
        let mut c = chain_of(&["a", "b", "c", "d"]);
        assert_eq!(c.remove_entry("c"), Some(("c".to_string(), 2)));
        assert_eq!(keys(&c), ["d", "b", "a"]);
        assert!(c.remove("a"));
        assert_eq!(keys(&c), ["d", "b"]);
        assert_eq!(c.len(), 2);

        c.add_front("e".to_string(), 9);
        assert_eq!(keys(&c), ["e", "d", "b"]);
    }

    /// Invariant: removal of an absent key, or from an empty chain, is a
    /// no-op that reports `false`.
    #[test]
    fn remove_absent_is_noop() {
        let mut empty: Chain<String, i32> = Chain::new();
        assert!(!empty.remove("a"));

        let mut c = chain_of(&["a", "b"]);
        assert!(!c.remove("z"));
        assert_eq!(keys(&c), ["b", "a"]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn remove_only_entry_empties_chain() {
        let mut c = chain_of(&["solo"]);
        assert!(c.remove("solo"));
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert_eq!(c.iter().count(), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut c = chain_of(&["a", "b", "c"]);
        c.clear();
        assert!(c.is_empty());
        assert!(c.find("a").is_none());
        c.add_front("x".to_string(), 1);
        assert_eq!(keys(&c), ["x"]);
    }

    /// Invariant: the consuming iterator yields owned pairs head-to-tail and
    /// reports an exact length.
    #[test]
    fn into_iter_is_head_to_tail() {
        let c = chain_of(&["a", "b", "c"]);
        let it = c.into_iter();
        assert_eq!(it.len(), 3);
        let drained: Vec<(String, i32)> = it.collect();
        assert_eq!(
            drained,
            vec![
                ("c".to_string(), 2),
                ("b".to_string(), 1),
                ("a".to_string(), 0)
            ]
        );
    }

    #[test]
    fn display_rendering() {
        let empty: Chain<String, i32> = Chain::new();
        assert_eq!(empty.to_string(), "[]");

        let one = chain_of(&["a"]);
        assert_eq!(one.to_string(), "[(a, 0)]");

        let many = chain_of(&["a", "b", "c"]);
        assert_eq!(many.to_string(), "[(c, 2) -> (b, 1) -> (a, 0)]");
    }

    /// Invariant: an empty chain holds no arena; removing the last entry or
    /// clearing releases it, and the chain stays usable afterward.
    #[test]
    fn arena_is_lazy_and_released_when_empty() {
        let mut c: Chain<String, i32> = Chain::new();
        assert!(!c.has_arena());
        assert!(c.find("a").is_none());
        assert!(!c.remove("a"));
        assert_eq!(c.iter().count(), 0);

        c.add_front("a".to_string(), 1);
        c.add_front("b".to_string(), 2);
        assert!(c.has_arena());
        assert!(c.remove("a"));
        assert!(c.has_arena());
        assert!(c.remove("b"));
        assert!(!c.has_arena());
        assert_eq!(c.len(), 0);

        c.add_front("c".to_string(), 3);
        assert_eq!(keys(&c), ["c"]);
        c.clear();
        assert!(!c.has_arena());
        assert!(c.is_empty());

        let drained: Vec<(String, i32)> = Chain::<String, i32>::new().into_iter().collect();
        assert!(drained.is_empty());
    }

    /// Invariant: slot reuse after removal does not corrupt links.
    #[test]
    fn slot_reuse_keeps_links_intact() {
        let mut c = chain_of(&["a", "b", "c"]);
        assert!(c.remove("b"));
        c.add_front("d".to_string(), 3);
        c.add_front("e".to_string(), 4);
        assert_eq!(keys(&c), ["e", "d", "c", "a"]);
        assert!(c.remove("a"));
        assert!(c.remove("e"));
        assert_eq!(keys(&c), ["d", "c"]);
        assert_eq!(c.iter().len(), 2);
    }
}
