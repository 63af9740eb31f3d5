//! Bucket chains over a binding arena.
//!
//! Bindings live in a `SlotMap` and are addressed by `BindingId`. Each bucket
//! holds the id of the first binding in its chain and each binding holds the
//! id of its successor. These primitives are the only code that touches the
//! links; `SymTable` builds every operation from `find`, `push_front` and
//! `unlink`.

use crate::alloc;
use crate::error::Result;
use crate::hash;
use crate::key::Key;
use core::borrow::Borrow;
use core::iter::FusedIterator;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable arena handle of one binding.
    pub(crate) struct BindingId;
}

#[derive(Debug)]
pub(crate) struct Binding<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    next: Option<BindingId>,
}

pub(crate) struct Chains<K, V> {
    heads: Vec<Option<BindingId>>,
    arena: SlotMap<BindingId, Binding<K, V>>,
}

impl<K: Key, V> Chains<K, V> {
    pub(crate) fn with_buckets(bucket_count: usize) -> Result<Self> {
        Ok(Self {
            heads: alloc::try_filled_vec(bucket_count)?,
            arena: SlotMap::with_key(),
        })
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Key,
    {
        hash::bucket_index(key, self.heads.len())
    }

    /// Scan `bucket` for a binding whose key equals `key`.
    pub(crate) fn find<Q>(&self, bucket: usize, key: &Q) -> Option<BindingId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let mut cur = self.heads[bucket];
        while let Some(id) = cur {
            let b = &self.arena[id];
            if b.key.borrow() == key {
                return Some(id);
            }
            cur = b.next;
        }
        None
    }

    /// Make room in the arena for one more binding so the next `push_front`
    /// cannot allocate.
    pub(crate) fn try_reserve_binding(&mut self) -> Result<()> {
        let arena = &mut self.arena;
        alloc::try_reserve_with(core::mem::size_of::<Binding<K, V>>(), || arena.try_reserve(1))
    }

    /// Link a new binding at the head of `bucket`. The caller has already
    /// checked that the key is absent and reserved an arena slot.
    pub(crate) fn push_front(&mut self, bucket: usize, key: K, value: V) -> BindingId {
        let next = self.heads[bucket];
        let id = self.arena.insert(Binding { key, value, next });
        self.heads[bucket] = Some(id);
        id
    }

    /// Unlink the binding with `key` from `bucket` and hand it back.
    pub(crate) fn unlink<Q>(&mut self, bucket: usize, key: &Q) -> Option<Binding<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let mut prev: Option<BindingId> = None;
        let mut cur = self.heads[bucket];
        while let Some(id) = cur {
            let (hit, next) = {
                let b = &self.arena[id];
                (b.key.borrow() == key, b.next)
            };
            if hit {
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.arena[p].next = next,
                }
                return self.arena.remove(id);
            }
            prev = cur;
            cur = next;
        }
        None
    }

    #[inline]
    pub(crate) fn binding(&self, id: BindingId) -> &Binding<K, V> {
        &self.arena[id]
    }

    #[inline]
    pub(crate) fn binding_mut(&mut self, id: BindingId) -> &mut Binding<K, V> {
        &mut self.arena[id]
    }

    /// Move every binding into a fresh array of `bucket_count` buckets.
    ///
    /// The new array is allocated before any link changes. If that fails the
    /// live array and all chains are untouched. Nothing after the allocation
    /// can fail, so the old array is only dropped once every binding sits in
    /// its new chain.
    pub(crate) fn rebucket(&mut self, bucket_count: usize) -> Result<()> {
        let mut heads: Vec<Option<BindingId>> = alloc::try_filled_vec(bucket_count)?;
        for &head in &self.heads {
            let mut cur = head;
            while let Some(id) = cur {
                let b = &mut self.arena[id];
                cur = b.next;
                let i = hash::bucket_index(&b.key, bucket_count);
                b.next = heads[i];
                heads[i] = Some(id);
            }
        }
        self.heads = heads;
        Ok(())
    }

    /// Drop every binding; the bucket array keeps its length.
    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.heads.fill(None);
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            chains: self,
            next_bucket: 0,
            cur: None,
            remaining: self.len(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.arena.iter_mut(),
        }
    }

    pub(crate) fn into_bindings(self) -> IntoIter<K, V> {
        IntoIter {
            it: self.arena.into_iter(),
        }
    }

    /// Panics unless every binding sits in exactly the chain its key hashes
    /// to, keys are unique, and the count matches the chain lengths.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        let mut keys: HashSet<&[u8]> = HashSet::new();
        for (bucket, &head) in self.heads.iter().enumerate() {
            let mut cur = head;
            while let Some(id) = cur {
                assert!(seen.insert(id), "binding reachable twice");
                let b = &self.arena[id];
                assert_eq!(
                    hash::bucket_index(&b.key, self.heads.len()),
                    bucket,
                    "binding in the wrong bucket"
                );
                assert!(keys.insert(b.key.key_bytes()), "duplicate key");
                cur = b.next;
            }
        }
        assert_eq!(seen.len(), self.arena.len(), "unreachable binding");
    }
}

/// Iterator over `(&K, &V)`, walking the buckets in order and each chain
/// from its head.
pub struct Iter<'a, K, V> {
    chains: &'a Chains<K, V>,
    next_bucket: usize,
    cur: Option<BindingId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let chains = self.chains;
        loop {
            if let Some(id) = self.cur {
                let b = &chains.arena[id];
                self.cur = b.next;
                self.remaining -= 1;
                return Some((&b.key, &b.value));
            }
            if self.remaining == 0 || self.next_bucket >= chains.heads.len() {
                return None;
            }
            self.cur = chains.heads[self.next_bucket];
            self.next_bucket += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, BindingId, Binding<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, b)| (&b.key, &mut b.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<BindingId, Binding<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, b)| (b.key, b.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chains_with(bucket_count: usize, keys: &[&str]) -> Chains<String, usize> {
        let mut c = Chains::with_buckets(bucket_count).unwrap();
        for (i, k) in keys.iter().enumerate() {
            let b = c.bucket_of(*k);
            assert!(c.find(b, *k).is_none());
            c.push_front(b, (*k).to_string(), i);
        }
        c
    }

    /// Invariant: a pushed binding is found in its bucket and nowhere else.
    #[test]
    fn push_then_find() {
        let c = chains_with(509, &["alpha", "beta"]);
        let b = c.bucket_of("alpha");
        let id = c.find(b, "alpha").expect("present");
        assert_eq!(c.binding(id).value, 0);
        assert!(c.find(b, "gamma").is_none());
        c.assert_consistent();
    }

    /// Invariant: with one bucket every binding shares a chain and the most
    /// recent push sits at the head.
    #[test]
    fn single_bucket_prepends() {
        let c = chains_with(1, &["a", "b", "c"]);
        let order: Vec<&str> = c.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        c.assert_consistent();
    }

    /// Invariant: unlinking the head, a middle binding, and the tail each
    /// keep the rest of the chain intact.
    #[test]
    fn unlink_head_middle_tail() {
        let mut c = chains_with(1, &["a", "b", "c", "d"]);
        // chain order: d c b a
        let d = c.unlink(0, "d").expect("head");
        assert_eq!((d.key.as_str(), d.value), ("d", 3));
        let b = c.unlink(0, "b").expect("middle");
        assert_eq!(b.value, 1);
        let a = c.unlink(0, "a").expect("tail");
        assert_eq!(a.value, 0);
        assert!(c.unlink(0, "a").is_none());

        let left: Vec<&str> = c.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(left, ["c"]);
        assert_eq!(c.len(), 1);
        c.assert_consistent();
    }

    /// Invariant: rebucketing keeps every binding and places each in the
    /// bucket its key hashes to under the new count.
    #[test]
    fn rebucket_moves_every_binding() {
        let keys: Vec<String> = (0..600).map(|i| format!("k{i}")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut c = chains_with(509, &refs);
        c.rebucket(1021).unwrap();
        assert_eq!(c.bucket_count(), 1021);
        assert_eq!(c.len(), 600);
        c.assert_consistent();
        for (i, k) in refs.iter().enumerate() {
            let id = c.find(c.bucket_of(*k), *k).expect("kept");
            assert_eq!(c.binding(id).value, i);
        }
    }

    /// Invariant: a refused bucket array leaves the chains exactly as they were.
    #[test]
    fn failed_rebucket_keeps_old_array() {
        let mut c = chains_with(509, &["x", "y", "z"]);
        alloc::fault::fail_next(1);
        assert!(c.rebucket(1021).is_err());
        alloc::fault::reset();
        assert_eq!(c.bucket_count(), 509);
        assert_eq!(c.len(), 3);
        c.assert_consistent();
    }

    /// Invariant: a refused slot reservation leaves the arena untouched, and a
    /// granted one lets the next push go through.
    #[test]
    fn reserve_binding_is_fallible() {
        let mut c = chains_with(509, &["x"]);
        alloc::fault::fail_next(1);
        assert!(c.try_reserve_binding().is_err());
        alloc::fault::reset();
        assert_eq!(c.len(), 1);

        c.try_reserve_binding().unwrap();
        let b = c.bucket_of("y");
        c.push_front(b, "y".to_string(), 1);
        assert_eq!(c.len(), 2);
        c.assert_consistent();
    }

    /// Invariant: clearing drops all bindings but keeps the bucket count.
    #[test]
    fn clear_keeps_buckets() {
        let mut c = chains_with(509, &["x", "y"]);
        c.clear();
        assert_eq!(c.len(), 0);
        assert_eq!(c.bucket_count(), 509);
        assert_eq!(c.iter().count(), 0);
        c.assert_consistent();
    }

    /// Invariant: iteration reports an exact length and visits each binding once.
    #[test]
    fn iter_is_exact() {
        let c = chains_with(3, &["a", "b", "c", "d", "e"]);
        let it = c.iter();
        assert_eq!(it.len(), 5);
        let mut seen: Vec<usize> = it.map(|(_, v)| *v).collect();
        seen.sort_unstable();
        assert_eq!(seen, [0, 1, 2, 3, 4]);
    }
}
