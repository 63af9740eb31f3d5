//! SymTable: public surface over bucket chains plus the growth policy.

use crate::chain::{Chains, IntoIter, Iter, IterMut};
use crate::error::Result;
use crate::key::{CopyKey, Key};
use crate::ladder::Layout;
use core::borrow::Borrow;
use core::fmt;
use log::{debug, trace, warn};

/// A symbol table: unique keys bound to values, stored in chained buckets.
///
/// Keys are copied on `put` and owned by the table. Values are moved in and
/// never inspected. Iteration order is unspecified but every binding is
/// visited exactly once.
///
/// ```
/// use symtable::SymTable;
///
/// let mut t: SymTable<String, i32> = SymTable::new()?;
/// assert!(t.put("a", 1)?);
/// assert!(!t.put("a", 2)?);
/// assert_eq!(t.replace("a", 2), Some(1));
/// assert_eq!(t.get("a"), Some(&2));
/// assert_eq!(t.remove("a"), Some(2));
/// assert!(t.is_empty());
/// # Ok::<(), symtable::SymTableError>(())
/// ```
pub struct SymTable<K, V> {
    chains: Chains<K, V>,
    layout: Layout,
}

impl<K, V> SymTable<K, V>
where
    K: Key,
{
    /// Empty resizable table at the first ladder rung.
    pub fn new() -> Result<Self> {
        Self::with_layout(Layout::Resizable)
    }

    /// Empty table with the given bucket arrangement.
    pub fn with_layout(layout: Layout) -> Result<Self> {
        let chains = Chains::with_buckets(layout.initial_capacity())?;
        debug!("symtable: new {:?} table with {} buckets", layout, chains.bucket_count());
        Ok(Self { chains, layout })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current bucket count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.chains.bucket_count()
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Bind a copy of `key` to `value` unless `key` is already bound.
    ///
    /// Returns `Ok(false)` and leaves the table unchanged for a duplicate
    /// key. Returns `Err(OutOfMemory)` and leaves the table unchanged if the
    /// binding slot or the key copy cannot be allocated. A successful insert
    /// may grow the table.
    pub fn put<Q>(&mut self, key: &Q, value: V) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + CopyKey<Owned = K>,
    {
        let bucket = self.chains.bucket_of(key);
        if self.chains.find(bucket, key).is_some() {
            return Ok(false);
        }
        self.chains.try_reserve_binding()?;
        let owned = key.try_copy()?;
        self.chains.push_front(bucket, owned, value);
        trace!("symtable: put into bucket {}, len {}", bucket, self.len());
        self.grow_if_due();
        Ok(true)
    }

    /// Swap in `value` for the value bound to `key`, returning the old one.
    /// Returns `None` and changes nothing if `key` is absent.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let id = self.chains.find(self.chains.bucket_of(key), key)?;
        Some(core::mem::replace(&mut self.chains.binding_mut(id).value, value))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        self.chains.find(self.chains.bucket_of(key), key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let id = self.chains.find(self.chains.bucket_of(key), key)?;
        Some(&self.chains.binding(id).value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let id = self.chains.find(self.chains.bucket_of(key), key)?;
        Some(&mut self.chains.binding_mut(id).value)
    }

    /// Unbind `key` and return its value. The bucket count never shrinks.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Unbind `key` and return the table's key copy along with the value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Key,
    {
        let bucket = self.chains.bucket_of(key);
        let b = self.chains.unlink(bucket, key)?;
        trace!("symtable: removed from bucket {}, len {}", bucket, self.len());
        Some((b.key, b.value))
    }

    /// Call `visit` once per binding. The table is borrowed for the whole
    /// traversal, so `visit` cannot mutate it.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.chains.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.chains.iter_mut()
    }

    /// Drop every binding. The bucket count is kept.
    pub fn clear(&mut self) {
        self.chains.clear();
    }

    fn grow_if_due(&mut self) {
        let from = self.capacity();
        let Some(to) = self.layout.next_capacity(self.len(), from) else {
            return;
        };
        match self.chains.rebucket(to) {
            Ok(()) => debug!(
                "symtable: grew from {} to {} buckets at {} bindings",
                from,
                to,
                self.len()
            ),
            Err(err) => warn!(
                "symtable: growth from {} to {} buckets abandoned: {}",
                from, to, err
            ),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.chains.assert_consistent();
    }
}

impl<K, V> fmt::Debug for SymTable<K, V>
where
    K: Key + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: Key, V> IntoIterator for &'a SymTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Key, V> IntoIterator for &'a mut SymTable<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Key, V> IntoIterator for SymTable<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.into_bindings()
    }
}
