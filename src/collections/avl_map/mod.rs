//! [`AvlMap`] an ordered map backed by an AVL tree.
//!
//! Keys are kept in a binary search tree where the heights of the two subtrees of
//! every node differ by at most one, so lookup, insertion and removal all take
//! O(log n) time.
//!
//! Values are created and updated with [`AvlMap::get_or_insert`], which returns a
//! mutable reference to the (possibly freshly defaulted) value for a key.
//!
//! Traversal in ascending key order uses a [`Cursor`], which keeps an explicit
//! stack of ancestors still to be visited instead of recursing. The cursor borrows
//! the map, so the map cannot be structurally modified while a cursor is alive.
//! [`CursorMut`] allows values (but not keys) to be updated during traversal.
//!
//! # Example
//!
//! ```
//!     use avlmap::collections::AvlMap;
//!     let mut scores = AvlMap::new();
//!     *scores.get_or_insert("midterm") = 16;
//!     *scores.get_or_insert("final") = 71;
//!     *scores.get_or_insert("midterm") = 46;
//!     assert_eq!(*scores.get_or_insert("midterm"), 46);
//!
//!     let mut c = scores.begin();
//!     while c != scores.end() {
//!         let (k, v) = c.get().unwrap();
//!         println!("{k}: {v}");
//!         c.advance();
//!     }
//! ```
//!
//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`AvlMap`] via serde crate.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    fmt::Debug,
    iter::FusedIterator,
    mem, ptr,
};

#[cfg(feature = "serde")]
use std::marker::PhantomData;

mod tree;
use tree::{Link, NodeId, StkVec, Tree};

/// `AvlMap` an ordered map, similar to [`std::collections::BTreeMap`].
///
/// General guide to implementation:
///
/// Nodes are stored in slots of a vector and refer to their children by slot index.
/// Each node has exactly one parent link, insertion and removal return the
/// (possibly rotated) root of each subtree they pass through so the parent can relink it.
/// Released slots are reused.
#[derive(Clone)]
pub struct AvlMap<K, V> {
    tree: Tree<K, V>,
}
impl<K, V> Default for AvlMap<K, V> {
    /// Creates an empty AvlMap.
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AvlMap<K, V> {
    /// Returns a new, empty map.
    #[must_use]
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }

    /// Clear the map.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Get number of key-value pairs in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Is the map empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the tree, 0 if the map is empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height(self.tree.root)
    }

    /// Get mutable reference to the value for key,
    /// inserting a default value first if the key is absent.
    ///
    /// This is how values are both created and updated:
    ///
    /// ```
    ///     use avlmap::collections::AvlMap;
    ///     let mut m = AvlMap::<&str, i32>::new();
    ///     *m.get_or_insert("a") += 1;
    ///     *m.get_or_insert("a") += 1;
    ///     assert_eq!(m["a"], 2);
    /// ```
    pub fn get_or_insert(&mut self, key: K) -> &mut V
    where
        K: Ord,
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Get mutable reference to the value for key,
    /// inserting the result of `f` first if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        let (id, _created) = self.tree.find_or_insert(key, f);
        &mut self.tree[id].value
    }

    /// Insert key-value pair into map, or if key is already in map,
    /// replaces value and returns old value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        if let Some(v) = self.get_mut(&key) {
            return Some(mem::replace(v, value));
        }
        self.tree.find_or_insert(key, || value);
        None
    }

    /// Does the map have an entry for the specified key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Same as [`AvlMap::contains`].
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.contains(key)
    }

    /// Remove the entry for key, if there is one.
    pub fn erase<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key);
    }

    /// Remove key-value pair from map, returning just the value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_k, v)| v)
    }

    /// Remove key-value pair from map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key)
    }

    /// Get reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        Some(&self.tree[id].value)
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        Some(&mut self.tree[id].value)
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let node = &self.tree[self.tree.find(key)?];
        Some((&node.key, &node.value))
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.tree[self.tree.min_node(self.tree.root?)];
        Some((&node.key, &node.value))
    }

    /// Gets references to last key and value.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.tree[self.tree.max_node(self.tree.root?)];
        Some((&node.key, &node.value))
    }

    /// Get cursor positioned at the smallest key, exhausted if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::begin(&self.tree)
    }

    /// Get exhausted cursor, for comparison with a cursor obtained from [`AvlMap::begin`].
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::end(&self.tree)
    }

    /// Get cursor positioned at the smallest key that permits values to be updated.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::begin(&mut self.tree)
    }

    /// Get iterator of references to key-value pairs, in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            len: self.len(),
            cursor: self.begin(),
        }
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Get consuming iterator that returns all the keys, in sorted order.
    #[must_use]
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys(self.into_iter())
    }

    /// Get consuming iterator that returns all the values, in sorted order.
    #[must_use]
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues(self.into_iter())
    }

    /// Check the map is a valid AVL tree: keys strictly ascending, every node balanced,
    /// stored heights correct and the length matching the number of nodes.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        let mut count = 0;
        self.tree.check_subtree(self.tree.root, &mut count)?;
        if count != self.len() {
            return Err(InvariantError::LenMismatch);
        }
        let mut prev: Option<&K> = None;
        for k in self.keys() {
            if prev.is_some_and(|p| p >= k) {
                return Err(InvariantError::OutOfOrder);
            }
            prev = Some(k);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn check(&self)
    where
        K: Ord,
    {
        if let Err(e) = self.validate() {
            panic!("invalid map: {e}");
        }
    }
} // End impl AvlMap

use std::hash::{Hash, Hasher};
impl<K: Hash, V: Hash> Hash for AvlMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}
impl<K: PartialEq, V: PartialEq> PartialEq for AvlMap<K, V> {
    fn eq(&self, other: &AvlMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
impl<K: Eq, V: Eq> Eq for AvlMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for AvlMap<K, V> {
    fn partial_cmp(&self, other: &AvlMap<K, V>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}
impl<K: Ord, V: Ord> Ord for AvlMap<K, V> {
    fn cmp(&self, other: &AvlMap<K, V>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}
impl<K, V> IntoIterator for AvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Convert `AvlMap` to [`IntoIter`].
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self)
    }
}
impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> AvlMap<K, V> {
        let mut map = AvlMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(arr: [(K, V); N]) -> AvlMap<K, V> {
        let mut map = AvlMap::new();
        for (k, v) in arr {
            map.insert(k, v);
        }
        map
    }
}
impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
impl<K, Q, V> std::ops::Index<&Q> for AvlMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// Panics if the key is not present in the `AvlMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
impl<K: Debug, V: Debug> Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "serde")]
impl<K: Serialize, V: Serialize> Serialize for AvlMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct AvlMapVisitor<K, V> {
    marker: PhantomData<fn() -> AvlMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<K, V> AvlMapVisitor<K, V> {
    fn new() -> Self {
        AvlMapVisitor {
            marker: PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> Visitor<'de> for AvlMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = AvlMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("AvlMap")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = AvlMap::new();
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> Deserialize<'de> for AvlMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlMapVisitor::new())
    }
}

// Errors.

/// Error returned by [`Cursor::get`] and [`CursorMut::get_mut`] when the cursor is exhausted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExhaustedError {}
impl fmt::Display for ExhaustedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cursor is past the last element")
    }
}
impl std::error::Error for ExhaustedError {}

/// Error returned by [`AvlMap::validate`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvariantError {
    /// Keys are not in strictly ascending order.
    OutOfOrder,
    /// The heights of the subtrees of a node differ by more than one.
    Unbalanced,
    /// A stored height is not one more than the height of the taller child.
    BadHeight,
    /// The number of reachable nodes differs from the recorded length.
    LenMismatch,
}
impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfOrder => "keys are not in ascending order",
            Self::Unbalanced => "subtree heights differ by more than one",
            Self::BadHeight => "stored node height is wrong",
            Self::LenMismatch => "length does not match node count",
        };
        f.write_str(msg)
    }
}
impl std::error::Error for InvariantError {}

// Cursors.

/// Cursor returned by [`AvlMap::begin`], [`AvlMap::end`].
///
/// An active cursor is positioned at a node, `stack` holds the ancestors whose
/// key and right subtree are still to be visited. An exhausted cursor has no node.
pub struct Cursor<'a, K, V> {
    tree: &'a Tree<K, V>,
    current: Link,
    stack: StkVec<NodeId>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn begin(tree: &'a Tree<K, V>) -> Self {
        let mut c = Self::end(tree);
        c.push_left(tree.root);
        c.current = c.stack.pop();
        c
    }

    fn end(tree: &'a Tree<K, V>) -> Self {
        Self {
            tree,
            current: None,
            stack: StkVec::new(),
        }
    }

    /// Push link and all its left descendants.
    fn push_left(&mut self, mut link: Link) {
        let tree = self.tree;
        while let Some(id) = link {
            self.stack.push(id);
            link = tree[id].left;
        }
    }

    /// Move to the next key in ascending order. Does nothing if the cursor is exhausted.
    pub fn advance(&mut self) {
        if let Some(id) = self.current {
            let right = self.tree[id].right;
            self.push_left(right);
            self.current = self.stack.pop();
        }
    }

    /// Has the cursor moved past the last element?
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// Get references to the current key and value, `None` if the cursor is exhausted.
    #[must_use]
    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        let node = &tree[self.current?];
        Some((&node.key, &node.value))
    }

    /// Get references to the current key and value.
    pub fn get(&self) -> Result<(&'a K, &'a V), ExhaustedError> {
        self.current().ok_or(ExhaustedError {})
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            current: self.current,
            stack: self.stack.clone(),
        }
    }
}

/// Cursors are equal if both are exhausted, or both are at the same node of the same map.
impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self.current, other.current) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b && ptr::eq(self.tree, other.tree),
            _ => false,
        }
    }
}
impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: Debug, V: Debug> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.current()).finish()
    }
}

/// Cursor that allows values to be updated, returned by [`AvlMap::begin_mut`].
///
/// Holds the map exclusively, so keys cannot be inserted or removed while it exists.
pub struct CursorMut<'a, K, V> {
    tree: &'a mut Tree<K, V>,
    current: Link,
    stack: StkVec<NodeId>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    fn begin(tree: &'a mut Tree<K, V>) -> Self {
        let root = tree.root;
        let mut c = Self {
            tree,
            current: None,
            stack: StkVec::new(),
        };
        c.push_left(root);
        c.current = c.stack.pop();
        c
    }

    fn push_left(&mut self, mut link: Link) {
        while let Some(id) = link {
            self.stack.push(id);
            link = self.tree[id].left;
        }
    }

    /// Move to the next key in ascending order. Does nothing if the cursor is exhausted.
    pub fn advance(&mut self) {
        if let Some(id) = self.current {
            let right = self.tree[id].right;
            self.push_left(right);
            self.current = self.stack.pop();
        }
    }

    /// Has the cursor moved past the last element?
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// Get reference to the current key.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        Some(&self.tree[self.current?].key)
    }

    /// Get mutable reference to the current value.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        Some(&mut self.tree[self.current?].value)
    }

    /// Get references to the current key and value, `None` if the cursor is exhausted.
    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        let node = &mut self.tree[self.current?];
        Some((&node.key, &mut node.value))
    }

    /// Get references to the current key and value.
    pub fn get_mut(&mut self) -> Result<(&K, &mut V), ExhaustedError> {
        self.current_mut().ok_or(ExhaustedError {})
    }

    /// Returns a read-only cursor pointing to the same location as the `CursorMut`.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor {
            tree: &*self.tree,
            current: self.current,
            stack: self.stack.clone(),
        }
    }
}

impl<K: Debug, V: Debug> Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.as_cursor().current())
            .finish()
    }
}

// Immutable reference iteration.

/// Iterator returned by [`AvlMap::iter`].
pub struct Iter<'a, K, V> {
    len: usize,
    cursor: Cursor<'a, K, V>,
}
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            cursor: self.cursor.clone(),
        }
    }
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let result = self.cursor.current()?;
        self.cursor.advance();
        self.len -= 1;
        Some(result)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}
impl<K: Debug, V: Debug> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// Consuming iteration.

/// Consuming iterator for [`AvlMap`].
///
/// Nodes are released as they are returned,
/// any not returned are released when the iterator is dropped.
pub struct IntoIter<K, V> {
    tree: Tree<K, V>,
    stack: StkVec<NodeId>,
}
impl<K, V> IntoIter<K, V> {
    fn new(map: AvlMap<K, V>) -> Self {
        let AvlMap { mut tree } = map;
        // Yielded nodes leave stale links behind, so the tree must not walk from the root again.
        let root = tree.root.take();
        let mut s = Self {
            tree,
            stack: StkVec::new(),
        };
        s.push_left(root);
        s
    }

    fn push_left(&mut self, mut link: Link) {
        while let Some(id) = link {
            self.stack.push(id);
            link = self.tree[id].left;
        }
    }
}
impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.release(id);
        self.push_left(node.right);
        Some((node.key, node.value))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tree.len();
        (len, Some(len))
    }
}
impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}
impl<K, V> FusedIterator for IntoIter<K, V> {}
impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

/// Consuming iterator returned by [`AvlMap::into_keys`].
pub struct IntoKeys<K, V>(IntoIter<K, V>);
impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V> FusedIterator for IntoKeys<K, V> {}

/// Consuming iterator returned by [`AvlMap::into_values`].
pub struct IntoValues<K, V>(IntoIter<K, V>);
impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V> FusedIterator for IntoValues<K, V> {}

// Trivial iterators.

/// Iterator returned by [`AvlMap::values`].
#[derive(Clone, Debug)]
pub struct Values<'a, K, V>(Iter<'a, K, V>);
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

/// Iterator returned by [`AvlMap::keys`].
#[derive(Clone, Debug)]
pub struct Keys<'a, K, V>(Iter<'a, K, V>);
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::MAX);

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod mytests;
