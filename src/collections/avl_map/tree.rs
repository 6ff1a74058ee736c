use std::{
    borrow::Borrow,
    cmp::Ordering,
    mem,
    ops::{Index, IndexMut},
};

use super::InvariantError;

/// Index of a node slot.
pub(super) type NodeId = usize;

/// Link to a child subtree, `None` if absent.
pub(super) type Link = Option<NodeId>;

/// Upper bound on tree height.
///
/// An AVL tree of height h has at least fib(h + 2) - 1 nodes, so a tree of height 92
/// would need more nodes than a 64-bit address space can hold.
pub(super) const MAX_HEIGHT: usize = 92;

/// StkVec is used for stacks of node ids, length is maximum tree height.
pub(super) type StkVec<T> = arrayvec::ArrayVec<T, MAX_HEIGHT>;

#[derive(Clone, Debug)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) left: Link,
    pub(super) right: Link,
    /// 1 for a leaf, an absent child counts as 0.
    pub(super) height: usize,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Full(Node<K, V>),
    /// Released slot, holds the next entry of the free list.
    Free(Link),
}

/// Node storage plus the root link.
///
/// Every node is reachable from `root` through exactly one parent link, so each
/// node is exclusively owned by its parent (or by the tree, for the root).
/// Released slots are chained into a free list and reused.
#[derive(Clone, Debug)]
pub(super) struct Tree<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Link,
    len: usize,
    pub(super) root: Link,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Tree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Index<NodeId> for Tree<K, V> {
    type Output = Node<K, V>;
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id] {
            Slot::Full(node) => node,
            Slot::Free(_) => unreachable!("link to released node"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Tree<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id] {
            Slot::Full(node) => node,
            Slot::Free(_) => unreachable!("link to released node"),
        }
    }
}

impl<K, V> Tree<K, V> {
    pub(super) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            len: 0,
            root: None,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(super) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn alloc(&mut self, key: K, value: V) -> NodeId {
        let slot = Slot::Full(Node::new(key, value));
        self.len += 1;
        match self.free {
            Some(id) => match mem::replace(&mut self.slots[id], slot) {
                Slot::Free(next) => {
                    self.free = next;
                    id
                }
                Slot::Full(_) => unreachable!("free list points at a live node"),
            },
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    /// Takes the node out of its slot. The caller must already have unlinked it.
    pub(super) fn release(&mut self, id: NodeId) -> Node<K, V> {
        match mem::replace(&mut self.slots[id], Slot::Free(self.free)) {
            Slot::Full(node) => {
                self.free = Some(id);
                self.len -= 1;
                node
            }
            Slot::Free(_) => unreachable!("node released twice"),
        }
    }

    /// Releases every node, children before their parent.
    pub(super) fn clear(&mut self) {
        let mut stack = StkVec::new();
        stack.extend(self.root.take());
        while let Some(&id) = stack.last() {
            let node = &mut self[id];
            if let Some(left) = node.left.take() {
                stack.push(left);
            } else if let Some(right) = node.right.take() {
                stack.push(right);
            } else {
                stack.pop();
                self.release(id);
            }
        }
        self.slots.clear();
        self.free = None;
    }

    pub(super) fn height(&self, link: Link) -> usize {
        link.map_or(0, |id| self[id].height)
    }

    fn balance_factor(&self, id: NodeId) -> isize {
        let node = &self[id];
        self.height(node.left) as isize - self.height(node.right) as isize
    }

    fn update_height(&mut self, id: NodeId) {
        let node = &self[id];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self[id].height = height;
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self[id].right else {
            unreachable!("rotate_left without right child")
        };
        self[id].right = self[pivot].left;
        self[pivot].left = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self[id].left else {
            unreachable!("rotate_right without left child")
        };
        self[id].left = self[pivot].right;
        self[pivot].right = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    /// Restore balance at `id` after one of its subtrees changed height by at most one.
    /// Returns the root of the subtree, which may now be a different node.
    ///
    /// The child's own balance factor picks single or double rotation, on both the
    /// insert and the remove path.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update_height(id);
        let balance = self.balance_factor(id);
        if balance > 1 {
            if let Some(left) = self[id].left {
                if self.balance_factor(left) < 0 {
                    let left = self.rotate_left(left);
                    self[id].left = Some(left);
                }
            }
            self.rotate_right(id)
        } else if balance < -1 {
            if let Some(right) = self[id].right {
                if self.balance_factor(right) > 0 {
                    let right = self.rotate_right(right);
                    self[id].right = Some(right);
                }
            }
            self.rotate_left(id)
        } else {
            id
        }
    }

    pub(super) fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    pub(super) fn max_node(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    pub(super) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut link = self.root;
        while let Some(id) = link {
            let node = &self[id];
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => link = node.left,
                Ordering::Greater => link = node.right,
            }
        }
        None
    }

    /// Find the node for `key`, creating it with value `make()` if absent.
    /// Returns the node and whether it was created.
    pub(super) fn find_or_insert<F>(&mut self, key: K, make: F) -> (NodeId, bool)
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        match self.root {
            None => {
                let id = self.alloc(key, make());
                self.root = Some(id);
                (id, true)
            }
            Some(root) => {
                let (root, found, created) = self.insert_at(root, key, make);
                self.root = Some(root);
                (found, created)
            }
        }
    }

    /// Returns (new subtree root, node holding key, created).
    fn insert_at<F>(&mut self, id: NodeId, key: K, make: F) -> (NodeId, NodeId, bool)
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        match key.cmp(&self[id].key) {
            Ordering::Equal => (id, id, false),
            Ordering::Less => {
                let left = self[id].left;
                let (child, found, created) = match left {
                    None => {
                        let child = self.alloc(key, make());
                        (child, child, true)
                    }
                    Some(left) => self.insert_at(left, key, make),
                };
                self[id].left = Some(child);
                (self.rebalance(id), found, created)
            }
            Ordering::Greater => {
                let right = self[id].right;
                let (child, found, created) = match right {
                    None => {
                        let child = self.alloc(key, make());
                        (child, child, true)
                    }
                    Some(right) => self.insert_at(right, key, make),
                };
                self[id].right = Some(child);
                (self.rebalance(id), found, created)
            }
        }
    }

    /// Remove the node for `key`, returning its key and value.
    pub(super) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let root = self.root?;
        let mut removed = None;
        self.root = self.remove_at(root, key, &mut removed);
        removed
    }

    fn remove_at<Q>(&mut self, id: NodeId, key: &Q, removed: &mut Option<(K, V)>) -> Link
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        match key.cmp(self[id].key.borrow()) {
            Ordering::Less => {
                if let Some(left) = self[id].left {
                    let left = self.remove_at(left, key, removed);
                    self[id].left = left;
                }
            }
            Ordering::Greater => {
                if let Some(right) = self[id].right {
                    let right = self.remove_at(right, key, removed);
                    self[id].right = right;
                }
            }
            Ordering::Equal => {
                let node = &self[id];
                match (node.left, node.right) {
                    (Some(_), Some(right)) => {
                        // The in-order successor moves into this position.
                        let (right, (skey, svalue)) = self.take_min(right);
                        let node = &mut self[id];
                        node.right = right;
                        let key = mem::replace(&mut node.key, skey);
                        let value = mem::replace(&mut node.value, svalue);
                        *removed = Some((key, value));
                    }
                    (child, None) | (None, child) => {
                        let node = self.release(id);
                        *removed = Some((node.key, node.value));
                        return child;
                    }
                }
            }
        }
        Some(self.rebalance(id))
    }

    /// Unlink the minimum node of the subtree at `id`.
    /// Returns the new subtree root and the removed key and value.
    fn take_min(&mut self, id: NodeId) -> (Link, (K, V)) {
        match self[id].left {
            None => {
                let node = self.release(id);
                (node.right, (node.key, node.value))
            }
            Some(left) => {
                let (left, min) = self.take_min(left);
                self[id].left = left;
                (Some(self.rebalance(id)), min)
            }
        }
    }

    /// Check stored heights and balance of the subtree at `link`, returns its height.
    pub(super) fn check_subtree(
        &self,
        link: Link,
        count: &mut usize,
    ) -> Result<usize, InvariantError> {
        let Some(id) = link else {
            return Ok(0);
        };
        *count += 1;
        let node = &self[id];
        let lh = self.check_subtree(node.left, count)?;
        let rh = self.check_subtree(node.right, count)?;
        if lh.abs_diff(rh) > 1 {
            return Err(InvariantError::Unbalanced);
        }
        let height = 1 + lh.max(rh);
        if node.height != height {
            return Err(InvariantError::BadHeight);
        }
        Ok(height)
    }
}
