//! Index-based splay tree backing the ordered maps
//!
//! `Tree` only manages the shape of a binary tree over `usize` slots. The keys and values live in
//! a vector owned by the caller, and every lookup is driven by a probe closure that compares the
//! sought key against the key stored at a given slot. This keeps the tree independent of how the
//! caller stores or orders its data.

#![warn(missing_docs)]

use std::cmp::Ordering;

/// Slot index meaning "no node"
pub const NIL: usize = usize::MAX;

//-----------------------------------------------------------------------------------------------//

// A node in a splay tree
#[derive(Clone)]
struct Node {
    parent: usize,
    left: usize,
    right: usize,
}

impl Node {
    fn detached(parent: usize) -> Node {
        Node {
            parent,
            left: NIL,
            right: NIL,
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// A splay tree of `usize` slots.
///
/// Slots are handed out in insertion order, so the caller's data vector and the tree always have
/// the same length.
#[derive(Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: usize,
}

impl Tree {
    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree::with_capacity(0)
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            nodes: Vec::with_capacity(capacity),
            root: NIL,
        }
    }

    /// Get the number of slots in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no slots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the slot matching a probe, creating it if it does not exist.
    ///
    /// `probe(slot)` must return how the sought key compares to the key stored at `slot`. A new
    /// slot is always `count()` before the call, and the caller must push its data. The slot is
    /// not promoted to the root.
    pub fn insert<P>(&mut self, mut probe: P) -> usize
    where
        P: FnMut(usize) -> Ordering,
    {
        match locate(&self.nodes, self.root, &mut probe) {
            Location::Found(slot) => slot,
            Location::Root => {
                let slot = self.alloc(NIL);
                self.root = slot;
                slot
            }
            Location::Left(parent) => {
                let slot = self.alloc(parent);
                self.nodes[parent].left = slot;
                slot
            }
            Location::Right(parent) => {
                let slot = self.alloc(parent);
                self.nodes[parent].right = slot;
                slot
            }
        }
    }

    /// Get the first slot in order
    #[inline]
    pub fn first(&self) -> usize {
        first(&self.nodes, self.root)
    }

    /// Get the slot after `slot`
    #[inline]
    pub fn next(&self, slot: usize) -> usize {
        next(&self.nodes, slot)
    }

    /// Splay a slot up to the root. The in-order sequence is unchanged.
    pub fn promote(&mut self, slot: usize) {
        if slot == NIL {
            return;
        }
        promote(&mut self.nodes, slot);
        self.root = slot;
    }

    fn alloc(&mut self, parent: usize) -> usize {
        self.nodes.push(Node::detached(parent));
        self.nodes.len() - 1
    }

    #[cfg(test)]
    fn check(&self) {
        check_links(&self.nodes, self.root);
        assert_eq!(check_count(&self.nodes, self.root), self.count());
    }

    #[cfg(test)]
    fn in_order(&self) -> Vec<usize> {
        let mut slots = Vec::with_capacity(self.count());
        let mut slot = self.first();
        while slot != NIL {
            slots.push(slot);
            slot = self.next(slot);
        }
        slots
    }
}

//-----------------------------------------------------------------------------------------------//

// The functions below work on the raw node vector. Callers own the bookkeeping of `root`.

enum Location {
    Found(usize),
    Root,
    Left(usize),
    Right(usize),
}

// Walk down from the root following the probe
fn locate<P>(nodes: &[Node], mut x: usize, probe: &mut P) -> Location
where
    P: FnMut(usize) -> Ordering,
{
    debug_assert!(x == NIL || nodes[x].parent == NIL);

    if x == NIL {
        return Location::Root;
    }

    loop {
        match probe(x) {
            Ordering::Equal => return Location::Found(x),
            Ordering::Less => {
                let y = nodes[x].left;
                if y == NIL {
                    return Location::Left(x);
                }
                x = y;
            }
            Ordering::Greater => {
                let y = nodes[x].right;
                if y == NIL {
                    return Location::Right(x);
                }
                x = y;
            }
        }
    }
}

// Rotate `x` up until it is the root, using zig, zig-zig and zig-zag steps. The caller records
// the new root.
fn promote(nodes: &mut [Node], x: usize) {
    if nodes[x].parent == NIL {
        return;
    }

    loop {
        let y = nodes[x].parent;

        // Zig: `y` is the root
        if nodes[y].parent == NIL {
            let b = if nodes[y].left == x {
                let b = nodes[x].right;
                nodes[x].right = y;
                nodes[y].left = b;
                b
            } else {
                debug_assert_eq!(nodes[y].right, x);
                let b = nodes[x].left;
                nodes[x].left = y;
                nodes[y].right = b;
                b
            };

            nodes[x].parent = NIL;
            nodes[y].parent = x;
            if b != NIL {
                nodes[b].parent = y;
            }
            return;
        }

        let z = nodes[y].parent;
        let e = nodes[z].parent;

        let (b, c) = if nodes[y].left == x {
            let b = nodes[x].right;
            nodes[x].right = y;
            nodes[y].left = b;
            if nodes[z].left == y {
                // Zig-zig
                let c = nodes[y].right;
                nodes[y].right = z;
                nodes[z].left = c;
                nodes[z].parent = y;
                (b, c)
            } else {
                // Zig-zag
                debug_assert_eq!(nodes[z].right, y);
                let c = nodes[x].left;
                nodes[x].left = z;
                nodes[z].right = c;
                nodes[z].parent = x;
                (b, c)
            }
        } else {
            debug_assert_eq!(nodes[y].right, x);
            let b = nodes[x].left;
            nodes[x].left = y;
            nodes[y].right = b;
            if nodes[z].right == y {
                let c = nodes[y].left;
                nodes[y].left = z;
                nodes[z].right = c;
                nodes[z].parent = y;
                (b, c)
            } else {
                debug_assert_eq!(nodes[z].left, y);
                let c = nodes[x].right;
                nodes[x].right = z;
                nodes[z].left = c;
                nodes[z].parent = x;
                (b, c)
            }
        };

        nodes[x].parent = e;
        nodes[y].parent = x;
        if b != NIL {
            nodes[b].parent = y;
        }
        if c != NIL {
            nodes[c].parent = z;
        }

        if e == NIL {
            return;
        }
        if nodes[e].left == z {
            nodes[e].left = x;
        } else {
            debug_assert_eq!(nodes[e].right, z);
            nodes[e].right = x;
        }
    }
}

fn first(nodes: &[Node], mut x: usize) -> usize {
    if x == NIL {
        return NIL;
    }
    while nodes[x].left != NIL {
        x = nodes[x].left;
    }
    x
}

// In-order successor
fn next(nodes: &[Node], mut x: usize) -> usize {
    let y = nodes[x].right;
    if y != NIL {
        return first(nodes, y);
    }

    loop {
        let y = nodes[x].parent;
        if y == NIL {
            return NIL;
        }
        if nodes[y].left == x {
            return y;
        }
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn check_links(nodes: &[Node], root: usize) {
    assert!(root == NIL || nodes[root].parent == NIL);

    let mut x = first(nodes, root);
    while x != NIL {
        for child in [nodes[x].left, nodes[x].right] {
            if child != NIL {
                assert_eq!(nodes[child].parent, x);
            }
        }
        x = next(nodes, x);
    }
}

#[cfg(test)]
fn check_count(nodes: &[Node], root: usize) -> usize {
    let mut count = 0;
    let mut x = first(nodes, root);
    while x != NIL {
        count += 1;
        x = next(nodes, x);
    }
    count
}

#[test]
// Slots come back in key order whatever the insertion order
fn test_tree_order() {
    let keys = [40, 10, 30, 50, 20];
    let mut tree = Tree::new();
    for key in keys {
        let slot = tree.insert(|x| key.cmp(&keys[x]));
        tree.promote(slot);
        tree.check();
    }

    assert_eq!(tree.in_order(), vec![1, 4, 2, 0, 3]);
    assert_eq!(tree.count(), keys.len());
}

#[test]
// Inserting a key that is already present hands back its slot without growing the tree
fn test_tree_existing_key() {
    let keys = [5, 3, 8, 1, 4];
    let mut tree = Tree::with_capacity(keys.len());
    for key in keys {
        tree.insert(|x| key.cmp(&keys[x]));
        tree.check();
    }

    for (slot, key) in keys.iter().enumerate() {
        assert_eq!(tree.insert(|x| key.cmp(&keys[x])), slot);
        tree.promote(slot);
        tree.check();
    }
    assert_eq!(tree.count(), keys.len());
    assert_eq!(tree.in_order(), vec![3, 1, 4, 0, 2]);
}
