//! Declarator-list node
//!
//! [`DeclarationNode`] holds one declaration specifier and the ordered list of
//! declarators that share it, as in `int a, *b, c[3];`. The parser creates the
//! node once it has read the specifier and appends each declarator as it is
//! consumed, so the list grows one element at a time during a single pass.
//!
//! # Tombstones
//!
//! A declarator that failed to parse still occupies its position in the list:
//! the parser appends it with [`DeclarationNode::add_slot`]`(None)`. Such a
//! slot is never visible to readers. Physical removal is deferred to
//! [`DeclarationNode::compact`], which the parser runs once when it reaches the
//! declaration's `;`, so a burst of failed declarators costs a single pass.
//! Owners holding the node mutably read through
//! [`DeclarationNode::read_declarators`], which compacts on the first read
//! after a tombstone was appended; shared borrows get the skipping view from
//! [`DeclarationNode::declarators`].

use std::iter::FusedIterator;
use std::slice;

/// Number of declarator slots reserved on the first append.
pub const DEFAULT_DECLARATOR_CAPACITY: usize = 4;

/// A specifier plus a growable, insertion-ordered list of declarators.
#[derive(Debug, Clone)]
pub struct DeclarationNode<S, D> {
    specifier: Option<S>,
    slots: Vec<Option<D>>,
    tombstones: usize,
}

impl<S, D> DeclarationNode<S, D> {
    pub fn new() -> Self {
        DeclarationNode {
            specifier: None,
            slots: Vec::new(),
            tombstones: 0,
        }
    }

    /// Create a node that already carries its specifier.
    pub fn with_specifier(specifier: S) -> Self {
        let mut node = Self::new();
        node.set_specifier(specifier);
        node
    }

    /// Replace the held specifier. Last write wins.
    pub fn set_specifier(&mut self, specifier: S) {
        self.specifier = Some(specifier);
    }

    pub fn specifier(&self) -> Option<&S> {
        self.specifier.as_ref()
    }

    /// Append a declarator after every previously appended one.
    pub fn add_declarator(&mut self, declarator: D) {
        self.add_slot(Some(declarator));
    }

    /// Append a slot that may be empty.
    ///
    /// `None` keeps the position of a declarator that could not be built. It
    /// is skipped by every read and dropped by the next [`compact`](Self::compact).
    pub fn add_slot(&mut self, slot: Option<D>) {
        if self.slots.capacity() == 0 {
            self.slots.reserve_exact(DEFAULT_DECLARATOR_CAPACITY);
        }
        if slot.is_none() {
            self.tombstones += 1;
        }
        // Vec doubles its capacity when full
        self.slots.push(slot);
    }

    /// Read view over the live declarators, in insertion order.
    ///
    /// Compacts pending tombstones first, so every later read walks a dense
    /// list.
    pub fn read_declarators(&mut self) -> Declarators<'_, D> {
        self.compact();
        self.declarators()
    }

    /// Read view over the live declarators that skips tombstones in place.
    pub fn declarators(&self) -> Declarators<'_, D> {
        Declarators {
            inner: self.slots.iter(),
            remaining: self.len(),
        }
    }

    /// The `index`-th live declarator.
    pub fn declarator(&self, index: usize) -> Option<&D> {
        if self.tombstones == 0 {
            return self.slots.get(index).and_then(Option::as_ref);
        }
        self.declarators().nth(index)
    }

    /// Mutable access to the live declarators. Compacts first.
    pub fn declarators_mut(&mut self) -> impl Iterator<Item = &mut D> {
        self.compact();
        self.slots.iter_mut().flatten()
    }

    /// Number of live declarators.
    pub fn len(&self) -> usize {
        self.slots.len() - self.tombstones
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of empty slots still awaiting compaction.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Number of slots the backing storage can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drop empty slots and shrink storage to the live count.
    ///
    /// Survivors keep their relative order. Does nothing when there is no
    /// tombstone.
    pub fn compact(&mut self) {
        if self.tombstones == 0 {
            return;
        }
        self.slots.retain(Option::is_some);
        self.slots.shrink_to_fit();
        self.tombstones = 0;
    }

    /// Split the node into its specifier and live declarators.
    pub fn into_parts(self) -> (Option<S>, Vec<D>) {
        let declarators = self.slots.into_iter().flatten().collect();
        (self.specifier, declarators)
    }
}

impl<S, D> Default for DeclarationNode<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

// Tombstones are not part of a node's value.
impl<S: PartialEq, D: PartialEq> PartialEq for DeclarationNode<S, D> {
    fn eq(&self, other: &Self) -> bool {
        self.specifier == other.specifier && self.declarators().eq(other.declarators())
    }
}

impl<S, D> FromIterator<D> for DeclarationNode<S, D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        let mut node = Self::new();
        for declarator in iter {
            node.add_declarator(declarator);
        }
        node
    }
}

impl<'a, S, D> IntoIterator for &'a DeclarationNode<S, D> {
    type Item = &'a D;
    type IntoIter = Declarators<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarators()
    }
}

/// Iterator returned by [`DeclarationNode::declarators`].
#[derive(Debug, Clone)]
pub struct Declarators<'a, D> {
    inner: slice::Iter<'a, Option<D>>,
    remaining: usize,
}

impl<'a, D> Iterator for Declarators<'a, D> {
    type Item = &'a D;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(declarator) = slot {
                self.remaining -= 1;
                return Some(declarator);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<D> DoubleEndedIterator for Declarators<'_, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.inner.next_back() {
            if let Some(declarator) = slot {
                self.remaining -= 1;
                return Some(declarator);
            }
        }
        None
    }
}

impl<D> ExactSizeIterator for Declarators<'_, D> {}

impl<D> FusedIterator for Declarators<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;

    type Node = DeclarationNode<&'static str, &'static str>;

    fn collect(node: &Node) -> Vec<&'static str> {
        node.declarators().copied().collect()
    }

    #[test]
    fn test_empty_node() {
        let node = Node::new();
        assert!(node.specifier().is_none());
        assert_eq!(node.declarators().len(), 0);
        assert!(collect(&node).is_empty());
        assert_eq!(node.capacity(), 0);
    }

    #[test]
    fn test_specifier_last_write_wins() {
        let mut node = Node::new();
        node.set_specifier("int");
        node.set_specifier("char");
        assert_eq!(node.specifier(), Some(&"char"));
    }

    #[test]
    fn test_declarators_in_order() {
        let mut node = Node::with_specifier("int");
        node.add_declarator("a");
        node.add_declarator("b");
        node.add_declarator("c");

        assert_eq!(node.specifier(), Some(&"int"));
        assert_eq!(collect(&node), vec!["a", "b", "c"]);
        assert_eq!(node.declarators().len(), 3);
    }

    #[test]
    fn test_first_append_reserves_default_capacity() {
        let mut node = Node::new();
        node.add_declarator("a");
        assert!(node.capacity() >= DEFAULT_DECLARATOR_CAPACITY);
    }

    #[test]
    fn test_growth_past_initial_capacity() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let mut node = Node::new();
        for name in names {
            node.add_declarator(name);
        }
        assert_eq!(collect(&node), names.to_vec());
        assert!(node.capacity() >= names.len());
    }

    #[test]
    fn test_tombstones_skipped_before_compaction() {
        let mut node = Node::new();
        node.add_declarator("a");
        node.add_slot(None);
        node.add_declarator("b");

        assert_eq!(node.tombstones(), 1);
        assert_eq!(node.len(), 2);
        assert_eq!(collect(&node), vec!["a", "b"]);
        assert_eq!(node.declarator(1), Some(&"b"));
        assert_eq!(node.declarator(2), None);
    }

    #[test]
    fn test_compact_removes_tombstones() {
        let mut node = Node::new();
        node.add_declarator("a");
        node.add_slot(None);
        node.add_declarator("b");
        node.add_slot(None);
        node.add_slot(None);
        node.add_declarator("c");

        node.compact();
        assert_eq!(node.tombstones(), 0);
        assert_eq!(node.len(), 3);
        assert_eq!(node.capacity(), 3);
        assert_eq!(collect(&node), vec!["a", "b", "c"]);

        // a second compaction is a no-op
        node.compact();
        assert_eq!(collect(&node), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_read_compacts() {
        let mut node = Node::new();
        node.add_declarator("a");
        node.add_slot(None);
        node.add_declarator("b");

        assert_eq!(node.read_declarators().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(node.tombstones(), 0);
        assert_eq!(node.capacity(), 2);

        // nothing left to drop on the next read
        assert_eq!(node.read_declarators().len(), 2);
        assert_eq!(node.capacity(), 2);
    }

    #[test]
    fn test_declarators_mut_compacts_and_edits_in_place() {
        let mut node: DeclarationNode<(), String> = DeclarationNode::new();
        node.add_declarator("a".to_string());
        node.add_slot(None);
        node.add_declarator("b".to_string());

        for declarator in node.declarators_mut() {
            declarator.push('!');
        }
        assert_eq!(node.tombstones(), 0);
        assert_eq!(node.capacity(), 2);
        assert_eq!(node.declarators().collect::<Vec<_>>(), vec!["a!", "b!"]);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let mut node = Node::new();
        node.add_declarator("x");
        node.add_slot(None);
        node.add_declarator("y");

        let first = collect(&node);
        let second = collect(&node);
        assert_eq!(first, second);
        assert_eq!(node.declarators().len(), node.declarators().len());
    }

    #[test]
    fn test_reverse_iteration_skips_tombstones() {
        let mut node = Node::new();
        node.add_slot(None);
        node.add_declarator("a");
        node.add_slot(None);
        node.add_declarator("b");
        node.add_slot(None);

        let reversed: Vec<_> = node.declarators().rev().copied().collect();
        assert_eq!(reversed, vec!["b", "a"]);
    }

    #[test]
    fn test_only_tombstones() {
        let mut node = Node::new();
        node.add_slot(None);
        node.add_slot(None);
        assert!(node.is_empty());
        assert_eq!(node.declarators().next(), None);

        node.compact();
        assert_eq!(node.capacity(), 0);
    }

    #[test]
    fn test_append_after_compaction() {
        let mut node = Node::new();
        node.add_declarator("a");
        node.add_slot(None);
        node.compact();
        node.add_declarator("b");
        assert_eq!(collect(&node), vec!["a", "b"]);
    }

    #[test]
    fn test_into_parts() {
        let mut node = Node::with_specifier("long");
        node.add_declarator("p");
        node.add_slot(None);
        node.add_declarator("q");

        let (spec, decls) = node.into_parts();
        assert_eq!(spec, Some("long"));
        assert_eq!(decls, vec!["p", "q"]);
    }
}
