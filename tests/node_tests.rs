// Behavior of the declarator-list node through its public API

use declview::parser::node::{DeclarationNode, DEFAULT_DECLARATOR_CAPACITY};

type Node = DeclarationNode<&'static str, &'static str>;

fn live(node: &Node) -> Vec<&'static str> {
    node.declarators().copied().collect()
}

#[test]
fn test_specifier_and_declarators_in_order() {
    let mut node = Node::new();
    node.set_specifier("int");
    for name in ["a", "b", "c"] {
        node.add_declarator(name);
    }

    assert_eq!(node.specifier(), Some(&"int"));
    assert_eq!(live(&node), vec!["a", "b", "c"]);
}

#[test]
fn test_tombstones_are_never_read() {
    let mut node = Node::with_specifier("int");
    for slot in [Some("a"), None, Some("b"), None, None, Some("c")] {
        node.add_slot(slot);
    }

    assert_eq!(node.len(), 3);
    assert_eq!(node.declarators().len(), 3);
    assert_eq!(live(&node), vec!["a", "b", "c"]);
    assert_eq!(node.declarator(2), Some(&"c"));
    assert_eq!(node.declarator(3), None);
}

#[test]
fn test_first_read_after_tombstone_compacts() {
    let mut node = Node::new();
    node.add_declarator("a");
    node.add_slot(None);
    node.add_declarator("b");
    assert_eq!(node.tombstones(), 1);

    let first: Vec<_> = node.read_declarators().copied().collect();
    assert_eq!(first, vec!["a", "b"]);
    assert_eq!(node.tombstones(), 0);
    assert_eq!(node.capacity(), 2);

    let second: Vec<_> = node.read_declarators().copied().collect();
    assert_eq!(first, second);

    // a later tombstone is dropped by the next read
    node.add_slot(None);
    node.add_declarator("c");
    assert_eq!(node.tombstones(), 1);
    assert_eq!(node.read_declarators().len(), 3);
    assert_eq!(node.tombstones(), 0);
    assert_eq!(live(&node), vec!["a", "b", "c"]);
}

#[test]
fn test_shared_view_skips_without_compacting() {
    let mut node = Node::new();
    node.add_declarator("a");
    node.add_slot(None);
    node.add_declarator("b");

    assert_eq!(live(&node), vec!["a", "b"]);
    assert_eq!(node.tombstones(), 1);

    node.compact();
    assert_eq!(node.tombstones(), 0);
    assert_eq!(node.capacity(), 2);
    assert_eq!(live(&node), vec!["a", "b"]);
}

#[test]
fn test_declarators_mut_sees_only_live_slots() {
    let mut node: DeclarationNode<&str, u32> = DeclarationNode::with_specifier("int");
    for slot in [Some(1), None, None, Some(2)] {
        node.add_slot(slot);
    }

    for value in node.declarators_mut() {
        *value *= 10;
    }
    assert_eq!(node.tombstones(), 0);
    assert_eq!(node.declarators().copied().collect::<Vec<_>>(), vec![10, 20]);
}

#[test]
fn test_empty_node_reads_as_empty() {
    let node = Node::new();
    assert!(node.specifier().is_none());
    assert!(node.is_empty());
    assert_eq!(node.declarators().count(), 0);
    assert_eq!(node.capacity(), 0);
}

#[test]
fn test_specifier_last_write_wins() {
    let mut node = Node::with_specifier("int");
    node.set_specifier("char");
    assert_eq!(node.specifier(), Some(&"char"));
}

#[test]
fn test_growth_keeps_every_declarator() {
    let names: Vec<String> = (0..100).map(|i| format!("d{}", i)).collect();
    let mut node: DeclarationNode<(), String> = DeclarationNode::new();
    for name in &names {
        node.add_declarator(name.clone());
    }

    assert_eq!(node.len(), 100);
    assert!(node.capacity() >= 100);
    assert!(node.declarators().eq(names.iter()));
}

#[test]
fn test_first_append_reserves_default_capacity() {
    let mut node = Node::new();
    node.add_declarator("a");
    assert!(node.capacity() >= DEFAULT_DECLARATOR_CAPACITY);
}

#[test]
fn test_view_is_double_ended() {
    let mut node = Node::new();
    for slot in [None, Some("x"), Some("y"), None, Some("z"), None] {
        node.add_slot(slot);
    }
    let reversed: Vec<_> = node.declarators().rev().copied().collect();
    assert_eq!(reversed, vec!["z", "y", "x"]);
}

#[test]
fn test_into_parts_drops_tombstones() {
    let mut node = Node::with_specifier("long");
    node.add_slot(None);
    node.add_declarator("n");
    let (specifier, declarators) = node.into_parts();
    assert_eq!(specifier, Some("long"));
    assert_eq!(declarators, vec!["n"]);
}

#[test]
fn test_equality_ignores_tombstones() {
    let mut with_gaps = Node::with_specifier("int");
    with_gaps.add_declarator("a");
    with_gaps.add_slot(None);
    with_gaps.add_declarator("b");

    let mut plain = Node::with_specifier("int");
    plain.add_declarator("a");
    plain.add_declarator("b");

    assert_eq!(with_gaps, plain);
}

#[test]
fn test_equality_compares_specifiers() {
    let mut int_node = Node::with_specifier("int");
    int_node.add_declarator("a");
    let mut char_node = Node::with_specifier("char");
    char_node.add_declarator("a");
    assert_ne!(int_node, char_node);

    let mut bare = Node::new();
    bare.add_declarator("a");
    assert_ne!(bare, int_node);
}

#[test]
fn test_equality_without_specifiers() {
    let mut with_gaps = Node::new();
    with_gaps.add_slot(None);
    with_gaps.add_declarator("a");
    with_gaps.add_slot(None);

    let mut plain = Node::new();
    plain.add_declarator("a");

    assert_eq!(with_gaps, plain);
    assert_eq!(Node::new(), Node::new());

    plain.add_declarator("b");
    assert_ne!(with_gaps, plain);
}

#[test]
fn test_collect_and_borrow_iteration() {
    let node: Node = ["a", "b"].into_iter().collect();
    assert!(node.specifier().is_none());

    let mut seen = Vec::new();
    for declarator in &node {
        seen.push(*declarator);
    }
    assert_eq!(seen, vec!["a", "b"]);
}
