//! Tests for the node arena: attachment, detachment, copies and paths.

use cgtree::domain::{DomainError, Index, NodeArena, NodeData, Value};

fn chain(arena: &mut NodeArena) -> (Index, Index, Index) {
    let root = arena.insert_node(NodeData::new("Root"), None).unwrap();
    let mid = arena.insert_node(NodeData::new("Mid"), Some(root)).unwrap();
    let leaf = arena
        .insert_node(NodeData::new("Leaf").with_value(Value::i4(vec![1, 2, 3])), Some(mid))
        .unwrap();
    (root, mid, leaf)
}

#[test]
fn given_parent_when_inserting_child_then_both_links_set() {
    // Arrange
    let mut arena = NodeArena::new();
    let root = arena.insert_node(NodeData::new("Root"), None).unwrap();

    // Act
    let child = arena.insert_node(NodeData::new("Child"), Some(root)).unwrap();

    // Assert
    assert_eq!(arena.parent(child).unwrap(), Some(root));
    assert_eq!(arena.children(root).unwrap(), &[child]);
}

#[test]
fn given_attached_node_when_attaching_elsewhere_then_moves() {
    // Arrange
    let mut arena = NodeArena::new();
    let a = arena.insert_node(NodeData::new("A"), None).unwrap();
    let b = arena.insert_node(NodeData::new("B"), None).unwrap();
    let child = arena.insert_node(NodeData::new("C"), Some(a)).unwrap();

    // Act
    arena.attach_child(b, child).unwrap();

    // Assert
    assert!(arena.children(a).unwrap().is_empty());
    assert_eq!(arena.children(b).unwrap(), &[child]);
    assert_eq!(arena.parent(child).unwrap(), Some(b));
    assert!(arena.only_contains_nodes(a));
    assert!(arena.only_contains_nodes(b));
}

#[test]
fn given_same_parent_when_attaching_again_then_child_listed_once() {
    // Arrange
    let mut arena = NodeArena::new();
    let parent = arena.insert_node(NodeData::new("P"), None).unwrap();
    let first = arena.insert_node(NodeData::new("First"), Some(parent)).unwrap();
    let second = arena.insert_node(NodeData::new("Second"), Some(parent)).unwrap();

    // Act
    arena.attach_child(parent, first).unwrap();

    // Assert
    assert_eq!(arena.children(parent).unwrap(), &[second, first]);
}

#[test]
fn given_position_when_attaching_then_inserted_there() {
    // Arrange
    let mut arena = NodeArena::new();
    let parent = arena.insert_node(NodeData::new("P"), None).unwrap();
    let a = arena.insert_node(NodeData::new("A"), Some(parent)).unwrap();
    let b = arena.insert_node(NodeData::new("B"), Some(parent)).unwrap();
    let c = arena.insert_node(NodeData::new("C"), None).unwrap();

    // Act
    arena.attach_child_at(parent, 1, c).unwrap();

    // Assert
    assert_eq!(arena.children(parent).unwrap(), &[a, c, b]);
}

#[test]
fn given_descendant_when_attaching_ancestor_below_it_then_cycle_rejected() {
    // Arrange
    let mut arena = NodeArena::new();
    let (root, _, leaf) = chain(&mut arena);

    // Act
    let result = arena.attach_child(leaf, root);

    // Assert
    assert!(matches!(result, Err(DomainError::CycleDetected { .. })));
    assert_eq!(arena.parent(root).unwrap(), None);
    assert!(arena.children(leaf).unwrap().is_empty());
}

#[test]
fn given_detached_node_when_asking_parent_then_none() {
    // Arrange
    let mut arena = NodeArena::new();
    let (_, mid, leaf) = chain(&mut arena);

    // Act
    let old = arena.detach(leaf).unwrap();

    // Assert
    assert_eq!(old, Some(mid));
    assert_eq!(arena.parent(leaf).unwrap(), None);
    assert!(arena.children(mid).unwrap().is_empty());
}

#[test]
fn given_removed_subtree_when_using_stale_handle_then_dangling_reference() {
    // Arrange
    let mut arena = NodeArena::new();
    let (root, mid, leaf) = chain(&mut arena);

    // Act
    let removed = arena.remove_subtree(mid).unwrap();

    // Assert
    assert_eq!(removed.name, "Mid");
    assert!(arena.children(root).unwrap().is_empty());
    assert!(matches!(arena.name(leaf), Err(DomainError::DanglingReference(_))));
    assert!(matches!(arena.parent(mid), Err(DomainError::DanglingReference(_))));
    assert_eq!(arena.len(), 1);
}

#[test]
fn given_subtree_when_deep_copying_then_copy_is_independent() {
    // Arrange
    let mut arena = NodeArena::new();
    let (root, mid, _) = chain(&mut arena);

    // Act
    let copy = arena.deep_copy(mid).unwrap();
    arena.set_name(copy, "Copy").unwrap();
    let copied_leaf = arena.children(copy).unwrap()[0];
    arena.data_mut(copied_leaf).unwrap().value = None;

    // Assert
    assert_eq!(arena.parent(copy).unwrap(), None);
    assert_eq!(arena.paths(root).unwrap(), vec!["Root", "Root/Mid", "Root/Mid/Leaf"]);
    let original_leaf = arena.get_at_path(root, "Root/Mid/Leaf").unwrap().unwrap();
    assert!(arena.data(original_leaf).unwrap().value.is_some());
}

#[test]
fn given_other_arena_when_importing_then_subtree_copied() {
    // Arrange
    let mut source = NodeArena::new();
    let (root, _, _) = chain(&mut source);
    let mut target = NodeArena::new();

    // Act
    let imported = target.import(&source, root).unwrap();

    // Assert
    assert_eq!(
        target.path_content_map(imported).unwrap(),
        source.path_content_map(root).unwrap()
    );
}

#[test]
fn given_tree_when_iterating_then_pre_and_post_order_agree_on_nodes() {
    // Arrange
    let mut arena = NodeArena::new();
    let (root, mid, leaf) = chain(&mut arena);
    let sibling = arena.insert_node(NodeData::new("Sibling"), Some(root)).unwrap();

    // Act
    let pre: Vec<Index> = arena.iter_preorder(root).map(|(i, _)| i).collect();
    let post: Vec<Index> = arena.iter_postorder(root).map(|(i, _)| i).collect();

    // Assert
    assert_eq!(pre, vec![root, mid, leaf, sibling]);
    assert_eq!(post, vec![leaf, mid, sibling, root]);
}

#[test]
fn given_nested_node_when_computing_paths_then_names_joined_from_root() {
    // Arrange
    let mut arena = NodeArena::new();
    let (root, mid, leaf) = chain(&mut arena);

    // Act
    let full = arena.path_of(leaf).unwrap();
    let below_mid = arena.path_from(mid, leaf).unwrap();

    // Assert
    assert_eq!(full, "Root/Mid/Leaf");
    assert_eq!(below_mid, "Mid/Leaf");
    assert_eq!(arena.get_relative(root, "Mid/Leaf").unwrap(), Some(leaf));
    assert_eq!(arena.get_relative(root, "/Mid//Leaf/").unwrap(), Some(leaf));
    assert_eq!(arena.get_at_path(root, "Other/Mid").unwrap(), None);
}

#[test]
fn given_rename_when_recomputing_path_then_path_follows() {
    // Arrange
    let mut arena = NodeArena::new();
    let (_, mid, leaf) = chain(&mut arena);

    // Act
    arena.set_name(mid, "Renamed").unwrap();

    // Assert
    assert_eq!(arena.path_of(leaf).unwrap(), "Root/Renamed/Leaf");
}

#[test]
fn given_name_with_separator_when_renaming_then_rejected() {
    // Arrange
    let mut arena = NodeArena::new();
    let (_, mid, _) = chain(&mut arena);

    // Act
    let result = arena.set_name(mid, "a/b");

    // Assert
    assert!(matches!(result, Err(DomainError::InvalidName { .. })));
    assert_eq!(arena.name(mid).unwrap(), "Mid");
}
