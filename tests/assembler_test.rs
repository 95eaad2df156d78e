//! Tests for tree assembly and backend orchestration.

use std::sync::Arc;

use cgtree::application::services::{AddInputs, Assembler};
use cgtree::application::ApplicationError;
use cgtree::config::Settings;
use cgtree::domain::kind::{BASE_TAG, LIBRARY_VERSION_NAME, TREE_TAG, ZONE_TAG};
use cgtree::domain::{
    DomainError, EntityBuilder, EntityKind, Index, Link, NodeArena, NodeData, RawNode, SpecializationRegistry,
    Value,
};
use cgtree::infrastructure::backend::MemoryBackend;
use cgtree::infrastructure::di::ServiceContainer;
use cgtree::infrastructure::traits::{RealFileSystem, SaveOptions};
use cgtree::util::testing::{init_test_setup, registry_with, StubHandler};

fn assembler(backend: &Arc<MemoryBackend>, settings: Settings) -> Assembler {
    init_test_setup();
    Assembler::new(
        backend.clone(),
        Arc::new(SpecializationRegistry::new()),
        Arc::new(settings),
    )
}

fn names(arena: &NodeArena, nodes: &[Index]) -> Vec<String> {
    nodes.iter().map(|&n| arena.name(n).unwrap().to_string()).collect()
}

fn child_names(arena: &NodeArena, parent: Index) -> Vec<String> {
    names(arena, arena.children(parent).unwrap())
}

/// CGNSTree/Base/{zones...}, zones three-dimensional.
fn tree_with_zones(arena: &mut NodeArena, zones: &[&str]) -> Index {
    let builder = EntityBuilder::default();
    let tree = builder.tree(arena).unwrap();
    let base = builder.base(arena, "Base", Some(tree)).unwrap();
    for zone in zones {
        builder.zone(arena, zone, &[5, 4, 3], Some(base)).unwrap();
    }
    tree
}

fn loose_zone(arena: &mut NodeArena, name: &str) -> Index {
    EntityBuilder::default().zone(arena, name, &[5, 4, 3], None).unwrap()
}

fn stored_mesh() -> RawNode {
    RawNode::new("CGNSTree", TREE_TAG).with_child(
        RawNode::new("Base", BASE_TAG)
            .with_value(Value::i4(vec![3, 3]))
            .with_child(
                RawNode::new("Wing", ZONE_TAG)
                    .with_value(Value::structured_zone_shape(&[9, 5, 2]))
                    .with_child(RawNode::new("GridCoordinates", "GridCoordinates_t")),
            ),
    )
}

// ============================================================
// add
// ============================================================

#[test]
fn given_two_generic_nodes_named_zone_when_adding_then_second_renamed() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let first = arena.insert_node(NodeData::new("Zone"), None).unwrap();
    let second = arena.insert_node(NodeData::new("Zone"), None).unwrap();

    // Act
    let tree = assembler.add(&mut arena, vec![first, second]).unwrap();

    // Assert
    assert_eq!(arena.kind(tree).unwrap(), &EntityKind::Tree);
    assert_eq!(
        child_names(&arena, tree),
        vec![LIBRARY_VERSION_NAME, "Zone", "Zone.0"]
    );
}

#[test]
fn given_tree_and_colliding_loose_zone_when_getting_zones_then_three_in_preorder() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let tree = tree_with_zones(&mut arena, &["Z1", "Z2"]);
    let standalone = loose_zone(&mut arena, "Z1");

    // Act
    let zones = assembler.get_zones(&mut arena, vec![tree, standalone]).unwrap();

    // Assert
    assert_eq!(names(&arena, &zones), vec!["Z1", "Z2", "Z1.0"]);
    let paths: Vec<String> = zones.iter().map(|&z| arena.path_of(z).unwrap()).collect();
    assert_eq!(paths, vec!["CGNSTree/Base/Z1", "CGNSTree/Base/Z2", "CGNSTree/Base/Z1.0"]);
    assert!(zones.iter().all(|&z| arena.kind(z).unwrap() == &EntityKind::Zone));
}

#[test]
fn given_inputs_when_adding_then_inputs_untouched() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let tree = tree_with_zones(&mut arena, &["Z1"]);
    let standalone = loose_zone(&mut arena, "Z1");
    let tree_before = arena.path_content_map(tree).unwrap();
    let zone_before = arena.path_content_map(standalone).unwrap();

    // Act
    assembler.add(&mut arena, vec![tree, standalone]).unwrap();

    // Assert
    assert_eq!(arena.path_content_map(tree).unwrap(), tree_before);
    assert_eq!(arena.path_content_map(standalone).unwrap(), zone_before);
    assert_eq!(arena.parent(standalone).unwrap(), None);
    assert_eq!(arena.kind(standalone).unwrap(), &EntityKind::Node);
}

#[test]
fn given_named_group_when_adding_then_zones_go_into_synthesized_base() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let a = loose_zone(&mut arena, "A");
    let b = loose_zone(&mut arena, "B");
    let c = loose_zone(&mut arena, "C");

    // Act
    let tree = assembler
        .add(
            &mut arena,
            AddInputs::new().with(c).with_group("Wing", vec![a, b]),
        )
        .unwrap();

    // Assert
    assert_eq!(
        arena.paths(tree).unwrap().into_iter().filter(|p| p.matches('/').count() == 2).collect::<Vec<_>>(),
        vec!["CGNSTree/Base/C", "CGNSTree/Wing/A", "CGNSTree/Wing/B"]
    );
    let wing = arena.get_relative(tree, "Wing").unwrap().unwrap();
    assert_eq!(arena.kind(wing).unwrap(), &EntityKind::Base);
    assert_eq!(arena.data(wing).unwrap().value, Some(Value::i4(vec![3, 3])));
}

#[test]
fn given_zone_inside_named_base_when_adding_then_keeps_base_name() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let builder = EntityBuilder::default();
    let fuselage = builder.base(&mut arena, "Fuselage", None).unwrap();
    let zone = builder.zone(&mut arena, "Body", &[4, 4, 4], Some(fuselage)).unwrap();

    // Act
    let tree = assembler.add(&mut arena, zone).unwrap();

    // Assert
    assert!(arena.get_relative(tree, "Fuselage/Body").unwrap().is_some());
}

#[test]
fn given_generic_node_in_group_when_adding_then_placed_in_group_base() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let loose = arena.insert_node(NodeData::new("Notes"), None).unwrap();
    let other = arena.insert_node(NodeData::new("Extra"), None).unwrap();

    // Act
    let tree = assembler
        .add(&mut arena, AddInputs::new().with_group("Meta", loose).with(other))
        .unwrap();

    // Assert
    assert!(arena.get_relative(tree, "Meta/Notes").unwrap().is_some());
    assert!(arena.get_relative(tree, "Extra").unwrap().is_some());
}

#[test]
fn given_two_trees_with_same_base_when_adding_then_bases_combine() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let a = tree_with_zones(&mut arena, &["Z1"]);
    let b = tree_with_zones(&mut arena, &["Z1", "Z2"]);

    // Act
    let bases = assembler.get_bases(&mut arena, vec![a, b]).unwrap();

    // Assert
    assert_eq!(names(&arena, &bases), vec!["Base"]);
    assert_eq!(child_names(&arena, bases[0]), vec!["Z1", "Z1.0", "Z2"]);
    let tree = arena.root_of(bases[0]).unwrap();
    assert_eq!(child_names(&arena, tree), vec![LIBRARY_VERSION_NAME, "Base"]);
}

#[test]
fn given_unique_zone_names_when_adding_then_zones_renamed_across_bases() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let settings = Settings {
        unique_zone_names: true,
        ..Settings::default()
    };
    let assembler = assembler(&backend, settings);
    let mut arena = NodeArena::new();
    let a = loose_zone(&mut arena, "Block");
    let b = loose_zone(&mut arena, "Block");

    // Act
    let zones = assembler
        .get_zones(
            &mut arena,
            AddInputs::new().with_group("Left", a).with_group("Right", b),
        )
        .unwrap();

    // Assert
    assert_eq!(names(&arena, &zones), vec!["Block", "Block.0"]);
}

#[test]
fn given_group_repeated_after_another_when_adding_unique_names_then_every_zone_renamed() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let settings = Settings {
        unique_zone_names: true,
        ..Settings::default()
    };
    let assembler = assembler(&backend, settings);
    let mut arena = NodeArena::new();
    let a = loose_zone(&mut arena, "Block");
    let b = loose_zone(&mut arena, "Block");
    let c = loose_zone(&mut arena, "Block");

    // Act
    let zones = assembler
        .get_zones(
            &mut arena,
            AddInputs::new()
                .with_group("Left", a)
                .with_group("Right", b)
                .with_group("Left", c),
        )
        .unwrap();

    // Assert
    assert_eq!(names(&arena, &zones), vec!["Block", "Block.0", "Block.1"]);
}

#[test]
fn given_two_tree_roots_in_one_input_when_adding_then_ambiguous_root() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let holder = arena.insert_node(NodeData::new("Holder"), None).unwrap();
    for name in ["T1", "T2"] {
        arena
            .insert_node(NodeData::new(name).with_tag(TREE_TAG), Some(holder))
            .unwrap();
    }
    let before = arena.len();

    // Act
    let result = assembler.add(&mut arena, holder);

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::AmbiguousRoot { path, count })) => {
            assert_eq!(count, 2);
            assert_eq!(path, "Holder/T2");
        }
        other => panic!("expected AmbiguousRoot, got {:?}", other),
    }
    assert_eq!(arena.len(), before);
}

#[test]
fn given_tree_root_below_apex_when_adding_then_ambiguous_root() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let holder = arena.insert_node(NodeData::new("Holder"), None).unwrap();
    arena
        .insert_node(NodeData::new("Inner").with_tag(TREE_TAG), Some(holder))
        .unwrap();

    // Act
    let result = assembler.add(&mut arena, holder);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::AmbiguousRoot { count: 1, .. }))
    ));
}

#[test]
fn given_unsupported_kind_when_adding_then_error_and_no_leftover_nodes() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let fine = loose_zone(&mut arena, "Fine");
    let odd = loose_zone(&mut arena, "Odd");
    EntityBuilder::default().set_zone_kind(&mut arena, odd, "LiftingLine").unwrap();
    let before = arena.len();

    // Act
    let result = assembler.add(&mut arena, vec![fine, odd]);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnsupportedKind { .. }))
    ));
    assert_eq!(arena.len(), before);
}

#[test]
fn given_registered_kind_when_getting_zones_then_registered_zone_listed() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = Assembler::new(
        backend.clone(),
        Arc::new(registry_with(vec![StubHandler::accepting("LiftingLine")])),
        Arc::new(Settings::default()),
    );
    let mut arena = NodeArena::new();
    let line = EntityBuilder::default().zone(&mut arena, "Line", &[30], None).unwrap();
    EntityBuilder::default().set_zone_kind(&mut arena, line, "LiftingLine").unwrap();

    // Act
    let zones = assembler.get_zones(&mut arena, line).unwrap();

    // Assert
    assert_eq!(zones.len(), 1);
    assert_eq!(arena.kind(zones[0]).unwrap().label(), "LiftingLine");
}

/// CGNSTree/Base/LL where LL selects a kind nobody registered.
fn tree_with_lifting_line(arena: &mut NodeArena) -> (Index, Index, Index) {
    let builder = EntityBuilder::default();
    let tree = builder.tree(arena).unwrap();
    let base = builder.base(arena, "Base", Some(tree)).unwrap();
    let zone = builder.zone(arena, "LL", &[10, 4, 2], Some(base)).unwrap();
    builder.set_zone_kind(arena, zone, "LiftingLine").unwrap();
    (tree, base, zone)
}

fn assert_unsupported_at<T: std::fmt::Debug>(result: Result<T, ApplicationError>, expected_path: &str) {
    match result {
        Err(ApplicationError::Domain(DomainError::UnsupportedKind { kind, path })) => {
            assert_eq!(kind, "LiftingLine");
            assert_eq!(path, expected_path);
        }
        other => panic!("expected UnsupportedKind, got {:?}", other),
    }
}

#[test]
fn given_unsupported_zone_inside_tree_when_adding_base_or_zone_then_error_names_full_path() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let (_, base, zone) = tree_with_lifting_line(&mut arena);
    let before = arena.len();

    // Act
    let from_base = assembler.add(&mut arena, base);
    let from_zone = assembler.add(&mut arena, zone);

    // Assert
    assert_unsupported_at(from_base, "CGNSTree/Base/LL");
    assert_unsupported_at(from_zone, "CGNSTree/Base/LL");
    assert_eq!(arena.len(), before);
}

#[test]
fn given_stored_unsupported_zone_when_reading_node_then_error_names_stored_path() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let mut scratch = NodeArena::new();
    let (tree, _, _) = tree_with_lifting_line(&mut scratch);
    backend.insert("mesh", scratch.to_raw(tree).unwrap(), Vec::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let result = assembler.read_node(&mut arena, "mesh", "Base/LL");

    // Assert
    assert_unsupported_at(result, "CGNSTree/Base/LL");
    assert!(arena.is_empty());
}

// ============================================================
// save / load
// ============================================================

#[test]
fn given_tree_with_links_when_saving_and_loading_then_links_and_kinds_restored() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let tree = tree_with_zones(&mut arena, &["Wing"]);
    let link = Link::new("CGNSTree/Base/Wing", "mesh", "Base/Wing");
    arena.data_mut(tree).unwrap().links.push(link.clone());

    // Act
    let saved = assembler
        .save(&mut arena, tree, "out", &SaveOptions::default())
        .unwrap();
    let loaded = assembler.load(&mut arena, "out").unwrap();

    // Assert
    assert_eq!(saved, tree);
    assert_eq!(backend.get("out").unwrap().links, vec![link.clone()]);
    assert_eq!(arena.data(loaded).unwrap().links, vec![link]);
    assert_eq!(arena.kind(loaded).unwrap(), &EntityKind::Tree);
    let zone = arena.get_relative(loaded, "Base/Wing").unwrap().unwrap();
    assert_eq!(arena.kind(zone).unwrap(), &EntityKind::Zone);
}

#[test]
fn given_loose_zones_when_saving_then_assembled_tree_stored() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let a = loose_zone(&mut arena, "A");
    let b = loose_zone(&mut arena, "A");

    // Act
    assembler
        .save(&mut arena, vec![a, b], "zones", &SaveOptions::default())
        .unwrap();

    // Assert
    let stored = backend.get("zones").unwrap().tree;
    assert_eq!(stored.type_tag, TREE_TAG);
    assert!(stored.get_relative("Base/A").is_some());
    assert!(stored.get_relative("Base/A.0").is_some());
}

#[test]
fn given_missing_source_when_loading_then_node_not_found() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let result = assembler.load(&mut arena, "nowhere");

    // Assert
    match result {
        Err(ApplicationError::NodeNotFound { path, source_id }) => {
            assert_eq!(path, "/");
            assert_eq!(source_id, "nowhere");
        }
        other => panic!("expected NodeNotFound, got {:?}", other),
    }
}

#[test]
fn given_stored_name_with_separator_when_loading_then_malformed_and_arena_empty() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert(
        "bad",
        RawNode::new("CGNSTree", TREE_TAG).with_child(
            RawNode::new("Base", BASE_TAG)
                .with_value(Value::i4(vec![3, 3]))
                .with_child(RawNode::new("Wing/Tip", ZONE_TAG).with_value(Value::structured_zone_shape(&[9, 5, 2]))),
        ),
        Vec::new(),
    );
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let result = assembler.load(&mut arena, "bad");

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::MalformedSubtree(message))) => {
            assert!(message.contains("CGNSTree/Base/\"Wing/Tip\""), "{}", message);
        }
        other => panic!("expected MalformedSubtree, got {:?}", other),
    }
    assert!(arena.is_empty());
}

#[test]
fn given_stored_base_when_loading_then_wrapped_in_tree() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert(
        "base-only",
        RawNode::new("Base", BASE_TAG).with_child(
            RawNode::new("Wing", ZONE_TAG).with_value(Value::structured_zone_shape(&[9, 5, 2])),
        ),
        Vec::new(),
    );
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let tree = assembler.load(&mut arena, "base-only").unwrap();

    // Assert
    assert_eq!(arena.name(tree).unwrap(), "CGNSTree");
    assert_eq!(child_names(&arena, tree), vec![LIBRARY_VERSION_NAME, "Base"]);
    assert_eq!(arena.iter_preorder(tree).count(), arena.len());
}

#[test]
fn given_several_sources_when_loading_many_then_merged_into_one_tree() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    backend.insert(
        "tail",
        RawNode::new("CGNSTree", TREE_TAG).with_child(
            RawNode::new("Base", BASE_TAG)
                .with_child(RawNode::new("Tail", ZONE_TAG).with_value(Value::structured_zone_shape(&[3, 3, 3]))),
        ),
        vec![Link::new("CGNSTree/Base/Fin", "fin", "Base/Fin")],
    );
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let tree = assembler.load_many(&mut arena, &["mesh", "tail"]).unwrap();

    // Assert
    let base = arena.get_relative(tree, "Base").unwrap().unwrap();
    assert_eq!(child_names(&arena, base), vec!["Wing", "Tail"]);
    assert_eq!(arena.data(tree).unwrap().links.len(), 1);
    assert_eq!(arena.iter_preorder(tree).count(), arena.len());
}

#[test]
fn given_one_missing_source_when_loading_many_then_error_and_arena_empty() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let result = assembler.load_many(&mut arena, &["mesh", "missing"]);

    // Assert
    assert!(matches!(result, Err(ApplicationError::NodeNotFound { .. })));
    assert!(arena.is_empty());
}

#[test]
fn given_path_with_or_without_tree_name_when_reading_node_then_same_node() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let full = assembler.read_node(&mut arena, "mesh", "CGNSTree/Base/Wing").unwrap();
    let relative = assembler.read_node(&mut arena, "mesh", "Base/Wing").unwrap();

    // Assert
    assert_eq!(arena.name(full).unwrap(), "Wing");
    assert_eq!(arena.kind(full).unwrap(), &EntityKind::Zone);
    assert_eq!(
        arena.path_content_map(full).unwrap(),
        arena.path_content_map(relative).unwrap()
    );
}

#[test]
fn given_missing_path_when_reading_node_then_not_found_with_requested_path() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();

    // Act
    let result = assembler.read_node(&mut arena, "mesh", "CGNSTree/Base/Tail");

    // Assert
    match result {
        Err(ApplicationError::NodeNotFound { path, source_id }) => {
            assert_eq!(path, "CGNSTree/Base/Tail");
            assert_eq!(source_id, "mesh");
        }
        other => panic!("expected NodeNotFound, got {:?}", other),
    }
}

// ============================================================
// links
// ============================================================

#[test]
fn given_link_when_resolving_then_placeholder_replaced_and_link_dropped() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let tree = tree_with_zones(&mut arena, &["Wing", "Tail"]);
    arena
        .data_mut(tree)
        .unwrap()
        .links
        .push(Link::new("CGNSTree/Base/Wing", "mesh", "Base/Wing"));

    // Act
    let resolved = assembler
        .resolve_link(&mut arena, tree, "CGNSTree/Base/Wing")
        .unwrap();

    // Assert
    assert_eq!(arena.path_of(resolved).unwrap(), "CGNSTree/Base/Wing");
    assert!(arena.get_relative(resolved, "GridCoordinates").unwrap().is_some());
    let base = arena.get_relative(tree, "Base").unwrap().unwrap();
    assert_eq!(child_names(&arena, base), vec!["Wing", "Tail"]);
    assert!(arena.data(tree).unwrap().links.is_empty());
}

#[test]
fn given_unknown_link_when_resolving_then_link_not_found() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    let assembler = assembler(&backend, Settings::default());
    let mut arena = NodeArena::new();
    let tree = tree_with_zones(&mut arena, &["Wing"]);

    // Act
    let result = assembler.resolve_link(&mut arena, tree, "Base/Wing");

    // Assert
    assert!(matches!(result, Err(ApplicationError::LinkNotFound(_))));
}

// ============================================================
// wiring
// ============================================================

#[test]
fn given_container_with_memory_backend_when_assembling_then_uses_injected_settings() {
    // Arrange
    init_test_setup();
    let backend = Arc::new(MemoryBackend::new());
    backend.insert("mesh", stored_mesh(), Vec::new());
    let settings = Settings {
        tree_name: "Mesh".into(),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        backend.clone(),
        SpecializationRegistry::new(),
    );
    let mut arena = NodeArena::new();

    // Act
    let tree = container.assembler().load_many(&mut arena, &["mesh"]).unwrap();

    // Assert
    assert_eq!(arena.name(tree).unwrap(), "Mesh");
    assert!(arena.get_relative(tree, "Base/Wing").unwrap().is_some());
}
