//! Unit tests for the scene graph
//!
//! Covers node creation and destruction, paint-order mutation and the
//! point query used by hit-testing.

use super::*;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[test]
fn test_new_scene_has_only_root() {
    let scene = Scene::new();
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.kind(scene.root()), Some(&NodeKind::Root));
    assert_eq!(scene.parent(scene.root()), None);
    assert!(scene.children(scene.root()).is_empty());
}

#[test]
fn test_children_keep_creation_order() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = scene.create_tree(root);
    let b = scene.create_tree(root);
    let c = scene.create_rect(root, 10, 10, WHITE);

    assert_eq!(scene.children(root), &[a, b, c]);
    assert_eq!(scene.parent(c), Some(root));
}

#[test]
fn test_raise_and_lower_reorder_siblings() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = scene.create_tree(root);
    let b = scene.create_tree(root);
    let c = scene.create_tree(root);

    scene.raise_to_top(a);
    assert_eq!(scene.children(root), &[b, c, a]);

    scene.lower_to_bottom(c);
    assert_eq!(scene.children(root), &[c, b, a]);
}

#[test]
fn test_destroy_removes_subtree() {
    let mut scene = Scene::new();
    let root = scene.root();
    let tree = scene.create_tree(root);
    let rect = scene.create_rect(tree, 5, 5, WHITE);
    let nested = scene.create_buffer(rect, 2, 2);

    scene.destroy(tree);

    assert!(!scene.contains(tree));
    assert!(!scene.contains(rect));
    assert!(!scene.contains(nested));
    assert!(scene.children(root).is_empty());
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_destroy_root_is_ignored() {
    let mut scene = Scene::new();
    let root = scene.root();
    scene.destroy(root);
    assert!(scene.contains(root));
}

#[test]
fn test_coords_accumulate_offsets() {
    let mut scene = Scene::new();
    let root = scene.root();
    let tree = scene.create_tree(root);
    scene.set_position(tree, 100, 50);
    let rect = scene.create_rect(tree, 10, 10, WHITE);
    scene.set_position(rect, -5, 7);

    assert_eq!(scene.coords(rect), Some((95, 57, true)));

    scene.set_enabled(tree, false);
    assert_eq!(scene.coords(rect), Some((95, 57, false)));
}

#[test]
fn test_ancestors_walks_to_root() {
    let mut scene = Scene::new();
    let root = scene.root();
    let tree = scene.create_tree(root);
    let rect = scene.create_rect(tree, 1, 1, WHITE);

    let chain: Vec<_> = scene.ancestors(rect).collect();
    assert_eq!(chain, vec![rect, tree, root]);
}

#[test]
fn test_node_at_returns_local_coordinates() {
    let mut scene = Scene::new();
    let root = scene.root();
    let tree = scene.create_tree(root);
    scene.set_position(tree, 100, 100);
    let rect = scene.create_rect(tree, 50, 20, WHITE);
    scene.set_position(rect, 10, 10);

    let hit = scene.node_at(root, 115.0, 112.5).expect("point is inside the rect");
    assert_eq!(hit.node, rect);
    assert_eq!(hit.sx, 5.0);
    assert_eq!(hit.sy, 2.5);

    assert!(scene.node_at(root, 109.0, 112.0).is_none());
    // Right and bottom edges are exclusive
    assert!(scene.node_at(root, 160.0, 115.0).is_none());
    assert!(scene.node_at(root, 115.0, 130.0).is_none());
}

#[test]
fn test_node_at_prefers_topmost_sibling() {
    let mut scene = Scene::new();
    let root = scene.root();
    let bottom = scene.create_rect(root, 100, 100, WHITE);
    let top = scene.create_rect(root, 100, 100, WHITE);

    assert_eq!(scene.node_at(root, 10.0, 10.0).map(|h| h.node), Some(top));

    scene.raise_to_top(bottom);
    assert_eq!(scene.node_at(root, 10.0, 10.0).map(|h| h.node), Some(bottom));
}

#[test]
fn test_node_at_skips_disabled_subtrees() {
    let mut scene = Scene::new();
    let root = scene.root();
    let bottom = scene.create_rect(root, 100, 100, WHITE);
    let tree = scene.create_tree(root);
    scene.create_rect(tree, 100, 100, WHITE);

    scene.set_enabled(tree, false);
    assert_eq!(scene.node_at(root, 10.0, 10.0).map(|h| h.node), Some(bottom));
}

#[test]
fn test_node_at_children_of_drawable_win_over_parent() {
    let mut scene = Scene::new();
    let root = scene.root();
    let button = scene.create_rect(root, 26, 26, WHITE);
    let icon = scene.create_buffer(button, 10, 10);
    scene.set_position(icon, 8, 8);

    assert_eq!(scene.node_at(root, 10.0, 10.0).map(|h| h.node), Some(icon));
    assert_eq!(scene.node_at(root, 2.0, 2.0).map(|h| h.node), Some(button));
}

#[test]
fn test_node_at_from_subtree_uses_parent_offsets() {
    let mut scene = Scene::new();
    let root = scene.root();
    let outer = scene.create_tree(root);
    scene.set_position(outer, 40, 40);
    let inner = scene.create_tree(outer);
    let rect = scene.create_rect(inner, 10, 10, WHITE);

    let hit = scene.node_at(inner, 45.0, 45.0).expect("hit in subtree");
    assert_eq!(hit.node, rect);
    assert_eq!((hit.sx, hit.sy), (5.0, 5.0));
}

#[test]
fn test_set_size_updates_drawables_only() {
    let mut scene = Scene::new();
    let root = scene.root();
    let tree = scene.create_tree(root);
    let rect = scene.create_rect(root, 1, 1, WHITE);

    scene.set_size(rect, 30, 40);
    scene.set_size(tree, 30, 40);

    assert!(matches!(
        scene.kind(rect),
        Some(NodeKind::Rect { width: 30, height: 40, .. })
    ));
    assert_eq!(scene.kind(tree), Some(&NodeKind::Tree));
}
