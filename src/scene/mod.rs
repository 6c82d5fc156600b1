//! Scene graph for the desktop
//!
//! The scene is an arena of typed nodes. Every node carries a local offset
//! relative to its parent and an ordered list of children; the last child is
//! painted last and is therefore the topmost one for hit-testing.
//!
//! ```text
//! root
//! ├── layer-background / layer-bottom   (per output)
//! ├── view_tree
//! │   └── view subtree ── ssd tree, content surface
//! ├── layer-top / layer-overlay         (per output)
//! ├── osd_tree
//! └── menu_tree
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::view::SurfaceId;

/// Identifier of a node in the scene arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// What a node draws, and the fields only that kind needs
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Tree,
    Surface {
        surface: SurfaceId,
        width: i32,
        height: i32,
    },
    Rect {
        width: i32,
        height: i32,
        color: [f32; 4],
    },
    Buffer {
        width: i32,
        height: i32,
    },
}

impl NodeKind {
    /// Short name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Tree => "tree",
            NodeKind::Surface { .. } => "surface",
            NodeKind::Rect { .. } => "rect",
            NodeKind::Buffer { .. } => "buffer",
        }
    }

    /// Size of the painted area, `None` for pure containers
    fn extent(&self) -> Option<(i32, i32)> {
        match *self {
            NodeKind::Root | NodeKind::Tree => None,
            NodeKind::Surface { width, height, .. }
            | NodeKind::Rect { width, height, .. }
            | NodeKind::Buffer { width, height } => Some((width, height)),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    x: i32,
    y: i32,
    enabled: bool,
}

/// Result of a point query: the node hit and the point in its local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAt {
    pub node: NodeId,
    pub sx: f64,
    pub sy: f64,
}

/// Arena-backed scene graph
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u32,
}

impl Scene {
    /// Creates a scene holding only the root node
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                x: 0,
                y: 0,
                enabled: true,
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Creates an empty container node on top of `parent`
    pub fn create_tree(&mut self, parent: NodeId) -> NodeId {
        self.insert(parent, NodeKind::Tree)
    }

    pub fn create_surface(
        &mut self,
        parent: NodeId,
        surface: SurfaceId,
        width: i32,
        height: i32,
    ) -> NodeId {
        self.insert(
            parent,
            NodeKind::Surface {
                surface,
                width,
                height,
            },
        )
    }

    pub fn create_rect(&mut self, parent: NodeId, width: i32, height: i32, color: [f32; 4]) -> NodeId {
        self.insert(
            parent,
            NodeKind::Rect {
                width,
                height,
                color,
            },
        )
    }

    pub fn create_buffer(&mut self, parent: NodeId, width: i32, height: i32) -> NodeId {
        self.insert(parent, NodeKind::Buffer { width, height })
    }

    fn insert(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        debug_assert!(self.nodes.contains_key(&parent), "parent {} is not in the scene", parent);
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                kind,
                parent: Some(parent),
                children: Vec::new(),
                x: 0,
                y: 0,
                enabled: true,
            },
        );
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Destroys a node and its whole subtree. Destroying the root is ignored.
    pub fn destroy(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        let Some(parent) = self.nodes.get(&node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&child| child != node);
        }

        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                pending.extend(removed.children);
            }
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(&node).map(|n| &n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    /// Children in paint order, bottom first
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates `node` and then each of its ancestors up to the root
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.contains(node).then_some(node),
        }
    }

    pub fn position(&self, node: NodeId) -> Option<(i32, i32)> {
        self.nodes.get(&node).map(|n| (n.x, n.y))
    }

    pub fn set_position(&mut self, node: NodeId, x: i32, y: i32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.x = x;
            n.y = y;
        }
    }

    /// Resizes a surface, rect or buffer node; containers are left alone
    pub fn set_size(&mut self, node: NodeId, new_width: i32, new_height: i32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            match &mut n.kind {
                NodeKind::Surface { width, height, .. }
                | NodeKind::Rect { width, height, .. }
                | NodeKind::Buffer { width, height } => {
                    *width = new_width;
                    *height = new_height;
                }
                NodeKind::Root | NodeKind::Tree => {}
            }
        }
    }

    pub fn is_enabled(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map(|n| n.enabled).unwrap_or(false)
    }

    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.enabled = enabled;
        }
    }

    /// Layout-space coordinates of a node and whether it and all of its
    /// ancestors are enabled
    pub fn coords(&self, node: NodeId) -> Option<(i32, i32, bool)> {
        if !self.contains(node) {
            return None;
        }
        let (mut x, mut y, mut enabled) = (0, 0, true);
        for id in self.ancestors(node) {
            let n = &self.nodes[&id];
            x = n.x.saturating_add(x);
            y = n.y.saturating_add(y);
            enabled &= n.enabled;
        }
        Some((x, y, enabled))
    }

    /// Moves a node above all of its siblings
    pub fn raise_to_top(&mut self, node: NodeId) {
        if let Some(siblings) = self.siblings_mut(node) {
            siblings.retain(|&id| id != node);
            siblings.push(node);
        }
    }

    /// Moves a node below all of its siblings
    pub fn lower_to_bottom(&mut self, node: NodeId) {
        if let Some(siblings) = self.siblings_mut(node) {
            siblings.retain(|&id| id != node);
            siblings.insert(0, node);
        }
    }

    fn siblings_mut(&mut self, node: NodeId) -> Option<&mut Vec<NodeId>> {
        let parent = self.parent(node)?;
        self.nodes.get_mut(&parent).map(|p| &mut p.children)
    }

    /// Finds the topmost enabled drawable node below `node` that contains the
    /// layout point `(lx, ly)`.
    pub fn node_at(&self, node: NodeId, lx: f64, ly: f64) -> Option<NodeAt> {
        // Start from the parent's absolute offset so the query point is in
        // the same space as `node`'s own offset.
        let (px, py) = match self.parent(node).and_then(|p| self.coords(p)) {
            Some((x, y, _)) => (x as f64, y as f64),
            None => (0.0, 0.0),
        };
        self.node_at_local(node, lx - px, ly - py)
    }

    fn node_at_local(&self, id: NodeId, lx: f64, ly: f64) -> Option<NodeAt> {
        let node = self.nodes.get(&id)?;
        if !node.enabled {
            return None;
        }
        let lx = lx - node.x as f64;
        let ly = ly - node.y as f64;

        for &child in node.children.iter().rev() {
            if let Some(found) = self.node_at_local(child, lx, ly) {
                return Some(found);
            }
        }

        match node.kind.extent() {
            Some((width, height))
                if lx >= 0.0 && lx < width as f64 && ly >= 0.0 && ly < height as f64 =>
            {
                Some(NodeAt {
                    node: id,
                    sx: lx,
                    sy: ly,
                })
            }
            _ => None,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Scene::ancestors`]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests;
