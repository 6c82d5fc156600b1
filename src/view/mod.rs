//! Top-level windows ("views") and the ordered registry that holds them
//!
//! A view is either a native shell window or a window from the legacy
//! compatibility layer. Only legacy windows carry a transient parent link;
//! windows sharing a top-level ancestor are raised together.

pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoration::Ssd;
use crate::scene::NodeId;

pub use registry::{Direction, RingWalk, ViewRegistry};

/// Identifier of a registered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Identifier of a content surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Identifier of the client owning a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

/// Protocol family a view comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    Native,
    /// Legacy compatibility window with an optional transient parent
    CompatLegacy { parent: Option<ViewId> },
}

impl ViewKind {
    pub fn is_compat_legacy(&self) -> bool {
        matches!(self, ViewKind::CompatLegacy { .. })
    }

    pub fn transient_parent(&self) -> Option<ViewId> {
        match *self {
            ViewKind::CompatLegacy { parent } => parent,
            ViewKind::Native => None,
        }
    }
}

/// Position and size of a view's content in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One top-level window
#[derive(Debug, Clone)]
pub struct View {
    id: ViewId,
    kind: ViewKind,
    title: String,
    geometry: Geometry,
    pub(crate) surface: Option<SurfaceId>,
    pub(crate) mapped: bool,
    pub(crate) been_mapped: bool,
    pub(crate) minimized: bool,
    pub(crate) activated: bool,
    /// Subtree under the desktop's view tree holding content and decorations
    pub(crate) scene_tree: NodeId,
    pub(crate) content_node: Option<NodeId>,
    pub(crate) ssd: Option<Ssd>,
}

impl View {
    pub(crate) fn new(id: ViewId, kind: ViewKind, title: String, geometry: Geometry, scene_tree: NodeId) -> Self {
        Self {
            id,
            kind,
            title,
            geometry,
            surface: None,
            mapped: false,
            been_mapped: false,
            minimized: false,
            activated: false,
            scene_tree,
            content_node: None,
            ssd: None,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub(crate) fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn scene_tree(&self) -> NodeId {
        self.scene_tree
    }

    pub fn has_ssd(&self) -> bool {
        self.ssd.is_some()
    }

    /// Views that may receive focus: a surface exists and the view is either
    /// mapped or minimized. Legacy clients leave never-mapped surfaces around,
    /// those must be skipped when cycling.
    pub fn is_focusable(&self) -> bool {
        self.surface.is_some() && (self.mapped || self.minimized)
    }
}
