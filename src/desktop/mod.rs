//! The desktop: views, outputs and the scene they live in
//!
//! `Desktop` is the single server object. It owns the view registry, the
//! scene graph, the seat and the outputs, and hands out everything else by
//! id. The operations are split by concern:
//!
//! - [`stack`]: raise, lower and grouped raise
//! - [`focus`]: focus transfer and activation
//! - [`cycle`]: alt-tab style traversal
//! - [`hit_test`]: point to view/region resolution
//! - [`lifecycle`]: view, output and overlay setup and teardown

pub mod cycle;
pub mod focus;
pub mod hit_test;
pub mod lifecycle;
pub mod stack;

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::RidgeConfig;
use crate::scene::{NodeId, Scene};
use crate::seat::Seat;
use crate::view::{ClientId, Geometry, SurfaceId, View, ViewId, ViewRegistry};

pub use focus::FocusOutcome;
pub use hit_test::HitTest;

/// The four fixed layer-shell layers of an output, bottom first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Background,
    Bottom,
    Top,
    Overlay,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Background, Layer::Bottom, Layer::Top, Layer::Overlay];

    /// Layer for a protocol layer index, as sent by layer-shell clients and
    /// accepted in desktop descriptions.
    ///
    /// # Panics
    ///
    /// Panics on an index outside `0..=3`; the layer set is closed.
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Layer::Background,
            1 => Layer::Bottom,
            2 => Layer::Top,
            3 => Layer::Overlay,
            _ => panic!("unknown layer index {}", index),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::Bottom => "bottom",
            Layer::Top => "top",
            Layer::Overlay => "overlay",
        }
    }

    /// Layers painted below the views
    pub fn is_below_views(self) -> bool {
        matches!(self, Layer::Background | Layer::Bottom)
    }
}

impl std::str::FromStr for Layer {
    type Err = crate::error::RidgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::RidgeError::UnknownLayer(s.to_string()))
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OutputId(pub u32);

/// A display output with its layer trees and redraw flag
#[derive(Debug, Clone)]
pub struct Output {
    id: OutputId,
    name: String,
    geometry: Geometry,
    layers: [NodeId; 4],
    needs_frame: bool,
}

impl Output {
    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn layer_tree(&self, layer: Layer) -> NodeId {
        self.layers[layer.index()]
    }

    /// Whether the output has been damaged since its last frame
    pub fn needs_frame(&self) -> bool {
        self.needs_frame
    }
}

/// What a content surface is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    Toplevel(ViewId),
    LayerShell { output: OutputId, layer: Layer },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub client: ClientId,
    pub role: SurfaceRole,
    pub node: NodeId,
}

/// Handle for an unminimize request waiting on its map event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapToken(u64);

/// The desktop server object
#[derive(Debug)]
pub struct Desktop {
    config: RidgeConfig,
    scene: Scene,
    views: ViewRegistry,
    seat: Seat,
    outputs: Vec<Output>,
    surfaces: HashMap<SurfaceId, SurfaceInfo>,
    /// Scene node → owning view, for the per-view subtrees only
    node_views: HashMap<NodeId, ViewId>,
    view_tree: NodeId,
    osd_tree: NodeId,
    menu_tree: NodeId,
    /// View whose decoration currently shows the active look
    ssd_focused_view: Option<ViewId>,
    pending_maps: HashMap<MapToken, ViewId>,
    next_token: u64,
    next_surface: u32,
    activation_changes: u64,
}

impl Desktop {
    pub fn new(config: RidgeConfig) -> Self {
        let mut scene = Scene::new();
        let root = scene.root();
        let view_tree = scene.create_tree(root);
        let osd_tree = scene.create_tree(root);
        let menu_tree = scene.create_tree(root);
        debug!(
            "Desktop scene: views {}, osd {}, menu {}",
            view_tree, osd_tree, menu_tree
        );

        Self {
            config,
            scene,
            views: ViewRegistry::new(),
            seat: Seat::new(),
            outputs: Vec::new(),
            surfaces: HashMap::new(),
            node_views: HashMap::new(),
            view_tree,
            osd_tree,
            menu_tree,
            ssd_focused_view: None,
            pending_maps: HashMap::new(),
            next_token: 1,
            next_surface: 1,
            activation_changes: 0,
        }
    }

    pub fn config(&self) -> &RidgeConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    /// View ids from front to back
    pub fn stack(&self) -> &[ViewId] {
        self.views.ids()
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    pub fn seat_mut(&mut self) -> &mut Seat {
        &mut self.seat
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|output| output.id == id)
    }

    pub fn output_by_name(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn surface_info(&self, surface: SurfaceId) -> Option<&SurfaceInfo> {
        self.surfaces.get(&surface)
    }

    /// Whether `surface` belongs to a layer-shell client rather than a view
    pub fn is_layer_surface(&self, surface: SurfaceId) -> bool {
        matches!(
            self.surfaces.get(&surface).map(|info| info.role),
            Some(SurfaceRole::LayerShell { .. })
        )
    }

    pub fn view_tree(&self) -> NodeId {
        self.view_tree
    }

    pub fn osd_tree(&self) -> NodeId {
        self.osd_tree
    }

    pub fn menu_tree(&self) -> NodeId {
        self.menu_tree
    }

    /// View owning a per-view scene subtree root
    pub fn view_for_node(&self, node: NodeId) -> Option<ViewId> {
        self.node_views.get(&node).copied()
    }

    pub fn ssd_focused_view(&self) -> Option<ViewId> {
        self.ssd_focused_view
    }

    /// Number of activate/deactivate calls made on views so far
    pub fn activation_changes(&self) -> u64 {
        self.activation_changes
    }

    /// Marks every output for a full redraw
    pub fn damage_all_outputs(&mut self) {
        for output in &mut self.outputs {
            output.needs_frame = true;
        }
    }

    /// Clears the redraw flag of an output after it has been painted
    pub fn frame_done(&mut self, output: OutputId) {
        if let Some(output) = self.outputs.iter_mut().find(|o| o.id == output) {
            output.needs_frame = false;
        }
    }

    fn allocate_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        id
    }

    fn allocate_token(&mut self) -> MapToken {
        let token = MapToken(self.next_token);
        self.next_token += 1;
        token
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(RidgeConfig::default())
    }
}
