//! View, output and overlay lifecycle
//!
//! These entry points stand in for the protocol handlers that create,
//! map, unmap and destroy windows. Each keeps the registry, the scene and
//! the node → view index in step.

use log::{debug, info, warn};

use super::{Desktop, Layer, MapToken, Output, OutputId, SurfaceInfo, SurfaceRole};
use crate::decoration::Ssd;
use crate::error::RidgeError;
use crate::scene::NodeId;
use crate::view::{ClientId, Geometry, SurfaceId, View, ViewId, ViewKind};

const OVERLAY_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 0.9];

impl Desktop {
    /// Registers a new, unmapped view at the front of the stack
    pub fn add_view(&mut self, kind: ViewKind, title: &str, geometry: Geometry) -> ViewId {
        let id = self.views.allocate_id();
        self.insert_view(id, kind, title, geometry);
        id
    }

    /// Registers a new view under a caller-chosen id
    pub fn add_view_with_id(
        &mut self,
        id: ViewId,
        kind: ViewKind,
        title: &str,
        geometry: Geometry,
    ) -> Result<ViewId, RidgeError> {
        if self.views.contains(id) {
            return Err(RidgeError::DuplicateView(id));
        }
        self.insert_view(id, kind, title, geometry);
        Ok(id)
    }

    fn insert_view(&mut self, id: ViewId, kind: ViewKind, title: &str, geometry: Geometry) {
        let tree = self.scene.create_tree(self.view_tree);
        self.scene.set_position(tree, geometry.x, geometry.y);
        self.scene.set_enabled(tree, false);

        let view = View::new(id, kind, title.to_string(), geometry, tree);
        if self.views.insert_front(view) {
            self.node_views.insert(tree, id);
            info!("New view {} {:?} ({:?})", id, title, kind);
        } else {
            self.scene.destroy(tree);
        }
    }

    /// Gives a view its content surface.
    ///
    /// Returns the existing surface if the view already has one, `None` for
    /// an unknown view.
    pub fn attach_surface(&mut self, view: ViewId, client: ClientId) -> Option<SurfaceId> {
        let (tree, geometry, existing) = {
            let v = self.views.get(view)?;
            (v.scene_tree(), v.geometry(), v.surface())
        };
        if existing.is_some() {
            return existing;
        }

        let surface = self.allocate_surface();
        let node = self
            .scene
            .create_surface(tree, surface, geometry.width, geometry.height);
        self.surfaces.insert(
            surface,
            SurfaceInfo {
                client,
                role: SurfaceRole::Toplevel(view),
                node,
            },
        );
        if let Some(v) = self.views.get_mut(view) {
            v.surface = Some(surface);
            v.content_node = Some(node);
        }
        debug!("Attached {} to {}", surface, view);
        Some(surface)
    }

    /// Maps a view: shows it, decorates it on first map, then focuses and
    /// raises it
    pub fn map_view(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get(id) else {
            warn!("Map requested for unknown {}", id);
            return false;
        };
        if view.surface().is_none() {
            warn!("Refusing to map {} without a surface", id);
            return false;
        }
        let tree = view.scene_tree();
        let geometry = view.geometry();
        let title = view.title().to_string();
        let first_map = !view.been_mapped;

        if first_map && self.config.focus.server_side_decorations {
            let ssd = Ssd::create(
                &mut self.scene,
                tree,
                &self.config.theme,
                geometry.width,
                geometry.height,
                &title,
            );
            if let Some(view) = self.views.get_mut(id) {
                view.ssd = Some(ssd);
            }
        }

        if let Some(view) = self.views.get_mut(id) {
            view.mapped = true;
            view.minimized = false;
            view.been_mapped = true;
            if let Some(ssd) = view.ssd.as_ref() {
                ssd.show(&mut self.scene);
            }
        }
        self.scene.set_enabled(tree, true);
        self.pending_maps.retain(|_, view| *view != id);
        info!("Mapped {}", id);

        self.focus_and_raise(Some(id));
        true
    }

    /// Unmaps a view and moves focus to the frontmost mapped one
    pub fn unmap_view(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        if !view.mapped {
            return false;
        }
        view.mapped = false;
        let tree = view.scene_tree;
        if let Some(ssd) = view.ssd.as_ref() {
            ssd.hide(&mut self.scene);
        }
        self.scene.set_enabled(tree, false);
        self.damage_all_outputs();
        info!("Unmapped {}", id);

        self.focus_topmost_mapped();
        true
    }

    /// Minimizes or unminimizes a view.
    ///
    /// Minimizing unmaps right away. Unminimizing is deferred: the returned
    /// token is handed to [`Desktop::complete_map`] once the view maps.
    pub fn minimize_view(&mut self, id: ViewId, minimized: bool) -> Option<MapToken> {
        if minimized {
            let view = self.views.get_mut(id)?;
            if view.minimized {
                return None;
            }
            view.minimized = true;
            info!("Minimized {}", id);
            self.unmap_view(id);
            None
        } else {
            self.request_unminimize(id)
        }
    }

    /// Issues the map token for a minimized view, reusing a pending one
    pub(crate) fn request_unminimize(&mut self, id: ViewId) -> Option<MapToken> {
        let view = self.views.get(id)?;
        if !view.is_minimized() {
            return None;
        }
        let pending = self
            .pending_maps
            .iter()
            .find(|(_, pending)| **pending == id)
            .map(|(token, _)| *token);
        if pending.is_some() {
            return pending;
        }
        let token = self.allocate_token();
        self.pending_maps.insert(token, id);
        debug!("Unminimize of {} pending as {:?}", id, token);
        Some(token)
    }

    /// Delivers the map event for a pending unminimize, which maps the view
    /// and focuses it.
    ///
    /// Returns the mapped view, or `None` for a stale token.
    pub fn complete_map(&mut self, token: MapToken) -> Option<ViewId> {
        let id = self.pending_maps.remove(&token)?;
        if let Some(view) = self.views.get_mut(id) {
            view.minimized = false;
        }
        self.map_view(id).then_some(id)
    }

    /// Whether a view has an unminimize waiting for its map event
    pub fn has_pending_map(&self, id: ViewId) -> bool {
        self.pending_maps.values().any(|&view| view == id)
    }

    /// Moves and resizes a view, relaying out its decoration
    pub fn configure_view(&mut self, id: ViewId, geometry: Geometry) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        view.set_geometry(geometry);
        self.scene.set_position(view.scene_tree, geometry.x, geometry.y);
        if let Some(node) = view.content_node {
            self.scene.set_size(node, geometry.width, geometry.height);
        }
        let title = view.title().to_string();
        if let Some(ssd) = view.ssd.as_mut() {
            ssd.update_geometry(
                &mut self.scene,
                &self.config.theme,
                geometry.width,
                geometry.height,
                &title,
            );
        }
        true
    }

    pub fn set_view_title(&mut self, id: ViewId, title: &str) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        view.set_title(title.to_string());
        let geometry = view.geometry();
        if let Some(ssd) = view.ssd.as_mut() {
            ssd.update_geometry(
                &mut self.scene,
                &self.config.theme,
                geometry.width,
                geometry.height,
                title,
            );
        }
        true
    }

    /// Removes a view for good, unmapping it first if needed
    pub fn destroy_view(&mut self, id: ViewId) -> bool {
        if !self.views.contains(id) {
            return false;
        }
        self.unmap_view(id);

        let Some(mut view) = self.views.remove(id) else {
            return false;
        };
        self.pending_maps.retain(|_, pending| *pending != id);
        if self.ssd_focused_view == Some(id) {
            self.ssd_focused_view = None;
        }
        if let Some(ssd) = view.ssd.take() {
            ssd.destroy(&mut self.scene);
        }
        self.node_views.remove(&view.scene_tree);
        self.scene.destroy(view.scene_tree);

        if let Some(surface) = view.surface {
            self.surfaces.remove(&surface);
            if self.seat.focused_surface() == Some(surface) {
                self.seat.focus_surface(None);
            }
        }
        info!("Destroyed {}", id);
        true
    }

    /// Adds an output and its four layer trees.
    ///
    /// Background and bottom layers are painted below the views, top and
    /// overlay above them; the OSD and menu stay above everything.
    pub fn add_output(&mut self, name: &str, geometry: Geometry) -> OutputId {
        let id = OutputId(self.outputs.len() as u32);
        let root = self.scene.root();

        let layers = Layer::ALL.map(|_| self.scene.create_tree(root));
        for layer in Layer::ALL {
            let tree = layers[layer.index()];
            self.scene.set_position(tree, geometry.x, geometry.y);
        }
        // Lowered top-down so background ends up below bottom
        for layer in Layer::ALL.into_iter().rev().filter(|l| l.is_below_views()) {
            self.scene.lower_to_bottom(layers[layer.index()]);
        }
        for layer in Layer::ALL.into_iter().filter(|l| !l.is_below_views()) {
            self.scene.raise_to_top(layers[layer.index()]);
        }
        self.scene.raise_to_top(self.osd_tree);
        self.scene.raise_to_top(self.menu_tree);

        self.outputs.push(Output {
            id,
            name: name.to_string(),
            geometry,
            layers,
            needs_frame: true,
        });
        info!("New output {:?} at {:?}", name, geometry);
        id
    }

    /// Adds a layer-shell surface; `rect` is relative to the output origin
    pub fn add_layer_surface(
        &mut self,
        output: OutputId,
        layer: Layer,
        client: ClientId,
        rect: Geometry,
    ) -> Option<SurfaceId> {
        let tree = self.output(output)?.layer_tree(layer);
        let surface = self.allocate_surface();
        let node = self.scene.create_surface(tree, surface, rect.width, rect.height);
        self.scene.set_position(node, rect.x, rect.y);
        self.surfaces.insert(
            surface,
            SurfaceInfo {
                client,
                role: SurfaceRole::LayerShell { output, layer },
                node,
            },
        );
        debug!("Layer surface {} on {:?} {}", surface, output, layer);
        Some(surface)
    }

    /// Shows the on-screen display in `rect`, replacing any previous one
    pub fn show_osd(&mut self, rect: Geometry) -> NodeId {
        Self::fill_overlay(&mut self.scene, self.osd_tree, rect)
    }

    pub fn hide_osd(&mut self) {
        Self::clear_overlay(&mut self.scene, self.osd_tree);
    }

    /// Opens a menu in `rect`, replacing any open one
    pub fn open_menu(&mut self, rect: Geometry) -> NodeId {
        Self::fill_overlay(&mut self.scene, self.menu_tree, rect)
    }

    pub fn close_menu(&mut self) {
        Self::clear_overlay(&mut self.scene, self.menu_tree);
    }

    fn fill_overlay(scene: &mut crate::scene::Scene, tree: NodeId, rect: Geometry) -> NodeId {
        Self::clear_overlay(scene, tree);
        let node = scene.create_rect(tree, rect.width, rect.height, OVERLAY_COLOR);
        scene.set_position(node, rect.x, rect.y);
        node
    }

    fn clear_overlay(scene: &mut crate::scene::Scene, tree: NodeId) {
        for child in scene.children(tree).to_vec() {
            scene.destroy(child);
        }
    }
}
