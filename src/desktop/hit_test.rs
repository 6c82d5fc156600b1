//! Resolving a layout point to the view and region under it

use log::{error, trace};
use serde::Serialize;

use super::Desktop;
use crate::decoration::{self, PartType};
use crate::scene::{NodeId, NodeKind};
use crate::view::ViewId;

/// Result of a point query against the desktop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitTest {
    pub view: Option<ViewId>,
    pub area: PartType,
    /// Innermost scene node under the point
    pub node: Option<NodeId>,
    /// Point in `node`'s local coordinates
    pub sx: f64,
    pub sy: f64,
}

impl HitTest {
    fn nothing(node: Option<NodeId>, sx: f64, sy: f64) -> Self {
        Self {
            view: None,
            area: PartType::None,
            node,
            sx,
            sy,
        }
    }

    fn overlay(area: PartType, node: NodeId, sx: f64, sy: f64) -> Self {
        Self {
            view: None,
            area,
            node: Some(node),
            sx,
            sy,
        }
    }
}

impl Desktop {
    /// Finds the topmost node at `(lx, ly)` and the view and region it
    /// belongs to.
    ///
    /// Layer-shell surfaces, the OSD and the menu are reported as overlay
    /// regions without a view.
    pub fn node_and_view_at(&self, lx: f64, ly: f64) -> HitTest {
        let Some(hit) = self.scene.node_at(self.scene.root(), lx, ly) else {
            return HitTest::nothing(None, 0.0, 0.0);
        };
        let (node, sx, sy) = (hit.node, hit.sx, hit.sy);

        if let Some(NodeKind::Surface { surface, .. }) = self.scene.kind(node) {
            if self.is_layer_surface(*surface) {
                return HitTest::overlay(PartType::LayerSurface, node, sx, sy);
            }
        }

        let mut owner = None;
        for ancestor in self.scene.ancestors(node) {
            if let Some(view) = self.view_for_node(ancestor) {
                owner = Some(view);
                break;
            }
            if ancestor == self.osd_tree {
                return HitTest::overlay(PartType::Osd, node, sx, sy);
            }
            if ancestor == self.menu_tree {
                return HitTest::overlay(PartType::Menu, node, sx, sy);
            }
        }

        let Some(id) = owner else {
            error!("Unknown node detected: {} at ({}, {})", node, lx, ly);
            return HitTest::nothing(Some(node), sx, sy);
        };

        let Some(view) = self.views.get(id).filter(|v| v.surface().is_some()) else {
            trace!("Hit {} without a content surface", id);
            return HitTest::nothing(Some(node), sx, sy);
        };

        let area = decoration::classify(&self.scene, view.ssd.as_ref(), node);
        HitTest {
            view: Some(id),
            area,
            node: Some(node),
            sx,
            sy,
        }
    }

    /// View under the seat's cursor
    pub fn view_at_cursor(&self) -> Option<ViewId> {
        let (x, y) = self.seat.cursor();
        self.node_and_view_at(x, y).view
    }

    /// Moves the cursor and applies the focus-follows-mouse policy.
    ///
    /// Returns the view under the cursor.
    pub fn process_cursor_motion(&mut self, x: f64, y: f64) -> Option<ViewId> {
        self.seat.set_cursor(x, y);
        let view = self.view_at_cursor();

        let follow = self.config.focus.focus_follows_mouse;
        let raise = self.config.focus.raise_on_focus;
        if follow && view.is_some() && view != self.focused_view() {
            if raise {
                self.focus_and_raise(view);
            } else {
                self.focus_and_activate(view);
            }
        }
        view
    }
}
