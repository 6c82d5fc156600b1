//! Keyboard focus transfer and view activation

use log::{debug, info, warn};
use serde::Serialize;

use super::{Desktop, MapToken};
use crate::view::ViewId;

/// How a focus request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusOutcome {
    /// No target: seat focus was cleared
    Cleared,
    /// The id does not name a registered view
    Unknown,
    /// The view has no content surface yet
    NoSurface,
    /// An input inhibitor owned by another client holds input
    Inhibited,
    /// The view was minimized; focus follows once the token's map completes
    PendingMap(MapToken),
    /// The view is not mapped
    NotMapped,
    /// The view's surface already has keyboard focus
    AlreadyFocused,
    /// Focus moved to the view
    Focused,
}

impl Desktop {
    /// Moves keyboard focus to `view` and activates it.
    ///
    /// Preconditions are checked in order and the first that fails ends the
    /// request without side effects, except for a minimized view, which gets
    /// an unminimize request instead.
    pub fn focus_and_activate(&mut self, view: Option<ViewId>) -> FocusOutcome {
        let Some(id) = view else {
            self.seat.focus_surface(None);
            return FocusOutcome::Cleared;
        };
        let Some(target) = self.views.get(id) else {
            warn!("Focus requested for unknown {}", id);
            return FocusOutcome::Unknown;
        };

        let (surface, minimized, mapped) = (target.surface(), target.is_minimized(), target.is_mapped());

        let Some(surface) = surface else {
            return FocusOutcome::NoSurface;
        };

        let owner = self.surfaces.get(&surface).map(|info| info.client);
        if self.seat.inhibit_blocks(owner) {
            debug!("Input inhibitor blocks focus of {}", id);
            return FocusOutcome::Inhibited;
        }

        if minimized {
            // The map that completes the token focuses the view again
            return match self.request_unminimize(id) {
                Some(token) => FocusOutcome::PendingMap(token),
                None => FocusOutcome::NotMapped,
            };
        }

        if !mapped {
            return FocusOutcome::NotMapped;
        }

        if self.seat.focused_surface() == Some(surface) {
            return FocusOutcome::AlreadyFocused;
        }

        self.deactivate_all_views();
        self.set_activated(id, true);
        self.seat.focus_surface(Some(surface));
        info!("Focused {}", id);
        FocusOutcome::Focused
    }

    /// Focuses a view and raises it
    pub fn focus_and_raise(&mut self, view: Option<ViewId>) -> FocusOutcome {
        let outcome = self.focus_and_activate(view);
        self.raise(view);
        outcome
    }

    /// Frontmost mapped view
    pub fn topmost_mapped_view(&self) -> Option<ViewId> {
        self.views.iter().find(|v| v.is_mapped()).map(|v| v.id())
    }

    /// Focuses and raises the frontmost mapped view, or clears focus when no
    /// view is mapped
    pub fn focus_topmost_mapped(&mut self) -> Option<ViewId> {
        let view = self.topmost_mapped_view();
        self.focus_and_raise(view);
        view
    }

    /// View whose surface holds keyboard focus
    pub fn focused_view(&self) -> Option<ViewId> {
        let focused = self.seat.focused_surface()?;
        self.views
            .iter()
            .find(|v| v.surface() == Some(focused))
            .map(|v| v.id())
    }

    fn deactivate_all_views(&mut self) {
        let mapped: Vec<ViewId> = self
            .views
            .iter()
            .filter(|v| v.is_mapped())
            .map(|v| v.id())
            .collect();
        for id in mapped {
            self.set_activated(id, false);
        }
    }

    fn set_activated(&mut self, id: ViewId, activated: bool) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        view.activated = activated;
        self.activation_changes += 1;

        if activated {
            self.set_ssd_focus(id);
        }
    }

    /// Shows the active decoration look on `id` and the inactive one on the
    /// previously active view
    fn set_ssd_focus(&mut self, id: ViewId) {
        if self.ssd_focused_view == Some(id) {
            return;
        }
        if !self.views.get(id).map(|v| v.has_ssd()).unwrap_or(false) {
            return;
        }
        if let Some(last) = self.ssd_focused_view.take() {
            if let Some(ssd) = self.views.get_mut(last).and_then(|v| v.ssd.as_mut()) {
                ssd.set_active(&mut self.scene, false);
            }
        }
        if let Some(ssd) = self.views.get_mut(id).and_then(|v| v.ssd.as_mut()) {
            ssd.set_active(&mut self.scene, true);
        }
        self.ssd_focused_view = Some(id);
    }
}
