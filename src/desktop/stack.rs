//! Stacking: raise, lower and grouped raise of transient legacy windows
//!
//! Registry order and the paint order of the per-view subtrees under the
//! view tree are kept in step: the registry front is the topmost subtree.

use log::debug;

use super::Desktop;
use crate::view::ViewId;

impl Desktop {
    /// Moves a view to the front of the stack and paints it on top
    pub fn raise(&mut self, view: Option<ViewId>) {
        let Some(id) = view else {
            return;
        };
        let Some(tree) = self.views.get(id).map(|v| v.scene_tree()) else {
            return;
        };
        self.views.move_to_front(id);
        self.scene.raise_to_top(tree);
        debug!("Raised {}", id);
    }

    /// Raises a view and then every legacy window in its transient group.
    ///
    /// Group members are taken from a snapshot of the stack between the
    /// back and the anchor, walked from the back, so they end up in front of
    /// the anchor in their previous relative order.
    pub fn raise_with_group(&mut self, view: Option<ViewId>) {
        let Some(anchor) = view else {
            return;
        };
        if !self.views.contains(anchor) {
            return;
        }
        self.raise(Some(anchor));

        let is_legacy = self
            .views
            .get(anchor)
            .map(|v| v.kind().is_compat_legacy())
            .unwrap_or(false);
        if !is_legacy {
            return;
        }
        let group = self.top_level_ancestor(anchor);

        let candidates: Vec<ViewId> = self
            .views
            .ids()
            .iter()
            .rev()
            .take_while(|&&id| id != anchor)
            .copied()
            .collect();

        for id in candidates {
            let Some(candidate) = self.views.get(id) else {
                continue;
            };
            if !candidate.kind().is_compat_legacy() {
                continue;
            }
            if !candidate.is_mapped() && !candidate.is_minimized() {
                continue;
            }
            if self.top_level_ancestor(id) != group {
                continue;
            }
            self.raise(Some(id));
        }
    }

    /// Moves a view to the back of the stack and paints it below the others
    pub fn lower(&mut self, view: Option<ViewId>) {
        let Some(id) = view else {
            return;
        };
        let Some(tree) = self.views.get(id).map(|v| v.scene_tree()) else {
            return;
        };
        self.views.move_to_back(id);
        self.scene.lower_to_bottom(tree);
        debug!("Lowered {}", id);
    }

    /// Follows transient parent links to the outermost registered ancestor.
    ///
    /// A link to an unregistered view ends the walk. Views on a parent cycle
    /// all resolve to the lowest id on that cycle.
    pub fn top_level_ancestor(&self, view: ViewId) -> ViewId {
        let mut path: Vec<ViewId> = Vec::new();
        let mut current = view;
        loop {
            if let Some(pos) = path.iter().position(|&seen| seen == current) {
                return path[pos..].iter().copied().min().unwrap_or(current);
            }
            path.push(current);
            let parent = self
                .views
                .get(current)
                .and_then(|v| v.kind().transient_parent())
                .filter(|&parent| self.views.contains(parent));
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}
