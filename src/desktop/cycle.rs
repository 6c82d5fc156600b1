//! Alt-tab style traversal of the stack

use log::debug;

use super::Desktop;
use crate::view::{Direction, ViewId};

impl Desktop {
    /// Next focusable view after `current` in `direction`, wrapping at
    /// either end of the stack.
    ///
    /// Starts from the front when `current` is `None` or gone, and always
    /// steps at least once, so with a single focusable view the result is
    /// that view. Returns `None` when nothing is focusable.
    pub fn cycle(&mut self, current: Option<ViewId>, direction: Direction) -> Option<ViewId> {
        if !self.views.iter().any(|v| v.is_focusable()) {
            return None;
        }

        let start = current
            .filter(|&id| self.views.contains(id))
            .or_else(|| self.views.front())?;

        let next = self.views.ring(start, direction).find(|&id| {
            self.views
                .get(id)
                .map(|v| v.is_focusable())
                .unwrap_or(false)
        });

        self.damage_all_outputs();
        debug!("Cycle {:?} from {} -> {:?}", direction, start, next);
        next
    }
}
