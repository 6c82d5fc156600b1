//! Ordered view registry
//!
//! The registry stores every live view exactly once. Position in the
//! registry is the z-order: index 0 is the front (most recently raised)
//! view and the last index is the back.
//!
//! # Examples
//!
//! ```
//! use ridge::view::{Direction, ViewRegistry};
//! # use ridge::view::ViewId;
//! # fn demo(mut registry: ViewRegistry, a: ViewId, b: ViewId) {
//! registry.move_to_front(b);
//! assert_eq!(registry.front(), Some(b));
//! let after_b: Vec<_> = registry.ring(b, Direction::Forward).collect();
//! assert_eq!(after_b.last(), Some(&b));
//! # let _ = a;
//! # }
//! ```

use std::collections::HashMap;

use super::{View, ViewId};

/// Direction of a walk through the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the back, wrapping to the front
    Forward,
    /// Toward the front, wrapping to the back
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "next" => Ok(Direction::Forward),
            "backward" | "prev" | "previous" => Ok(Direction::Backward),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Views in front-to-back order plus an id lookup
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    /// View ids from front to back
    order: Vec<ViewId>,

    /// Fast lookup: view id → index in `order`
    positions: HashMap<ViewId, usize>,

    views: HashMap<ViewId, View>,

    next_id: u32,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            positions: HashMap::new(),
            views: HashMap::new(),
            next_id: 1,
        }
    }

    /// Hands out the next id above every id seen so far.
    ///
    /// Once the id space is exhausted the last id is handed out again and
    /// [`ViewRegistry::insert_front`] rejects it.
    pub(crate) fn allocate_id(&mut self) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Reserves a caller-chosen id, keeping later allocations clear of it
    pub(crate) fn reserve_id(&mut self, id: ViewId) {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
    }

    /// Inserts a view at the front.
    ///
    /// Returns `false` and leaves the registry untouched if a view with the
    /// same id is already registered.
    pub(crate) fn insert_front(&mut self, view: View) -> bool {
        let id = view.id();
        if self.views.contains_key(&id) {
            return false;
        }
        self.reserve_id(id);
        self.views.insert(id, view);
        self.order.insert(0, id);
        self.rebuild_positions();
        true
    }

    /// Removes a view, returning it
    pub(crate) fn remove(&mut self, id: ViewId) -> Option<View> {
        let pos = self.positions.remove(&id)?;
        self.order.remove(pos);
        self.rebuild_positions();
        self.views.remove(&id)
    }

    /// Moves a view to the front. Returns `false` if it isn't registered.
    pub fn move_to_front(&mut self, id: ViewId) -> bool {
        let Some(pos) = self.positions.get(&id).copied() else {
            return false;
        };
        if pos != 0 {
            self.order.remove(pos);
            self.order.insert(0, id);
            self.reindex(0..=pos);
        }
        true
    }

    /// Moves a view to the back. Returns `false` if it isn't registered.
    pub fn move_to_back(&mut self, id: ViewId) -> bool {
        let Some(pos) = self.positions.get(&id).copied() else {
            return false;
        };
        if pos + 1 != self.order.len() {
            self.order.remove(pos);
            self.order.push(id);
            self.reindex(pos..self.order.len());
        }
        true
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Index of a view, 0 being the front
    pub fn position(&self, id: ViewId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn front(&self) -> Option<ViewId> {
        self.order.first().copied()
    }

    pub fn back(&self) -> Option<ViewId> {
        self.order.last().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// View ids from front to back
    pub fn ids(&self) -> &[ViewId] {
        &self.order
    }

    /// Views from front to back
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &View> {
        self.order.iter().map(move |id| &self.views[id])
    }

    /// The view one link away from `id`, wrapping at either end
    pub fn step(&self, id: ViewId, direction: Direction) -> Option<ViewId> {
        let pos = self.position(id)?;
        let len = self.order.len();
        let next = match direction {
            Direction::Forward => (pos + 1) % len,
            Direction::Backward => (pos + len - 1) % len,
        };
        Some(self.order[next])
    }

    /// Walks the registry as a ring starting after `start`.
    ///
    /// The walk yields exactly `len()` ids; the last one is `start` itself.
    /// An unregistered `start` yields nothing.
    pub fn ring(&self, start: ViewId, direction: Direction) -> RingWalk<'_> {
        match self.position(start) {
            Some(pos) => RingWalk {
                order: &self.order,
                pos,
                remaining: self.order.len(),
                direction,
            },
            None => RingWalk {
                order: &self.order,
                pos: 0,
                remaining: 0,
                direction,
            },
        }
    }

    /// Refreshes the position index for the slots in `range` only
    fn reindex(&mut self, range: impl Iterator<Item = usize>) {
        for i in range {
            self.positions.insert(self.order[i], i);
        }
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (i, &id) in self.order.iter().enumerate() {
            self.positions.insert(id, i);
        }
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded wraparound walk over the registry, see [`ViewRegistry::ring`]
#[derive(Debug, Clone)]
pub struct RingWalk<'a> {
    order: &'a [ViewId],
    pos: usize,
    remaining: usize,
    direction: Direction,
}

impl Iterator for RingWalk<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let len = self.order.len();
        self.pos = match self.direction {
            Direction::Forward => (self.pos + 1) % len,
            Direction::Backward => (self.pos + len - 1) % len,
        };
        Some(self.order[self.pos])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RingWalk<'_> {}
