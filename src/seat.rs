//! Seat state consumed by the focus coordinator and hit-testing
//!
//! The seat owns the single keyboard-focused surface, the cursor position
//! and the input inhibitor (a client holding exclusive input, e.g. a screen
//! locker).

use log::debug;

use crate::view::{ClientId, SurfaceId};

#[derive(Debug, Clone, Default)]
pub struct Seat {
    focused_surface: Option<SurfaceId>,
    cursor: (f64, f64),
    inhibitor: Option<ClientId>,
}

impl Seat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_surface(&self) -> Option<SurfaceId> {
        self.focused_surface
    }

    /// Gives keyboard focus to `surface`, or clears it
    pub fn focus_surface(&mut self, surface: Option<SurfaceId>) {
        if self.focused_surface != surface {
            debug!("Keyboard focus {:?} -> {:?}", self.focused_surface, surface);
            self.focused_surface = surface;
        }
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    pub fn inhibitor(&self) -> Option<ClientId> {
        self.inhibitor
    }

    /// Activates an input inhibitor owned by `client`, or releases it
    pub fn set_inhibitor(&mut self, client: Option<ClientId>) {
        debug!("Input inhibitor set to {:?}", client);
        self.inhibitor = client;
    }

    /// Whether an active inhibitor keeps a surface owned by `owner` from
    /// receiving focus
    pub fn inhibit_blocks(&self, owner: Option<ClientId>) -> bool {
        match self.inhibitor {
            Some(inhibitor) => owner != Some(inhibitor),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_surface_round_trip() {
        let mut seat = Seat::new();
        assert_eq!(seat.focused_surface(), None);

        seat.focus_surface(Some(SurfaceId(3)));
        assert_eq!(seat.focused_surface(), Some(SurfaceId(3)));

        seat.focus_surface(None);
        assert_eq!(seat.focused_surface(), None);
    }

    #[test]
    fn test_inhibitor_blocks_other_clients_only() {
        let mut seat = Seat::new();
        assert!(!seat.inhibit_blocks(Some(ClientId(1))));

        seat.set_inhibitor(Some(ClientId(7)));
        assert!(seat.inhibit_blocks(Some(ClientId(1))));
        assert!(seat.inhibit_blocks(None));
        assert!(!seat.inhibit_blocks(Some(ClientId(7))));

        seat.set_inhibitor(None);
        assert!(!seat.inhibit_blocks(Some(ClientId(1))));
    }

    #[test]
    fn test_cursor_position() {
        let mut seat = Seat::new();
        seat.set_cursor(12.5, -3.0);
        assert_eq!(seat.cursor(), (12.5, -3.0));
    }
}
