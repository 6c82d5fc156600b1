//! # Ridge
//!
//! View stacking, focus and hit-testing core for a stacking desktop shell.
//!
//! ## Architecture
//!
//! - `scene`: Scene graph of typed nodes with per-node offsets
//! - `view`: Views (top-level windows) and the ordered view registry
//! - `seat`: Keyboard focus, cursor and input inhibitor state
//! - `decoration`: Server-side decorations and region classification
//! - `desktop`: The server object: stacking, focus, cycling, hit-testing
//! - `config`: Configuration parsing and management
//! - `layout`: Desktop descriptions used to set up a desktop from TOML
//!
//! ## Usage
//!
//! ```rust
//! use ridge::view::{ClientId, Geometry, ViewKind};
//! use ridge::{Desktop, RidgeConfig};
//!
//! let mut desktop = Desktop::new(RidgeConfig::default());
//! desktop.add_output("DP-1", Geometry::new(0, 0, 1920, 1080));
//!
//! let terminal = desktop.add_view(ViewKind::Native, "Terminal", Geometry::new(100, 100, 640, 480));
//! desktop.attach_surface(terminal, ClientId(1));
//! desktop.map_view(terminal);
//!
//! assert_eq!(desktop.focused_view(), Some(terminal));
//! assert_eq!(desktop.node_and_view_at(200.0, 200.0).view, Some(terminal));
//! ```

pub mod config;
pub mod decoration;
pub mod desktop;
pub mod error;
pub mod layout;
pub mod logging;
pub mod scene;
pub mod seat;
pub mod view;

// Re-export main types for easy access
pub use config::RidgeConfig;
pub use decoration::PartType;
pub use desktop::{Desktop, FocusOutcome, HitTest, Layer};
pub use error::RidgeError;
pub use layout::DesktopLayout;
pub use view::{Direction, ViewId};

/// Version information for Ridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
