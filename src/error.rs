//! Errors raised while building a desktop from a description
//!
//! Core stacking, focus and hit-test operations never fail; they report
//! through `Option` and outcome enums. Only the description layer has real
//! failure modes.

use std::path::PathBuf;

use thiserror::Error;

use crate::view::ViewId;

#[derive(Debug, Error)]
pub enum RidgeError {
    #[error("failed to read desktop description {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse desktop description: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("view {0} is declared more than once")]
    DuplicateView(ViewId),

    #[error("view {view} names unknown transient parent {parent}")]
    UnknownParent { view: ViewId, parent: ViewId },

    #[error("{owner} refers to unknown output {name:?}")]
    UnknownOutput { owner: String, name: String },

    #[error("focus target {0} is not declared")]
    UnknownFocus(ViewId),

    #[error("invalid geometry for {owner}: {width}x{height}")]
    InvalidGeometry {
        owner: String,
        width: i32,
        height: i32,
    },

    #[error("{owner} is placed too far out at ({x}, {y})")]
    OutOfRange { owner: String, x: i32, y: i32 },

    #[error("unknown layer {0:?}, expected background, bottom, top or overlay (or 0 to 3)")]
    UnknownLayer(String),
}

pub type Result<T> = std::result::Result<T, RidgeError>;
