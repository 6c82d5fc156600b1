//! Desktop descriptions
//!
//! A description is a TOML file listing outputs, views, layer-shell
//! surfaces and overlays. Building it replays the same lifecycle calls a
//! running shell would make, so the resulting desktop is in a state the
//! core can be queried against.
//!
//! ```toml
//! focus = 1
//!
//! [[outputs]]
//! name = "DP-1"
//! x = 0
//! y = 0
//! width = 1920
//! height = 1080
//!
//! # Views are listed back to front
//! [[views]]
//! id = 1
//! title = "Terminal"
//! x = 100
//! y = 100
//! width = 640
//! height = 480
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::RidgeConfig;
use crate::desktop::{Desktop, Layer};
use crate::error::{Result, RidgeError};
use crate::view::{ClientId, Geometry, ViewId, ViewKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DesktopLayout {
    /// View to focus and raise once everything is built
    #[serde(default)]
    pub focus: Option<u32>,

    #[serde(default)]
    pub outputs: Vec<OutputSpec>,

    #[serde(default)]
    pub views: Vec<ViewSpec>,

    #[serde(default)]
    pub layer_surfaces: Vec<LayerSurfaceSpec>,

    #[serde(default)]
    pub osd: Option<Geometry>,

    #[serde(default)]
    pub menu: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSpec {
    pub name: String,
    #[serde(flatten)]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    #[default]
    Native,
    Legacy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewSpec {
    pub id: u32,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub kind: KindSpec,

    /// Transient parent, legacy views only
    #[serde(default)]
    pub parent: Option<u32>,

    #[serde(flatten)]
    pub geometry: Geometry,

    /// Whether the content surface exists
    #[serde(default = "default_true")]
    pub surface: bool,

    #[serde(default = "default_true")]
    pub mapped: bool,

    #[serde(default)]
    pub minimized: bool,

    #[serde(default = "default_client")]
    pub client: u32,
}

/// Layer of a layer-shell surface, by name or by protocol index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LayerRef {
    Index(u32),
    Name(String),
}

impl LayerRef {
    pub fn resolve(&self) -> Result<Layer> {
        match self {
            LayerRef::Index(index) if *index < Layer::ALL.len() as u32 => Ok(Layer::from_index(*index)),
            LayerRef::Index(index) => Err(RidgeError::UnknownLayer(index.to_string())),
            LayerRef::Name(name) => name.parse(),
        }
    }
}

impl std::fmt::Display for LayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerRef::Index(index) => write!(f, "layer {}", index),
            LayerRef::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSurfaceSpec {
    pub output: String,
    pub layer: LayerRef,
    #[serde(default = "default_client")]
    pub client: u32,
    /// Relative to the output origin
    #[serde(flatten)]
    pub geometry: Geometry,
}

fn default_true() -> bool {
    true
}

fn default_client() -> u32 {
    1
}

impl ViewSpec {
    fn kind(&self) -> ViewKind {
        match self.kind {
            KindSpec::Native => ViewKind::Native,
            KindSpec::Legacy => ViewKind::CompatLegacy {
                parent: self.parent.map(ViewId),
            },
        }
    }
}

/// Largest width or height a description may give anything
pub const MAX_EXTENT: i32 = 1 << 16;

/// Largest distance from the layout origin on either axis
pub const MAX_OFFSET: i32 = 1 << 20;

fn check_size(owner: String, geometry: &Geometry) -> Result<()> {
    let extent = 1..=MAX_EXTENT;
    if !extent.contains(&geometry.width) || !extent.contains(&geometry.height) {
        return Err(RidgeError::InvalidGeometry {
            owner,
            width: geometry.width,
            height: geometry.height,
        });
    }
    let offset = -MAX_OFFSET..=MAX_OFFSET;
    if !offset.contains(&geometry.x) || !offset.contains(&geometry.y) {
        return Err(RidgeError::OutOfRange {
            owner,
            x: geometry.x,
            y: geometry.y,
        });
    }
    Ok(())
}

impl DesktopLayout {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| RidgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::parse(&contents)?;
        info!(
            "Loaded desktop description {}: {} outputs, {} views",
            path.display(),
            layout.outputs.len(),
            layout.views.len()
        );
        Ok(layout)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks references and sizes without building anything
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for view in &self.views {
            if !ids.insert(view.id) {
                return Err(RidgeError::DuplicateView(ViewId(view.id)));
            }
            check_size(format!("view {}", view.id), &view.geometry)?;
        }
        for view in &self.views {
            if let (KindSpec::Legacy, Some(parent)) = (view.kind, view.parent) {
                if !ids.contains(&parent) {
                    return Err(RidgeError::UnknownParent {
                        view: ViewId(view.id),
                        parent: ViewId(parent),
                    });
                }
            }
        }

        for output in &self.outputs {
            check_size(format!("output {}", output.name), &output.geometry)?;
        }
        for surface in &self.layer_surfaces {
            if !self.outputs.iter().any(|o| o.name == surface.output) {
                return Err(RidgeError::UnknownOutput {
                    owner: format!("{} layer surface", surface.layer),
                    name: surface.output.clone(),
                });
            }
            surface.layer.resolve()?;
            check_size(format!("{} layer surface", surface.layer), &surface.geometry)?;
        }

        if let Some(rect) = &self.osd {
            check_size("osd".to_string(), rect)?;
        }
        if let Some(rect) = &self.menu {
            check_size("menu".to_string(), rect)?;
        }

        if let Some(focus) = self.focus {
            if !ids.contains(&focus) {
                return Err(RidgeError::UnknownFocus(ViewId(focus)));
            }
        }
        Ok(())
    }

    /// Builds a desktop from the description
    pub fn build(&self, config: RidgeConfig) -> Result<Desktop> {
        self.validate()?;
        let mut desktop = Desktop::new(config);

        for output in &self.outputs {
            desktop.add_output(&output.name, output.geometry);
        }

        for spec in &self.views {
            let id = desktop.add_view_with_id(ViewId(spec.id), spec.kind(), &spec.title, spec.geometry)?;
            if !spec.surface {
                continue;
            }
            desktop.attach_surface(id, ClientId(spec.client));
            if spec.mapped || spec.minimized {
                desktop.map_view(id);
            }
            if spec.minimized {
                desktop.minimize_view(id, true);
            }
        }

        for spec in &self.layer_surfaces {
            let layer = spec.layer.resolve()?;
            let output = desktop
                .output_by_name(&spec.output)
                .map(|o| o.id())
                .ok_or_else(|| RidgeError::UnknownOutput {
                    owner: format!("{} layer surface", layer),
                    name: spec.output.clone(),
                })?;
            desktop.add_layer_surface(output, layer, ClientId(spec.client), spec.geometry);
        }

        if let Some(rect) = self.osd {
            desktop.show_osd(rect);
        }
        if let Some(rect) = self.menu {
            desktop.open_menu(rect);
        }

        if let Some(focus) = self.focus {
            desktop.focus_and_raise(Some(ViewId(focus)));
        }
        debug!("Built desktop, stack {:?}", desktop.stack());
        Ok(desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::PartType;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
focus = 1

[[outputs]]
name = "DP-1"
x = 0
y = 0
width = 1920
height = 1080

[[views]]
id = 1
title = "Terminal"
x = 100
y = 100
width = 400
height = 300

[[views]]
id = 2
title = "Editor"
kind = "legacy"
x = 300
y = 200
width = 400
height = 300

[[views]]
id = 3
title = "Find"
kind = "legacy"
parent = 2
x = 350
y = 250
width = 100
height = 50
minimized = true

[[views]]
id = 4
title = "splash"
surface = false
x = 0
y = 0
width = 10
height = 10

[[layer_surfaces]]
output = "DP-1"
layer = "top"
client = 7
x = 0
y = 0
width = 1920
height = 30

[osd]
x = 800
y = 500
width = 320
height = 80
"#;

    #[test]
    fn test_parse_and_build() {
        let layout = DesktopLayout::parse(SAMPLE).unwrap();
        assert_eq!(layout.views.len(), 4);
        assert_eq!(layout.views[1].kind, KindSpec::Legacy);
        assert!(layout.views[0].mapped);
        assert!(!layout.views[3].surface);

        let desktop = layout.build(RidgeConfig::default()).unwrap();
        assert_eq!(
            desktop.stack(),
            &[ViewId(1), ViewId(4), ViewId(2), ViewId(3)]
        );
        assert_eq!(desktop.focused_view(), Some(ViewId(1)));
        assert!(desktop.view(ViewId(3)).unwrap().is_minimized());
        assert!(desktop.view(ViewId(4)).unwrap().surface().is_none());

        assert_eq!(desktop.node_and_view_at(900.0, 10.0).area, PartType::LayerSurface);
        assert_eq!(desktop.node_and_view_at(900.0, 520.0).area, PartType::Osd);
        assert_eq!(desktop.node_and_view_at(150.0, 150.0).view, Some(ViewId(1)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("desktop.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let layout = DesktopLayout::load(&path).unwrap();
        assert_eq!(layout.focus, Some(1));
        assert_eq!(layout.osd, Some(Geometry::new(800, 500, 320, 80)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = DesktopLayout::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, RidgeError::Io { .. }));
    }

    #[test]
    fn test_malformed_description() {
        let err = DesktopLayout::parse("[[views]]\nid = \"one\"").unwrap_err();
        assert!(matches!(err, RidgeError::Parse(_)));
    }

    #[test]
    fn test_reference_errors() {
        let base = DesktopLayout::parse(SAMPLE).unwrap();

        let mut layout = base.clone();
        layout.views[2].parent = Some(42);
        assert!(matches!(
            layout.validate(),
            Err(RidgeError::UnknownParent { parent: ViewId(42), .. })
        ));

        let mut layout = base.clone();
        layout.views[1].id = 1;
        assert!(matches!(layout.validate(), Err(RidgeError::DuplicateView(ViewId(1)))));

        let mut layout = base.clone();
        layout.layer_surfaces[0].output = "HDMI-A-1".to_string();
        assert!(matches!(layout.validate(), Err(RidgeError::UnknownOutput { .. })));

        let mut layout = base.clone();
        layout.layer_surfaces[0].layer = LayerRef::Name("middle".to_string());
        assert!(matches!(layout.validate(), Err(RidgeError::UnknownLayer(_))));

        let mut layout = base.clone();
        layout.layer_surfaces[0].layer = LayerRef::Index(4);
        assert!(matches!(layout.validate(), Err(RidgeError::UnknownLayer(_))));

        let mut layout = base.clone();
        layout.focus = Some(9);
        assert!(matches!(layout.build(RidgeConfig::default()), Err(RidgeError::UnknownFocus(ViewId(9)))));

        let mut layout = base;
        layout.views[0].geometry.width = 0;
        assert!(matches!(layout.validate(), Err(RidgeError::InvalidGeometry { width: 0, .. })));
    }

    #[test]
    fn test_layer_by_index() {
        let layout = DesktopLayout::parse(
            r#"
[[outputs]]
name = "DP-1"
x = 0
y = 0
width = 800
height = 600

[[layer_surfaces]]
output = "DP-1"
layer = 3
x = 0
y = 0
width = 800
height = 20
"#,
        )
        .unwrap();
        assert_eq!(layout.layer_surfaces[0].layer, LayerRef::Index(3));
        assert_eq!(layout.layer_surfaces[0].layer.resolve().unwrap(), Layer::Overlay);

        let desktop = layout.build(RidgeConfig::default()).unwrap();
        assert_eq!(desktop.node_and_view_at(10.0, 10.0).area, PartType::LayerSurface);
    }

    #[test]
    fn test_largest_view_id_builds() {
        let layout = DesktopLayout::parse(
            r#"
[[views]]
id = 4294967295
x = 0
y = 0
width = 100
height = 100
"#,
        )
        .unwrap();
        let mut desktop = layout.build(RidgeConfig::default()).unwrap();
        assert_eq!(desktop.stack(), &[ViewId(u32::MAX)]);
        assert_eq!(desktop.focused_view(), Some(ViewId(u32::MAX)));

        // No id is left to hand out, so the existing view is untouched
        desktop.add_view(ViewKind::Native, "late", Geometry::new(0, 0, 10, 10));
        assert_eq!(desktop.stack(), &[ViewId(u32::MAX)]);
        assert_eq!(desktop.view(ViewId(u32::MAX)).unwrap().geometry().width, 100);
    }

    #[test]
    fn test_extreme_geometry_is_rejected() {
        let base = DesktopLayout::parse(SAMPLE).unwrap();

        let mut layout = base.clone();
        layout.views[0].geometry.width = i32::MAX;
        assert!(matches!(
            layout.build(RidgeConfig::default()),
            Err(RidgeError::InvalidGeometry { width: i32::MAX, .. })
        ));

        let mut layout = base.clone();
        layout.views[0].geometry.x = i32::MIN;
        assert!(matches!(layout.validate(), Err(RidgeError::OutOfRange { x: i32::MIN, .. })));

        let mut layout = base.clone();
        layout.osd = Some(Geometry::new(0, 0, MAX_EXTENT + 1, 10));
        assert!(matches!(layout.validate(), Err(RidgeError::InvalidGeometry { .. })));

        let mut layout = base;
        layout.views[0].geometry = Geometry::new(-MAX_OFFSET, MAX_OFFSET, MAX_EXTENT, MAX_EXTENT);
        assert!(layout.build(RidgeConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_description_builds_empty_desktop() {
        let desktop = DesktopLayout::parse("").unwrap().build(RidgeConfig::default()).unwrap();
        assert!(desktop.stack().is_empty());
        assert!(desktop.outputs().is_empty());
    }
}
