//! Server-side decoration system for Ridge
//!
//! This module builds window decorations (titlebar, borders, buttons and the
//! invisible resize extents) as scene subtrees and classifies scene nodes
//! back into decoration regions for hit-testing.
//!
//! Layout of one decoration, relative to the content origin:
//!
//! ```text
//!  extents (invisible, `extended_area` wide, resize only)
//!  ┌──────────────────────────────────────────────┐
//!  │ ┌[menu]─[ title ]──────────[_][□][×]┐        │
//!  │ │                                   │        │
//!  │ │ left          content       right │        │
//!  │ └───────────── bottom ──────────────┘        │
//!  └──────────────────────────────────────────────┘
//! ```

use bitflags::bitflags;
use log::debug;
use serde::Serialize;

use crate::config::ThemeConfig;
use crate::scene::{NodeId, NodeKind, Scene};
use crate::view::Geometry;

/// Region of a decorated view (or an overlay) a scene node belongs to
///
/// Variant order matters: [`part_contains`] relies on the button, title
/// and client ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartType {
    None,
    ButtonClose,
    ButtonMaximize,
    ButtonIconify,
    ButtonWindowMenu,
    Titlebar,
    Title,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomRight,
    CornerBottomLeft,
    Top,
    Right,
    Bottom,
    Left,
    Client,
    Frame,
    Root,
    Menu,
    Osd,
    LayerSurface,
}

bitflags! {
    /// Window edges affected by an interactive resize
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// Decoration size on each side of the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Border {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

pub fn is_button(part: PartType) -> bool {
    matches!(
        part,
        PartType::ButtonClose
            | PartType::ButtonMaximize
            | PartType::ButtonIconify
            | PartType::ButtonWindowMenu
    )
}

/// Edges an interactive resize grabs when started on `part`
pub fn resize_edges(part: PartType) -> Edges {
    match part {
        PartType::Top => Edges::TOP,
        PartType::Right => Edges::RIGHT,
        PartType::Bottom => Edges::BOTTOM,
        PartType::Left => Edges::LEFT,
        PartType::CornerTopLeft => Edges::TOP | Edges::LEFT,
        PartType::CornerTopRight => Edges::TOP | Edges::RIGHT,
        PartType::CornerBottomRight => Edges::BOTTOM | Edges::RIGHT,
        PartType::CornerBottomLeft => Edges::BOTTOM | Edges::LEFT,
        _ => Edges::empty(),
    }
}

/// Whether `candidate` is `whole` or one of its sub-regions
pub fn part_contains(whole: PartType, candidate: PartType) -> bool {
    if whole == candidate {
        return true;
    }
    match whole {
        PartType::Titlebar => (PartType::ButtonClose..=PartType::Title).contains(&candidate),
        PartType::Frame => (PartType::ButtonClose..=PartType::Client).contains(&candidate),
        PartType::Top => matches!(candidate, PartType::CornerTopLeft | PartType::CornerTopRight),
        PartType::Right => matches!(
            candidate,
            PartType::CornerTopRight | PartType::CornerBottomRight
        ),
        PartType::Bottom => matches!(
            candidate,
            PartType::CornerBottomRight | PartType::CornerBottomLeft
        ),
        PartType::Left => matches!(candidate, PartType::CornerTopLeft | PartType::CornerBottomLeft),
        _ => false,
    }
}

pub fn thickness(theme: &ThemeConfig) -> Border {
    Border {
        top: theme.title_height,
        right: theme.border_width,
        bottom: theme.border_width,
        left: theme.border_width,
    }
}

/// Outer box of a decorated view, resize extents excluded
pub fn max_extents(geometry: Geometry, theme: &ThemeConfig) -> Geometry {
    let border = thickness(theme);
    Geometry::new(
        geometry.x.saturating_sub(border.left),
        geometry.y.saturating_sub(border.top),
        geometry
            .width
            .saturating_add(border.left)
            .saturating_add(border.right),
        geometry
            .height
            .saturating_add(border.top)
            .saturating_add(border.bottom),
    )
}

/// Classifies a hit node of a view.
///
/// Content surfaces are the client area; everything else is looked up in
/// the view's decoration, if it has one.
pub fn classify(scene: &Scene, ssd: Option<&Ssd>, node: NodeId) -> PartType {
    match scene.kind(node) {
        None => PartType::None,
        Some(NodeKind::Surface { .. }) => PartType::Client,
        Some(_) => match ssd {
            Some(ssd) => ssd.part_type(scene, node),
            None => PartType::None,
        },
    }
}

#[derive(Debug, Clone)]
struct Part {
    kind: PartType,
    node: NodeId,
    icon: Option<NodeId>,
    hover: Option<NodeId>,
}

impl Part {
    fn owns(&self, node: NodeId) -> bool {
        self.node == node || self.icon == Some(node) || self.hover == Some(node)
    }
}

#[derive(Debug, Clone)]
struct SubTree {
    tree: NodeId,
    parts: Vec<Part>,
}

impl SubTree {
    fn find(&self, node: NodeId) -> Option<PartType> {
        self.parts.iter().find(|part| part.owns(node)).map(|part| part.kind)
    }
}

/// Placement of one part inside its subtree
struct Slot {
    kind: PartType,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Slot {
    fn new(kind: PartType, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
        }
    }
}

/// Sizes that drive the decoration layout
struct Metrics {
    width: i32,
    height: i32,
    border: i32,
    title_height: i32,
    button_width: i32,
    extended_area: i32,
    title_width: i32,
}

impl Metrics {
    fn new(theme: &ThemeConfig, width: i32, height: i32, title: &str) -> Self {
        let chars = i32::try_from(title.chars().count()).unwrap_or(i32::MAX);
        Self {
            width,
            height,
            border: theme.border_width,
            title_height: theme.title_height,
            button_width: theme.button_width,
            extended_area: theme.extended_area,
            title_width: chars.saturating_mul(theme.title_char_width),
        }
    }

    // Layout math saturates: oversized content clamps at i32::MAX.

    fn full_width(&self) -> i32 {
        self.width.saturating_add(self.border.saturating_mul(2))
    }

    fn full_height(&self) -> i32 {
        self.height
            .saturating_add(self.border)
            .saturating_add(self.title_height)
    }

    fn extents_origin(&self) -> (i32, i32) {
        (
            -self.border.saturating_add(self.extended_area),
            -self.title_height.saturating_add(self.extended_area),
        )
    }

    fn extents(&self) -> Vec<Slot> {
        let e = self.extended_area;
        let fw = self.full_width();
        let fh = self.full_height();
        let right = e.saturating_add(fw);
        let bottom = e.saturating_add(fh);
        vec![
            Slot::new(PartType::CornerTopLeft, 0, 0, e, e),
            Slot::new(PartType::Top, e, 0, fw, e),
            Slot::new(PartType::CornerTopRight, right, 0, e, e),
            Slot::new(PartType::Left, 0, e, e, fh),
            Slot::new(PartType::Right, right, e, e, fh),
            Slot::new(PartType::CornerBottomLeft, 0, bottom, e, e),
            Slot::new(PartType::Bottom, e, bottom, fw, e),
            Slot::new(PartType::CornerBottomRight, right, bottom, e, e),
        ]
    }

    fn border(&self) -> Vec<Slot> {
        let b = self.border;
        vec![
            Slot::new(PartType::Left, 0, 0, b, self.height),
            Slot::new(PartType::Right, b.saturating_add(self.width), 0, b, self.height),
            Slot::new(PartType::Bottom, 0, self.height, self.full_width(), b),
        ]
    }

    fn titlebar(&self) -> Vec<Slot> {
        let bw = self.button_width;
        let th = self.title_height;
        let fw = self.full_width();
        let bar = fw.saturating_sub(bw.saturating_mul(4)).max(0);
        vec![
            Slot::new(PartType::Titlebar, bw, 0, bar, th),
            Slot::new(PartType::Title, bw, 0, self.title_width.clamp(0, bar), th),
            Slot::new(PartType::ButtonWindowMenu, 0, 0, bw, th),
            Slot::new(PartType::ButtonIconify, fw.saturating_sub(bw.saturating_mul(3)), 0, bw, th),
            Slot::new(PartType::ButtonMaximize, fw.saturating_sub(bw.saturating_mul(2)), 0, bw, th),
            Slot::new(PartType::ButtonClose, fw.saturating_sub(bw), 0, bw, th),
        ]
    }
}

const INVISIBLE: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
const HOVER: [f32; 4] = [0.5, 0.5, 0.5, 0.5];

/// Server-side decoration of one view
#[derive(Debug, Clone)]
pub struct Ssd {
    tree: NodeId,
    extents: SubTree,
    border_active: SubTree,
    border_inactive: SubTree,
    titlebar_active: SubTree,
    titlebar_inactive: SubTree,
    width: i32,
    height: i32,
    title: String,
    active: bool,
}

impl Ssd {
    /// Builds the decoration under `parent`, below everything already there.
    /// It starts with the inactive look until the view is activated.
    pub fn create(
        scene: &mut Scene,
        parent: NodeId,
        theme: &ThemeConfig,
        width: i32,
        height: i32,
        title: &str,
    ) -> Self {
        debug!("Creating SSD for {}x{} content under {}", width, height, parent);
        let metrics = Metrics::new(theme, width, height, title);

        let tree = scene.create_tree(parent);
        scene.lower_to_bottom(tree);

        let (ex, ey) = metrics.extents_origin();
        let extents = build_subtree(scene, tree, (ex, ey), metrics.extents(), |_| INVISIBLE);

        let border_origin = (-metrics.border, 0);
        let border_active = build_subtree(scene, tree, border_origin, metrics.border(), |_| {
            theme.active_border()
        });
        let border_inactive = build_subtree(scene, tree, border_origin, metrics.border(), |_| {
            theme.inactive_border()
        });

        let title_origin = (-metrics.border, -metrics.title_height);
        let titlebar_active =
            build_titlebar(scene, tree, title_origin, &metrics, theme.active_title());
        let titlebar_inactive =
            build_titlebar(scene, tree, title_origin, &metrics, theme.inactive_title());

        let mut ssd = Self {
            tree,
            extents,
            border_active,
            border_inactive,
            titlebar_active,
            titlebar_inactive,
            width,
            height,
            title: title.to_string(),
            active: false,
        };
        ssd.set_active(scene, false);
        ssd
    }

    /// Root node of the decoration subtree
    pub fn tree(&self) -> NodeId {
        self.tree
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Re-lays out every part for new content size or title.
    ///
    /// Returns `false` when nothing changed.
    pub fn update_geometry(
        &mut self,
        scene: &mut Scene,
        theme: &ThemeConfig,
        width: i32,
        height: i32,
        title: &str,
    ) -> bool {
        if width == self.width && height == self.height && title == self.title {
            return false;
        }
        let metrics = Metrics::new(theme, width, height, title);

        apply_layout(scene, &self.extents, metrics.extents());
        for subtree in [&self.border_active, &self.border_inactive] {
            apply_layout(scene, subtree, metrics.border());
        }
        for subtree in [&self.titlebar_active, &self.titlebar_inactive] {
            apply_layout(scene, subtree, metrics.titlebar());
        }

        self.width = width;
        self.height = height;
        self.title = title.to_string();
        true
    }

    /// Switches between the active and inactive look
    pub fn set_active(&mut self, scene: &mut Scene, active: bool) {
        scene.set_enabled(self.border_active.tree, active);
        scene.set_enabled(self.titlebar_active.tree, active);
        scene.set_enabled(self.border_inactive.tree, !active);
        scene.set_enabled(self.titlebar_inactive.tree, !active);
        self.active = active;
    }

    pub fn hide(&self, scene: &mut Scene) {
        scene.set_enabled(self.tree, false);
    }

    pub fn show(&self, scene: &mut Scene) {
        scene.set_enabled(self.tree, true);
    }

    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.is_enabled(self.tree)
    }

    pub fn destroy(self, scene: &mut Scene) {
        debug!("Destroying SSD {}", self.tree);
        scene.destroy(self.tree);
    }

    /// Decoration part owning `node`.
    ///
    /// Titlebar buttons own their icon and hover children, so the titlebar
    /// subtrees are matched on the grandparent as well.
    pub fn part_type(&self, scene: &Scene, node: NodeId) -> PartType {
        let parent = scene.parent(node);
        let grandparent = parent.and_then(|p| scene.parent(p));
        let is_child_of = |tree: NodeId| parent == Some(tree);
        let is_grandchild_of = |tree: NodeId| grandparent == Some(tree);

        let subtree = if is_child_of(self.titlebar_active.tree)
            || is_grandchild_of(self.titlebar_active.tree)
        {
            Some(&self.titlebar_active)
        } else if is_child_of(self.extents.tree) {
            Some(&self.extents)
        } else if is_child_of(self.border_active.tree) {
            Some(&self.border_active)
        } else if is_child_of(self.titlebar_inactive.tree)
            || is_grandchild_of(self.titlebar_inactive.tree)
        {
            Some(&self.titlebar_inactive)
        } else if is_child_of(self.border_inactive.tree) {
            Some(&self.border_inactive)
        } else {
            None
        };

        subtree
            .and_then(|subtree| subtree.find(node))
            .unwrap_or(PartType::None)
    }
}

fn build_subtree(
    scene: &mut Scene,
    parent: NodeId,
    (x, y): (i32, i32),
    slots: Vec<Slot>,
    color: impl Fn(PartType) -> [f32; 4],
) -> SubTree {
    let tree = scene.create_tree(parent);
    scene.set_position(tree, x, y);
    let parts = slots
        .into_iter()
        .map(|slot| {
            let node = scene.create_rect(tree, slot.width, slot.height, color(slot.kind));
            scene.set_position(node, slot.x, slot.y);
            Part {
                kind: slot.kind,
                node,
                icon: None,
                hover: None,
            }
        })
        .collect();
    SubTree { tree, parts }
}

fn build_titlebar(
    scene: &mut Scene,
    parent: NodeId,
    (x, y): (i32, i32),
    metrics: &Metrics,
    background: [f32; 4],
) -> SubTree {
    let tree = scene.create_tree(parent);
    scene.set_position(tree, x, y);

    let mut parts = Vec::new();
    for slot in metrics.titlebar() {
        let node = match slot.kind {
            PartType::Titlebar | PartType::ButtonIconify | PartType::ButtonMaximize => {
                scene.create_rect(tree, slot.width, slot.height, background)
            }
            // Title text and the rounded corner buttons are rendered buffers
            _ => scene.create_buffer(tree, slot.width, slot.height),
        };
        scene.set_position(node, slot.x, slot.y);

        let (icon, hover) = if is_button(slot.kind) {
            let icon = scene.create_buffer(node, slot.width / 2, slot.height / 2);
            scene.set_position(icon, slot.width / 4, slot.height / 4);
            let hover = scene.create_rect(node, slot.width, slot.height, HOVER);
            scene.set_enabled(hover, false);
            (Some(icon), Some(hover))
        } else {
            (None, None)
        };

        parts.push(Part {
            kind: slot.kind,
            node,
            icon,
            hover,
        });
    }
    SubTree { tree, parts }
}

fn apply_layout(scene: &mut Scene, subtree: &SubTree, slots: Vec<Slot>) {
    for (part, slot) in subtree.parts.iter().zip(slots) {
        debug_assert_eq!(part.kind, slot.kind);
        scene.set_position(part.node, slot.x, slot.y);
        scene.set_size(part.node, slot.width, slot.height);
    }
}
