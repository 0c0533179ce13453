//! # Scene Model
//!
//! The input representation for the renderer. A scene is a list of top-level
//! nodes (normally layers). Each node has a kind, a style, optional children,
//! and two flags that matter to compositing:
//!
//! - `clipMask`: the first such child of a layer establishes the layer's clip
//!   region and is never painted.
//! - `merge`: a tag marking linear items that should be drawn in lock-step
//!   stages together with their adjacent siblings.
//!
//! Scenes are usually deserialized from JSON:
//!
//! ```json
//! {
//!   "settings": { "width": 400, "height": 300 },
//!   "children": [
//!     { "kind": { "type": "Layer" }, "children": [
//!       { "kind": { "type": "Rect", "x": 0, "y": 0, "width": 200, "height": 100 },
//!         "clipMask": true },
//!       { "kind": { "type": "AreaText", "rectangle": { "x": 10, "y": 10, "width": 180, "height": 80 },
//!                   "content": "Hello" } }
//!     ] }
//!   ]
//! }
//! ```

use serde::Deserialize;

use crate::error::VellumError;
use crate::font::FontContext;
use crate::geometry::Rect;
use crate::style::{Color, Justification, Style, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::text::TextBox;

/// A complete scene ready for rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Viewport and style defaults.
    #[serde(default)]
    pub settings: Settings,

    /// Custom fonts to register before layout.
    #[serde(default)]
    pub fonts: Vec<FontEntry>,

    /// The top-level nodes, drawn in order.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Scene-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Viewport width. When both dimensions are set the scene is clipped to them.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Style every top-level node inherits from.
    #[serde(default = "default_scene_style")]
    pub default_style: Style,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            default_style: default_scene_style(),
        }
    }
}

fn default_scene_style() -> Style {
    Style {
        font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
        font_size: Some(DEFAULT_FONT_SIZE),
        font_weight: Some(400),
        ..Default::default()
    }
}

impl Settings {
    /// The viewport rectangle, if the scene declares one.
    pub fn viewport(&self) -> Option<Rect> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Rect::new(0.0, 0.0, w, h)),
            _ => None,
        }
    }
}

/// A custom font to register with the renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct FontEntry {
    /// Font family name (e.g. "Inter", "Roboto").
    pub family: String,
    /// Base64-encoded font data, or a data URI (e.g. "data:font/ttf;base64,...").
    pub src: String,
    /// Font weight (100-900). Defaults to 400.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Whether this is an italic variant.
    #[serde(default)]
    pub italic: bool,
}

fn default_weight() -> u32 {
    400
}

/// A node in the scene tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Style properties for this node. Changed through [`Node::set_style`]
    /// so text nodes stay in sync with their typography.
    #[serde(default)]
    pub(crate) style: Style,

    /// Child nodes (layers and groups only).
    #[serde(default)]
    pub children: Vec<Node>,

    /// A unique identifier for this node (optional, useful for debugging).
    #[serde(default)]
    pub id: Option<String>,

    /// Whether this node is a clip mask for its parent layer.
    #[serde(default)]
    pub clip_mask: bool,

    /// Hidden nodes are skipped entirely.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Run-membership tag for staged drawing.
    #[serde(default)]
    pub merge: Option<MergeTag>,
}

fn default_true() -> bool {
    true
}

/// The different kinds of nodes in the scene tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// A compositing container: clip mask + merge-aware child drawing.
    Layer,

    /// A plain container. Each child is one internal state, so a group
    /// drawn at stage `n` paints only its `n`th child.
    Group,

    /// A rectangle, filled and/or stroked per style.
    Rect(Rect),

    /// Plain text wrapped into a fixed box.
    AreaText(TextBox),
}

/// Which item family a node belongs to, for run detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MergeKind {
    /// Linear items (roads, rails, rivers) whose layers interleave.
    Linear,
    Area,
    Point,
}

/// Marks a node as a candidate for staged drawing with its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTag {
    pub kind: MergeKind,
    #[serde(default)]
    pub auto_merge: bool,
}

impl MergeTag {
    pub fn linear() -> Self {
        Self {
            kind: MergeKind::Linear,
            auto_merge: true,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            children: Vec::new(),
            id: None,
            clip_mask: false,
            visible: true,
            merge: None,
        }
    }

    pub fn layer(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Layer).with_children(children)
    }

    pub fn group(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Group).with_children(children)
    }

    pub fn rect(rect: Rect) -> Self {
        Self::new(NodeKind::Rect(rect))
    }

    pub fn area_text(text: TextBox) -> Self {
        Self::new(NodeKind::AreaText(text))
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.set_style(style);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_merge(mut self, merge: MergeTag) -> Self {
        self.merge = Some(merge);
        self
    }

    pub fn as_clip_mask(mut self) -> Self {
        self.clip_mask = true;
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the style. Text nodes pick up the new typography immediately.
    pub fn set_style(&mut self, style: Style) {
        if let NodeKind::AreaText(text) = &mut self.kind {
            text.apply_style(&style);
        }
        self.style = style;
    }

    /// Set the justification on the style, so a later restyle keeps it.
    pub fn set_justification(&mut self, justification: Justification) {
        let mut style = self.style.clone();
        style.justification = Some(justification);
        self.set_style(style);
    }

    /// Whether this node joins a staged run with its mergeable neighbours.
    pub fn is_mergeable(&self) -> bool {
        matches!(
            self.merge,
            Some(MergeTag {
                kind: MergeKind::Linear,
                auto_merge: true,
            })
        )
    }

    /// Number of internal drawing states. Groups have one per child.
    pub fn state_count(&self) -> usize {
        match self.kind {
            NodeKind::Group => self.children.len(),
            _ => 1,
        }
    }

    pub fn text(&self) -> Option<&TextBox> {
        match &self.kind {
            NodeKind::AreaText(text) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextBox> {
        match &mut self.kind {
            NodeKind::AreaText(text) => Some(text),
            _ => None,
        }
    }

    /// Resolve this node's style against its parent's and recurse.
    fn cascade_from(&mut self, parent: &Style) {
        let mut resolved = self.style.cascade(parent);
        if matches!(self.kind, NodeKind::AreaText(_))
            && resolved.fill_color.is_none()
            && resolved.stroke_color.is_none()
        {
            // Text is painted black unless told otherwise
            resolved.fill_color = Some(Color::BLACK);
        }
        self.set_style(resolved);
        let parent = self.style.clone();
        for child in &mut self.children {
            child.cascade_from(&parent);
        }
    }
}

impl Scene {
    pub fn new(children: Vec<Node>) -> Self {
        let mut scene = Self {
            children,
            ..Default::default()
        };
        scene.resolve_styles();
        scene
    }

    /// Parse a JSON scene and resolve its style cascade.
    pub fn from_json(json: &str) -> Result<Self, VellumError> {
        let mut scene: Scene = serde_json::from_str(json)?;
        scene.resolve_styles();
        log::debug!(
            "Loaded scene with {} top-level nodes and {} custom fonts",
            scene.children.len(),
            scene.fonts.len()
        );
        Ok(scene)
    }

    /// Push the default style down the tree so every node has concrete values.
    pub fn resolve_styles(&mut self) {
        let root = self.settings.default_style.clone();
        for node in &mut self.children {
            node.cascade_from(&root);
        }
    }

    /// Build a font context with the scene's custom fonts registered.
    pub fn font_context(&self) -> Result<FontContext, VellumError> {
        let mut fonts = FontContext::new();
        for entry in &self.fonts {
            fonts.registry_mut().register_encoded(
                &entry.family,
                entry.weight,
                entry.italic,
                &entry.src,
            )?;
        }
        Ok(fonts)
    }
}
