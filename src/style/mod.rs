//! # Style System
//!
//! The paint and typography properties a scene node carries. Every field is
//! optional so a node only states what differs from its parent; `cascade`
//! fills the gaps from the parent before drawing. This is deliberately tiny:
//! fill, stroke, shadow, and the font settings the text flow needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default font size when nothing in the cascade sets one.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Default line pitch as a multiple of the font size.
pub const DEFAULT_LEADING_RATIO: f64 = 1.2;
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

/// The paint and font properties of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Paint ──────────────────────────────────────────────────
    /// Fill color. `None` means no fill.
    pub fill_color: Option<Color>,
    /// Stroke color. `None` means no stroke.
    pub stroke_color: Option<Color>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Shadow cast by fills.
    pub shadow_color: Option<Color>,

    // ── Typography ─────────────────────────────────────────────
    pub font_family: Option<String>,
    /// Font size in scene units.
    pub font_size: Option<f64>,
    /// Font weight (100-900).
    pub font_weight: Option<u32>,
    pub font_style: Option<FontStyle>,
    /// Distance between successive baselines.
    pub leading: Option<f64>,
    /// Horizontal alignment of text lines.
    pub justification: Option<Justification>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of a text block inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Everything the measurement service needs to know about a font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
    pub size: f64,
}

impl fmt::Display for FontSpec {
    /// CSS font shorthand, e.g. `normal 400 12px Helvetica`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if self.italic { "italic" } else { "normal" };
        write!(f, "{} {} {}px {}", style, self.weight, self.size, self.family)
    }
}

impl Style {
    /// Fill the unset properties of this style from `parent`.
    pub fn cascade(&self, parent: &Style) -> Style {
        Style {
            fill_color: self.fill_color.or(parent.fill_color),
            stroke_color: self.stroke_color.or(parent.stroke_color),
            stroke_width: self.stroke_width.or(parent.stroke_width),
            shadow_color: self.shadow_color.or(parent.shadow_color),
            font_family: self
                .font_family
                .clone()
                .or_else(|| parent.font_family.clone()),
            font_size: self.font_size.or(parent.font_size),
            font_weight: self.font_weight.or(parent.font_weight),
            font_style: self.font_style.or(parent.font_style),
            leading: self.leading.or(parent.leading),
            justification: self.justification.or(parent.justification),
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill_color.is_some_and(|c| !c.is_transparent())
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke_color.is_some_and(|c| !c.is_transparent()) && self.stroke_width() > 0.0
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width.unwrap_or(1.0)
    }

    pub fn font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Line pitch; defaults to 1.2 × the font size.
    pub fn leading(&self) -> f64 {
        self.leading
            .unwrap_or_else(|| self.font_size() * DEFAULT_LEADING_RATIO)
    }

    pub fn justification(&self) -> Justification {
        self.justification.unwrap_or_default()
    }

    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            weight: self.font_weight.unwrap_or(400),
            italic: matches!(self.font_style, Some(FontStyle::Italic)),
            size: self.font_size(),
        }
    }
}
