//! # Area Text
//!
//! Plain text flowed into a fixed-width box.
//!
//! A [`TextBox`] caches its wrapped lines and the anchor (the baseline origin
//! of the first line). The cache has two states: `Clean`, where `lines` and
//! `anchor` are valid, and `Dirty`, after content, box, or font changed.
//! Every read of the derived data goes through [`TextBox::ensure_layout`],
//! which rewraps only when dirty. Alignment changes do not touch the lines,
//! so they just move the anchor.
//!
//! Drawing is incremental: lines are painted one after another, moving the
//! paint cursor down by the leading each time, and stop at the first line
//! whose bottom would fall below the box. Lines below the box are still laid
//! out so the layout does not depend on how much is visible.

pub mod wrap;

pub use wrap::{split_paragraphs, wrap_text};

use serde::Deserialize;

use crate::font::TextMeasure;
use crate::geometry::{Point, Rect};
use crate::render::DrawContext;
use crate::style::{Color, FontSpec, Justification, Style, VerticalAlign};

/// Baseline of the first line below the box top, as a fraction of the font
/// size. Approximates the cap height of common Latin faces.
const BASELINE_RATIO: f64 = 0.92;

/// Whether the cached lines and anchor match the current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Clean,
    Dirty,
}

/// Text wrapped into a rectangle.
///
/// `lines` and `anchor` are only meaningful while the state is `Clean`. Setters
/// that leave it `Dirty` do not touch the stored anchor; read it through
/// [`TextBox::anchor`], which lays out first.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "TextBoxDef")]
pub struct TextBox {
    rectangle: Option<Rect>,
    content: String,
    lines: Vec<String>,
    state: LayoutState,
    /// Baseline origin of the first line. Stale while `Dirty`.
    anchor: Point,
    /// Translation of the text in its parent; follows the rectangle's corner.
    position: Point,
    justification: Justification,
    vertical_align: VerticalAlign,
    font: FontSpec,
    leading: f64,
}

/// Serialized form of a text box.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextBoxDef {
    #[serde(default)]
    rectangle: Option<Rect>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    vertical_align: VerticalAlign,
}

impl From<TextBoxDef> for TextBox {
    fn from(def: TextBoxDef) -> Self {
        let mut text = TextBox::default();
        if let Some(rect) = def.rectangle {
            text.set_rectangle(rect);
        }
        text.set_content(def.content);
        text.set_vertical_align(def.vertical_align);
        text
    }
}

impl Default for TextBox {
    fn default() -> Self {
        let style = Style::default();
        Self {
            rectangle: None,
            content: String::new(),
            lines: Vec::new(),
            state: LayoutState::Dirty,
            anchor: Point::ZERO,
            position: Point::ZERO,
            justification: Justification::Left,
            vertical_align: VerticalAlign::Top,
            font: style.font_spec(),
            leading: style.leading(),
        }
    }
}

impl TextBox {
    pub fn new(rectangle: Rect, content: impl Into<String>) -> Self {
        let mut text = Self::default();
        text.set_rectangle(rectangle);
        text.set_content(content);
        text
    }

    /// The layout box. Without one, a zero-size box at the anchor.
    pub fn rectangle(&self) -> Rect {
        self.rectangle
            .unwrap_or_else(|| Rect::from_origin(self.anchor, 0.0, 0.0))
    }

    /// Replace the layout box and move the text to its top-left corner.
    pub fn set_rectangle(&mut self, rectangle: Rect) {
        let delta = rectangle.top_left() - self.position;
        self.rectangle = Some(rectangle);
        self.translate(delta);
        self.state = LayoutState::Dirty;
        self.refresh_anchor();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.state = LayoutState::Dirty;
        self.refresh_anchor();
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    /// Set the justification of this box alone. A node style that carries a
    /// justification wins on the next restyle; use `Node::set_justification`
    /// to change both.
    pub fn set_justification(&mut self, justification: Justification) {
        self.justification = justification;
        self.refresh_anchor();
    }

    pub fn vertical_align(&self) -> VerticalAlign {
        self.vertical_align
    }

    pub fn set_vertical_align(&mut self, vertical_align: VerticalAlign) {
        self.vertical_align = vertical_align;
        self.refresh_anchor();
    }

    /// Pick up font, leading and justification from a resolved style.
    ///
    /// A font change invalidates the lines; a justification in the style
    /// overrides the current one.
    pub fn apply_style(&mut self, style: &Style) {
        let font = style.font_spec();
        if font != self.font {
            self.font = font;
            self.state = LayoutState::Dirty;
        }
        self.leading = style.leading();
        if let Some(justification) = style.justification {
            self.justification = justification;
        }
        self.refresh_anchor();
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn font_size(&self) -> f64 {
        self.font.size
    }

    pub fn leading(&self) -> f64 {
        self.leading
    }

    /// Where the text sits in its parent.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the text without touching its box or layout.
    pub fn translate(&mut self, delta: Point) {
        self.position = self.position + delta;
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == LayoutState::Dirty
    }

    /// The wrapped lines, if the layout is current.
    pub fn cached_lines(&self) -> Option<&[String]> {
        match self.state {
            LayoutState::Clean => Some(&self.lines),
            LayoutState::Dirty => None,
        }
    }

    /// Rewrap and re-anchor if anything changed since the last layout.
    pub fn ensure_layout(&mut self, measure: &dyn TextMeasure) {
        if self.state == LayoutState::Clean {
            return;
        }
        let width = self.rectangle().width;
        if width <= 0.0 && !self.content.is_empty() {
            log::warn!("Text box has non-positive width {}; nothing will be laid out", width);
        }
        self.lines = wrap_text(&self.content, width, &self.font, measure);
        log::debug!(
            "Wrapped {} chars into {} lines at width {}",
            self.content.len(),
            self.lines.len(),
            width
        );
        self.state = LayoutState::Clean;
        self.update_anchor();
    }

    pub fn lines(&mut self, measure: &dyn TextMeasure) -> &[String] {
        self.ensure_layout(measure);
        &self.lines
    }

    pub fn anchor(&mut self, measure: &dyn TextMeasure) -> Point {
        self.ensure_layout(measure);
        self.anchor
    }

    /// The box in the text's own coordinates.
    pub fn bounds(&self) -> Rect {
        let rect = self.rectangle();
        Rect::new(0.0, 0.0, rect.width, rect.height)
    }

    /// The box in the parent's coordinates.
    pub fn bounds_in_parent(&self) -> Rect {
        self.bounds().translate(self.position)
    }

    /// Recompute the anchor now if the lines are current; otherwise the next
    /// `ensure_layout` will.
    fn refresh_anchor(&mut self) {
        if self.state == LayoutState::Clean {
            self.update_anchor();
        }
    }

    fn update_anchor(&mut self) {
        let rect = self.rectangle();
        let text_height = self.lines.len() as f64 * self.leading;
        let visible_height = text_height.min(rect.height);
        let mut anchor = Point::new(0.0, self.font.size * BASELINE_RATIO);

        anchor.x += match self.justification {
            Justification::Left => 0.0,
            Justification::Center => rect.width / 2.0,
            Justification::Right => rect.width,
        };
        anchor.y += match self.vertical_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Center => (rect.height - visible_height) / 2.0,
            VerticalAlign::Bottom => rect.height - visible_height,
        };

        self.anchor = anchor;
    }

    /// Paint the visible lines at the current cursor.
    ///
    /// Fills cast the surface's shadow; a stroke over a fill on the same
    /// line does not cast it a second time.
    pub fn draw(&mut self, ctx: &mut DrawContext<'_>, style: &Style) {
        if self.content.is_empty() {
            return;
        }
        ctx.surface().set_font(&self.font.to_string());
        ctx.surface().set_text_align(self.justification);
        self.ensure_layout(ctx.measure());

        let has_fill = style.has_fill();
        let has_stroke = style.has_stroke();
        let height = self.rectangle().height;
        let anchor = self.anchor;
        let leading = self.leading;

        let surface = ctx.surface();
        let shadow = surface.shadow_color();
        for (i, line) in self.lines.iter().enumerate() {
            if (i + 1) as f64 * leading > height {
                log::trace!("Stopping at line {} of {}: below the box", i, self.lines.len());
                break;
            }
            surface.set_shadow_color(shadow);
            if has_fill {
                surface.fill_text(line, anchor.x, anchor.y);
                surface.set_shadow_color(Color::TRANSPARENT);
            }
            if has_stroke {
                surface.stroke_text(line, anchor.x, anchor.y);
            }
            surface.translate(0.0, leading);
        }
    }
}
