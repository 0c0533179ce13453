//! # Paint Surface
//!
//! The stateful 2D surface the renderer paints into. It has canvas-style
//! semantics: a save/restore state stack, a translatable paint cursor, a clip
//! that narrows until restored, text fill/stroke at coordinates relative to the
//! cursor, and a shadow color that applies to subsequent paint operations.
//!
//! [`DisplayList`] is the recording implementation. It keeps the raw sequence
//! of operations so a backend can replay them, and it also tracks enough state
//! (cursor origin, shadow, clip depth) to stamp each paint op with its absolute
//! position, which is what tests and the CLI output look at.

use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::style::{Color, Justification};

/// A stateful 2D paint surface.
pub trait Surface {
    /// Push the current state (cursor, clip, paint settings).
    fn save(&mut self);
    /// Pop back to the most recently saved state.
    fn restore(&mut self);
    /// Move the paint cursor.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Intersect the clip region with `rect` (relative to the cursor).
    fn clip_rect(&mut self, rect: Rect);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);

    /// Font for subsequent text operations, as CSS shorthand.
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: Justification);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);

    fn shadow_color(&self) -> Color;
    fn set_shadow_color(&mut self, color: Color);
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PaintOp {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Clip {
        rect: Rect,
    },
    SetFillColor {
        color: Color,
    },
    SetStrokeColor {
        color: Color,
    },
    SetLineWidth {
        width: f64,
    },
    SetFont {
        font: String,
    },
    SetTextAlign {
        align: Justification,
    },
    SetShadowColor {
        color: Color,
    },
    FillRect {
        rect: Rect,
        /// Cursor position when the rect was painted.
        origin: Point,
        shadow: Color,
    },
    StrokeRect {
        rect: Rect,
        origin: Point,
        shadow: Color,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        origin: Point,
        shadow: Color,
    },
    StrokeText {
        text: String,
        x: f64,
        y: f64,
        origin: Point,
        shadow: Color,
    },
}

impl PaintOp {
    /// Whether this op puts pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            PaintOp::FillRect { .. }
                | PaintOp::StrokeRect { .. }
                | PaintOp::FillText { .. }
                | PaintOp::StrokeText { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct SurfaceState {
    origin: Point,
    shadow: Color,
    clip_depth: usize,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            shadow: Color::TRANSPARENT,
            clip_depth: 0,
        }
    }
}

/// A [`Surface`] that records every operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    ops: Vec<PaintOp>,
    #[serde(skip)]
    state: SurfaceState,
    #[serde(skip)]
    stack: Vec<SurfaceState>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PaintOp> {
        self.ops
    }

    /// Only the ops that put pixels on the surface, in order.
    pub fn paint_ops(&self) -> impl Iterator<Item = &PaintOp> {
        self.ops.iter().filter(|op| op.is_paint())
    }

    /// Current absolute cursor position.
    pub fn origin(&self) -> Point {
        self.state.origin
    }

    /// Number of clips active in the current state.
    pub fn clip_depth(&self) -> usize {
        self.state.clip_depth
    }

    /// Depth of the save/restore stack.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.stack.push(self.state);
        self.ops.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        // An unbalanced restore is ignored, matching canvas behavior
        if let Some(state) = self.stack.pop() {
            self.state = state;
            self.ops.push(PaintOp::Restore);
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.origin = self.state.origin.translate(dx, dy);
        self.ops.push(PaintOp::Translate { dx, dy });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_depth += 1;
        self.ops.push(PaintOp::Clip { rect });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(PaintOp::SetFillColor { color });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(PaintOp::SetStrokeColor { color });
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(PaintOp::SetLineWidth { width });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(PaintOp::FillRect {
            rect,
            origin: self.state.origin,
            shadow: self.state.shadow,
        });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(PaintOp::StrokeRect {
            rect,
            origin: self.state.origin,
            shadow: self.state.shadow,
        });
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(PaintOp::SetFont {
            font: font.to_string(),
        });
    }

    fn set_text_align(&mut self, align: Justification) {
        self.ops.push(PaintOp::SetTextAlign { align });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(PaintOp::FillText {
            text: text.to_string(),
            x,
            y,
            origin: self.state.origin,
            shadow: self.state.shadow,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(PaintOp::StrokeText {
            text: text.to_string(),
            x,
            y,
            origin: self.state.origin,
            shadow: self.state.shadow,
        });
    }

    fn shadow_color(&self) -> Color {
        self.state.shadow
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.state.shadow = color;
        self.ops.push(PaintOp::SetShadowColor { color });
    }
}
