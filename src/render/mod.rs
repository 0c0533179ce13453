//! # Scene Rendering
//!
//! One frame is one depth-first walk over the scene. A single [`DrawContext`]
//! is threaded through the whole walk by `&mut`; besides the surface and the
//! text measurement service it carries two transient flags:
//!
//! - `clipping`: the node being drawn establishes a clip instead of painting.
//! - `step`: the stage a staged run is currently drawing.
//!
//! Both are only ever set through a guard ([`Scoped`]) that puts the previous
//! value back when it is dropped, so a flag can never outlive the subtree it
//! was set for.

pub mod composite;

pub use composite::{CompositeRenderer, SHARED_STAGES};

use std::ops::{Deref, DerefMut};

use crate::font::TextMeasure;
use crate::geometry::Rect;
use crate::model::{Node, NodeKind};
use crate::style::{Color, Style};
use crate::surface::Surface;

/// Per-traversal drawing state.
pub struct DrawContext<'a> {
    surface: &'a mut dyn Surface,
    measure: &'a dyn TextMeasure,
    clipping: bool,
    step: Option<usize>,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut dyn Surface, measure: &'a dyn TextMeasure) -> Self {
        Self {
            surface,
            measure,
            clipping: false,
            step: None,
        }
    }

    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    pub fn measure(&self) -> &'a dyn TextMeasure {
        self.measure
    }

    pub fn is_clipping(&self) -> bool {
        self.clipping
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// Draw in clip mode until the guard is dropped.
    pub fn clipping_scope(&mut self) -> Scoped<'_, 'a> {
        let previous = Saved::Clipping(self.clipping);
        self.clipping = true;
        Scoped { ctx: self, previous }
    }

    /// Draw stage `step` until the guard is dropped.
    pub fn stage(&mut self, step: usize) -> Scoped<'_, 'a> {
        let previous = Saved::Step(self.step);
        self.step = Some(step);
        Scoped { ctx: self, previous }
    }

    /// Draw without a stage until the guard is dropped.
    pub fn unstaged(&mut self) -> Scoped<'_, 'a> {
        let previous = Saved::Step(self.step.take());
        Scoped { ctx: self, previous }
    }
}

enum Saved {
    Clipping(bool),
    Step(Option<usize>),
}

/// A borrowed [`DrawContext`] with one transient flag changed.
///
/// Derefs to the context, so it can be passed wherever `&mut DrawContext`
/// is expected. Dropping it restores the flag.
pub struct Scoped<'c, 'a> {
    ctx: &'c mut DrawContext<'a>,
    previous: Saved,
}

impl<'a> Deref for Scoped<'_, 'a> {
    type Target = DrawContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a> DerefMut for Scoped<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for Scoped<'_, '_> {
    fn drop(&mut self) {
        match self.previous {
            Saved::Clipping(clipping) => self.ctx.clipping = clipping,
            Saved::Step(step) => self.ctx.step = step,
        }
    }
}

/// Draw one node and its subtree.
///
/// Outside clip mode the node's drawing is wrapped in save/restore so its
/// paint settings and translation stay local. In clip mode there is no
/// save/restore: the clip it adds has to persist for its siblings, bounded
/// by the parent's restore.
pub fn draw_node(node: &mut Node, ctx: &mut DrawContext<'_>) {
    if !node.visible {
        return;
    }

    // A staged draw only paints states the node has. Everything but a group
    // has one, drawn whole at stage 0.
    if let Some(step) = ctx.step() {
        if step >= node.state_count() {
            return;
        }
        if !matches!(node.kind, NodeKind::Group) {
            let mut unstaged = ctx.unstaged();
            draw_node(node, &mut unstaged);
            return;
        }
    }

    let clipping = ctx.is_clipping();
    if !clipping {
        ctx.surface().save();
        apply_paint_style(&node.style, ctx.surface());
    }

    match node.kind {
        NodeKind::Layer => CompositeRenderer::new().draw(node, ctx),
        NodeKind::Group => draw_group(&mut node.children, ctx),
        NodeKind::Rect(rect) => draw_rect(rect, &node.style, ctx),        NodeKind::AreaText(ref mut text) => {
            if clipping {
                ctx.surface().clip_rect(text.bounds_in_parent());
            } else {
                let position = text.position();
                ctx.surface().translate(position.x, position.y);
                text.draw(ctx, &node.style);
            }
        }
    }

    if !clipping {
        ctx.surface().restore();
    }
}

/// Push a node's paint properties to the surface.
fn apply_paint_style(style: &Style, surface: &mut dyn Surface) {
    if let Some(color) = style.fill_color {
        surface.set_fill_color(color);
    }
    if let Some(color) = style.stroke_color {
        surface.set_stroke_color(color);
        surface.set_line_width(style.stroke_width());
    }
    if let Some(color) = style.shadow_color {
        surface.set_shadow_color(color);
    }
}

/// A group's children are its internal states: at stage `n` only child `n`
/// is drawn, otherwise all of them in order.
fn draw_group(children: &mut [Node], ctx: &mut DrawContext<'_>) {
    match ctx.step() {
        Some(step) => {
            if let Some(child) = children.get_mut(step) {
                let mut unstaged = ctx.unstaged();
                draw_node(child, &mut unstaged);
            }
        }
        None => {
            for child in children {
                draw_node(child, ctx);
            }
        }
    }
}

fn draw_rect(rect: Rect, style: &Style, ctx: &mut DrawContext<'_>) {
    if ctx.is_clipping() {
        ctx.surface().clip_rect(rect);
        return;
    }
    let surface = ctx.surface();
    let shadow = surface.shadow_color();
    if style.has_fill() {
        surface.fill_rect(rect);
        surface.set_shadow_color(Color::TRANSPARENT);
    }
    if style.has_stroke() {
        surface.stroke_rect(rect);
    }
    surface.set_shadow_color(shadow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::style::FontSpec;
    use crate::surface::{DisplayList, PaintOp};

    struct Mono;

    impl TextMeasure for Mono {
        fn measure(&self, _font: &FontSpec, text: &str) -> f64 {
            text.chars().count() as f64 * 10.0
        }
    }

    fn filled(rect: Rect) -> Node {
        Node::rect(rect).with_style(Style {
            fill_color: Some(Color::BLACK),
            ..Default::default()
        })
    }

    #[test]
    fn test_scopes_restore_flags() {
        let mut list = DisplayList::new();
        let mut ctx = DrawContext::new(&mut list, &Mono);
        {
            let mut clip = ctx.clipping_scope();
            assert!(clip.is_clipping());
            let staged = clip.stage(3);
            assert_eq!(staged.step(), Some(3));
        }
        assert!(!ctx.is_clipping());
        assert_eq!(ctx.step(), None);
    }

    #[test]
    fn test_unstaged_restores_outer_step() {
        let mut list = DisplayList::new();
        let mut ctx = DrawContext::new(&mut list, &Mono);
        let mut staged = ctx.stage(2);
        {
            let inner = staged.unstaged();
            assert_eq!(inner.step(), None);
        }
        assert_eq!(staged.step(), Some(2));
    }

    #[test]
    fn test_rect_in_clip_mode_clips() {
        let mut list = DisplayList::new();
        let mut node = filled(Rect::new(0.0, 0.0, 10.0, 10.0));
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            let mut clip = ctx.clipping_scope();
            draw_node(&mut node, &mut clip);
        }
        assert_eq!(
            list.ops(),
            &[PaintOp::Clip {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0)
            }]
        );
    }

    #[test]
    fn test_node_drawing_is_saved_and_restored() {
        let mut list = DisplayList::new();
        let mut node = filled(Rect::new(0.0, 0.0, 10.0, 10.0));
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            draw_node(&mut node, &mut ctx);
        }
        let ops = list.ops();
        assert_eq!(ops.first(), Some(&PaintOp::Save));
        assert_eq!(ops.last(), Some(&PaintOp::Restore));
        assert_eq!(list.save_depth(), 0);
    }

    #[test]
    fn test_hidden_node_draws_nothing() {
        let mut list = DisplayList::new();
        let mut node = filled(Rect::new(0.0, 0.0, 10.0, 10.0));
        node.visible = false;
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            draw_node(&mut node, &mut ctx);
        }
        assert!(list.ops().is_empty());
    }

    #[test]
    fn test_group_at_stage_draws_one_child() {
        let mut list = DisplayList::new();
        let mut group = Node::group(vec![
            filled(Rect::new(0.0, 0.0, 1.0, 1.0)),
            filled(Rect::new(0.0, 0.0, 2.0, 2.0)),
        ]);
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            let mut staged = ctx.stage(1);
            draw_node(&mut group, &mut staged);
            let mut staged = staged.stage(7);
            draw_node(&mut group, &mut staged);
        }
        let rects: Vec<Rect> = list
            .paint_ops()
            .filter_map(|op| match op {
                PaintOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 2.0, 2.0)]);
    }

    #[test]
    fn test_leaf_paints_only_at_first_stage() {
        let mut list = DisplayList::new();
        let mut node = filled(Rect::new(0.0, 0.0, 3.0, 3.0));
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            for step in 0..4 {
                let mut staged = ctx.stage(step);
                draw_node(&mut node, &mut staged);
            }
        }
        assert_eq!(list.paint_ops().count(), 1);
        assert_eq!(list.save_depth(), 0);
    }

    #[test]
    fn test_layer_at_first_stage_draws_groups_whole() {
        let mut list = DisplayList::new();
        let mut layer = Node::layer(vec![Node::group(vec![
            filled(Rect::new(0.0, 0.0, 1.0, 1.0)),
            filled(Rect::new(0.0, 0.0, 2.0, 2.0)),
        ])]);
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            let mut staged = ctx.stage(0);
            draw_node(&mut layer, &mut staged);
            assert_eq!(staged.step(), Some(0));
        }
        assert_eq!(list.paint_ops().count(), 2);
    }

    #[test]
    fn test_text_is_drawn_at_its_position() {
        let mut list = DisplayList::new();
        let mut node = Node::area_text(crate::text::TextBox::new(
            Rect::new(20.0, 30.0, 100.0, 100.0),
            "aa",
        ))
        .with_style(Style {
            fill_color: Some(Color::BLACK),
            ..Default::default()
        });
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            draw_node(&mut node, &mut ctx);
        }
        let origin = list.paint_ops().find_map(|op| match op {
            PaintOp::FillText { origin, .. } => Some(*origin),
            _ => None,
        });
        assert_eq!(origin, Some(Point::new(20.0, 30.0)));
    }

    #[test]
    fn test_text_as_clip_uses_its_box() {
        let mut list = DisplayList::new();
        let mut node = Node::area_text(crate::text::TextBox::new(
            Rect::new(5.0, 6.0, 50.0, 60.0),
            "aa",
        ));
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            let mut clip = ctx.clipping_scope();
            draw_node(&mut node, &mut clip);
        }
        assert_eq!(
            list.ops(),
            &[PaintOp::Clip {
                rect: Rect::new(5.0, 6.0, 50.0, 60.0)
            }]
        );
    }

    #[test]
    fn test_rect_stroke_after_fill_has_no_shadow() {
        let shadow = Color::rgb(0.2, 0.2, 0.2);
        let mut list = DisplayList::new();
        let mut node = Node::rect(Rect::new(0.0, 0.0, 4.0, 4.0)).with_style(Style {
            fill_color: Some(Color::WHITE),
            stroke_color: Some(Color::BLACK),
            shadow_color: Some(shadow),
            ..Default::default()
        });
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            draw_node(&mut node, &mut ctx);
        }
        let shadows: Vec<Color> = list
            .paint_ops()
            .map(|op| match op {
                PaintOp::FillRect { shadow, .. } | PaintOp::StrokeRect { shadow, .. } => *shadow,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(shadows, vec![shadow, Color::TRANSPARENT]);
    }
}
