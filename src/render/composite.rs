//! Clip-aware, merge-aware drawing of a layer's children.
//!
//! A layer's children paint back to front, with two exceptions. The first
//! child flagged as a clip mask is drawn before everything else, in clip
//! mode, and never painted. And consecutive mergeable children form a run
//! that is drawn in stages: for the first [`SHARED_STAGES`] stages every
//! member draws its state for that stage before any member moves on, so
//! linear features that cross each other interleave their casings and fills.
//! Past the shared stages each member finishes its remaining states alone.

use super::{draw_node, DrawContext};
use crate::model::Node;

/// Stages every member of a run goes through in lock-step.
pub const SHARED_STAGES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildRole {
    Clip,
    Mergeable,
    Plain,
}

/// Draws a container's children.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeRenderer;

impl CompositeRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, container: &mut Node, ctx: &mut DrawContext<'_>) {
        let children = &mut container.children;
        let clip_index = children.iter().position(|child| child.clip_mask);

        if let Some(index) = clip_index {
            let mut clipping = ctx.clipping_scope();
            draw_node(&mut children[index], &mut clipping);
        }

        let roles: Vec<ChildRole> = children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                if Some(i) == clip_index {
                    ChildRole::Clip
                } else if child.is_mergeable() {
                    ChildRole::Mergeable
                } else {
                    ChildRole::Plain
                }
            })
            .collect();

        let mut run: Vec<usize> = Vec::new();
        for (index, role) in roles.into_iter().enumerate() {
            match role {
                ChildRole::Clip => {}
                ChildRole::Mergeable => run.push(index),
                ChildRole::Plain => {
                    self.flush(children, &mut run, ctx);
                    draw_node(&mut children[index], ctx);
                }
            }
        }
        self.flush(children, &mut run, ctx);
    }

    /// Draw a pending run and empty it.
    fn flush(&self, children: &mut [Node], run: &mut Vec<usize>, ctx: &mut DrawContext<'_>) {
        match run.as_slice() {
            [] => return,
            [single] => draw_node(&mut children[*single], ctx),
            members => {
                log::debug!(
                    "Drawing a run of {} merged items in {} shared stages",
                    members.len(),
                    SHARED_STAGES
                );
                for step in 0..SHARED_STAGES {
                    let mut staged = ctx.stage(step);
                    for &index in members {
                        draw_node(&mut children[index], &mut staged);
                    }
                }
                for &index in members {
                    for step in SHARED_STAGES..children[index].state_count() {
                        let mut staged = ctx.stage(step);
                        draw_node(&mut children[index], &mut staged);
                    }
                }
            }
        }
        run.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::TextMeasure;
    use crate::geometry::Rect;
    use crate::model::MergeTag;
    use crate::style::{Color, FontSpec, Style};
    use crate::surface::{DisplayList, PaintOp};

    struct Mono;

    impl TextMeasure for Mono {
        fn measure(&self, _font: &FontSpec, text: &str) -> f64 {
            text.chars().count() as f64 * 10.0
        }
    }

    /// A rect whose width encodes `(item, state)` so paints can be traced.
    fn marker(item: usize, state: usize) -> Node {
        Node::rect(Rect::new(0.0, 0.0, (item * 100 + state) as f64, 1.0)).with_style(Style {
            fill_color: Some(Color::BLACK),
            ..Default::default()
        })
    }

    /// A mergeable group with one marker per internal state.
    fn road(item: usize, states: usize) -> Node {
        Node::group((0..states).map(|s| marker(item, s)).collect()).with_merge(MergeTag::linear())
    }

    fn render(layer: &mut Node) -> DisplayList {
        let mut list = DisplayList::new();
        {
            let mut ctx = DrawContext::new(&mut list, &Mono);
            CompositeRenderer::new().draw(layer, &mut ctx);
            assert_eq!(ctx.step(), None);
            assert!(!ctx.is_clipping());
        }
        list
    }

    fn trace(list: &DisplayList) -> Vec<(usize, usize)> {
        list.paint_ops()
            .filter_map(|op| match op {
                PaintOp::FillRect { rect, .. } => {
                    let w = rect.width as usize;
                    Some((w / 100, w % 100))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_run_stages_interleave_then_finish_alone() {
        let mut layer = Node::layer(vec![road(1, 12), road(2, 11)]);
        let painted = trace(&render(&mut layer));

        let mut expected = Vec::new();
        for step in 0..SHARED_STAGES {
            expected.push((1, step));
            expected.push((2, step));
        }
        expected.extend([(1, 10), (1, 11), (2, 10)]);
        assert_eq!(painted, expected);
    }

    #[test]
    fn test_short_members_skip_missing_stages() {
        let mut layer = Node::layer(vec![road(1, 3), road(2, 2)]);
        let painted = trace(&render(&mut layer));
        assert_eq!(painted, vec![(1, 0), (2, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_single_member_run_draws_like_plain_item() {
        let mut merged = Node::layer(vec![road(1, 12)]);
        let mut plain = Node::layer(vec![Node::group((0..12).map(|s| marker(1, s)).collect())]);
        assert_eq!(render(&mut merged).ops(), render(&mut plain).ops());
    }

    #[test]
    fn test_merged_leaves_draw_like_plain_sequence() {
        let mut merged = Node::layer(vec![
            marker(1, 0).with_merge(MergeTag::linear()),
            marker(2, 0).with_merge(MergeTag::linear()),
        ]);
        let mut plain = Node::layer(vec![marker(1, 0), marker(2, 0)]);
        let merged = render(&mut merged);
        assert_eq!(trace(&merged), vec![(1, 0), (2, 0)]);
        assert_eq!(merged.ops(), render(&mut plain).ops());
    }

    #[test]
    fn test_merged_text_boxes_paint_once() {
        let label = |content: &str| {
            Node::area_text(crate::text::TextBox::new(Rect::new(0.0, 0.0, 100.0, 50.0), content))
                .with_style(Style {
                    fill_color: Some(Color::BLACK),
                    ..Default::default()
                })
                .with_merge(MergeTag::linear())
        };
        let mut layer = Node::layer(vec![label("north"), label("south")]);
        let list = render(&mut layer);
        let painted: Vec<&str> = list
            .paint_ops()
            .filter_map(|op| match op {
                PaintOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(painted, vec!["north", "south"]);
    }

    #[test]
    fn test_plain_child_flushes_pending_run() {
        let mut layer = Node::layer(vec![road(1, 2), road(2, 2), marker(9, 0), road(3, 1)]);
        let painted = trace(&render(&mut layer));
        assert_eq!(painted, vec![(1, 0), (2, 0), (1, 1), (2, 1), (9, 0), (3, 0)]);
    }

    #[test]
    fn test_step_does_not_leak_into_later_plain_groups() {
        let plain_group = Node::group(vec![marker(5, 0), marker(5, 1)]);
        let mut layer = Node::layer(vec![road(1, 1), road(2, 1), plain_group]);
        let painted = trace(&render(&mut layer));
        assert_eq!(painted, vec![(1, 0), (2, 0), (5, 0), (5, 1)]);
    }

    #[test]
    fn test_clip_child_is_drawn_first_and_never_painted() {
        let mut layer = Node::layer(vec![
            marker(1, 0),
            marker(7, 0).as_clip_mask(),
            marker(2, 0),
        ]);
        let list = render(&mut layer);
        assert_eq!(
            list.ops().first(),
            Some(&PaintOp::Clip {
                rect: Rect::new(0.0, 0.0, 700.0, 1.0)
            })
        );
        assert_eq!(trace(&list), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_only_first_clip_mask_clips() {
        let mut layer = Node::layer(vec![marker(7, 0).as_clip_mask(), marker(8, 0).as_clip_mask()]);
        let list = render(&mut layer);
        let clips = list
            .ops()
            .iter()
            .filter(|op| matches!(op, PaintOp::Clip { .. }))
            .count();
        assert_eq!(clips, 1);
        assert_eq!(trace(&list), vec![(8, 0)]);
    }

    #[test]
    fn test_empty_layer_draws_nothing() {
        let mut layer = Node::layer(vec![]);
        assert!(render(&mut layer).ops().is_empty());
    }
}
