//! # Vellum
//!
//! Clip-aware layer compositing and area-text flow for a vector scene graph.
//!
//! A scene is a tree of layers, groups, rectangles and text boxes. Rendering
//! walks it once per frame and paints into a [`surface::Surface`]. Two things
//! make the walk more than a plain back-to-front traversal:
//!
//! - A layer may designate one child as its clip mask. That child is drawn
//!   first, in clip mode, and narrows what the rest of the layer can paint.
//! - Adjacent linear items tagged for merging are drawn in shared stages, so
//!   the lower states of every member land before any member's upper states.
//!
//! Text boxes wrap their content greedily into lines that fit the box width
//! and draw as many lines as fit the box height.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    — Scene tree: layers, groups, rects, area text
//!       ↓
//!   [style]    — Resolve cascade from the scene's default style
//!       ↓
//!   [render]   — Clip masks, merged runs, per-node drawing
//!       ↓        (text: wrap, anchor, line-by-line paint)
//!   [surface]  — Recorded display list
//! ```

pub mod error;
pub mod font;
pub mod geometry;
pub mod model;
pub mod render;
pub mod style;
pub mod surface;
pub mod text;

use error::VellumError;
use font::FontContext;
use model::Scene;
use render::{draw_node, DrawContext};
use surface::{DisplayList, Surface};

/// Render a scene into a display list.
///
/// Text layout is cached on the scene's text boxes, so rendering the same
/// scene again only rewraps boxes that changed in between.
pub fn render(scene: &mut Scene, fonts: &FontContext) -> DisplayList {
    let mut list = DisplayList::new();
    let viewport = scene.settings.viewport();
    {
        let mut ctx = DrawContext::new(&mut list, fonts);
        if let Some(viewport) = viewport {
            ctx.surface().save();
            ctx.surface().clip_rect(viewport);
        }
        for node in &mut scene.children {
            draw_node(node, &mut ctx);
        }
        if viewport.is_some() {
            ctx.surface().restore();
        }
    }
    log::debug!(
        "Rendered {} top-level nodes into {} ops",
        scene.children.len(),
        list.ops().len()
    );
    list
}

/// Render a scene described as JSON into a display list.
pub fn render_json(json: &str) -> Result<DisplayList, VellumError> {
    let mut scene = Scene::from_json(json)?;
    let fonts = scene.font_context()?;
    Ok(render(&mut scene, &fonts))
}
