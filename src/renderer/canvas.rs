//! 2D canvas backend

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::shapes::{BubbleStyle, OUTLINE_WIDTH, colors};
use crate::sim::Bubble;

const BACKGROUND_TOP: &str = "#dff3ff";
const BACKGROUND_BOTTOM: &str = "#a9dcf5";

/// Paint one frame. Bubbles are drawn in spawn order, so later ones sit on top.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, bubbles: &[Bubble], width: f64, height: f64) {
    draw_background(ctx, width, height);
    for bubble in bubbles {
        draw_bubble(ctx, &BubbleStyle::for_bubble(bubble), bubble);
    }
    ctx.set_global_alpha(1.0);
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    gradient.add_color_stop(0.0, BACKGROUND_TOP).ok();
    gradient.add_color_stop(1.0, BACKGROUND_BOTTOM).ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_bubble(ctx: &CanvasRenderingContext2d, style: &BubbleStyle, bubble: &Bubble) {
    let cx = style.center.x as f64;
    let cy = style.center.y as f64;
    let r = style.radius as f64;

    ctx.save();
    ctx.set_global_alpha(style.global_alpha as f64);

    // Body
    let g = &style.gradient;
    if let Ok(gradient) = ctx.create_radial_gradient(
        g.inner_center.x as f64,
        g.inner_center.y as f64,
        g.inner_radius as f64,
        g.outer_center.x as f64,
        g.outer_center.y as f64,
        g.outer_radius as f64,
    ) {
        for (offset, color) in &g.stops {
            gradient.add_color_stop(*offset, &color.css()).ok();
        }
        ctx.set_fill_style_canvas_gradient(&gradient);
    }
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, TAU).ok();
    ctx.fill();

    ctx.set_stroke_style_str(&colors::OUTLINE.css());
    ctx.set_line_width(OUTLINE_WIDTH as f64);
    ctx.stroke();

    // Highlight
    let h = &style.highlight;
    ctx.begin_path();
    ctx.ellipse(
        h.center.x as f64,
        h.center.y as f64,
        h.radius_x as f64,
        h.radius_y as f64,
        h.rotation as f64,
        0.0,
        TAU,
    )
    .ok();
    ctx.set_fill_style_str(&colors::HIGHLIGHT.css());
    ctx.fill();

    // Icon and label
    ctx.set_fill_style_str(colors::TEXT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&style.icon_font);
    ctx.fill_text(&bubble.icon, style.icon_pos.x as f64, style.icon_pos.y as f64)
        .ok();
    ctx.set_font(&style.label_font);
    ctx.fill_text(&bubble.text, style.label_pos.x as f64, style.label_pos.y as f64)
        .ok();

    ctx.restore();
}
