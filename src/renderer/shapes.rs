//! Bubble styling for 2D drawing
//!
//! Pure geometry and colour maths so the canvas layer only issues draw calls.

use glam::Vec2;

use crate::sim::Bubble;

/// Straight RGBA colour (alpha 0-1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` string
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Colours for fixed bubble details
pub mod colors {
    use super::Rgba;

    pub const OUTLINE: Rgba = Rgba::new(180, 220, 255, 0.9);
    pub const HIGHLIGHT: Rgba = Rgba::new(255, 255, 255, 0.5);
    pub const TEXT: &str = "#08324a";
}

/// Outline stroke width (px)
pub const OUTLINE_WIDTH: f32 = 2.0;

/// Glossy highlight ellipse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation in radians
    pub rotation: f32,
}

/// Radial gradient: offset inner circle to the bubble's full circle
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleGradient {
    pub inner_center: Vec2,
    pub inner_radius: f32,
    pub outer_center: Vec2,
    pub outer_radius: f32,
    /// (offset, colour) pairs
    pub stops: [(f32, Rgba); 3],
}

/// Everything needed to draw one bubble
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleStyle {
    pub center: Vec2,
    pub radius: f32,
    pub global_alpha: f32,
    pub gradient: BubbleGradient,
    pub highlight: Highlight,
    pub icon_font: String,
    pub icon_pos: Vec2,
    pub label_font: String,
    pub label_pos: Vec2,
}

impl BubbleStyle {
    pub fn for_bubble(bubble: &Bubble) -> Self {
        let r = bubble.radius;
        let c = bubble.pos;
        let alpha = bubble.alpha;
        let (cr, cg, cb) = bubble.color.rgb();

        let gradient = BubbleGradient {
            inner_center: c - Vec2::splat(r * 0.4),
            inner_radius: r * 0.2,
            outer_center: c,
            outer_radius: r,
            stops: [
                (0.0, Rgba::new(255, 255, 255, alpha * 0.9)),
                (0.5, Rgba::new(cr, cg, cb, alpha * 0.8)),
                (1.0, Rgba::new(135, 206, 235, alpha * 0.2)),
            ],
        };

        Self {
            center: c,
            radius: r,
            global_alpha: alpha,
            gradient,
            highlight: Highlight {
                center: c - Vec2::splat(r * 0.35),
                radius_x: r * 0.4,
                radius_y: r * 0.2,
                rotation: -0.6,
            },
            icon_font: format!("bold {}px system-ui", icon_font_px(r)),
            icon_pos: c - Vec2::new(0.0, r * 0.1),
            label_font: format!("600 {}px system-ui", label_font_px(r)),
            label_pos: c + Vec2::new(0.0, r * 0.3),
        }
    }
}

/// Icon glyph size, never smaller than 16px
pub fn icon_font_px(radius: f32) -> f32 {
    (radius * 0.5).max(16.0)
}

/// Label size, never smaller than 12px
pub fn label_font_px(radius: f32) -> f32 {
    (radius * 0.25).max(12.0)
}
