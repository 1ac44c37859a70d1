//! Rendering module
//!
//! Bubble styling is computed on every platform; the 2D canvas backend that
//! paints it only exists on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

pub use shapes::{BubbleStyle, Rgba};
