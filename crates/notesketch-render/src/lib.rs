//! notesketch render library
//!
//! Draws notesketch documents in a hand-drawn style onto any 2D surface.

pub mod display_list;
pub mod grid;
pub mod prng;
pub mod rough;
mod renderer;
pub mod surface;

pub use display_list::{DisplayList, DrawCommand};
pub use prng::Prng;
pub use renderer::{RenderContext, SketchRenderer};
pub use rough::{FillGeometry, RoughGenerator, RoughOptions};
pub use surface::Surface;
