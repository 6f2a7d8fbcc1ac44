//! wgpu rendering module
//!
//! The scene is tessellated on the CPU into one triangle list per frame.

pub mod background;
pub mod font;
pub mod hud;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use background::{BackgroundError, pick_background};
pub use font::{Anchor, TextError};
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
