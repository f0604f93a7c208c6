//! WebGPU rendering module
//!
//! The scene is recorded into a CPU-side [`DrawList`] (canvas-style calls
//! tessellated into triangles) and drawn by a single textured pipeline.

pub mod draw_list;
pub mod font;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw_list::{Batch, ColorFilter, DrawList, TextBaseline};
pub use pipeline::{RenderError, RenderResult, RenderState};
pub use scene::{Draw, Layer, PaintCtx, paint};
pub use vertex::{Color, Vertex};
