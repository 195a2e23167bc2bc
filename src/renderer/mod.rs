//! WebGPU rendering module
//!
//! The scene builder turns a [`crate::RenderSnapshot`] into flat-coloured
//! triangles in board pixel space; the pipeline maps them to the viewport.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, board_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
