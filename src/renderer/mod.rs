//! WebGPU rendering module
//!
//! The scene is tessellated into flat-colored triangles on the CPU each frame.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
pub use vertex::Vertex;
