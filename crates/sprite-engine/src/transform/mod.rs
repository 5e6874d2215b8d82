//! Model / view / projection matrices.
//!
//! Conventions:
//! - world space is +X right, +Y up, sprites live on the z = 0 plane
//! - matrices are column-major `glam::Mat4`, applied right to left to a vertex
//! - projection targets wgpu clip space (depth 0..1)

mod model;
mod projection;

pub use model::compose_model_matrix;
pub use projection::{OrthoBox, ViewProjection};
