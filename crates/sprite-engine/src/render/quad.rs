//! Unit quad geometry shared by sprite draws.
//!
//! Two triangles centred on the origin, 1 × 1 units; the model matrix scales
//! the quad to the sprite's size. UV (0, 0) is the image's top-left texel.

/// Vertices per quad draw.
pub(super) const QUAD_VERTEX_COUNT: u32 = 6;

pub(super) const QUAD_POSITIONS: [[f32; 2]; QUAD_VERTEX_COUNT as usize] = [
    [-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], // triangle 1
    [-0.5, -0.5], [0.5, 0.5], [-0.5, 0.5], // triangle 2
];

pub(super) const QUAD_TEX_COORDS: [[f32; 2]; QUAD_VERTEX_COUNT as usize] = [
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], // triangle 1
    [0.0, 1.0], [1.0, 0.0], [0.0, 0.0], // triangle 2
];

/// Layout for a tightly packed `vec2<f32>` stream bound to `location`.
pub(super) fn vec2_layout(
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}
