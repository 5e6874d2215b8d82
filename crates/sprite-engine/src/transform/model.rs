use glam::{Mat4, Vec2, Vec3};

/// Builds a sprite's model matrix from its position and fixed scale.
///
/// Starts from identity, translates by `position`, then scales by `scale`:
/// `M = T(position) · S(scale)`. Applied to a vertex, the scale happens first
/// in the sprite's local frame and the translation moves the result into
/// place. The z scale is 1; sprites are flat.
pub fn compose_model_matrix(position: Vec2, scale: Vec2) -> Mat4 {
    let mut model = Mat4::IDENTITY;
    model *= Mat4::from_translation(position.extend(0.0));
    model *= Mat4::from_scale(Vec3::new(scale.x, scale.y, 1.0));
    model
}
