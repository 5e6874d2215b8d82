use glam::Mat4;

/// Orthographic view volume in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBox {
    /// 10 × 7.5 units centred on the origin, a 4:3 window.
    pub const DEFAULT: Self = Self {
        left: -5.0,
        right: 5.0,
        bottom: -3.75,
        top: 3.75,
        near: -1.0,
        far: 1.0,
    };

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

impl Default for OrthoBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Static camera matrices, computed once at startup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewProjection {
    pub view: Mat4,
    pub projection: Mat4,
}

impl ViewProjection {
    /// Identity view looking through `bounds`.
    pub fn orthographic(bounds: OrthoBox) -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: bounds.projection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn box_corners_map_to_clip_corners() {
        let proj = OrthoBox::DEFAULT.projection();

        let top_right = proj.project_point3(Vec3::new(5.0, 3.75, 0.0));
        assert!((top_right.x - 1.0).abs() < 1e-6);
        assert!((top_right.y - 1.0).abs() < 1e-6);

        let bottom_left = proj.project_point3(Vec3::new(-5.0, -3.75, 0.0));
        assert!((bottom_left.x + 1.0).abs() < 1e-6);
        assert!((bottom_left.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn sprite_plane_is_inside_depth_range() {
        let z = OrthoBox::DEFAULT.projection().project_point3(Vec3::ZERO).z;
        assert!((0.0..=1.0).contains(&z));
    }

    #[test]
    fn view_is_identity() {
        let vp = ViewProjection::orthographic(OrthoBox::default());
        assert_eq!(vp.view, Mat4::IDENTITY);
        assert_eq!(vp.projection, OrthoBox::DEFAULT.projection());
    }
}
