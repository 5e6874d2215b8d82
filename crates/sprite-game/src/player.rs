use glam::Vec2;

/// Position and motion of the single sprite.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,

    /// Direction applied on the last frame; at most unit length.
    pub movement: Vec2,

    /// World units per second.
    pub speed: f32,
}

impl PlayerState {
    pub fn new(speed: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            movement: Vec2::ZERO,
            speed,
        }
    }

    /// Replaces the movement direction and integrates the position over `dt`.
    pub fn advance(&mut self, movement: Vec2, dt: f32) {
        self.movement = movement;
        self.position += movement * self.speed * dt;
    }
}
