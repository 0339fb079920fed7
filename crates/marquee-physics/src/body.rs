use glam::Vec2;

/// Snapshot of one simulated fragment in CSS pixels, refreshed each step.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub text_content: String,
    /// Center position, y down.
    pub position: Vec2,
    /// Rotation in radians, clockwise on screen.
    pub angle: f32,
    /// Pixels per second.
    pub velocity: Vec2,
    /// Radians per second.
    pub angular_velocity: f32,
    pub is_settled: bool,
    pub half_extents: Vec2,
}

impl PhysicsBody {
    /// CSS transform placing a node whose top-left sits at the container
    /// origin onto this body.
    pub fn css_transform(&self) -> String {
        let top_left = self.position - self.half_extents;
        format!(
            "translate({:.2}px, {:.2}px) rotate({:.4}rad)",
            top_left.x, top_left.y, self.angle
        )
    }
}
