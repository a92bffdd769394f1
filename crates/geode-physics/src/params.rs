//! Resolver tuning constants.

/// Per-tick physics constants, in blocks and ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Downward velocity added every tick.
    pub gravity: f32,
    /// Upward velocity added when a requested jump meets the ground.
    pub jump_impulse: f32,
    /// Horizontal slowdown per unit of vertical reaction on landing.
    pub friction: f32,
    /// Sweep iterations allowed per tick before giving up.
    pub max_iterations: u32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: 0.01,
            jump_impulse: 0.22,
            friction: 0.5,
            max_iterations: 10,
        }
    }
}
