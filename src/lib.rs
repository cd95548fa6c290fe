//! Sphere Break - a billiard-style ball breaking game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (balls, walls, collisions, level progression)
//! - `config`: Game modes and tuning constants
//! - `renderer`: Render collaborator trait and HUD text
//! - `error`: Configuration, placement and setup errors

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{GameConfig, GameMode};
pub use error::{ConfigError, PlacementExhausted, SimError};

/// Game configuration constants
pub mod consts {
    /// Position integration multiplier applied on top of the frame delta
    pub const TIME_SCALE: f32 = 3.3;
    /// Below this speed on both axes a ball is snapped to rest
    pub const REST_EPSILON: f32 = 0.01;
    /// Largest frame delta the simulation accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.15;
    /// Per-frame velocity retention used by the friction model
    pub const DECREASE_RATE: f32 = 0.9982;
    /// Friction scale: `rate = 1 - (1 - DECREASE_RATE) * dt * FRICTION_SCALE`
    pub const FRICTION_SCALE: f32 = 400.0;
    /// Extra separation left after positional correction
    pub const CONTACT_SKIN: f32 = 0.01;

    /// Table dimensions (x in [-3, 3], z in [-3.5, 3.5])
    pub const FIELD_HALF_WIDTH: f32 = 3.0;
    pub const FIELD_HALF_DEPTH: f32 = 3.5;
    pub const WALL_THICKNESS: f32 = 0.12;
    pub const WALL_HEIGHT: f32 = 0.3;

    /// Target spawn region
    pub const SPAWN_X_MIN: f32 = -2.8;
    pub const SPAWN_X_MAX: f32 = 2.8;
    pub const SPAWN_Z_MIN: f32 = -2.6;
    pub const SPAWN_Z_MAX: f32 = 3.3;

    /// Progression defaults
    pub const TARGET_COUNT: usize = 20;
    pub const LIVES_PER_LEVEL: u32 = 2;
    pub const MAX_LEVEL: u32 = 5;
    pub const BASE_SPEED: f32 = 2.0;
    pub const SPEED_INCREMENT: f32 = 1.5;
    pub const BONUS_CHANCE: f32 = 1.0 / 3.0;

    /// Control ball panning
    pub const PAN_STEP: f32 = 0.007;
    pub const PAN_MARGIN: f32 = 0.06;

    /// Random placement retry cap (per ball)
    pub const PLACEMENT_ATTEMPTS: u32 = 10_000;
}
