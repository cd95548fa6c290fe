//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Caller-supplied frame delta, clamped to a sane maximum
//! - Seeded RNG only
//! - Stable iteration order (by spawn order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod placement;
pub mod progression;
pub mod state;
pub mod tick;
pub mod wall;

pub use ball::{Ball, BallColor};
pub use collision::{Contact, FrameOutcome, ball_contact, reflect_velocity, step};
pub use placement::{grid_positions, place_targets, random_positions};
pub use progression::{Transition, apply_outcome, next_transition};
pub use state::{GameEvent, GamePhase, GameState, GameWorld};
pub use tick::{TickInput, tick};
pub use wall::Wall;
