//! Frame-driven simulation tick
//!
//! Core game loop: applies one frame of input, runs the collision sweep and
//! feeds its outcome to the progression rules.

use super::collision;
use super::progression;
use super::state::{GameEvent, GamePhase, GameWorld};
use crate::consts::MAX_FRAME_DT;
use crate::error::SimError;

/// Fastest the autopilot slides the control ball, in pan steps per tick
const AUTOPILOT_PAN_STEPS: f32 = 4.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the active ball (space)
    pub launch: bool,
    /// Sideways control ball movement this frame (arrow keys)
    pub pan: f32,
    /// Switch between solid and wireframe drawing
    pub toggle_render_mode: bool,
    /// Leave the game (escape)
    pub quit: bool,
    /// Demo mode - the control ball plays itself
    pub autopilot: bool,
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut GameWorld, input: &TickInput, dt: f32) -> Result<Vec<GameEvent>, SimError> {
    let mut events = Vec::new();

    if input.quit {
        world.quit_requested = true;
        events.push(GameEvent::Quit);
        return Ok(events);
    }

    if input.toggle_render_mode {
        world.render_mode = world.render_mode.toggled();
    }

    // Frozen once won or lost; only quit and render toggles get through
    if world.state.phase.is_terminal() {
        return Ok(events);
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    let mut input = input.clone();
    if input.autopilot {
        autopilot(world, &mut input);
    }
    let input = &input;

    world.state.time_ticks += 1;

    if input.pan != 0.0 {
        world.pan(input.pan);
    }
    if input.launch && world.launch() {
        events.push(GameEvent::Launched);
    }

    let outcome = collision::step(world, dt);
    events.extend(progression::apply_outcome(world, &outcome)?);

    // A shot that rolled to a stop on the table can be taken again
    if world.config.rearm_at_rest
        && world.state.phase == GamePhase::Playing
        && world.state.launched
        && world.active.is_live()
        && world.active.is_at_rest(world.config.rest_epsilon)
    {
        world.state.launched = false;
        events.push(GameEvent::Rearmed);
    }

    Ok(events)
}

/// Rewrite input so the control ball plays on its own
fn autopilot(world: &GameWorld, input: &mut TickInput) {
    if !world.state.launched {
        input.launch = true;
        return;
    }

    // Track the ball with some offset to avoid perfect loops
    let time_factor = world.state.time_ticks as f32 * 0.01;
    let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15) * world.control.radius();

    let target_x = world.active.planar().x + offset;
    let max_step = world.config.pan_step * AUTOPILOT_PAN_STEPS;
    input.pan = (target_x - world.control.planar().x).clamp(-max_step, max_step);
}
