//! Collision detection and the per-frame collision sweep
//!
//! Order matters: each resolution mutates state the next one reads. Per
//! frame the active ball is advanced, checked against the drain, pushed
//! out of walls, bounced off the control ball, checked against the bonus
//! ball and finally swept against every live target. When targets can
//! move, they are advanced and resolved pairwise afterwards.

use glam::Vec2;

use super::ball::Ball;
use super::state::GameWorld;
use super::wall::Wall;
use crate::config::{CollisionResponse, GameConfig};

/// Contact between two circles on the table plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first center toward the second
    pub normal: Vec2,
    /// Overlap depth (zero when just touching)
    pub penetration: f32,
}

/// Check two circles for contact; touching counts
///
/// Concentric circles get an arbitrary +z normal so the pair can still be
/// separated.
pub fn ball_contact(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Contact> {
    let delta = b - a;
    let dist = delta.length();
    let reach = ra + rb;
    if dist > reach {
        return None;
    }
    Some(Contact {
        normal: delta.try_normalize().unwrap_or(Vec2::Y),
        penetration: reach - dist,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// What happened during one collision sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Targets destroyed this frame, in sweep order
    pub destroyed: Vec<u32>,
    /// The active ball left the field through the drain
    pub active_lost: bool,
    /// The active ball touched the bonus ball
    pub bonus_collected: bool,
    pub wall_hits: u32,
}

/// Run one frame of motion and collision resolution
pub fn step(world: &mut GameWorld, dt: f32) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();
    let config = &world.config;
    let drain_z = config.field.region.z_min;

    if world.active.is_live() {
        world
            .active
            .update(dt, config.time_scale, config.rest_epsilon, &config.field);

        if world.active.planar().y < drain_z {
            world.active.destroy();
            outcome.active_lost = true;
        }
    }

    if world.active.is_live() {
        for wall in &world.walls {
            if wall.resolve_collision(&mut world.active) {
                outcome.wall_hits += 1;
            }
        }

        // The control ball is held by the player and never gives way
        if world.state.launched {
            world
                .active
                .hit_by(&mut world.control, CollisionResponse::Immovable);
        }

        if world.active.intersects(&world.bonus) {
            world.bonus.destroy();
            outcome.bonus_collected = true;
        }

        for target in world.targets.iter_mut() {
            if world.active.hit_by(target, config.response) && config.destroy_on_hit {
                target.destroy();
                outcome.destroyed.push(target.id);
            }
        }
    }

    if config.passive_collisions {
        step_targets(&mut world.targets, &world.walls, config, dt, &mut outcome);
    }

    outcome
}

/// Advance movable targets, drain them, then resolve every unordered pair once
fn step_targets(
    targets: &mut [Ball],
    walls: &[Wall],
    config: &GameConfig,
    dt: f32,
    outcome: &mut FrameOutcome,
) {
    let drain_z = config.field.region.z_min;

    for target in targets.iter_mut().filter(|t| t.is_live()) {
        target.update(dt, config.time_scale, config.rest_epsilon, &config.field);
        if target.planar().y < drain_z {
            target.destroy();
            outcome.destroyed.push(target.id);
            continue;
        }
        for wall in walls {
            if wall.resolve_collision(target) {
                outcome.wall_hits += 1;
            }
        }
    }

    for i in 0..targets.len() {
        let (head, tail) = targets.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            a.hit_by(b, config.response);
        }
    }
}
