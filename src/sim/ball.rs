//! Ball entity: kinematics, contact tests and ball-ball response

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{CollisionResponse, FieldBounds};
use crate::consts::{CONTACT_SKIN, FRICTION_SCALE};
use crate::error::ConfigError;

use super::collision::{ball_contact, reflect_velocity};

/// Color tag, which doubles as the ball's role on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallColor {
    /// Active ball launched by the player
    Red,
    /// Control ball the player pans to aim and deflect
    White,
    /// Destructible target
    Yellow,
    /// Extra-life bonus ball
    Blue,
}

/// A ball on the table
///
/// The center is a 3D point with y pinned to the table height; velocity
/// lives in the x/z plane (`velocity.x` is vx, `velocity.y` is vz).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub color: BallColor,
    center: Vec3,
    radius: f32,
    velocity: Vec2,
    live: bool,
    /// Per-frame velocity retention (e.g. 0.9982), `None` for no friction
    pub friction: Option<f32>,
}

impl Ball {
    /// Create a live ball at rest, resting on the table (y = radius)
    pub fn new(id: u32, color: BallColor, x: f32, z: f32, radius: f32) -> Result<Self, ConfigError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(radius));
        }
        if !x.is_finite() || !z.is_finite() {
            return Err(ConfigError::NonFinite("ball center"));
        }
        Ok(Self {
            id,
            color,
            center: Vec3::new(x, radius, z),
            radius,
            velocity: Vec2::ZERO,
            live: true,
            friction: None,
        })
    }

    pub fn with_friction(mut self, friction: Option<f32>) -> Self {
        self.friction = friction;
        self
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Center projected onto the table plane (x, z)
    #[inline]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.z)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Relocate without any boundary check
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Overwrite velocity (vy is always zero)
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Move on the table plane, keeping the current height
    pub fn set_planar(&mut self, pos: Vec2) {
        self.center.x = pos.x;
        self.center.z = pos.y;
    }

    /// Pose used by the render collaborator
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_translation(self.center)
    }

    /// True when both velocity components are within the rest epsilon
    pub fn is_at_rest(&self, rest_epsilon: f32) -> bool {
        self.velocity.x.abs() <= rest_epsilon && self.velocity.y.abs() <= rest_epsilon
    }

    /// Mark destroyed: inert, not drawn, skipped by collision tests
    pub fn destroy(&mut self) {
        self.live = false;
        self.velocity = Vec2::ZERO;
    }

    /// Bring a destroyed ball back at a fresh pose, at rest
    pub fn respawn(&mut self, center: Vec3) {
        self.center = center;
        self.velocity = Vec2::ZERO;
        self.live = true;
    }

    /// Integrate one frame
    ///
    /// Moving balls advance by `dt * time_scale * velocity` and are hard
    /// clamped to the field (the low-z edge only when it is closed). Balls
    /// slower than `rest_epsilon` on both axes snap to a stop.
    pub fn update(&mut self, dt: f32, time_scale: f32, rest_epsilon: f32, field: &FieldBounds) {
        if self.is_at_rest(rest_epsilon) {
            self.velocity = Vec2::ZERO;
            return;
        }

        let r = self.radius;
        let region = &field.region;
        let mut next = self.planar() + self.velocity * (dt * time_scale);

        next.x = next.x.clamp(region.x_min + r, region.x_max - r);
        next.y = next.y.min(region.z_max - r);
        if !field.open_bottom {
            next.y = next.y.max(region.z_min + r);
        }
        self.set_planar(next);

        if let Some(decrease) = self.friction {
            let rate = (1.0 - (1.0 - decrease) * dt * FRICTION_SCALE).max(0.0);
            self.velocity *= rate;
        }
    }

    /// Pure overlap test; touching counts as contact
    pub fn intersects(&self, other: &Ball) -> bool {
        self.live
            && other.live
            && ball_contact(self.planar(), self.radius, other.planar(), other.radius).is_some()
    }

    /// Push `self` away from `other` along the center axis by `share` of
    /// the overlap (plus the contact skin)
    pub fn resolve_penetration(&mut self, other: &Ball, share: f32) {
        if let Some(contact) = ball_contact(self.planar(), self.radius, other.planar(), other.radius) {
            let push = (contact.penetration + CONTACT_SKIN) * share;
            // normal points from self toward other
            self.set_planar(self.planar() - contact.normal * push);
        }
    }

    /// Respond to contact with `other`; returns whether they collided
    ///
    /// `Immovable` reflects only `self` off the contact normal and moves
    /// only `self` out of the overlap. `Elastic` treats both as equal unit
    /// masses: normal components are exchanged and each ball takes half of
    /// the correction. A pair already moving apart keeps its velocities.
    pub fn hit_by(&mut self, other: &mut Ball, response: CollisionResponse) -> bool {
        if !self.live || !other.live {
            return false;
        }
        let Some(contact) = ball_contact(self.planar(), self.radius, other.planar(), other.radius)
        else {
            return false;
        };
        let n = contact.normal;

        match response {
            CollisionResponse::Immovable => {
                self.velocity = reflect_velocity(self.velocity, n);
                self.resolve_penetration(other, 1.0);
            }
            CollisionResponse::Elastic => {
                let v1n = self.velocity.dot(n);
                let v2n = other.velocity.dot(n);
                // Already separating pairs only get pushed apart
                if v1n - v2n > 0.0 {
                    self.velocity += (v2n - v1n) * n;
                    other.velocity += (v1n - v2n) * n;
                }

                let push = (contact.penetration + CONTACT_SKIN) * 0.5;
                self.set_planar(self.planar() - n * push);
                other.set_planar(other.planar() + n * push);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use crate::consts::{DECREASE_RATE, REST_EPSILON, TIME_SCALE};
    use proptest::prelude::*;

    fn field(open_bottom: bool) -> FieldBounds {
        FieldBounds {
            region: Region {
                x_min: -3.0,
                x_max: 3.0,
                z_min: -3.5,
                z_max: 3.5,
            },
            open_bottom,
        }
    }

    fn ball_at(id: u32, x: f32, z: f32) -> Ball {
        Ball::new(id, BallColor::Yellow, x, z, 0.15).unwrap()
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            Ball::new(1, BallColor::Red, 0.0, 0.0, 0.0).unwrap_err(),
            ConfigError::InvalidRadius(0.0)
        );
        assert!(Ball::new(1, BallColor::Red, f32::NAN, 0.0, 0.15).is_err());
        let ball = ball_at(1, 1.0, 2.0);
        assert_eq!(ball.center(), Vec3::new(1.0, 0.15, 2.0));
        assert!(ball.is_live());
    }

    #[test]
    fn test_head_on_hit_reflects() {
        let mut a = ball_at(1, 0.0, 0.0);
        a.set_center(Vec3::new(0.0, 0.0, 0.0));
        a.set_velocity(Vec2::new(0.0, 2.0));
        let mut b = ball_at(2, 0.0, 0.3);
        b.set_center(Vec3::new(0.0, 0.0, 0.3));

        assert!(a.intersects(&b));
        assert!(a.hit_by(&mut b, CollisionResponse::Immovable));

        assert!(a.velocity().x.abs() < 1e-6);
        assert!((a.velocity().y + 2.0).abs() < 1e-6);
        // Stationary target untouched
        assert_eq!(b.velocity(), Vec2::ZERO);
        assert_eq!(b.center(), Vec3::new(0.0, 0.0, 0.3));
        // Separation corrected
        assert!(!a.intersects(&b));
        assert!(a.center().distance(b.center()) >= 0.3);
    }

    #[test]
    fn test_elastic_hit_transfers_momentum() {
        let mut a = ball_at(1, 0.0, 0.0);
        a.set_velocity(Vec2::new(0.0, 2.0));
        let mut b = ball_at(2, 0.0, 0.25);

        assert!(a.hit_by(&mut b, CollisionResponse::Elastic));
        assert!(a.velocity().length() < 1e-5);
        assert!((b.velocity().y - 2.0).abs() < 1e-5);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_elastic_separating_pair_keeps_velocity() {
        let mut a = ball_at(1, 0.0, 0.0);
        a.set_velocity(Vec2::new(0.0, -1.0));
        let mut b = ball_at(2, 0.0, 0.25);
        b.set_velocity(Vec2::new(0.0, 1.0));

        assert!(a.hit_by(&mut b, CollisionResponse::Elastic));
        assert_eq!(a.velocity(), Vec2::new(0.0, -1.0));
        assert_eq!(b.velocity(), Vec2::new(0.0, 1.0));
        // Overlap is still corrected
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_no_hit_when_apart_or_destroyed() {
        let mut a = ball_at(1, 0.0, 0.0);
        a.set_velocity(Vec2::new(1.0, 0.0));
        let mut b = ball_at(2, 1.0, 0.0);
        assert!(!a.hit_by(&mut b, CollisionResponse::Immovable));
        assert_eq!(a.velocity(), Vec2::new(1.0, 0.0));

        let mut c = ball_at(3, 0.1, 0.0);
        c.destroy();
        assert!(!a.intersects(&c));
        assert!(!a.hit_by(&mut c, CollisionResponse::Immovable));
    }

    #[test]
    fn test_intersects_is_pure() {
        let a = ball_at(1, 0.0, 0.0);
        let b = ball_at(2, 0.1, 0.0);
        let before = (a.center(), b.center());
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert_eq!(before, (a.center(), b.center()));
    }

    #[test]
    fn test_resolve_penetration_share() {
        let mut a = ball_at(1, 0.0, 0.0);
        let b = ball_at(2, 0.2, 0.0);
        a.resolve_penetration(&b, 0.5);
        // overlap 0.1 + skin 0.01, half of it
        assert!((a.center().x + 0.055).abs() < 1e-5);
        assert!(a.center().z.abs() < 1e-6);
    }

    #[test]
    fn test_update_integrates_and_clamps() {
        let mut ball = ball_at(1, 0.0, 0.0);
        ball.set_velocity(Vec2::new(1.0, 0.0));
        ball.update(0.1, TIME_SCALE, REST_EPSILON, &field(true));
        assert!((ball.center().x - 0.33).abs() < 1e-5);

        ball.set_velocity(Vec2::new(100.0, 100.0));
        ball.update(0.1, TIME_SCALE, REST_EPSILON, &field(true));
        assert!((ball.center().x - 2.85).abs() < 1e-5);
        assert!((ball.center().z - 3.35).abs() < 1e-5);
    }

    #[test]
    fn test_open_bottom_lets_ball_drain() {
        let mut ball = ball_at(1, 0.0, -3.3);
        ball.set_velocity(Vec2::new(0.0, -2.0));
        ball.update(0.1, TIME_SCALE, REST_EPSILON, &field(true));
        assert!(ball.center().z < -3.5);

        let mut ball = ball_at(1, 0.0, -3.3);
        ball.set_velocity(Vec2::new(0.0, -2.0));
        ball.update(0.1, TIME_SCALE, REST_EPSILON, &field(false));
        assert!((ball.center().z + 3.35).abs() < 1e-5);
    }

    #[test]
    fn test_slow_ball_snaps_to_rest() {
        let mut ball = ball_at(1, 0.5, 0.5);
        ball.set_velocity(Vec2::new(0.005, -0.009));
        ball.update(0.016, TIME_SCALE, REST_EPSILON, &field(true));
        assert_eq!(ball.velocity(), Vec2::ZERO);
        assert_eq!(ball.planar(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut ball = ball_at(1, 0.0, 0.0).with_friction(Some(DECREASE_RATE));
        ball.set_velocity(Vec2::new(0.0, 2.0));
        ball.update(0.01, TIME_SCALE, REST_EPSILON, &field(true));
        let expected = 2.0 * (1.0 - (1.0 - DECREASE_RATE) * 0.01 * FRICTION_SCALE);
        assert!((ball.velocity().y - expected).abs() < 1e-5);

        // Huge frame clamps the rate at zero instead of reversing direction
        ball.update(10.0, TIME_SCALE, REST_EPSILON, &field(true));
        assert_eq!(ball.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_destroy_and_respawn() {
        let mut ball = ball_at(1, 0.0, 0.0);
        ball.set_velocity(Vec2::new(1.0, 1.0));
        ball.destroy();
        assert!(!ball.is_live());
        assert_eq!(ball.velocity(), Vec2::ZERO);
        ball.respawn(Vec3::new(1.0, 0.15, -1.0));
        assert!(ball.is_live());
        assert_eq!(ball.local_transform().w_axis.truncate(), Vec3::new(1.0, 0.15, -1.0));
    }

    proptest! {
        #[test]
        fn prop_reflection_preserves_speed(angle in 0.0f32..std::f32::consts::TAU, speed in 0.1f32..20.0, offset in -0.2f32..0.2) {
            let mut mover = ball_at(1, 0.0, 0.0);
            mover.set_velocity(Vec2::from_angle(angle) * speed);
            let mut target = ball_at(2, offset, 0.2);
            let before = mover.velocity().length();
            prop_assert!(mover.hit_by(&mut target, CollisionResponse::Immovable));
            prop_assert!((mover.velocity().length() - before).abs() < 1e-3 * before.max(1.0));
            prop_assert_eq!(target.velocity(), Vec2::ZERO);
        }

        #[test]
        fn prop_rest_is_idempotent(x in -2.5f32..2.5, z in -2.5f32..2.5, vx in -0.01f32..0.01, vz in -0.01f32..0.01, steps in 1usize..50) {
            let mut ball = ball_at(1, x, z);
            ball.set_velocity(Vec2::new(vx, vz));
            let start = ball.planar();
            for _ in 0..steps {
                ball.update(1.0 / 60.0, TIME_SCALE, REST_EPSILON, &field(true));
                prop_assert_eq!(ball.planar(), start);
                prop_assert_eq!(ball.velocity(), Vec2::ZERO);
            }
        }
    }
}
