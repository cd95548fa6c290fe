//! Axis-aligned static walls and the reflective boundary model
//!
//! A wall is a box on the table. Balls overlapping it are snapped just
//! outside the nearer face and the matching velocity component is
//! inverted. There is no swept test, so a fast enough ball can tunnel
//! through a thin wall in one frame; the field clamp in `Ball::update`
//! keeps that from happening at the table's outer edges.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::WallSpec;
use crate::consts::CONTACT_SKIN;
use crate::error::ConfigError;

use super::ball::Ball;

/// A static boundary segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    /// Center on the table plane (x, z)
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
    /// Render only
    pub height: f32,
}

impl Wall {
    pub fn new(center: Vec2, width: f32, depth: f32, height: f32) -> Result<Self, ConfigError> {
        if !center.is_finite() {
            return Err(ConfigError::NonFinite("wall center"));
        }
        for (dimension, value) in [("width", width), ("depth", depth), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { dimension, value });
            }
        }
        Ok(Self {
            center,
            width,
            depth,
            height,
        })
    }

    pub fn from_spec(spec: &WallSpec) -> Result<Self, ConfigError> {
        Self::new(Vec2::new(spec.x, spec.z), spec.width, spec.depth, spec.height)
    }

    #[inline]
    fn min(&self) -> Vec2 {
        self.center - Vec2::new(self.width, self.depth) / 2.0
    }

    #[inline]
    fn max(&self) -> Vec2 {
        self.center + Vec2::new(self.width, self.depth) / 2.0
    }

    /// Pose and box size for the render collaborator
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.center.x, self.height / 2.0, self.center.y))
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Ball center inside the wall rectangle grown by the ball radius (inclusive)
    pub fn intersects(&self, ball: &Ball) -> bool {
        if !ball.is_live() {
            return false;
        }
        let p = ball.planar();
        let r = Vec2::splat(ball.radius());
        let (lo, hi) = (self.min() - r, self.max() + r);
        lo.x <= p.x && p.x <= hi.x && lo.y <= p.y && p.y <= hi.y
    }

    /// Push an overlapping ball out and bounce it; returns whether it hit
    ///
    /// Within the wall's x-span the ball is moved off the nearer z face and
    /// vz flips; within the z-span the same happens on x. A corner overlap
    /// (outside both spans) applies both. A center inside the wall itself has
    /// no meaningful nearer face, so the ball is parked on the face looking
    /// toward the field origin and stopped.
    pub fn resolve_collision(&self, ball: &mut Ball) -> bool {
        if !self.intersects(ball) {
            return false;
        }

        let p = ball.planar();
        let r = ball.radius();
        let (lo, hi) = (self.min(), self.max());
        let in_x = lo.x <= p.x && p.x <= hi.x;
        let in_z = lo.y <= p.y && p.y <= hi.y;

        if in_x && in_z {
            ball.set_planar(self.reset_point(p, r));
            ball.set_velocity(Vec2::ZERO);
            return true;
        }

        let mut pos = p;
        let mut vel = ball.velocity();

        if !in_z {
            pos.y = if p.y <= self.center.y {
                lo.y - r - CONTACT_SKIN
            } else {
                hi.y + r + CONTACT_SKIN
            };
            vel.y = -vel.y;
        }
        if !in_x {
            pos.x = if p.x <= self.center.x {
                lo.x - r - CONTACT_SKIN
            } else {
                hi.x + r + CONTACT_SKIN
            };
            vel.x = -vel.x;
        }

        ball.set_planar(pos);
        ball.set_velocity(vel);
        true
    }

    /// Spot just outside the face that looks toward the field origin
    fn reset_point(&self, p: Vec2, radius: f32) -> Vec2 {
        let (lo, hi) = (self.min(), self.max());
        let offset = radius + CONTACT_SKIN;
        let to_origin = -self.center;
        // Thin walls face the origin across their short side
        if self.width < self.depth {
            let x = if to_origin.x >= 0.0 { hi.x + offset } else { lo.x - offset };
            Vec2::new(x, p.y)
        } else {
            let z = if to_origin.y >= 0.0 { hi.y + offset } else { lo.y - offset };
            Vec2::new(p.x, z)
        }
    }
}
