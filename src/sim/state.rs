//! Game state and the world aggregate
//!
//! `GameWorld` owns every entity and counter. The frame driver passes it by
//! mutable reference into the collision sweep and the progression rules;
//! nothing lives in globals.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor};
use super::placement::{place_targets, random_positions};
use super::wall::Wall;
use crate::config::{GameConfig, TargetLayout};
use crate::consts::CONTACT_SKIN;
use crate::error::SimError;
use crate::renderer::RenderMode;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (before or after launch)
    Playing,
    /// Final level cleared to the bar; terminal
    Won,
    /// Out of lives below the bar; terminal
    Lost,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Things that happened during a tick, for HUD and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched,
    /// A resting active ball was re-armed for another shot
    Rearmed,
    TargetDestroyed { id: u32 },
    BonusCollected { lives: u32 },
    BallLost { lives_left: u32 },
    /// A fresh active ball was placed above the control ball
    Respawned,
    LevelUp { level: u32 },
    Won,
    Lost,
    Quit,
}

/// Counters owned by the progression rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub lives: u32,
    /// Targets destroyed so far; cumulative across levels
    pub score: u32,
    /// Current level (1-based)
    pub level: u32,
    /// The active ball has been fired this round
    pub launched: bool,
    pub phase: GamePhase,
    /// Launch speed for the current level
    pub speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            lives: config.lives_per_level,
            score: 0,
            level: 1,
            launched: false,
            phase: GamePhase::Playing,
            speed: config.base_speed,
            time_ticks: 0,
        }
    }
}

/// Every entity and counter of one running game
#[derive(Debug, Clone)]
pub struct GameWorld {
    pub config: GameConfig,
    pub state: GameState,
    /// Ball the player launches
    pub active: Ball,
    /// Ball the player pans to aim and deflect
    pub control: Ball,
    /// Extra-life ball; not live when absent this level
    pub bonus: Ball,
    pub targets: Vec<Ball>,
    pub walls: Vec<Wall>,
    pub render_mode: RenderMode,
    pub quit_requested: bool,
    /// Active ball is parked above the control ball and follows its panning
    pub(crate) docked: bool,
    rng: Pcg32,
    next_id: u32,
}

impl GameWorld {
    /// Validate the config and lay out the first level
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        config.validate()?;

        let walls = config
            .walls
            .iter()
            .map(Wall::from_spec)
            .collect::<Result<Vec<_>, _>>()?;

        let r = config.ball_radius;
        let (home, dock) = (config.control_home(), config.active_home());
        let control = Ball::new(1, BallColor::White, home.x, home.y, r)?;
        let active = Ball::new(2, BallColor::Red, dock.x, dock.y, r)?
            .with_friction(config.friction);
        let mut bonus = Ball::new(3, BallColor::Blue, 0.0, 0.0, r)?;
        bonus.destroy();

        let mut world = Self {
            state: GameState::new(&config),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            active,
            control,
            bonus,
            targets: Vec::new(),
            walls,
            render_mode: RenderMode::default(),
            quit_requested: false,
            docked: true,
            next_id: 4,
        };

        world.spawn_targets()?;
        world.roll_bonus();

        log::info!(
            "{} game ready: {} targets, {} lives, seed {}",
            world.config.mode.as_str(),
            world.targets.len(),
            world.state.lives,
            world.config.seed
        );
        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn live_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.is_live()).count()
    }

    /// Where a fresh active ball sits: just above the control ball
    fn dock_point(&self) -> Vec3 {
        let r = self.active.radius();
        let c = self.control.center();
        Vec3::new(c.x, c.y, c.z + 2.0 * r + CONTACT_SKIN)
    }

    /// Replace the active ball above the control ball, at rest and unfired
    pub fn reset_active(&mut self) {
        let home = self.dock_point();
        self.active.respawn(home);
        self.state.launched = false;
        self.docked = true;
    }

    /// Lay out a fresh set of targets for the current level
    pub fn spawn_targets(&mut self) -> Result<(), SimError> {
        let r = self.config.ball_radius;
        let positions: Vec<Vec2> = match &self.config.layout {
            TargetLayout::Table(table) => table.iter().map(|&[x, z]| Vec2::new(x, z)).collect(),
            TargetLayout::Random => {
                let avoid = [self.control.planar(), self.active.planar()];
                place_targets(
                    &mut self.rng,
                    self.config.target_count,
                    &self.config.spawn_region,
                    r,
                    &avoid,
                    self.config.placement_attempts,
                )
            }
        };

        let mut targets = Vec::with_capacity(positions.len());
        for p in positions {
            let id = self.next_entity_id();
            targets.push(
                Ball::new(id, BallColor::Yellow, p.x, p.y, r)?.with_friction(self.config.friction),
            );
        }
        self.targets = targets;
        Ok(())
    }

    /// Decide whether the bonus ball appears this level and place it
    pub fn roll_bonus(&mut self) {
        self.bonus.destroy();
        if self.config.bonus_chance <= 0.0
            || !self.rng.random_bool(self.config.bonus_chance as f64)
        {
            return;
        }

        let avoid: Vec<Vec2> = self
            .targets
            .iter()
            .filter(|t| t.is_live())
            .map(Ball::planar)
            .chain([self.control.planar(), self.active.planar()])
            .collect();

        match random_positions(
            &mut self.rng,
            1,
            &self.config.spawn_region,
            self.bonus.radius(),
            &avoid,
            self.config.placement_attempts,
        ) {
            Ok(spot) => {
                let y = self.bonus.radius();
                self.bonus.respawn(Vec3::new(spot[0].x, y, spot[0].y));
                log::debug!("Bonus ball placed at {:?}", spot[0]);
            }
            Err(e) => log::warn!("No bonus ball this level: {}", e),
        }
    }

    /// Advance to the next level: refill lives, speed up, new layout
    ///
    /// Walls stay where they are.
    pub fn level_up(&mut self) -> Result<(), SimError> {
        self.state.lives = self.config.lives_per_level;
        self.state.level += 1;
        self.state.speed += self.config.speed_increment;
        self.reset_active();
        self.spawn_targets()?;
        self.roll_bonus();
        log::info!(
            "Level {} (speed {:.1}, score {})",
            self.state.level,
            self.state.speed,
            self.state.score
        );
        Ok(())
    }

    /// Fire the active ball from the control ball through its own center
    pub fn launch(&mut self) -> bool {
        if self.state.launched || self.state.phase != GamePhase::Playing || !self.active.is_live()
        {
            return false;
        }
        let dir = (self.active.planar() - self.control.planar())
            .try_normalize()
            .unwrap_or(Vec2::Y);
        self.active.set_velocity(dir * self.state.speed);
        self.state.launched = true;
        self.docked = false;
        log::debug!("Launched at speed {:.1}", self.state.speed);
        true
    }

    /// Slide the control ball sideways, clamped inside the side margins
    ///
    /// A docked active ball moves with it.
    pub fn pan(&mut self, dx: f32) {
        if self.state.phase.is_terminal() || !dx.is_finite() {
            return;
        }
        let region = &self.config.field.region;
        let inset = self.control.radius() + self.config.pan_margin;
        let old = self.control.planar();
        let x = (old.x + dx).clamp(region.x_min + inset, region.x_max - inset);
        let applied = x - old.x;
        self.control.set_planar(Vec2::new(x, old.y));

        if self.docked && self.active.is_live() {
            let p = self.active.planar();
            self.active.set_planar(Vec2::new(p.x + applied, p.y));
        }
    }

    /// Stop the active ball for good (terminal phases)
    pub(crate) fn freeze(&mut self) {
        self.active.set_velocity(Vec2::ZERO);
    }
}
