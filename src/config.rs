//! Game modes and tuning configuration
//!
//! Every variant of the game is one `GameConfig`; the four built-in modes
//! differ only in the values below.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::error::{ConfigError, SimError};
use crate::sim::placement::{grid_capacity, overlaps};
use crate::sim::wall::Wall;

/// Built-in game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Random targets, stationary-target reflection, bonus ball
    #[default]
    Classic,
    /// Fixed triangular rack of targets
    Rack,
    /// Movable targets, friction, targets scored by knocking them off the table
    Billiards,
    /// Crowded field with a steep speed ramp
    Arcade,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Classic,
        GameMode::Rack,
        GameMode::Billiards,
        GameMode::Arcade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Rack => "Rack",
            GameMode::Billiards => "Billiards",
            GameMode::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "rack" => Some(GameMode::Rack),
            "billiards" | "pool" => Some(GameMode::Billiards),
            "arcade" => Some(GameMode::Arcade),
            _ => None,
        }
    }
}

/// How a ball-ball hit changes velocities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionResponse {
    /// The struck ball absorbs nothing; only the mover reflects off the normal
    #[default]
    Immovable,
    /// Equal unit masses: normal velocity components are exchanged
    Elastic,
}

/// Axis-aligned rectangle in the x/z plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Region {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn depth(&self) -> f32 {
        self.z_max - self.z_min
    }

    fn validate(&self, what: &'static str) -> Result<(), ConfigError> {
        let values = [self.x_min, self.x_max, self.z_min, self.z_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite(what));
        }
        if self.width() <= 0.0 || self.depth() <= 0.0 {
            return Err(ConfigError::EmptyRegion(what));
        }
        Ok(())
    }
}

/// Play field: hard clamp limits for ball motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub region: Region,
    /// When open, balls may leave through the low-z edge (the drain)
    pub open_bottom: bool,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            region: Region {
                x_min: -FIELD_HALF_WIDTH,
                x_max: FIELD_HALF_WIDTH,
                z_min: -FIELD_HALF_DEPTH,
                z_max: FIELD_HALF_DEPTH,
            },
            open_bottom: true,
        }
    }
}

/// A wall as described in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

/// Where targets spawn at the start of each level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum TargetLayout {
    /// Random non-overlapping positions inside the spawn region
    #[default]
    Random,
    /// Fixed (x, z) table reused every level
    Table(Vec<[f32; 2]>),
}

/// Complete tuning for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Targets per level (the level threshold unit)
    pub target_count: usize,
    pub lives_per_level: u32,
    pub max_level: u32,
    pub ball_radius: f32,
    pub field: FieldBounds,
    pub spawn_region: Region,
    pub walls: Vec<WallSpec>,
    pub time_scale: f32,
    pub rest_epsilon: f32,
    /// Per-frame velocity retention; `None` disables friction
    pub friction: Option<f32>,
    pub response: CollisionResponse,
    /// Resolve collisions among targets as well
    pub passive_collisions: bool,
    /// Targets struck by the active ball are destroyed immediately
    pub destroy_on_hit: bool,
    /// A launched active ball that comes to rest may be fired again
    pub rearm_at_rest: bool,
    pub layout: TargetLayout,
    pub base_speed: f32,
    pub speed_increment: f32,
    /// Chance per level that the extra-life ball appears
    pub bonus_chance: f32,
    pub pan_step: f32,
    pub pan_margin: f32,
    pub placement_attempts: u32,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_mode(GameMode::Classic)
    }
}

/// Top wall plus the two side walls around the default field
fn default_walls() -> Vec<WallSpec> {
    vec![
        WallSpec {
            x: 0.0,
            z: FIELD_HALF_DEPTH,
            width: 2.0 * FIELD_HALF_WIDTH,
            depth: WALL_THICKNESS,
            height: WALL_HEIGHT,
        },
        WallSpec {
            x: FIELD_HALF_WIDTH,
            z: 0.0,
            width: WALL_THICKNESS,
            depth: 2.0 * FIELD_HALF_DEPTH + WALL_THICKNESS,
            height: WALL_HEIGHT,
        },
        WallSpec {
            x: -FIELD_HALF_WIDTH,
            z: 0.0,
            width: WALL_THICKNESS,
            depth: 2.0 * FIELD_HALF_DEPTH + WALL_THICKNESS,
            height: WALL_HEIGHT,
        },
    ]
}

/// Triangular rack: row `n` holds `n + 1` balls, apex nearest the player
pub fn rack_layout(count: usize, radius: f32, apex: [f32; 2]) -> Vec<[f32; 2]> {
    let spacing = 2.0 * radius + CONTACT_SKIN;
    let row_step = spacing * 3f32.sqrt() / 2.0;
    let mut positions = Vec::with_capacity(count);
    let mut row = 0usize;
    while positions.len() < count {
        let z = apex[1] + row as f32 * row_step;
        let row_width = row as f32 * spacing;
        for i in 0..=row {
            if positions.len() == count {
                break;
            }
            positions.push([apex[0] - row_width / 2.0 + i as f32 * spacing, z]);
        }
        row += 1;
    }
    positions
}

/// Overlay `patch` onto `base`, recursing into objects
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl GameConfig {
    pub fn for_mode(mode: GameMode) -> Self {
        let classic = Self {
            mode,
            target_count: TARGET_COUNT,
            lives_per_level: LIVES_PER_LEVEL,
            max_level: MAX_LEVEL,
            ball_radius: BALL_RADIUS,
            field: FieldBounds::default(),
            spawn_region: Region {
                x_min: SPAWN_X_MIN,
                x_max: SPAWN_X_MAX,
                z_min: SPAWN_Z_MIN,
                z_max: SPAWN_Z_MAX,
            },
            walls: default_walls(),
            time_scale: TIME_SCALE,
            rest_epsilon: REST_EPSILON,
            friction: None,
            response: CollisionResponse::Immovable,
            passive_collisions: false,
            destroy_on_hit: true,
            rearm_at_rest: false,
            layout: TargetLayout::Random,
            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            bonus_chance: BONUS_CHANCE,
            pan_step: PAN_STEP,
            pan_margin: PAN_MARGIN,
            placement_attempts: PLACEMENT_ATTEMPTS,
            seed: 0,
        };

        match mode {
            GameMode::Classic => classic,
            GameMode::Rack => Self {
                target_count: 15,
                layout: TargetLayout::Table(rack_layout(15, BALL_RADIUS, [0.0, 1.0])),
                bonus_chance: 0.0,
                ..classic
            },
            GameMode::Billiards => Self {
                target_count: 10,
                layout: TargetLayout::Table(rack_layout(10, BALL_RADIUS, [0.0, 1.5])),
                friction: Some(DECREASE_RATE),
                response: CollisionResponse::Elastic,
                passive_collisions: true,
                destroy_on_hit: false,
                rearm_at_rest: true,
                base_speed: 4.0,
                speed_increment: 0.5,
                bonus_chance: 0.0,
                lives_per_level: 3,
                ..classic
            },
            GameMode::Arcade => Self {
                target_count: 30,
                lives_per_level: 3,
                base_speed: 3.0,
                speed_increment: 2.0,
                bonus_chance: 0.5,
                ..classic
            },
        }
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ball_radius.is_finite() || self.ball_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.ball_radius));
        }
        self.field.region.validate("field")?;
        self.spawn_region.validate("spawn region")?;

        for (name, value) in [
            ("time_scale", self.time_scale),
            ("rest_epsilon", self.rest_epsilon),
            ("base_speed", self.base_speed),
            ("speed_increment", self.speed_increment),
            ("pan_step", self.pan_step),
            ("pan_margin", self.pan_margin),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
            if value < 0.0 {
                return Err(ConfigError::Negative(name));
            }
        }

        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(ConfigError::InvalidChance(self.bonus_chance));
        }
        if let Some(rate) = self.friction {
            if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
                return Err(ConfigError::InvalidFriction(rate));
            }
        }
        if self.target_count == 0 {
            return Err(ConfigError::Zero("target_count"));
        }
        if self.lives_per_level == 0 {
            return Err(ConfigError::Zero("lives_per_level"));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Zero("max_level"));
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::Zero("placement_attempts"));
        }

        for (index, spec) in self.walls.iter().enumerate() {
            Wall::from_spec(spec).map_err(|e| match e {
                ConfigError::InvalidDimension { dimension, .. } => {
                    ConfigError::InvalidWall { index, dimension }
                }
                other => other,
            })?;
        }

        match &self.layout {
            TargetLayout::Random => {
                let capacity = grid_capacity(&self.spawn_region, self.ball_radius);
                if self.target_count > capacity {
                    return Err(ConfigError::TooManyTargets {
                        requested: self.target_count,
                        capacity,
                    });
                }
            }
            TargetLayout::Table(positions) => {
                if positions.len() != self.target_count {
                    return Err(ConfigError::LayoutMismatch {
                        expected: self.target_count,
                        got: positions.len(),
                    });
                }
                if positions.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(ConfigError::NonFinite("layout table"));
                }
                self.validate_table(positions)?;
            }
        }

        Ok(())
    }

    /// Fixed table entries must sit inside the field, apart from each other
    /// and clear of the balls the player starts with
    fn validate_table(&self, positions: &[[f32; 2]]) -> Result<(), ConfigError> {
        let r = self.ball_radius;
        let region = &self.field.region;
        let start = [self.control_home(), self.active_home()];
        let points: Vec<Vec2> = positions.iter().map(|&[x, z]| Vec2::new(x, z)).collect();

        for (index, p) in points.iter().enumerate() {
            let inside = (region.x_min + r..=region.x_max - r).contains(&p.x)
                && (region.z_min + r..=region.z_max - r).contains(&p.y);
            if !inside {
                return Err(ConfigError::LayoutOutOfField { index });
            }
            if start.iter().any(|&s| overlaps(*p, s, r)) {
                return Err(ConfigError::LayoutBlocksStart { index });
            }
            if let Some(offset) = points[index + 1..].iter().position(|&q| overlaps(*p, q, r)) {
                return Err(ConfigError::LayoutOverlap {
                    first: index,
                    second: index + 1 + offset,
                });
            }
        }
        Ok(())
    }

    /// Where the control ball starts each game (x, z)
    pub fn control_home(&self) -> Vec2 {
        Vec2::new(
            0.0,
            self.field.region.z_min + self.pan_margin + self.ball_radius,
        )
    }

    /// Where a fresh active ball docks before the first launch (x, z)
    pub fn active_home(&self) -> Vec2 {
        self.control_home() + Vec2::new(0.0, 2.0 * self.ball_radius + CONTACT_SKIN)
    }

    /// Parse a JSON config on top of the preset its `mode` names
    ///
    /// Fields missing from the JSON keep the preset's values, so
    /// `{"mode": "Billiards"}` is the full Billiards game.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mode = match overrides.get("mode") {
            Some(mode) => GameMode::deserialize(mode)?,
            None => GameMode::default(),
        };

        let mut merged = serde_json::to_value(Self::for_mode(mode))?;
        merge_json(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }

    /// Read a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        log::info!(
            "Loaded {} config from {}",
            config.mode.as_str(),
            path.display()
        );
        Ok(config)
    }
}
