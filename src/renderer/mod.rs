//! Render collaborator
//!
//! The simulation never draws. Each frame the driver hands the world to
//! `render_world`, which walks the live entities and HUD text and forwards
//! them to whatever `Renderer` the host provides.

pub mod log_renderer;

pub use log_renderer::LogRenderer;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::ball::BallColor;
use crate::sim::state::{GamePhase, GameWorld};

/// Polygon fill mode for the whole scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Solid,
    Wireframe,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Solid => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Solid,
        }
    }
}

/// Screen-space text box in normalized coordinates (0..1, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Top-left corner: lives and score
pub const STATUS_RECT: TextRect = TextRect::new(0.02, 0.02, 0.3, 0.1);
/// Top-right corner: current level
pub const LEVEL_RECT: TextRect = TextRect::new(0.8, 0.02, 0.18, 0.05);
/// Screen center: prompts and end-of-game messages
pub const BANNER_RECT: TextRect = TextRect::new(0.25, 0.45, 0.5, 0.1);

/// Drawing backend driven once per frame
pub trait Renderer {
    /// Acquire whatever the backend needs; failure is fatal before the first tick
    fn setup(&mut self) -> Result<(), SimError> {
        Ok(())
    }

    fn begin_frame(&mut self, mode: RenderMode);

    /// Unit sphere scaled by the pose
    fn draw_sphere(&mut self, pose: Mat4, color: BallColor);

    /// Box of `size` centered at the pose
    fn draw_box(&mut self, pose: Mat4, size: Vec3);

    fn draw_text(&mut self, rect: TextRect, text: &str);

    fn end_frame(&mut self);
}

/// HUD lines for the current state, paired with where they go
pub fn hud_text(world: &GameWorld) -> Vec<(TextRect, String)> {
    let state = &world.state;
    let mut lines = vec![
        (
            STATUS_RECT,
            format!("Life : {}\nScore : {}", state.lives, state.score),
        ),
        (LEVEL_RECT, format!("Level: {}", state.level)),
    ];

    match state.phase {
        GamePhase::Playing if !state.launched => {
            lines.push((BANNER_RECT, "Press Space to Start".to_string()));
        }
        GamePhase::Playing => {}
        GamePhase::Won => {
            lines.push((BANNER_RECT, "YOU WIN! Press ESC to quit game".to_string()));
        }
        GamePhase::Lost => {
            lines.push((BANNER_RECT, "Defeated. Press ESC to quit game".to_string()));
        }
    }

    lines
}

/// Draw one frame of the world
pub fn render_world<R: Renderer + ?Sized>(world: &GameWorld, renderer: &mut R) {
    renderer.begin_frame(world.render_mode);

    for wall in &world.walls {
        renderer.draw_box(wall.local_transform(), wall.size());
    }

    let balls = [&world.control, &world.active, &world.bonus]
        .into_iter()
        .chain(world.targets.iter());
    for ball in balls.filter(|b| b.is_live()) {
        let pose = ball.local_transform() * Mat4::from_scale(Vec3::splat(ball.radius()));
        renderer.draw_sphere(pose, ball.color);
    }

    for (rect, text) in hud_text(world) {
        renderer.draw_text(rect, &text);
    }

    renderer.end_frame();
}
