//! Headless renderer that traces draw calls through `log`

use glam::{Mat4, Vec3};

use super::{RenderMode, Renderer, TextRect};
use crate::sim::ball::BallColor;

/// Counts and traces everything it is asked to draw
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames: u64,
    /// Draw calls issued during the last completed frame
    pub last_frame_draws: usize,
    draws: usize,
    /// HUD text of the last completed frame
    pub last_text: Vec<String>,
    pending_text: Vec<String>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn setup(&mut self) -> Result<(), crate::error::SimError> {
        log::debug!("Headless renderer ready");
        Ok(())
    }

    fn begin_frame(&mut self, mode: RenderMode) {
        self.draws = 0;
        self.pending_text.clear();
        log::trace!("frame {} begin ({:?})", self.frames, mode);
    }

    fn draw_sphere(&mut self, pose: Mat4, color: BallColor) {
        self.draws += 1;
        log::trace!("sphere {:?} at {:?}", color, pose.w_axis.truncate());
    }

    fn draw_box(&mut self, pose: Mat4, size: Vec3) {
        self.draws += 1;
        log::trace!("box {:?} at {:?}", size, pose.w_axis.truncate());
    }

    fn draw_text(&mut self, rect: TextRect, text: &str) {
        self.draws += 1;
        self.pending_text.push(text.to_string());
        log::trace!("text at ({:.2}, {:.2}): {:?}", rect.x, rect.y, text);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.last_frame_draws = self.draws;
        self.last_text = std::mem::take(&mut self.pending_text);
    }
}
