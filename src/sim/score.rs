//! Score bookkeeping

use crate::renderer::{Canvas, Color};

/// Targets destroyed and projectiles fired. The score itself is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTable {
    pub targets_destroyed: u32,
    pub projectiles_used: u32,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroyed minus used; negative while shots outnumber kills
    pub fn score(&self) -> i64 {
        self.targets_destroyed as i64 - self.projectiles_used as i64
    }

    pub fn record_destroyed(&mut self, count: usize) {
        self.targets_destroyed = self.targets_destroyed.saturating_add(count as u32);
    }

    pub fn record_shot(&mut self) {
        self.projectiles_used = self.projectiles_used.saturating_add(1);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_score(
            self.targets_destroyed,
            self.projectiles_used,
            self.score(),
            Color::RED,
            Color::WHITE,
        );
    }
}
