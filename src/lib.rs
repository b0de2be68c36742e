//! Khiryanov Range - a concurrent arcade shooting range
//!
//! Core modules:
//! - `sim`: Entity simulation (targets, cannons, collisions, bomb spawner, tick loop)
//! - `renderer`: Abstract drawing contract consumed by the simulation
//! - `platform`: Input polling and fixed-rate tick pacing
//! - `settings`: Runtime parameters loaded from JSON

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 15;

    /// Targets spawned per mission
    pub const NUM_TARGETS: usize = 10;

    /// Bomb spawner cadence
    pub const SPAWNER_WAVE_MS: u64 = 500;
    pub const SPAWNER_TARGET_MS: u64 = 100;

    /// Bomb defaults (pixels per tick)
    pub const BOMB_SPEED: f32 = 5.0;
    pub const BOMB_DRIFT: f32 = 0.8;
    pub const BOMB_SIZE: f32 = 4.0;

    /// Target size bounds
    pub const MIN_TARGET_SIZE: f32 = 10.0;
    pub const MAX_TARGET_SIZE: f32 = 30.0;
    /// Moving targets spawn with each velocity component in [-MAX, MAX]
    pub const MAX_TARGET_SPEED: i32 = 2;

    /// Cannon defaults
    pub const CANNON_SIZE: f32 = 15.0;
    pub const CANNON_HEALTH: u32 = 10;
    pub const CANNON_STEP: f32 = 5.0;
    /// Distance from the side edge at which cannons start
    pub const CANNON_MARGIN: f32 = 30.0;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 5.0;
    pub const PROJECTILE_GRAVITY: f32 = 0.5;
    pub const MIN_POWER: f32 = 10.0;
    pub const MAX_POWER: f32 = 40.0;
    pub const POWER_GAIN: f32 = 1.5;

    /// Opponent behaviour
    pub const OPPONENT_FIRE_COOLDOWN: u32 = 20;
    pub const OPPONENT_POWER: f32 = 25.0;
    pub const ASSIST_CHANCE: f64 = 0.05;
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
