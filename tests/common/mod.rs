#![allow(dead_code)]

//! Shared helpers for the integration tests.
//!
//! Every test runs headless: a `RecordingCanvas` stands in for the screen and
//! input is fed by hand.

use glam::Vec2;
use khiryanov_range::Settings;
use khiryanov_range::sim::{Cannon, Direction, Manager, OpponentStrategy};

/// An opponent that never moves
pub struct Idle;

impl OpponentStrategy for Idle {
    fn decide(&mut self, _me: &Cannon, _player: &Cannon, _field: Vec2) -> Option<Direction> {
        None
    }
}

/// Seeded settings with spawn assist turned off
pub fn quiet_settings() -> Settings {
    Settings {
        seed: Some(2024),
        assist_chance: 0.0,
        ..Default::default()
    }
}

pub fn manager_headless() -> Manager {
    Manager::with_strategy(quiet_settings(), Box::new(Idle)).expect("default settings are valid")
}
