//! Drawing contract
//!
//! The simulation never rasterizes anything itself. Every frame it hands
//! shapes and the score line to a [`Canvas`]; the backend decides what that
//! means (a window, a log, or nothing at all in headless runs).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::Shape;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIGHT_BLUE: Color = Color::rgb(173, 216, 230);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A random color bright enough to read on the black background
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(64..=255),
            g: rng.random_range(64..=255),
            b: rng.random_range(64..=255),
        }
    }
}

/// Rendering backend consumed by the simulation
pub trait Canvas {
    /// Fill the whole frame with `color`
    fn clear(&mut self, color: Color);

    /// Draw one shape centered at (x, y)
    fn draw(&mut self, x: f32, y: f32, shape: Shape, color: Color, size: f32);

    /// Draw the score line
    fn draw_score(&mut self, destroyed: u32, used: u32, score: i64, fg: Color, bg: Color);

    /// Present the finished frame
    fn present(&mut self);
}

/// Discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullCanvas {
    pub frames: u64,
}

impl Canvas for NullCanvas {
    fn clear(&mut self, _color: Color) {}

    fn draw(&mut self, _x: f32, _y: f32, _shape: Shape, _color: Color, _size: f32) {}

    fn draw_score(&mut self, _destroyed: u32, _used: u32, _score: i64, _fg: Color, _bg: Color) {}

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// One recorded shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub x: f32,
    pub y: f32,
    pub shape: Shape,
    pub color: Color,
    pub size: f32,
}

/// Keeps the last presented frame around for inspection
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pending: Vec<DrawCall>,
    pending_score: Option<(u32, u32, i64)>,
    /// Shapes of the last presented frame
    pub last_frame: Vec<DrawCall>,
    /// Score line of the last presented frame
    pub last_score: Option<(u32, u32, i64)>,
    pub frames: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes of the given kind in the last frame
    pub fn count(&self, shape: Shape) -> usize {
        self.last_frame.iter().filter(|c| c.shape == shape).count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, _color: Color) {
        self.pending.clear();
        self.pending_score = None;
    }

    fn draw(&mut self, x: f32, y: f32, shape: Shape, color: Color, size: f32) {
        self.pending.push(DrawCall {
            x,
            y,
            shape,
            color,
            size,
        });
    }

    fn draw_score(&mut self, destroyed: u32, used: u32, score: i64, _fg: Color, _bg: Color) {
        self.pending_score = Some((destroyed, used, score));
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.last_score = self.pending_score.take();
        self.frames += 1;
    }
}
