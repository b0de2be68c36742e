//! Input polling
//!
//! The tick loop polls an [`InputSource`] exactly once per tick and gets a
//! snapshot: which keys are held, where the mouse is, and the discrete events
//! queued since the last poll.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{SharedRegistry, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    Num1,
    Num2,
    Num3,
}

impl Key {
    /// Key that selects ammunition of the given shape
    pub fn for_shape(shape: Shape) -> Key {
        match shape {
            Shape::Square => Key::Num1,
            Shape::Circle => Key::Num2,
            Shape::Triangle => Key::Num3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    MouseDown(MouseButton),
    MouseUp(MouseButton),
}

/// Everything the tick loop learns about input in one poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys: HashSet<Key>,
    pub mouse: Vec2,
    /// Whether the window has mouse focus; the cursor is ignored otherwise
    pub focused: bool,
    pub events: Vec<InputEvent>,
}

impl InputSnapshot {
    pub fn pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn quit() -> Self {
        Self {
            events: vec![InputEvent::Quit],
            ..Default::default()
        }
    }
}

pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

/// Replays a fixed list of snapshots, then asks to quit
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: InputSnapshot) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        self.frames.pop_front().unwrap_or_else(InputSnapshot::quit)
    }
}

/// Headless autopilot: picks a live target, selects matching ammunition,
/// aims a little above it, holds the trigger for a few ticks and lets go.
/// Quits after `max_ticks`.
pub struct DemoInput {
    registry: SharedRegistry,
    rng: Pcg32,
    tick: u64,
    max_ticks: u64,
    aim: Option<(Vec2, Shape)>,
    hold_ticks: u32,
    holding: bool,
}

impl DemoInput {
    pub fn new(registry: SharedRegistry, max_ticks: u64, seed: u64) -> Self {
        Self {
            registry,
            rng: Pcg32::seed_from_u64(seed),
            tick: 0,
            max_ticks,
            aim: None,
            hold_ticks: 0,
            holding: false,
        }
    }

    fn pick_target(&mut self) -> Option<(Vec2, Shape)> {
        let targets: Vec<(Vec2, Shape)> = {
            let reg = self.registry.lock();
            reg.iter().map(|t| (t.pos, t.shape)).collect()
        };
        if targets.is_empty() {
            return None;
        }
        let (pos, shape) = targets[self.rng.random_range(0..targets.len())];
        Some((pos - Vec2::new(0.0, 40.0), shape))
    }
}

impl InputSource for DemoInput {
    fn poll(&mut self) -> InputSnapshot {
        self.tick += 1;
        if self.tick >= self.max_ticks {
            return InputSnapshot::quit();
        }

        let mut snapshot = InputSnapshot {
            focused: true,
            ..Default::default()
        };

        if self.holding {
            self.hold_ticks = self.hold_ticks.saturating_sub(1);
            if self.hold_ticks == 0 {
                self.holding = false;
                snapshot.events.push(InputEvent::MouseUp(MouseButton::Left));
            }
        } else if self.tick % 10 == 0 {
            self.aim = self.pick_target();
            if let Some((_, shape)) = self.aim {
                snapshot.keys.insert(Key::for_shape(shape));
                snapshot.events.push(InputEvent::MouseDown(MouseButton::Left));
                self.holding = true;
                self.hold_ticks = self.rng.random_range(2..=6);
            }
        }

        if let Some((point, _)) = self.aim {
            snapshot.mouse = point;
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SpawnParams;

    #[test]
    fn test_scripted_input_quits_when_exhausted() {
        let mut input = ScriptedInput::new([InputSnapshot::default()]);
        assert_eq!(input.poll(), InputSnapshot::default());
        assert_eq!(input.poll().events, vec![InputEvent::Quit]);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_demo_input_presses_and_releases() {
        let registry = SharedRegistry::new();
        {
            let mut rng = Pcg32::seed_from_u64(1);
            registry
                .lock()
                .spawn_random(&mut rng, Vec2::new(800.0, 600.0), 20.0, SpawnParams::default());
        }

        let mut input = DemoInput::new(registry, 100, 5);
        let mut downs = 0;
        let mut ups = 0;
        let mut quit = false;
        for _ in 0..100 {
            let snap = input.poll();
            for event in &snap.events {
                match event {
                    InputEvent::MouseDown(_) => downs += 1,
                    InputEvent::MouseUp(_) => ups += 1,
                    InputEvent::Quit => quit = true,
                }
            }
        }
        assert!(quit);
        assert!(downs > 0);
        assert!(downs - ups <= 1);
    }
}
