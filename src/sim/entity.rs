//! Targets and the shared vocabulary of things on the field

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ordnance::BombRegistry;
use crate::renderer::{Canvas, Color};

/// Identity of a live target; never reused within a run
pub type TargetId = u32;

/// Shape of a target or projectile. Only matching shapes deal damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Square,
    Triangle,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Square, Shape::Triangle, Shape::Circle];
}

/// What the field may do with an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const DRAWABLE: Capabilities = Capabilities(1);
    pub const KILLABLE: Capabilities = Capabilities(1 << 1);
    pub const MOVEABLE: Capabilities = Capabilities(1 << 2);

    pub const fn empty() -> Self {
        Capabilities(0)
    }

    pub const fn union(self, other: Capabilities) -> Self {
        Capabilities(self.0 | other.0)
    }

    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        self.union(rhs)
    }
}

/// Static or moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Static,
    Moving { vel: Vec2 },
}

/// A target on the field
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: TargetId,
    pub pos: Vec2,
    /// Radius for circles, side length for squares and triangles
    pub size: f32,
    pub color: Color,
    pub health: u32,
    pub shape: Shape,
    pub motion: Motion,
    /// Bombs dropped by this target; discarded with it
    pub bombs: BombRegistry,
}

impl Entity {
    pub fn new(
        id: TargetId,
        pos: Vec2,
        size: f32,
        shape: Shape,
        motion: Motion,
        color: Color,
    ) -> Self {
        Self {
            id,
            pos,
            size,
            color,
            health: 1,
            shape,
            motion,
            bombs: BombRegistry::new(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let base = Capabilities::DRAWABLE | Capabilities::KILLABLE;
        match self.motion {
            Motion::Static => base,
            Motion::Moving { .. } => base | Capabilities::MOVEABLE,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving { .. })
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Take one point of damage; returns true if that killed the target
    pub fn take_hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Where this target's bombs are released
    pub fn bottom_anchor(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size)
    }

    /// Advance by velocity and bounce off the field edges.
    ///
    /// The horizontal and vertical checks are independent, so a corner hit
    /// flips both components in the same call. Static targets do not move.
    pub fn step(&mut self, field: Vec2) {
        let Motion::Moving { vel } = &mut self.motion else {
            return;
        };
        self.pos += *vel;

        if self.pos.x < self.size {
            self.pos.x = self.size;
            vel.x = -vel.x;
        } else if self.pos.x > field.x - self.size {
            self.pos.x = field.x - self.size;
            vel.x = -vel.x;
        }

        if self.pos.y < self.size {
            self.pos.y = self.size;
            vel.y = -vel.y;
        } else if self.pos.y > field.y - self.size {
            self.pos.y = field.y - self.size;
            vel.y = -vel.y;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw(self.pos.x, self.pos.y, self.shape, self.color, self.size);
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.motion {
            Motion::Static => write!(
                f,
                "Static {:?} #{} at ({}, {}), size {}, health {}",
                self.shape, self.id, self.pos.x, self.pos.y, self.size, self.health
            ),
            Motion::Moving { vel } => write!(
                f,
                "Moving {:?} #{} at ({}, {}), size {}, health {}, speed ({}, {})",
                self.shape, self.id, self.pos.x, self.pos.y, self.size, self.health, vel.x, vel.y
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn moving(pos: Vec2, vel: Vec2, size: f32) -> Entity {
        Entity::new(1, pos, size, Shape::Circle, Motion::Moving { vel }, Color::WHITE)
    }

    fn vel_of(e: &Entity) -> Vec2 {
        match e.motion {
            Motion::Moving { vel } => vel,
            Motion::Static => Vec2::ZERO,
        }
    }

    #[test]
    fn test_capabilities_follow_motion() {
        let still = Entity::new(
            1,
            Vec2::ONE * 50.0,
            10.0,
            Shape::Square,
            Motion::Static,
            Color::RED,
        );
        assert!(still.capabilities().contains(Capabilities::DRAWABLE | Capabilities::KILLABLE));
        assert!(!still.capabilities().contains(Capabilities::MOVEABLE));

        let mover = moving(Vec2::ONE * 50.0, Vec2::X, 10.0);
        assert!(mover.capabilities().contains(Capabilities::MOVEABLE));
    }

    #[test]
    fn test_static_target_never_moves() {
        let start = Vec2::new(5.0, 5.0);
        let mut e = Entity::new(1, start, 10.0, Shape::Square, Motion::Static, Color::RED);
        e.step(FIELD);
        assert_eq!(e.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_right_wall_bounce() {
        let mut e = moving(Vec2::new(789.0, 300.0), Vec2::new(2.0, 1.0), 10.0);
        e.step(FIELD);
        assert_eq!(e.pos.x, 790.0);
        assert_eq!(vel_of(&e), Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_corner_bounce_flips_both() {
        let mut e = moving(Vec2::new(11.0, 11.0), Vec2::new(-2.0, -2.0), 10.0);
        e.step(FIELD);
        assert_eq!(e.pos, Vec2::new(10.0, 10.0));
        assert_eq!(vel_of(&e), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_take_hit_saturates() {
        let mut e = moving(Vec2::ONE * 100.0, Vec2::ZERO, 10.0);
        assert!(e.take_hit());
        assert!(e.take_hit());
        assert_eq!(e.health, 0);
        assert!(!e.is_alive());
    }

    proptest! {
        #[test]
        fn prop_bounce_law(
            x in 10.0f32..790.0,
            y in 10.0f32..590.0,
            vx in -2i32..=2,
            vy in -2i32..=2,
        ) {
            let size = 10.0;
            let vel = Vec2::new(vx as f32, vy as f32);
            let mut e = moving(Vec2::new(x, y), vel, size);
            e.step(FIELD);
            let after = vel_of(&e);

            let nx = x + vel.x;
            let ny = y + vel.y;
            if nx < size || nx > FIELD.x - size {
                prop_assert_eq!(after.x, -vel.x);
                prop_assert!(e.pos.x == size || e.pos.x == FIELD.x - size);
            } else {
                prop_assert_eq!(after.x, vel.x);
                prop_assert_eq!(e.pos.x, nx);
            }
            if ny < size || ny > FIELD.y - size {
                prop_assert_eq!(after.y, -vel.y);
                prop_assert!(e.pos.y == size || e.pos.y == FIELD.y - size);
            } else {
                prop_assert_eq!(after.y, vel.y);
                prop_assert_eq!(e.pos.y, ny);
            }
            prop_assert!(e.pos.x >= size && e.pos.x <= FIELD.x - size);
            prop_assert!(e.pos.y >= size && e.pos.y <= FIELD.y - size);
        }
    }
}
