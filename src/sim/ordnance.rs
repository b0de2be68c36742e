//! Falling bombs dropped by targets

use glam::Vec2;

use super::entity::Shape;
use crate::consts::BOMB_SIZE;
use crate::renderer::{Canvas, Color};

#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    pub pos: Vec2,
    /// Fall speed (pixels per tick)
    pub speed: f32,
    /// Horizontal drift (pixels per tick)
    pub drift: f32,
    pub exploded: bool,
}

impl Bomb {
    /// Fall one tick; a bomb that leaves the bottom of the field explodes
    fn step(&mut self, field: Vec2) {
        self.pos.x += self.drift;
        self.pos.y += self.speed;
        if self.pos.y - BOMB_SIZE > field.y {
            self.exploded = true;
        }
    }
}

/// Bombs owned by a single target
#[derive(Debug, Clone, Default)]
pub struct BombRegistry {
    bombs: Vec<Bomb>,
}

impl BombRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, x: f32, y: f32, speed: f32, drift: f32) {
        self.bombs.push(Bomb {
            pos: Vec2::new(x, y),
            speed,
            drift,
            exploded: false,
        });
    }

    pub fn move_all(&mut self, field: Vec2) {
        for bomb in &mut self.bombs {
            bomb.step(field);
        }
    }

    /// Drop exploded bombs, returning how many were removed
    pub fn remove_exploded(&mut self) -> usize {
        let before = self.bombs.len();
        self.bombs.retain(|b| !b.exploded);
        before - self.bombs.len()
    }

    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        for bomb in &self.bombs {
            canvas.draw(bomb.pos.x, bomb.pos.y, Shape::Circle, Color::GRAY, BOMB_SIZE);
        }
    }

    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bomb_falls_and_drifts() {
        let mut reg = BombRegistry::new();
        reg.create(100.0, 50.0, 5.0, 0.8);
        reg.move_all(Vec2::new(800.0, 600.0));

        let bomb = reg.iter().next().unwrap();
        assert!((bomb.pos.x - 100.8).abs() < 1e-4);
        assert_eq!(bomb.pos.y, 55.0);
        assert!(!bomb.exploded);
    }

    #[test]
    fn test_bomb_explodes_below_field() {
        let field = Vec2::new(800.0, 600.0);
        let mut reg = BombRegistry::new();
        reg.create(100.0, 598.0, 5.0, 0.0);
        reg.create(100.0, 10.0, 5.0, 0.0);

        reg.move_all(field);
        assert_eq!(reg.remove_exploded(), 0);

        reg.move_all(field);
        assert_eq!(reg.remove_exploded(), 1);
        assert_eq!(reg.len(), 1);
    }
}
