//! Projectiles and the per-cannon projectile registry

use glam::Vec2;

use super::entity::Shape;
use crate::consts::PROJECTILE_GRAVITY;
use crate::renderer::{Canvas, Color};

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    pub health: u32,
    pub shape: Shape,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, shape: Shape, color: Color, size: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            size,
            health: 1,
            shape,
        }
    }

    /// Spend the projectile (on a hit)
    pub fn consume(&mut self) {
        self.health = 0;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Left through the sides or the bottom; the top is open since gravity
    /// brings lobbed shots back
    pub fn left_field(&self, field: Vec2) -> bool {
        self.pos.x < -self.size
            || self.pos.x > field.x + self.size
            || self.pos.y > field.y + self.size
    }

    fn step(&mut self) {
        self.vel.y += PROJECTILE_GRAVITY;
        self.pos += self.vel;
    }
}

/// Projectiles fired by one cannon
#[derive(Debug, Clone, Default)]
pub struct ProjectileRegistry {
    projectiles: Vec<Projectile>,
}

impl ProjectileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn move_all(&mut self) {
        for p in &mut self.projectiles {
            p.step();
        }
    }

    /// Drop spent projectiles and those that left `field`
    pub fn remove_dead(&mut self, field: Vec2) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.is_alive() && !p.left_field(field));
        before - self.projectiles.len()
    }

    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        for p in &self.projectiles {
            canvas.draw(p.pos.x, p.pos.y, p.shape, p.color, p.size);
        }
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.projectiles.iter_mut()
    }
}
