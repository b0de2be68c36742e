//! Cannons: the player's emplacement and the automated opponent
//!
//! Both own their projectiles. The player charges a shot while the mouse
//! button is held and releases it on button-up; the opponent tracks the
//! player and fires on a cooldown while it holds position.

use glam::Vec2;
use rand::Rng;

use super::entity::{Shape, TargetId};
use super::projectile::{Projectile, ProjectileRegistry};
use super::registry::{SpawnParams, TargetRegistry, size_for_score};
use crate::consts::*;
use crate::renderer::{Canvas, Color};
use crate::{angle_towards, direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn offset(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cannon {
    pub pos: Vec2,
    /// Barrel angle (radians, screen coordinates)
    pub angle: f32,
    pub color: Color,
    pub size: f32,
    pub health: u32,
    /// Ammunition shape fired next
    pub chosen: Shape,
    /// Shot power while the trigger is held
    charge: Option<f32>,
    pub projectiles: ProjectileRegistry,
}

impl Cannon {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos,
            angle: 0.0,
            color,
            size: CANNON_SIZE,
            health: CANNON_HEALTH,
            chosen: Shape::Circle,
            charge: None,
            projectiles: ProjectileRegistry::new(),
        }
    }

    /// Step in a direction, staying inside the field
    pub fn step(&mut self, dir: Direction, field: Vec2) {
        let pos = self.pos + dir.offset() * CANNON_STEP;
        self.pos = pos.clamp(Vec2::splat(self.size), field - self.size);
    }

    pub fn move_left(&mut self, field: Vec2) {
        self.step(Direction::Left, field);
    }

    pub fn move_right(&mut self, field: Vec2) {
        self.step(Direction::Right, field);
    }

    pub fn move_up(&mut self, field: Vec2) {
        self.step(Direction::Up, field);
    }

    pub fn move_down(&mut self, field: Vec2) {
        self.step(Direction::Down, field);
    }

    /// Point the barrel at `target`
    pub fn set_angle(&mut self, target: Vec2) {
        if target != self.pos {
            self.angle = angle_towards(self.pos, target);
        }
    }

    pub fn change_chosen(&mut self, shape: Shape) {
        self.chosen = shape;
    }

    /// Start charging a shot
    pub fn activate(&mut self) {
        self.charge.get_or_insert(MIN_POWER);
    }

    /// Build up power while charging
    pub fn gain(&mut self) {
        if let Some(power) = &mut self.charge {
            *power = (*power + POWER_GAIN).min(MAX_POWER);
        }
    }

    pub fn is_charging(&self) -> bool {
        self.charge.is_some()
    }

    pub fn power(&self) -> f32 {
        self.charge.unwrap_or(0.0)
    }

    /// Release the trigger. A release without a prior press fires at minimum power.
    pub fn fire(&mut self) {
        let power = self.charge.take().unwrap_or(MIN_POWER);
        self.fire_with_power(power);
    }

    pub fn fire_with_power(&mut self, power: f32) {
        let dir = direction(self.angle);
        let muzzle = self.pos + dir * self.size;
        self.projectiles.push(Projectile::new(
            muzzle,
            dir * power,
            self.chosen,
            self.color,
            PROJECTILE_SIZE,
        ));
    }

    /// Take one point of damage; returns true if that emptied the health bar
    pub fn deal_damage(&mut self) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(1);
        was_alive && self.health == 0
    }

    pub fn check_collision(&self, projectile: &Projectile) -> bool {
        super::collision::circles_touch(self.pos, self.size, projectile.pos, projectile.size)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw(self.pos.x, self.pos.y, Shape::Square, self.color, self.size);
        let muzzle = self.pos + direction(self.angle) * (self.size + self.power() * 0.5);
        canvas.draw(muzzle.x, muzzle.y, self.chosen, self.color, PROJECTILE_SIZE);
    }
}

/// Decides how the opponent moves each tick
pub trait OpponentStrategy: Send {
    /// `None` holds position
    fn decide(&mut self, me: &Cannon, player: &Cannon, field: Vec2) -> Option<Direction>;
}

/// Follows the player vertically, holding once roughly level
#[derive(Debug, Clone)]
pub struct TrackingStrategy {
    pub dead_zone: f32,
}

impl Default for TrackingStrategy {
    fn default() -> Self {
        Self { dead_zone: 40.0 }
    }
}

impl OpponentStrategy for TrackingStrategy {
    fn decide(&mut self, me: &Cannon, player: &Cannon, _field: Vec2) -> Option<Direction> {
        let dy = player.pos.y - me.pos.y;
        if dy > self.dead_zone {
            Some(Direction::Down)
        } else if dy < -self.dead_zone {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// The automated cannon
pub struct Opponent {
    pub cannon: Cannon,
    strategy: Box<dyn OpponentStrategy>,
    firing: bool,
    cooldown: u32,
}

impl Opponent {
    pub fn new(pos: Vec2, strategy: Box<dyn OpponentStrategy>) -> Self {
        let mut cannon = Cannon::new(pos, Color::RED);
        cannon.angle = std::f32::consts::PI;
        Self {
            cannon,
            strategy,
            firing: false,
            cooldown: 0,
        }
    }

    /// Aim at the player, lifting the barrel to make up for the shot's drop
    pub fn aim_at(&mut self, player: Vec2) {
        let flight_ticks = self.cannon.pos.distance(player) / OPPONENT_POWER;
        let drop = 0.5 * PROJECTILE_GRAVITY * flight_ticks * flight_ticks;
        self.cannon.set_angle(player - Vec2::new(0.0, drop));
    }

    /// Let the strategy move the cannon; returns true if it moved
    pub fn determine_move(&mut self, player: &Cannon, field: Vec2) -> bool {
        match self.strategy.decide(&self.cannon, player, field) {
            Some(dir) => {
                self.cannon.step(dir, field);
                true
            }
            None => false,
        }
    }

    /// Begin firing on the cooldown; a no-op while already firing
    pub fn start_firing(&mut self) {
        if !self.firing {
            self.firing = true;
            self.cooldown = OPPONENT_FIRE_COOLDOWN;
        }
    }

    pub fn stop_firing(&mut self) {
        self.firing = false;
    }

    /// Count down and fire when the cooldown elapses. Returns true on a shot.
    pub fn update_fire(&mut self) -> bool {
        if !self.firing {
            return false;
        }
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown > 0 {
            return false;
        }
        self.cooldown = OPPONENT_FIRE_COOLDOWN;
        self.cannon.fire_with_power(OPPONENT_POWER);
        true
    }

    /// With probability `chance`, spawn one extra target sized for `score`
    pub fn determine_target_spawning<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        registry: &mut TargetRegistry,
        field: Vec2,
        score: i64,
        chance: f64,
    ) -> Option<TargetId> {
        if !rng.random_bool(chance) {
            return None;
        }
        let size = size_for_score(rng, score);
        let id = registry.spawn_random(rng, field, size, SpawnParams::default());
        log::debug!("Opponent spawned assist target #{id}");
        Some(id)
    }
}
