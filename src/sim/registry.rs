//! The live-target registry
//!
//! Owns every target on the field. The tick loop inserts (missions, spawn
//! assist) and removes (collisions); the bomb spawner only ever takes a
//! snapshot of the live ids. Both go through [`SharedRegistry`], so each of
//! those accesses is a single critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, Motion, Shape, TargetId};
use crate::consts::{MAX_TARGET_SIZE, MAX_TARGET_SPEED, MIN_TARGET_SIZE};
use crate::renderer::{Canvas, Color};

/// Overrides for [`TargetRegistry::spawn_random`]; `None` means "pick at random"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnParams {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub moving: Option<bool>,
    pub shape: Option<Shape>,
    pub velocity: Option<Vec2>,
}

impl SpawnParams {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
}

/// Upper bound of the target size distribution for a score
///
/// The bound saturates at [`MAX_TARGET_SIZE`] for every score, which keeps the
/// expected size flat rather than rising.
pub fn size_upper_bound(score: i64) -> f64 {
    let score = score.max(0) as f64;
    let weight = 1.0 / (score + 1.0);
    (MAX_TARGET_SIZE as f64).min(MAX_TARGET_SIZE as f64 + weight * 20.0)
}

/// Random target size for the current score, always within
/// [`MIN_TARGET_SIZE`, `MAX_TARGET_SIZE`]
pub fn size_for_score<R: Rng + ?Sized>(rng: &mut R, score: i64) -> f32 {
    let upper = size_upper_bound(score);
    rng.random_range(MIN_TARGET_SIZE as f64..upper).floor() as f32
}

#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<Entity>,
    next_id: TargetId,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            next_id: 1,
        }
    }

    fn next_target_id(&mut self) -> TargetId {
        // Default-constructed registries start at 0; skip it so ids stay non-zero
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a fully initialized target and add it to the live set.
    ///
    /// Unset parameters are resolved at random: the position lands at least
    /// `target_size` from every edge, motion is a coin flip, and the shape is
    /// picked after the static/moving family. Explicit values are honored but
    /// clamped into the field, so the spawn can never be out of bounds.
    pub fn spawn_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        field: Vec2,
        target_size: f32,
        params: SpawnParams,
    ) -> TargetId {
        let size = target_size.max(1.0).min(field.min_element() / 2.0);
        let (lo, hi) = (Vec2::splat(size), field - size);

        let moving = params.moving.unwrap_or_else(|| rng.random_bool(0.5));
        let shape = params
            .shape
            .unwrap_or_else(|| Shape::ALL[rng.random_range(0..Shape::ALL.len())]);

        let x = match params.x {
            Some(x) => x.clamp(lo.x, hi.x),
            None => rng.random_range(lo.x..=hi.x),
        };
        let y = match params.y {
            Some(y) => y.clamp(lo.y, hi.y),
            None => rng.random_range(lo.y..=hi.y),
        };

        let motion = if moving {
            let vel = params.velocity.unwrap_or_else(|| {
                Vec2::new(
                    rng.random_range(-MAX_TARGET_SPEED..=MAX_TARGET_SPEED) as f32,
                    rng.random_range(-MAX_TARGET_SPEED..=MAX_TARGET_SPEED) as f32,
                )
            });
            Motion::Moving { vel }
        } else {
            Motion::Static
        };

        let id = self.next_target_id();
        let entity = Entity::new(id, Vec2::new(x, y), size, shape, motion, Color::random(rng));
        log::debug!("Spawned {entity}");
        self.targets.push(entity);
        id
    }

    /// Remove a target. Removing one that is already gone is a no-op.
    pub fn remove(&mut self, id: TargetId) -> Option<Entity> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.swap_remove(index))
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: TargetId) -> Option<&Entity> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Entity> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Ids of every live target, taken in one pass
    pub fn ids(&self) -> Vec<TargetId> {
        self.targets.iter().map(|t| t.id).collect()
    }

    /// Move every moving target and bounce it off the field edges
    pub fn move_all(&mut self, field: Vec2) {
        for target in self.targets.iter_mut().filter(|t| t.is_moving()) {
            target.step(field);
        }
    }

    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        draw_targets(&self.targets, canvas);
    }

    /// Release a bomb from the bottom edge of a live target.
    /// Returns false if the target is gone.
    pub fn drop_bomb(&mut self, id: TargetId, speed: f32, drift: f32) -> bool {
        match self.get_mut(id) {
            Some(target) => {
                let anchor = target.bottom_anchor();
                target.bombs.create(anchor.x, anchor.y, speed, drift);
                true
            }
            None => false,
        }
    }

    pub fn move_bombs(&mut self, field: Vec2) {
        for target in &mut self.targets {
            target.bombs.move_all(field);
        }
    }

    pub fn remove_exploded_bombs(&mut self) -> usize {
        self.targets
            .iter_mut()
            .map(|t| t.bombs.remove_exploded())
            .sum()
    }

    pub fn bomb_count(&self) -> usize {
        self.targets.iter().map(|t| t.bombs.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.targets.iter()
    }

    /// Copy of the live targets, for work that must not hold the lock
    pub fn snapshot(&self) -> Vec<Entity> {
        self.targets.clone()
    }
}

/// Draw a set of targets, live or snapshotted
pub fn draw_targets(targets: &[Entity], canvas: &mut dyn Canvas) {
    for target in targets {
        target.draw(canvas);
    }
}

/// The registry as shared between the tick loop and the bomb spawner
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry(Arc<Mutex<TargetRegistry>>);

impl SharedRegistry {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(TargetRegistry::new())))
    }

    /// Lock the registry. A panic while holding the lock cannot leave a
    /// half-inserted target behind, so a poisoned lock is still usable.
    pub fn lock(&self) -> MutexGuard<'_, TargetRegistry> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn live_ids(&self) -> Vec<TargetId> {
        self.lock().ids()
    }
}
