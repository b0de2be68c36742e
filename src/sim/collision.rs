//! Projectile collision resolution
//!
//! The geometry is plain circle overlap. Resolution is pairwise over every
//! live projectile and every live target, O(P×T) per tick.

use std::collections::HashSet;

use glam::Vec2;

use super::cannon::Cannon;
use super::entity::{Entity, TargetId};
use super::projectile::{Projectile, ProjectileRegistry};
use super::registry::TargetRegistry;

/// True iff the two circles overlap or touch
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) <= ra + rb
}

/// Geometric hit test between a projectile and a target; ignores shape
#[inline]
pub fn hits(projectile: &Projectile, target: &Entity) -> bool {
    circles_touch(target.pos, target.size, projectile.pos, projectile.size)
}

/// Apply player fire to the targets.
///
/// A projectile damages the first live target it touches that shares its
/// shape, and is spent doing so. Each target takes at most one hit per call.
/// Targets whose health runs out are removed on the spot. Returns the ids of
/// the destroyed targets.
pub fn resolve_target_hits(
    projectiles: &mut ProjectileRegistry,
    targets: &mut TargetRegistry,
) -> Vec<TargetId> {
    let mut struck: HashSet<TargetId> = HashSet::new();
    let mut destroyed = Vec::new();

    for projectile in projectiles.iter_mut().filter(|p| p.is_alive()) {
        let Some(id) = targets
            .iter()
            .find(|t| !struck.contains(&t.id) && t.shape == projectile.shape && hits(projectile, t))
            .map(|t| t.id)
        else {
            continue;
        };

        struck.insert(id);
        projectile.consume();

        let killed = targets.get_mut(id).is_some_and(|t| t.take_hit());
        if killed && targets.remove(id).is_some() {
            log::debug!("Target #{id} destroyed");
            destroyed.push(id);
        }
    }

    destroyed
}

/// Apply opponent fire to the player. Each touching projectile deals one
/// point of damage and is spent. Returns the number of hits.
pub fn resolve_player_hits(projectiles: &mut ProjectileRegistry, player: &mut Cannon) -> u32 {
    let mut hit_count = 0;
    for projectile in projectiles.iter_mut().filter(|p| p.is_alive()) {
        if player.check_collision(projectile) {
            projectile.consume();
            player.deal_damage();
            hit_count += 1;
        }
    }
    hit_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;
    use crate::sim::entity::{Motion, Shape};
    use crate::sim::registry::SpawnParams;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn shot(x: f32, y: f32, shape: Shape) -> Projectile {
        Projectile::new(Vec2::new(x, y), Vec2::ZERO, shape, Color::WHITE, 5.0)
    }

    fn static_target(reg: &mut TargetRegistry, x: f32, y: f32, shape: Shape) -> TargetId {
        let mut rng = Pcg32::seed_from_u64(0);
        reg.spawn_random(
            &mut rng,
            FIELD,
            20.0,
            SpawnParams {
                moving: Some(false),
                shape: Some(shape),
                ..SpawnParams::at(x, y)
            },
        )
    }

    fn still_circle(pos: Vec2, size: f32) -> Entity {
        Entity::new(1, pos, size, Shape::Circle, Motion::Static, Color::RED)
    }

    #[test]
    fn test_hits_boundary_is_inclusive() {
        let target = still_circle(Vec2::new(400.0, 300.0), 20.0);
        assert!(hits(&shot(425.0, 300.0, Shape::Circle), &target));
        assert!(!hits(&shot(425.5, 300.0, Shape::Circle), &target));
        assert!(hits(&shot(415.0, 320.0, Shape::Circle), &target));
    }

    #[test]
    fn test_shape_mismatch_does_no_damage() {
        let mut reg = TargetRegistry::new();
        let id = static_target(&mut reg, 400.0, 300.0, Shape::Square);
        let mut shots = ProjectileRegistry::new();
        shots.push(shot(400.0, 300.0, Shape::Circle));

        assert!(resolve_target_hits(&mut shots, &mut reg).is_empty());
        assert!(reg.contains(id));
        assert!(shots.iter().all(|p| p.is_alive()));
    }

    #[test]
    fn test_target_matched_once_per_tick() {
        let mut reg = TargetRegistry::new();
        let id = static_target(&mut reg, 400.0, 300.0, Shape::Circle);
        reg.get_mut(id).unwrap().health = 2;

        let mut shots = ProjectileRegistry::new();
        shots.push(shot(400.0, 300.0, Shape::Circle));
        shots.push(shot(401.0, 300.0, Shape::Circle));

        assert!(resolve_target_hits(&mut shots, &mut reg).is_empty());
        assert_eq!(reg.get(id).unwrap().health, 1);
        // Only the first shot was spent
        assert_eq!(shots.iter().filter(|p| p.is_alive()).count(), 1);

        // Next tick the surviving shot finishes it
        assert_eq!(resolve_target_hits(&mut shots, &mut reg), vec![id]);
        assert!(!reg.contains(id));
    }

    #[test]
    fn test_one_projectile_kills_at_most_one_target() {
        let mut reg = TargetRegistry::new();
        let a = static_target(&mut reg, 400.0, 300.0, Shape::Circle);
        let b = static_target(&mut reg, 410.0, 300.0, Shape::Circle);
        let mut shots = ProjectileRegistry::new();
        shots.push(shot(405.0, 300.0, Shape::Circle));

        let destroyed = resolve_target_hits(&mut shots, &mut reg);
        assert_eq!(destroyed.len(), 1);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(a) ^ reg.contains(b));
    }

    #[test]
    fn test_player_hit_consumes_projectile() {
        let mut player = Cannon::new(Vec2::new(30.0, 300.0), Color::LIGHT_BLUE);
        let before = player.health;
        let mut shots = ProjectileRegistry::new();
        shots.push(shot(35.0, 300.0, Shape::Circle));
        shots.push(shot(300.0, 300.0, Shape::Circle));

        assert_eq!(resolve_player_hits(&mut shots, &mut player), 1);
        assert_eq!(player.health, before - 1);
        // A spent projectile cannot hit again
        assert_eq!(resolve_player_hits(&mut shots, &mut player), 0);
    }

    proptest! {
        #[test]
        fn prop_hits_matches_distance(
            tx in 0.0f32..800.0, ty in 0.0f32..600.0,
            px in 0.0f32..800.0, py in 0.0f32..600.0,
            size in 10.0f32..30.0,
        ) {
            let target = still_circle(Vec2::new(tx, ty), size);
            let p = shot(px, py, Shape::Circle);
            let dist = Vec2::new(tx, ty).distance(Vec2::new(px, py));
            prop_assert_eq!(hits(&p, &target), dist <= size + 5.0);
            prop_assert_eq!(
                circles_touch(target.pos, size, p.pos, 5.0),
                circles_touch(p.pos, 5.0, target.pos, size)
            );
        }
    }
}
