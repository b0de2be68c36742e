//! Entity simulation
//!
//! Everything that happens on the field lives here:
//! - Targets and their registry (spawn rules, movement, bounce)
//! - Cannons and their projectiles
//! - Collision resolution and scoring
//! - The bomb spawner thread, which shares the registry with the tick loop
//!
//! Nothing in this module draws or reads devices directly; it talks to a
//! [`crate::renderer::Canvas`] and consumes [`crate::platform::InputSnapshot`]s.

pub mod cannon;
pub mod collision;
pub mod entity;
pub mod ordnance;
pub mod projectile;
pub mod registry;
pub mod score;
pub mod spawner;
pub mod tick;

pub use cannon::{Cannon, Direction, Opponent, OpponentStrategy, TrackingStrategy};
pub use collision::{circles_touch, hits, resolve_player_hits, resolve_target_hits};
pub use entity::{Capabilities, Entity, Motion, Shape, TargetId};
pub use ordnance::{Bomb, BombRegistry};
pub use projectile::{Projectile, ProjectileRegistry};
pub use registry::{
    SharedRegistry, SpawnParams, TargetRegistry, draw_targets, size_for_score, size_upper_bound,
};
pub use score::ScoreTable;
pub use spawner::{BombRequest, BombSpawner, Cadence, SpawnerState};
pub use tick::{Manager, RunSummary};
