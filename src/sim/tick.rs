//! The fixed-rate simulation loop
//!
//! One tick runs to completion before the next begins; nothing inside a tick
//! waits on anything but the registry lock. The step order is fixed:
//!
//! 1. clear the frame
//! 2. drain input events
//! 3. aim both cannons
//! 4. move the cannons (player keys, opponent strategy, spawn assist)
//! 5. move targets, bombs and projectiles
//! 6. discard spent projectiles and exploded bombs
//! 7. resolve collisions
//! 8. start a new mission if the field and the player's ammo are both empty
//! 9. draw and present
//! 10. wait for the next tick boundary ([`Manager::run`] only)

use std::sync::mpsc::{self, Receiver};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cannon::{Cannon, Opponent, OpponentStrategy, TrackingStrategy};
use super::collision::{resolve_player_hits, resolve_target_hits};
use super::entity::Shape;
use super::registry::{SharedRegistry, SpawnParams, draw_targets, size_for_score};
use super::score::ScoreTable;
use super::spawner::{BombRequest, BombSpawner, Cadence, SpawnerState};
use crate::consts::CANNON_MARGIN;
use crate::platform::{FixedClock, InputEvent, InputSnapshot, InputSource, Key, MouseButton};
use crate::renderer::{Canvas, Color};
use crate::settings::{Settings, SettingsError};

/// Totals reported when [`Manager::run`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub missions: u32,
    pub score: ScoreTable,
}

/// Owns the whole simulation: cannons, targets, score and the bomb spawner
pub struct Manager {
    settings: Settings,
    field: Vec2,
    rng: Pcg32,
    player: Cannon,
    opponent: Opponent,
    registry: SharedRegistry,
    score: ScoreTable,
    spawner: BombSpawner,
    bomb_requests: Receiver<BombRequest>,
    done: bool,
    player_down_reported: bool,
    ticks: u64,
    missions: u32,
}

impl Manager {
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        Self::with_strategy(settings, Box::new(TrackingStrategy::default()))
    }

    /// Build a manager whose opponent moves by `strategy`. The spawner is
    /// created but not started until [`Manager::run`] or [`Manager::start_spawner`].
    ///
    /// Fails if `settings` do not pass [`Settings::validate`].
    pub fn with_strategy(
        settings: Settings,
        strategy: Box<dyn OpponentStrategy>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        log::info!("Simulation seed: {seed}");

        let field = settings.field_size();
        let player = Cannon::new(Vec2::new(CANNON_MARGIN, field.y / 2.0), Color::LIGHT_BLUE);
        let opponent = Opponent::new(Vec2::new(field.x - CANNON_MARGIN, field.y / 2.0), strategy);

        let registry = SharedRegistry::new();
        let (tx, rx) = mpsc::channel();
        let cadence = Cadence {
            wave: settings.spawner_wave_interval(),
            per_target: settings.spawner_target_interval(),
        };
        let spawner = BombSpawner::new(registry.clone(), tx, cadence, rng.random());

        Ok(Self {
            settings,
            field,
            rng,
            player,
            opponent,
            registry,
            score: ScoreTable::new(),
            spawner,
            bomb_requests: rx,
            done: false,
            player_down_reported: false,
            ticks: 0,
            missions: 0,
        })
    }

    pub fn start_spawner(&mut self) {
        self.spawner.start();
    }

    pub fn spawner_state(&self) -> SpawnerState {
        self.spawner.state()
    }

    /// Stop the spawner and wait for its thread
    pub fn shutdown(&mut self) {
        self.spawner.stop();
    }

    /// Tick until a quit event, pacing with `clock`
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        canvas: &mut dyn Canvas,
        clock: &mut FixedClock,
    ) -> RunSummary {
        self.start_spawner();
        log::info!("Running at {} ticks/s", self.settings.tick_rate);

        while !self.done {
            let snapshot = input.poll();
            self.tick(&snapshot, canvas);
            clock.wait();
        }

        self.shutdown();
        let summary = RunSummary {
            ticks: self.ticks,
            missions: self.missions,
            score: self.score,
        };
        log::info!(
            "Run finished after {} ticks, {} missions: destroyed {}, used {}, score {}",
            summary.ticks,
            summary.missions,
            summary.score.targets_destroyed,
            summary.score.projectiles_used,
            summary.score.score()
        );
        summary
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, input: &InputSnapshot, canvas: &mut dyn Canvas) {
        self.ticks += 1;

        canvas.clear(Color::BLACK);
        self.handle_events(input);
        self.handle_angles(input);
        self.handle_cannon_movement(input);
        self.handle_movement();
        self.handle_expired();
        self.handle_collisions();
        self.handle_new_missions();
        self.handle_drawing(canvas);
        canvas.present();
    }

    fn handle_events(&mut self, input: &InputSnapshot) {
        for event in &input.events {
            match event {
                InputEvent::Quit => self.done = true,
                InputEvent::MouseDown(MouseButton::Left) => self.player.activate(),
                InputEvent::MouseUp(MouseButton::Left) => {
                    self.player.fire();
                    self.score.record_shot();
                }
                InputEvent::MouseDown(_) | InputEvent::MouseUp(_) => {}
            }
        }
    }

    fn handle_angles(&mut self, input: &InputSnapshot) {
        if input.focused {
            self.player.set_angle(input.mouse);
        }
        self.opponent.aim_at(self.player.pos);
    }

    fn handle_cannon_movement(&mut self, input: &InputSnapshot) {
        let field = self.field;
        let player = &mut self.player;
        if input.pressed(Key::Left) || input.pressed(Key::A) {
            player.move_left(field);
        }
        if input.pressed(Key::Right) || input.pressed(Key::D) {
            player.move_right(field);
        }
        if input.pressed(Key::Up) || input.pressed(Key::W) {
            player.move_up(field);
        }
        if input.pressed(Key::Down) || input.pressed(Key::S) {
            player.move_down(field);
        }

        for (key, shape) in [
            (Key::Num1, Shape::Square),
            (Key::Num2, Shape::Circle),
            (Key::Num3, Shape::Triangle),
        ] {
            if input.pressed(key) {
                player.change_chosen(shape);
            }
        }
        player.gain();

        if self.opponent.determine_move(&self.player, field) {
            self.opponent.stop_firing();
        } else {
            self.opponent.start_firing();
        }
        self.opponent.update_fire();

        let score = self.score.score();
        let mut registry = self.registry.lock();
        self.opponent.determine_target_spawning(
            &mut self.rng,
            &mut registry,
            field,
            score,
            self.settings.assist_chance,
        );
    }

    fn handle_movement(&mut self) {
        let field = self.field;
        {
            let mut registry = self.registry.lock();
            registry.move_all(field);

            // Bombs requested by the spawner since the last tick; targets that
            // died in the meantime are skipped
            let (speed, drift) = (self.settings.bomb_speed, self.settings.bomb_drift);
            while let Ok(request) = self.bomb_requests.try_recv() {
                if !registry.drop_bomb(request.target, speed, drift) {
                    log::trace!("Skipped bomb for departed target #{}", request.target);
                }
            }
            registry.move_bombs(field);
        }

        self.player.projectiles.move_all();
        self.opponent.cannon.projectiles.move_all();
    }

    fn handle_expired(&mut self) {
        self.player.projectiles.remove_dead(self.field);
        self.opponent.cannon.projectiles.remove_dead(self.field);
        self.registry.lock().remove_exploded_bombs();
    }

    fn handle_collisions(&mut self) {
        let destroyed = {
            let mut registry = self.registry.lock();
            resolve_target_hits(&mut self.player.projectiles, &mut registry)
        };
        self.score.record_destroyed(destroyed.len());

        if resolve_player_hits(&mut self.opponent.cannon.projectiles, &mut self.player) > 0 {
            log::debug!("Player hit, health {}", self.player.health);
            if self.player.health == 0 && !self.player_down_reported {
                self.player_down_reported = true;
                log::warn!("Player cannon health reached zero; simulation continues");
            }
        }
    }

    fn handle_new_missions(&mut self) {
        let mut registry = self.registry.lock();
        if !(registry.is_empty() && self.player.projectiles.is_empty()) {
            return;
        }

        let score = self.score.score();
        for _ in 0..self.settings.num_targets {
            let size = size_for_score(&mut self.rng, score);
            registry.spawn_random(&mut self.rng, self.field, size, SpawnParams::default());
        }
        self.missions += 1;
        log::info!(
            "Mission {} started with {} targets (score {score})",
            self.missions,
            self.settings.num_targets
        );
    }

    fn handle_drawing(&self, canvas: &mut dyn Canvas) {
        // Draw from a copy so the spawner is never kept waiting on rendering
        let targets = self.registry.lock().snapshot();

        self.player.projectiles.draw_all(canvas);
        self.opponent.cannon.projectiles.draw_all(canvas);
        draw_targets(&targets, canvas);
        self.player.draw(canvas);
        self.opponent.cannon.draw(canvas);
        for target in &targets {
            target.bombs.draw_all(canvas);
        }
        self.score.draw(canvas);
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn missions(&self) -> u32 {
        self.missions
    }

    pub fn score(&self) -> &ScoreTable {
        &self.score
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn field(&self) -> Vec2 {
        self.field
    }

    pub fn player(&self) -> &Cannon {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Cannon {
        &mut self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn opponent_mut(&mut self) -> &mut Opponent {
        &mut self.opponent
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
