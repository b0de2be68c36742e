//! Background bomb spawner
//!
//! Runs on its own thread with its own cadence, independent of ticks. Every
//! wave interval it snapshots the live target ids (holding the registry lock
//! only for that copy), shuffles them, and walks the list with a short pause
//! between targets, asking for one bomb per target.
//!
//! Bombs are not created here. Each request travels over a channel and the
//! tick loop attaches it, skipping targets that died in the meantime. The
//! spawner therefore never touches an entity, only the id list.
//!
//! Stopping is cooperative: the running flag is checked before every wave and
//! before every request, never in the middle of a sleep.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::entity::TargetId;
use super::registry::SharedRegistry;

/// Lifecycle of the spawner thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerState {
    Unstarted,
    Running,
    Stopped,
}

/// Spawner timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    /// Pause before each wave
    pub wave: Duration,
    /// Pause before each target within a wave
    pub per_target: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            wave: Duration::from_millis(crate::consts::SPAWNER_WAVE_MS),
            per_target: Duration::from_millis(crate::consts::SPAWNER_TARGET_MS),
        }
    }
}

/// Ask the tick loop to drop a bomb from `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombRequest {
    pub target: TargetId,
}

pub struct BombSpawner {
    state: SpawnerState,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    registry: SharedRegistry,
    requests: Sender<BombRequest>,
    cadence: Cadence,
    seed: u64,
    generation: u64,
}

impl BombSpawner {
    pub fn new(
        registry: SharedRegistry,
        requests: Sender<BombRequest>,
        cadence: Cadence,
        seed: u64,
    ) -> Self {
        Self {
            state: SpawnerState::Unstarted,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            registry,
            requests,
            cadence,
            seed,
            generation: 0,
        }
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    /// Launch the spawner thread. A no-op while already running; a stopped
    /// spawner may be started again.
    pub fn start(&mut self) {
        if self.state == SpawnerState::Running {
            return;
        }

        self.generation += 1;
        let running = Arc::new(AtomicBool::new(true));
        let worker = Worker {
            running: Arc::clone(&running),
            registry: self.registry.clone(),
            requests: self.requests.clone(),
            cadence: self.cadence,
            rng: Pcg32::seed_from_u64(self.seed.wrapping_add(self.generation)),
        };

        match thread::Builder::new()
            .name("bomb-spawner".into())
            .spawn(move || worker.run())
        {
            Ok(handle) => {
                self.running = running;
                self.handle = Some(handle);
                self.state = SpawnerState::Running;
                log::info!(
                    "Bomb spawner started (wave every {:?}, {:?} per target)",
                    self.cadence.wave,
                    self.cadence.per_target
                );
            }
            Err(e) => log::error!("Failed to spawn bomb spawner thread: {e}"),
        }
    }

    /// Signal the thread to stop and wait for it to notice. Whatever sleep it
    /// is in finishes first. A no-op unless running.
    pub fn stop(&mut self) {
        if self.state != SpawnerState::Running {
            return;
        }
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Bomb spawner thread panicked");
            }
        }
        self.state = SpawnerState::Stopped;
        log::info!("Bomb spawner stopped");
    }
}

impl Drop for BombSpawner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved onto the spawner thread
struct Worker {
    running: Arc<AtomicBool>,
    registry: SharedRegistry,
    requests: Sender<BombRequest>,
    cadence: Cadence,
    rng: Pcg32,
}

impl Worker {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn run(mut self) {
        while self.is_running() {
            thread::sleep(self.cadence.wave);
            if !self.is_running() {
                break;
            }

            let mut wave = self.registry.live_ids();
            wave.shuffle(&mut self.rng);
            log::debug!("Bomb wave over {} targets", wave.len());

            for target in wave {
                thread::sleep(self.cadence.per_target);
                if !self.is_running() {
                    return;
                }
                if self.requests.send(BombRequest { target }).is_err() {
                    // Tick loop is gone
                    return;
                }
            }
        }
    }
}
