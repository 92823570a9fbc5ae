#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing driver that runs the NIRD Defence tick pipeline.
//!
//! A [`Simulation`] owns the authoritative [`World`] and one instance of every
//! system. Each tick runs the stages in a fixed order:
//!
//! 1. spawn decision
//! 2. enemy movement and lives deduction
//! 3. tower targeting, cooldowns, income and firing
//! 4. projectile flight and collision
//! 5. dead enemy sweep and bounty
//!
//! Views are re-queried between stages so each stage observes the results of
//! the previous one. Host commands are only accepted between ticks.

use std::{collections::VecDeque, time::Duration};

use nird_defence_core::{
    CellCoord, Command, Event, MatchStatus, Phase, PlacementError, TowerId, TowerKind,
    TowerTarget, WaveStartError,
};
use nird_defence_rendering::Scene;
use nird_defence_system_analytics::{Analytics, MatchStats};
use nird_defence_system_economy::Economy;
use nird_defence_system_movement::Movement;
use nird_defence_system_projectiles::Projectiles;
use nird_defence_system_spawning::Spawning;
use nird_defence_system_tower_combat::TowerCombat;
use nird_defence_system_tower_targeting::TowerTargeting;
use nird_defence_world::{self as world, query, Rules, World};
use tracing::{debug, trace};

const DEFAULT_TICK_DURATION: Duration = Duration::from_nanos(16_666_667);
const DEFAULT_MAX_FRAME_STEP: Duration = Duration::from_millis(50);

/// Undrained events kept for the host; older events are dropped first.
pub const EVENT_BACKLOG: usize = 4096;

/// Frame clock parameters used by [`Simulation::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    tick_duration: Duration,
    max_frame_step: Duration,
}

impl SimulationConfig {
    /// Creates a configuration with the provided tick length and frame clamp.
    #[must_use]
    pub const fn new(tick_duration: Duration, max_frame_step: Duration) -> Self {
        Self {
            tick_duration,
            max_frame_step,
        }
    }

    /// Wall-clock time represented by one tick.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Longest frame delta honoured before clamping.
    #[must_use]
    pub const fn max_frame_step(&self) -> Duration {
        self.max_frame_step
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DURATION, DEFAULT_MAX_FRAME_STEP)
    }
}

/// Match driver combining the world, its systems and a frame clock.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    spawning: Spawning,
    movement: Movement,
    tower_targeting: TowerTargeting,
    tower_combat: TowerCombat,
    projectiles: Projectiles,
    economy: Economy,
    analytics: Analytics,
    accumulator: Duration,
    tick_events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    pending_events: VecDeque<Event>,
}

impl Simulation {
    /// Creates a simulation playing the shipped rules.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rules(Rules::default(), config)
    }

    /// Creates a simulation playing the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules, config: SimulationConfig) -> Self {
        Self {
            config,
            world: World::with_rules(rules),
            spawning: Spawning::new(),
            movement: Movement::new(),
            tower_targeting: TowerTargeting::new(),
            tower_combat: TowerCombat::new(),
            projectiles: Projectiles::new(),
            economy: Economy::new(),
            analytics: Analytics::new(),
            accumulator: Duration::ZERO,
            tick_events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            pending_events: VecDeque::new(),
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Frame clock parameters.
    #[must_use]
    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    /// Scalar match state.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        query::status(&self.world)
    }

    /// Statistics gathered since the match began.
    #[must_use]
    pub fn stats(&self) -> &MatchStats {
        self.analytics.report()
    }

    /// Renderable snapshot of the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::capture(&self.world)
    }

    /// Returns the events broadcast since the previous drain.
    ///
    /// At most [`EVENT_BACKLOG`] events are retained between drains, so hosts
    /// that need every event should drain once per frame.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.pending_events.drain(..).collect()
    }

    /// Feeds elapsed wall-clock time into the frame clock.
    ///
    /// `dt` is clamped to the configured maximum frame step. As many whole
    /// ticks as fit into the accumulated time are run; the remainder carries
    /// over to the next call. Returns the number of ticks run.
    pub fn advance(&mut self, dt: Duration) -> usize {
        if self.config.tick_duration.is_zero() {
            return 0;
        }

        if query::phase(&self.world) != Phase::Playing {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        self.accumulator = self
            .accumulator
            .saturating_add(dt.min(self.config.max_frame_step));

        let mut ticks = 0;
        while self.accumulator >= self.config.tick_duration {
            self.accumulator -= self.config.tick_duration;
            if !self.step() {
                self.accumulator = Duration::ZERO;
                break;
            }
            ticks += 1;
        }
        ticks
    }

    /// Runs exactly one tick of the pipeline.
    ///
    /// Returns `false` without touching the world when the match is not being
    /// played. When movement costs the last life, the tick ends there: towers,
    /// projectiles and bounties are not resolved on the tick the match is
    /// lost.
    pub fn step(&mut self) -> bool {
        if query::phase(&self.world) != Phase::Playing {
            return false;
        }

        self.tick_events.clear();
        world::apply(&mut self.world, Command::Tick, &mut self.tick_events);

        self.spawning.handle(
            &self.tick_events,
            query::phase(&self.world),
            query::wave_progress(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.movement.handle(
            &self.tick_events,
            query::phase(&self.world),
            &query::enemy_view(&self.world),
            query::path(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        if query::phase(&self.world) == Phase::Playing {
            self.run_combat_stages();
        }

        let status = query::status(&self.world);
        trace!(
            tick = status.tick,
            lives = status.lives,
            currency = status.currency,
            events = self.tick_events.len(),
            "tick processed"
        );
        self.publish_events();
        true
    }

    /// Requests a tower on the provided cell.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        let outcome = self.host_command(Command::PlaceTower { kind, cell });
        outcome
            .iter()
            .find_map(|event| match *event {
                Event::TowerPlaced { tower, .. } => Some(Ok(tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::InvalidPhase))
    }

    /// Launches the next wave in the schedule, returning its one-based number.
    pub fn start_next_wave(&mut self) -> Result<u32, WaveStartError> {
        let outcome = self.host_command(Command::StartWave);
        outcome
            .iter()
            .find_map(|event| match *event {
                Event::WaveStarted { wave } => Some(Ok(wave)),
                Event::WaveStartRejected { reason } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(WaveStartError::MatchOver))
    }

    /// Discards every entity and returns the match to its initial state.
    pub fn restart(&mut self) {
        self.accumulator = Duration::ZERO;
        let _ = self.host_command(Command::Restart);
    }

    fn run_combat_stages(&mut self) {
        self.tower_targeting.handle(
            query::phase(&self.world),
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            query::tower_catalog(&self.world),
            &mut self.targets,
        );
        self.tower_combat.handle(
            query::phase(&self.world),
            &query::tower_view(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        self.projectiles.handle(
            query::phase(&self.world),
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.economy.handle(
            query::phase(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.tick_events);
        }
    }

    fn host_command(&mut self, command: Command) -> Vec<Event> {
        debug!(?command, "host command");
        self.tick_events.clear();
        world::apply(&mut self.world, command, &mut self.tick_events);
        let outcome = self.tick_events.clone();
        self.publish_events();
        outcome
    }

    fn publish_events(&mut self) {
        self.analytics.handle(&self.tick_events);
        self.pending_events.extend(self.tick_events.drain(..));

        let overflow = self.pending_events.len().saturating_sub(EVENT_BACKLOG);
        if overflow > 0 {
            let _ = self.pending_events.drain(..overflow);
            trace!(dropped = overflow, "undrained events discarded");
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
