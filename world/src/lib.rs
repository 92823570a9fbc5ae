#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for NIRD Defence.
//!
//! The world owns one arena per entity kind and the scalar match state. It is
//! only ever mutated through [`apply`], which validates each [`Command`] and
//! reports the outcome as [`Event`] values. Invalid requests are rejected
//! without touching the state.

mod config;
mod enemies;
mod projectiles;
mod towers;

use std::collections::VecDeque;

use nird_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, Phase, PlacementError, ProjectileId, TowerId,
    TowerKind, WaveStartError, PROJECTILE_SPEED, SLOWED_FACTOR,
};
use tracing::{debug, info};

pub use config::{Rules, RulesError};

use self::{
    enemies::EnemyArena,
    projectiles::{Launch, ProjectileArena},
    towers::TowerRegistry,
};

/// Represents the authoritative NIRD Defence match state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    state: MatchState,
    enemies: EnemyArena,
    towers: TowerRegistry,
    projectiles: ProjectileArena,
}

impl World {
    /// Creates a world configured with the shipped rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a world configured with the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let state = MatchState::initial(&rules);
        Self {
            rules,
            state,
            enemies: EnemyArena::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileArena::new(),
        }
    }

    fn pipeline_open(&self) -> bool {
        self.state.phase == Phase::Playing
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.state.phase == phase {
            return;
        }
        info!(from = ?self.state.phase, to = ?phase, "match phase changed");
        self.state.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn placement_cost(&self, kind: TowerKind, cell: CellCoord) -> Result<u32, PlacementError> {
        if self.state.phase.is_over() {
            return Err(PlacementError::InvalidPhase);
        }
        if cell.column() >= self.rules.columns || cell.row() >= self.rules.rows {
            return Err(PlacementError::OutOfBounds);
        }
        if self.rules.path.contains(cell) {
            return Err(PlacementError::OnPath);
        }
        if self.towers.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let cost = self.rules.towers.stats(kind).cost;
        if self.state.currency < cost {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(cost)
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.placement_cost(kind, cell) {
            Ok(cost) => {
                self.state.currency -= cost;
                let tower = self.towers.insert(kind, cell);
                out_events.push(Event::TowerPlaced {
                    tower,
                    kind,
                    cell,
                    cost,
                });
            }
            Err(reason) => {
                debug!(?kind, ?cell, ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        let reason = if self.state.phase.is_over() {
            Some(WaveStartError::MatchOver)
        } else if self.state.wave_in_progress {
            Some(WaveStartError::WaveInProgress)
        } else {
            None
        };

        let definition = match reason {
            Some(reason) => Err(reason),
            None => self
                .rules
                .waves
                .get(self.state.wave_index as usize)
                .ok_or(WaveStartError::ScheduleExhausted),
        };

        let definition = match definition {
            Ok(definition) => definition,
            Err(reason) => {
                debug!(?reason, "wave start rejected");
                out_events.push(Event::WaveStartRejected { reason });
                return;
            }
        };

        self.state.pending_spawns = definition.enemies.iter().copied().collect();
        self.state.spawn_interval_frames = definition.spawn_interval_frames;
        self.state.frames_since_last_spawn = 0;
        self.state.wave_in_progress = true;
        self.state.wave_index += 1;

        info!(
            wave = self.state.wave_index,
            spawns = self.state.pending_spawns.len(),
            "wave started"
        );
        out_events.push(Event::WaveStarted {
            wave: self.state.wave_index,
        });
        self.set_phase(Phase::Playing, out_events);
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.state = MatchState::initial(&self.rules);
        self.enemies = EnemyArena::new();
        self.towers = TowerRegistry::new();
        self.projectiles = ProjectileArena::new();
        info!("match reset");
        out_events.push(Event::MatchReset);
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if !self.state.wave_in_progress || self.state.pending_spawns.front() != Some(&kind) {
            debug!(?kind, "spawn request does not match the pending queue");
            return;
        }
        let Some(origin) = self.rules.path.interpolate(0, 0.0) else {
            return;
        };

        let _ = self.state.pending_spawns.pop_front();
        self.state.frames_since_last_spawn = 0;
        let stats = self.rules.enemies.stats(kind);
        let enemy = self.enemies.spawn(kind, stats, origin);
        out_events.push(Event::EnemySpawned { enemy, kind });
    }

    fn conclude_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.wave_in_progress
            || !self.state.pending_spawns.is_empty()
            || !self.enemies.is_empty()
        {
            return;
        }

        self.state.wave_in_progress = false;
        let wave = self.state.wave_index;
        info!(wave, "wave cleared");
        out_events.push(Event::WaveCleared { wave });

        if wave as usize >= self.rules.waves.len() && self.state.lives > 0 {
            self.set_phase(Phase::Won, out_events);
        }
    }

    fn advance_enemy(
        &mut self,
        enemy: EnemyId,
        path_index: usize,
        progress: f64,
        slow_factor: f64,
    ) {
        let Some(position) = self.rules.path.interpolate(path_index, progress) else {
            return;
        };
        if let Some(enemy) = self.enemies.get_mut(enemy) {
            enemy.path_index = path_index;
            enemy.progress = progress;
            enemy.position = position;
            enemy.slow_factor = slow_factor.clamp(SLOWED_FACTOR, 1.0);
        }
    }

    fn lose_lives(&mut self, count: u32, out_events: &mut Vec<Event>) {
        if count == 0 {
            return;
        }
        let lost = i32::try_from(count).unwrap_or(i32::MAX);
        self.state.lives = self.state.lives.saturating_sub(lost);
        out_events.push(Event::LivesLost {
            count,
            remaining: self.state.lives,
        });
        if self.state.lives <= 0 {
            self.set_phase(Phase::Lost, out_events);
        }
    }

    fn harvest_income(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.kind.is_passive() || state.cooldown_remaining > 0 {
            return;
        }
        let stats = self.rules.towers.stats(state.kind);
        state.cooldown_remaining = stats.fire_interval;
        self.state.currency = self.state.currency.saturating_add(stats.income);
        out_events.push(Event::IncomeHarvested {
            tower,
            amount: stats.income,
        });
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.get(target).is_none() {
            return;
        }
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown_remaining > 0 {
            return;
        }
        let Some(kind) = state.kind.projectile() else {
            return;
        };

        let stats = self.rules.towers.stats(state.kind);
        state.cooldown_remaining = stats.fire_interval;
        let projectile = self.projectiles.launch(Launch {
            kind,
            origin: state.cell.to_point(),
            target,
            damage: stats.damage,
            speed: PROJECTILE_SPEED,
            splash_radius: stats.splash_radius,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            tower,
            target,
        });
    }

    fn detonate_projectile(
        &mut self,
        projectile: ProjectileId,
        victims: &[EnemyId],
        out_events: &mut Vec<Event>,
    ) {
        let Some(projectile) = self.projectiles.remove(projectile) else {
            return;
        };
        let slows = projectile.kind.slows() && projectile.splash_radius > 0.0;
        for &victim in victims {
            if let Some(enemy) = self.enemies.get_mut(victim) {
                let amount = enemy.take_hit(projectile.damage, slows);
                out_events.push(Event::EnemyDamaged {
                    enemy: victim,
                    amount,
                    remaining: enemy.health,
                });
            }
        }
    }

    fn collect_bounty(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.get(enemy).map_or(true, |enemy| enemy.health > 0) {
            return;
        }
        let Some(defeated) = self.enemies.remove(enemy) else {
            return;
        };
        let reward = self.rules.enemies.stats(defeated.kind).reward;
        self.state.currency = self.state.currency.saturating_add(reward);
        out_events.push(Event::EnemyDefeated {
            enemy,
            kind: defeated.kind,
            reward,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Host commands (`PlaceTower`, `StartWave`, `Restart`) are accepted between
/// ticks. Every other command belongs to the tick pipeline and is ignored
/// unless the match is being played.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::StartWave => world.start_wave(out_events),
        Command::Restart => world.restart(out_events),
        _ if !world.pipeline_open() => {
            debug!(?command, phase = ?world.state.phase, "pipeline command ignored");
        }
        Command::Tick => {
            world.state.tick_index = world.state.tick_index.saturating_add(1);
            if world.state.wave_in_progress {
                world.state.frames_since_last_spawn =
                    world.state.frames_since_last_spawn.saturating_add(1);
            }
            out_events.push(Event::TimeAdvanced {
                tick: world.state.tick_index,
            });
        }
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::ConcludeWave => world.conclude_wave(out_events),
        Command::AdvanceEnemy {
            enemy,
            path_index,
            progress,
            slow_factor,
        } => world.advance_enemy(enemy, path_index, progress, slow_factor),
        Command::EscapeEnemy { enemy } => {
            if let Some(escaped) = world.enemies.remove(enemy) {
                out_events.push(Event::EnemyEscaped {
                    enemy,
                    kind: escaped.kind,
                });
            }
        }
        Command::LoseLives { count } => world.lose_lives(count, out_events),
        Command::CoolDownTower { tower } => {
            if let Some(state) = world.towers.get_mut(tower) {
                state.cooldown_remaining = state.cooldown_remaining.saturating_sub(1);
            }
        }
        Command::HarvestIncome { tower } => world.harvest_income(tower, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(projectile) = world.projectiles.get_mut(projectile) {
                projectile.position = position;
            }
        }
        Command::DetonateProjectile {
            projectile,
            victims,
        } => world.detonate_projectile(projectile, &victims, out_events),
        Command::DiscardProjectile { projectile } => {
            if world.projectiles.remove(projectile).is_some() {
                out_events.push(Event::ProjectileExpired { projectile });
            }
        }
        Command::CollectBounty { enemy } => world.collect_bounty(enemy, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use nird_defence_core::{
        CellCoord, EnemyView, MatchStatus, PathTable, Phase, PlacementError, ProjectileView,
        TowerCatalog, TowerKind, TowerView, WaveProgress,
    };

    use super::{Rules, World};

    /// Provides read-only access to the rules the world was configured with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Route enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &PathTable {
        &world.rules.path
    }

    /// Tower stats keyed by kind.
    #[must_use]
    pub fn tower_catalog(world: &World) -> &TowerCatalog {
        &world.rules.towers
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.state.phase
    }

    /// Scalar match state for presentation.
    #[must_use]
    pub fn status(world: &World) -> MatchStatus {
        MatchStatus {
            phase: world.state.phase,
            wave_index: world.state.wave_index,
            wave_count: u32::try_from(world.rules.waves.len()).unwrap_or(u32::MAX),
            lives: world.state.lives,
            currency: world.state.currency,
            wave_in_progress: world.state.wave_in_progress,
            tick: world.state.tick_index,
        }
    }

    /// Spawn bookkeeping for the active wave.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            wave_in_progress: world.state.wave_in_progress,
            next_spawn: world.state.pending_spawns.front().copied(),
            pending: world.state.pending_spawns.len(),
            frames_since_last_spawn: world.state.frames_since_last_spawn,
            spawn_interval_frames: world.state.spawn_interval_frames,
            enemies_alive: world.enemies.len(),
        }
    }

    /// Captures a read-only view of the enemies on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Reports why a tower could not be placed on the cell, if it could not.
    #[must_use]
    pub fn placement_error(
        world: &World,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Option<PlacementError> {
        world.placement_cost(kind, cell).err()
    }

    /// Reports whether the player can currently pay for the tower kind.
    #[must_use]
    pub fn can_afford(world: &World, kind: TowerKind) -> bool {
        world.state.currency >= world.rules.towers.stats(kind).cost
    }
}

#[derive(Debug)]
struct MatchState {
    phase: Phase,
    wave_index: u32,
    lives: i32,
    currency: u32,
    pending_spawns: VecDeque<EnemyKind>,
    spawn_interval_frames: u32,
    frames_since_last_spawn: u32,
    wave_in_progress: bool,
    tick_index: u64,
}

impl MatchState {
    fn initial(rules: &Rules) -> Self {
        Self {
            phase: Phase::Idle,
            wave_index: 0,
            lives: i32::try_from(rules.starting_lives).unwrap_or(i32::MAX),
            currency: rules.starting_currency,
            pending_spawns: VecDeque::new(),
            spawn_interval_frames: 0,
            frames_since_last_spawn: 0,
            wave_in_progress: false,
            tick_index: 0,
        }
    }
}
