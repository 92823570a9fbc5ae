#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the NIRD Defence engine.
//!
//! This crate defines the message surface that connects the host driver, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing placement and lifecycle requests, the world executes commands
//! via its `apply` entry point and broadcasts [`Event`] values, and systems
//! read immutable views to answer with new command batches for the next
//! pipeline stage.

mod catalog;

use serde::{Deserialize, Serialize};

pub use catalog::{
    EnemyCatalog, EnemyKind, EnemyStats, PathTable, ProjectileKind, TowerCatalog, TowerKind,
    TowerStats, WaveDefinition, WaveSchedule,
};

/// Distance below which a projectile is considered to have struck its target.
pub const IMPACT_RADIUS: f64 = 0.5;

/// Distance travelled by a projectile per tick, measured in cells.
pub const PROJECTILE_SPEED: f64 = 0.3;

/// Speed multiplier written onto an enemy hit by a frost projectile.
pub const SLOWED_FACTOR: f64 = 0.5;

/// Amount the speed multiplier relaxes toward normal each tick.
pub const SLOW_RECOVERY_PER_TICK: f64 = 0.005;

/// Lifecycle phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the player to launch the first wave.
    Idle,
    /// Waves are being fought; the tick pipeline is running.
    Playing,
    /// The final wave was cleared.
    Won,
    /// The base ran out of lives.
    Lost,
}

impl Phase {
    /// Reports whether the match has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests a tower of the given kind on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Grid cell the tower occupies.
        cell: CellCoord,
    },
    /// Requests that the next wave in the schedule begins.
    StartWave,
    /// Discards every entity and returns the match to its initial state.
    Restart,
    /// Opens a new simulation tick.
    Tick,
    /// Emits the enemy at the head of the pending spawn queue.
    SpawnEnemy {
        /// Kind expected at the head of the queue.
        kind: EnemyKind,
    },
    /// Marks the active wave as cleared.
    ConcludeWave,
    /// Stores the movement result computed for an enemy this tick.
    AdvanceEnemy {
        /// Enemy being moved.
        enemy: EnemyId,
        /// Index of the waypoint the enemy departed from.
        path_index: usize,
        /// Fraction of the current segment travelled.
        progress: f64,
        /// Speed multiplier to hold for the next tick.
        slow_factor: f64,
    },
    /// Removes an enemy that reached the final waypoint.
    EscapeEnemy {
        /// Enemy that slipped through.
        enemy: EnemyId,
    },
    /// Deducts lives for every enemy that escaped this tick.
    LoseLives {
        /// Number of lives lost.
        count: u32,
    },
    /// Counts a tower's cooldown down by one tick.
    CoolDownTower {
        /// Tower being cooled down.
        tower: TowerId,
    },
    /// Credits the yield of a ready passive tower.
    HarvestIncome {
        /// Passive tower producing the income.
        tower: TowerId,
    },
    /// Launches a projectile from a ready tower toward an enemy.
    FireProjectile {
        /// Tower firing the projectile.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves a projectile to a new position.
    MoveProjectile {
        /// Projectile in flight.
        projectile: ProjectileId,
        /// Position reached this tick.
        position: CellPoint,
    },
    /// Resolves a projectile impact against the listed enemies.
    DetonateProjectile {
        /// Projectile that struck its target.
        projectile: ProjectileId,
        /// Enemies receiving the projectile's damage.
        victims: Vec<EnemyId>,
    },
    /// Drops a projectile whose target no longer exists.
    DiscardProjectile {
        /// Projectile being discarded.
        projectile: ProjectileId,
    },
    /// Removes a defeated enemy and credits its reward.
    CollectBounty {
        /// Enemy whose health reached zero.
        enemy: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a new tick opened.
    TimeAdvanced {
        /// Number of ticks processed since the match began.
        tick: u64,
    },
    /// Announces that a wave started.
    WaveStarted {
        /// One-based number of the wave that started.
        wave: u32,
    },
    /// Reports that a wave start request was rejected.
    WaveStartRejected {
        /// Specific reason the request failed.
        reason: WaveStartError,
    },
    /// Announces that every enemy of a wave was spawned and left play.
    WaveCleared {
        /// One-based number of the wave that cleared.
        wave: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the spawned enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Kind of the escaped enemy.
        kind: EnemyKind,
    },
    /// Reports the lives deducted during a tick.
    LivesLost {
        /// Number of lives deducted.
        count: u32,
        /// Lives remaining after the deduction.
        remaining: i32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Currency spent on the tower.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a passive tower produced currency.
    IncomeHarvested {
        /// Tower that produced the income.
        tower: TowerId,
        /// Currency credited.
        amount: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Reports that a projectile vanished because its target is gone.
    ProjectileExpired {
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
    },
    /// Reports damage dealt to an enemy by a projectile impact.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health actually removed by the hit.
        amount: u32,
        /// Health remaining after the hit.
        remaining: u32,
    },
    /// Reports that a defeated enemy was removed and rewarded.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Kind of the defeated enemy.
        kind: EnemyKind,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// Announces that the match entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms that the match was reset to its initial state.
    MatchReset,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Continuous position of the cell.
    #[must_use]
    pub fn to_point(self) -> CellPoint {
        CellPoint::new(self.column as f64, self.row as f64)
    }
}

/// Continuous position measured in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    x: f64,
    y: f64,
}

impl CellPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, aligned with cell columns.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate, aligned with cell rows.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves `step` units along the bearing toward `target`.
    ///
    /// The bearing is recomputed on every call, so repeated steps home in on
    /// a moving target.
    #[must_use]
    pub fn step_toward(self, target: CellPoint, step: f64) -> CellPoint {
        let bearing = (target.y - self.y).atan2(target.x - self.x);
        CellPoint::new(
            self.x + bearing.cos() * step,
            self.y + bearing.sin() * step,
        )
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Index of the waypoint the enemy departed from.
    pub path_index: usize,
    /// Fraction of the current segment travelled.
    pub progress: f64,
    /// Interpolated position along the path.
    pub position: CellPoint,
    /// Remaining health.
    pub health: u32,
    /// Health assigned on spawn.
    pub max_health: u32,
    /// Base path progress per tick.
    pub speed: f64,
    /// Speed multiplier in `[SLOWED_FACTOR, 1.0]`.
    pub slow_factor: f64,
}

impl EnemySnapshot {
    /// Reports whether the enemy's health is exhausted.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Reports whether the enemy currently moves below full speed.
    #[must_use]
    pub fn is_slowed(&self) -> bool {
        self.slow_factor < 1.0
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Ticks left before the tower may act again.
    pub cooldown_remaining: u32,
}

/// Read-only snapshot describing all towers placed on the board.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Current position.
    pub position: CellPoint,
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
    /// Damage applied on impact.
    pub damage: u32,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Explosion radius; zero for single-target projectiles.
    pub splash_radius: f64,
}

impl ProjectileSnapshot {
    /// Reports whether the projectile damages an area on impact.
    #[must_use]
    pub fn is_splash(&self) -> bool {
        self.splash_radius > 0.0
    }
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Spawn bookkeeping for the active wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Whether a wave is currently being fought.
    pub wave_in_progress: bool,
    /// Kind at the head of the pending spawn queue.
    pub next_spawn: Option<EnemyKind>,
    /// Enemies still waiting to be spawned.
    pub pending: usize,
    /// Ticks counted since the previous spawn.
    pub frames_since_last_spawn: u32,
    /// Ticks required between spawns for the active wave.
    pub spawn_interval_frames: u32,
    /// Enemies currently on the path.
    pub enemies_alive: usize,
}

/// Scalar match state exposed to hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatus {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Number of waves launched so far.
    pub wave_index: u32,
    /// Number of waves in the schedule.
    pub wave_count: u32,
    /// Lives left before the match is lost.
    pub lives: i32,
    /// Currency available for placement.
    pub currency: u32,
    /// Whether the launched wave is still being fought.
    pub wave_in_progress: bool,
    /// Ticks processed since the match began.
    pub tick: u64,
}

/// Tower paired with the enemy it should fire at this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that acquired a target.
    pub tower: TowerId,
    /// Enemy selected by the tower.
    pub enemy: EnemyId,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The match has ended, so placement is disabled.
    InvalidPhase,
    /// The requested cell lies outside the board.
    OutOfBounds,
    /// The requested cell is part of the enemy path.
    OnPath,
    /// Another tower already occupies the cell.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientFunds,
}

/// Reasons a wave start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStartError {
    /// The previous wave is still being fought.
    WaveInProgress,
    /// Every wave in the schedule has been launched.
    ScheduleExhausted,
    /// The match has already been won or lost.
    MatchOver,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellPoint, PlacementError, Phase, WaveStartError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
    }

    #[test]
    fn step_toward_moves_exactly_one_step() {
        let start = CellPoint::new(0.0, 0.0);
        let target = CellPoint::new(3.0, 4.0);
        let next = start.step_toward(target, 0.5);
        assert!((next.distance(start) - 0.5).abs() < 1e-5);
        assert!((next.distance(target) - 4.5).abs() < 1e-5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientFunds);
        assert_round_trip(&WaveStartError::ScheduleExhausted);
        assert_round_trip(&Phase::Lost);
    }

    #[test]
    fn only_won_and_lost_end_the_match() {
        assert!(!Phase::Idle.is_over());
        assert!(!Phase::Playing.is_over());
        assert!(Phase::Won.is_over());
        assert!(Phase::Lost.is_over());
    }
}
