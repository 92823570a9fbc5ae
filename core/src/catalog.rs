//! Static lookup tables describing enemies, towers, the path and the waves.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CellPoint};

/// Kinds of enemies that march along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast, fragile scout sent in large numbers.
    Tracker,
    /// Slow, heavily armoured bruiser.
    Bloatware,
    /// Crawling boss with an enormous health pool.
    LicenseBoss,
}

impl EnemyKind {
    /// Every enemy kind in catalog order.
    pub const ALL: [EnemyKind; 3] = [Self::Tracker, Self::Bloatware, Self::LicenseBoss];
}

/// Attributes shared by every enemy of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Health points assigned on spawn.
    pub health: u32,
    /// Path progress advanced per tick, measured in segments.
    pub speed: f64,
    /// Currency credited when the enemy is defeated.
    pub reward: u32,
}

/// Enemy stats keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyCatalog {
    /// Stats applied to [`EnemyKind::Tracker`].
    pub tracker: EnemyStats,
    /// Stats applied to [`EnemyKind::Bloatware`].
    pub bloatware: EnemyStats,
    /// Stats applied to [`EnemyKind::LicenseBoss`].
    pub license_boss: EnemyStats,
}

impl EnemyCatalog {
    /// Catalog shipped with the game.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            tracker: EnemyStats {
                health: 140,
                speed: 0.03,
                reward: 5,
            },
            bloatware: EnemyStats {
                health: 800,
                speed: 0.015,
                reward: 15,
            },
            license_boss: EnemyStats {
                health: 6000,
                speed: 0.01,
                reward: 150,
            },
        }
    }

    /// Looks up the stats for the provided kind.
    #[must_use]
    pub const fn stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Tracker => self.tracker,
            EnemyKind::Bloatware => self.bloatware,
            EnemyKind::LicenseBoss => self.license_boss,
        }
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Types of towers that can be constructed beside the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Rapid-fire turret dealing low single-target damage.
    TuxTurret,
    /// Slow cannon whose shells explode and chill everything nearby.
    Firewall,
    /// Passive workshop that periodically generates currency.
    Recycler,
}

impl TowerKind {
    /// Every tower kind in palette order.
    pub const ALL: [TowerKind; 3] = [Self::TuxTurret, Self::Firewall, Self::Recycler];

    /// Reports whether the tower earns income instead of attacking.
    #[must_use]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::Recycler)
    }

    /// Kind of projectile launched by the tower, if it attacks at all.
    #[must_use]
    pub const fn projectile(self) -> Option<ProjectileKind> {
        match self {
            Self::TuxTurret => Some(ProjectileKind::Bullet),
            Self::Firewall => Some(ProjectileKind::Frost),
            Self::Recycler => None,
        }
    }
}

/// Kinds of projectiles in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Plain bullet that only deals damage.
    Bullet,
    /// Shell that slows every enemy it damages.
    Frost,
}

impl ProjectileKind {
    /// Reports whether the projectile slows the enemies caught in its splash.
    #[must_use]
    pub const fn slows(self) -> bool {
        matches!(self, Self::Frost)
    }
}

/// Attributes shared by every tower of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Currency required to place the tower.
    pub cost: u32,
    /// Targeting radius measured in cells.
    pub range: f64,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Ticks the tower waits after acting before it may act again.
    pub fire_interval: u32,
    /// Explosion radius in cells; zero for single-target projectiles.
    #[serde(default)]
    pub splash_radius: f64,
    /// Currency yielded per cycle by passive towers.
    #[serde(default)]
    pub income: u32,
}

/// Tower stats keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TowerCatalog {
    /// Stats applied to [`TowerKind::TuxTurret`].
    pub tux_turret: TowerStats,
    /// Stats applied to [`TowerKind::Firewall`].
    pub firewall: TowerStats,
    /// Stats applied to [`TowerKind::Recycler`].
    pub recycler: TowerStats,
}

impl TowerCatalog {
    /// Catalog shipped with the game.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            tux_turret: TowerStats {
                cost: 60,
                range: 3.0,
                damage: 12,
                fire_interval: 8,
                splash_radius: 0.0,
                income: 0,
            },
            firewall: TowerStats {
                cost: 150,
                range: 3.5,
                damage: 120,
                fire_interval: 55,
                splash_radius: 2.0,
                income: 0,
            },
            recycler: TowerStats {
                cost: 250,
                range: 0.0,
                damage: 0,
                fire_interval: 180,
                splash_radius: 0.0,
                income: 20,
            },
        }
    }

    /// Looks up the stats for the provided kind.
    #[must_use]
    pub const fn stats(&self, kind: TowerKind) -> TowerStats {
        match kind {
            TowerKind::TuxTurret => self.tux_turret,
            TowerKind::Firewall => self.firewall,
            TowerKind::Recycler => self.recycler,
        }
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

const STANDARD_PATH: [(u32, u32); 43] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (2, 1),
    (2, 2),
    (1, 2),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 4),
    (2, 4),
    (3, 4),
    (4, 4),
    (4, 3),
    (4, 2),
    (4, 1),
    (5, 1),
    (6, 1),
    (6, 2),
    (6, 3),
    (6, 4),
    (6, 5),
    (5, 5),
    (4, 5),
    (3, 5),
    (2, 5),
    (2, 6),
    (2, 7),
    (3, 7),
    (4, 7),
    (5, 7),
    (6, 7),
    (7, 7),
    (8, 7),
    (8, 6),
    (8, 5),
    (8, 4),
    (9, 4),
    (9, 5),
    (9, 6),
    (9, 7),
    (9, 8),
    (9, 9),
];

/// Ordered waypoints that define the single route enemies traverse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathTable {
    waypoints: Vec<CellCoord>,
}

impl PathTable {
    /// Creates a path from the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<CellCoord>) -> Self {
        Self { waypoints }
    }

    /// Winding 43-waypoint route across the 10x10 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            STANDARD_PATH
                .iter()
                .map(|&(column, row)| CellCoord::new(column, row))
                .collect(),
        )
    }

    /// Waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Number of waypoints on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint. Reaching it removes the enemy.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Reports whether the cell lies on the path.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.waypoints.contains(&cell)
    }

    /// Position between waypoint `index` and its successor at `progress`.
    ///
    /// Returns `None` when `index` has no successor.
    #[must_use]
    pub fn interpolate(&self, index: usize, progress: f64) -> Option<CellPoint> {
        let from = self.waypoints.get(index)?.to_point();
        let to = self.waypoints.get(index.checked_add(1)?)?.to_point();
        Some(CellPoint::new(
            from.x() + (to.x() - from.x()) * progress,
            from.y() + (to.y() - from.y()) * progress,
        ))
    }
}

/// Scripted batch of enemy spawns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Number of enemies the wave emits.
    pub spawn_count: u32,
    /// Ticks between consecutive spawns.
    pub spawn_interval_frames: u32,
    /// Enemy kinds emitted in order.
    pub enemies: Vec<EnemyKind>,
}

impl WaveDefinition {
    /// Creates a wave whose spawn count matches the provided sequence.
    #[must_use]
    pub fn new(spawn_interval_frames: u32, enemies: Vec<EnemyKind>) -> Self {
        Self {
            spawn_count: u32::try_from(enemies.len()).unwrap_or(u32::MAX),
            spawn_interval_frames,
            enemies,
        }
    }
}

/// Ordered sequence of waves making up a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct WaveSchedule {
    waves: Vec<WaveDefinition>,
}

impl WaveSchedule {
    /// Creates a schedule from the provided waves.
    #[must_use]
    pub fn new(waves: Vec<WaveDefinition>) -> Self {
        Self { waves }
    }

    /// Twenty-wave campaign shipped with the game.
    #[must_use]
    pub fn standard() -> Self {
        use EnemyKind::{Bloatware as B, LicenseBoss as L, Tracker as T};

        let mixed = |interval: u32, groups: &[(EnemyKind, usize)]| {
            let enemies = groups
                .iter()
                .flat_map(|&(kind, count)| std::iter::repeat(kind).take(count))
                .collect();
            WaveDefinition::new(interval, enemies)
        };

        Self::new(vec![
            mixed(70, &[(T, 6)]),
            mixed(60, &[(T, 12)]),
            mixed(50, &[(T, 8), (B, 2)]),
            mixed(80, &[(B, 6)]),
            mixed(40, &[(T, 15), (B, 5)]),
            mixed(35, &[(T, 30)]),
            mixed(90, &[(B, 10)]),
            mixed(40, &[(T, 15), (B, 15)]),
            mixed(25, &[(T, 50)]),
            mixed(100, &[(L, 1)]),
            mixed(30, &[(T, 40)]),
            mixed(70, &[(B, 15)]),
            mixed(25, &[(T, 40), (B, 20)]),
            mixed(300, &[(L, 2)]),
            mixed(20, &[(T, 80)]),
            mixed(60, &[(B, 25)]),
            mixed(20, &[(T, 50), (B, 30)]),
            mixed(250, &[(L, 3)]),
            mixed(15, &[(T, 120)]),
            mixed(80, &[(L, 2), (B, 8), (L, 2), (B, 8)]),
        ])
    }

    /// Wave definition at the provided zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WaveDefinition> {
        self.waves.get(index)
    }

    /// Number of waves in the schedule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    /// Reports whether the schedule contains no waves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Iterator over the waves in play order.
    pub fn iter(&self) -> impl Iterator<Item = &WaveDefinition> {
        self.waves.iter()
    }
}
