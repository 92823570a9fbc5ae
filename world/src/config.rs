//! Static match configuration and its TOML representation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use nird_defence_core::{
    CellCoord, EnemyCatalog, EnemyKind, PathTable, TowerCatalog, TowerKind, WaveDefinition,
    WaveSchedule,
};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_COLUMNS: u32 = 10;
const DEFAULT_ROWS: u32 = 10;
const DEFAULT_STARTING_LIVES: u32 = 10;
const DEFAULT_STARTING_CURRENCY: u32 = 150;

/// Tables and starting values that define a match.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Number of board columns.
    pub columns: u32,
    /// Number of board rows.
    pub rows: u32,
    /// Lives granted at the start of a match.
    pub starting_lives: u32,
    /// Currency granted at the start of a match.
    pub starting_currency: u32,
    /// Route enemies follow.
    pub path: PathTable,
    /// Enemy stats keyed by kind.
    pub enemies: EnemyCatalog,
    /// Tower stats keyed by kind.
    pub towers: TowerCatalog,
    /// Waves fought in order.
    pub waves: WaveSchedule,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            starting_lives: DEFAULT_STARTING_LIVES,
            starting_currency: DEFAULT_STARTING_CURRENCY,
            path: PathTable::standard(),
            enemies: EnemyCatalog::standard(),
            towers: TowerCatalog::standard(),
            waves: WaveSchedule::standard(),
        }
    }
}

impl Rules {
    /// Parses rules from TOML, filling omitted sections from the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, RulesError> {
        let file: RulesFile = toml::from_str(contents)?;
        let defaults = Self::default();

        let path = match file.path {
            Some(points) => PathTable::new(
                points
                    .into_iter()
                    .map(|[column, row]| CellCoord::new(column, row))
                    .collect(),
            ),
            None => defaults.path,
        };

        let waves = match file.waves {
            Some(waves) => WaveSchedule::new(
                waves
                    .into_iter()
                    .map(|wave| match wave.spawn_count {
                        Some(spawn_count) => WaveDefinition {
                            spawn_count,
                            spawn_interval_frames: wave.spawn_interval_frames,
                            enemies: wave.enemies,
                        },
                        None => WaveDefinition::new(wave.spawn_interval_frames, wave.enemies),
                    })
                    .collect(),
            ),
            None => defaults.waves,
        };

        let rules = Self {
            columns: file.columns.unwrap_or(defaults.columns),
            rows: file.rows.unwrap_or(defaults.rows),
            starting_lives: file.starting_lives.unwrap_or(defaults.starting_lives),
            starting_currency: file.starting_currency.unwrap_or(defaults.starting_currency),
            path,
            enemies: file.enemies.unwrap_or(defaults.enemies),
            towers: file.towers.unwrap_or(defaults.towers),
            waves,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Reads and parses a TOML rules file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let contents = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.starting_lives == 0 {
            return Err(RulesError::NoLives);
        }

        if self.path.len() < 2 {
            return Err(RulesError::PathTooShort {
                waypoints: self.path.len(),
            });
        }

        for (index, waypoint) in self.path.waypoints().iter().enumerate() {
            if waypoint.column() >= self.columns || waypoint.row() >= self.rows {
                return Err(RulesError::WaypointOutOfBounds {
                    index,
                    columns: self.columns,
                    rows: self.rows,
                });
            }
        }

        for (index, pair) in self.path.waypoints().windows(2).enumerate() {
            if pair[0].chebyshev_distance(pair[1]) > 1 {
                return Err(RulesError::DisjointPath { index });
            }
        }

        for kind in EnemyKind::ALL {
            let stats = self.enemies.stats(kind);
            if stats.health == 0 {
                return Err(RulesError::ZeroHealth { kind });
            }
            if !(stats.speed > 0.0 && stats.speed.is_finite()) {
                return Err(RulesError::InvalidSpeed { kind });
            }
        }

        for kind in TowerKind::ALL {
            let stats = self.towers.stats(kind);
            if !kind.is_passive() && stats.damage == 0 {
                return Err(RulesError::HarmlessTower { kind });
            }
            if stats.range < 0.0 || stats.splash_radius < 0.0 {
                return Err(RulesError::NegativeRadius { kind });
            }
        }

        if self.waves.is_empty() {
            return Err(RulesError::EmptySchedule);
        }

        for (index, wave) in self.waves.iter().enumerate() {
            if wave.spawn_interval_frames == 0 {
                return Err(RulesError::ZeroInterval { wave: index + 1 });
            }
            if wave.spawn_count as usize != wave.enemies.len() {
                return Err(RulesError::SpawnCountMismatch {
                    wave: index + 1,
                    declared: wave.spawn_count,
                    listed: wave.enemies.len(),
                });
            }
        }

        Ok(())
    }
}

/// Errors raised while loading or validating [`Rules`].
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rules file could not be read.
    #[error("failed to read rules file {}", .path.display())]
    Io {
        /// Location that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The rules file is not valid TOML for the expected layout.
    #[error("failed to parse rules")]
    Parse(#[from] toml::de::Error),
    /// The match needs at least one life.
    #[error("starting lives must be positive")]
    NoLives,
    /// The path needs a start and an end.
    #[error("path needs at least two waypoints, found {waypoints}")]
    PathTooShort {
        /// Number of waypoints provided.
        waypoints: usize,
    },
    /// A waypoint lies outside the board.
    #[error("waypoint {index} lies outside the {columns}x{rows} board")]
    WaypointOutOfBounds {
        /// Index of the offending waypoint.
        index: usize,
        /// Board width.
        columns: u32,
        /// Board height.
        rows: u32,
    },
    /// Two consecutive waypoints are not neighbours.
    #[error("waypoint {index} is not adjacent to its successor")]
    DisjointPath {
        /// Index of the first waypoint of the broken segment.
        index: usize,
    },
    /// An enemy kind would spawn already defeated.
    #[error("{kind:?} enemies need positive health")]
    ZeroHealth {
        /// Offending enemy kind.
        kind: EnemyKind,
    },
    /// An enemy kind would never move.
    #[error("{kind:?} enemies need a positive, finite speed")]
    InvalidSpeed {
        /// Offending enemy kind.
        kind: EnemyKind,
    },
    /// An attacking tower deals no damage.
    #[error("{kind:?} towers need positive damage")]
    HarmlessTower {
        /// Offending tower kind.
        kind: TowerKind,
    },
    /// A tower declares a negative range or splash radius.
    #[error("{kind:?} towers cannot have a negative radius")]
    NegativeRadius {
        /// Offending tower kind.
        kind: TowerKind,
    },
    /// The schedule has no waves.
    #[error("wave schedule is empty")]
    EmptySchedule,
    /// A wave would release its enemies without any spacing.
    #[error("wave {wave} needs a positive spawn interval")]
    ZeroInterval {
        /// One-based wave number.
        wave: usize,
    },
    /// A wave's declared count disagrees with its enemy list.
    #[error("wave {wave} declares {declared} spawns but lists {listed} enemies")]
    SpawnCountMismatch {
        /// One-based wave number.
        wave: usize,
        /// Declared spawn count.
        declared: u32,
        /// Length of the enemy list.
        listed: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    columns: Option<u32>,
    rows: Option<u32>,
    starting_lives: Option<u32>,
    starting_currency: Option<u32>,
    path: Option<Vec<[u32; 2]>>,
    enemies: Option<EnemyCatalog>,
    towers: Option<TowerCatalog>,
    waves: Option<Vec<WaveFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WaveFile {
    spawn_count: Option<u32>,
    spawn_interval_frames: u32,
    enemies: Vec<EnemyKind>,
}
