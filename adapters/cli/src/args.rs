//! Command-line arguments.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use nird_defence_core::{CellCoord, TowerKind};

/// Headless NIRD Defence runner.
#[derive(Debug, Parser)]
#[command(name = "nird-defence", version, about)]
pub(crate) struct Args {
    /// TOML file overriding the shipped rules.
    #[arg(long, value_name = "FILE")]
    pub(crate) rules: Option<PathBuf>,

    /// Tower placed before the first wave, as KIND@COLUMN,ROW (repeatable).
    /// Placements are replayed after a restart.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    pub(crate) towers: Vec<TowerSpec>,

    /// Stop after this many waves have been fought.
    #[arg(long, value_name = "N")]
    pub(crate) waves: Option<u32>,

    /// Restart the match on this frame.
    #[arg(long, value_name = "FRAME")]
    pub(crate) restart_at: Option<u64>,

    /// Hard limit on simulated ticks.
    #[arg(long, value_name = "N", default_value_t = 1_000_000)]
    pub(crate) max_ticks: u64,

    /// Draw the board every N ticks (0 draws only the final board).
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub(crate) render_every: u64,

    /// Print the final report as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

/// Scripted tower placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerSpec {
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
}

impl FromStr for TowerSpec {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, cell) = value
            .split_once('@')
            .ok_or_else(|| format!("expected KIND@X,Y, got `{value}`"))?;

        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "tux" | "tux_turret" | "turret" => TowerKind::TuxTurret,
            "firewall" => TowerKind::Firewall,
            "recycler" => TowerKind::Recycler,
            other => return Err(format!("unknown tower kind `{other}`")),
        };

        let (column, row) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after `@`, got `{cell}`"))?;
        let column = column
            .trim()
            .parse()
            .map_err(|error| format!("invalid column `{column}`: {error}"))?;
        let row = row
            .trim()
            .parse()
            .map_err(|error| format!("invalid row `{row}`: {error}"))?;

        Ok(Self {
            kind,
            cell: CellCoord::new(column, row),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn tower_specs_parse() {
        assert_eq!(
            "firewall@3,1".parse::<TowerSpec>(),
            Ok(TowerSpec {
                kind: TowerKind::Firewall,
                cell: CellCoord::new(3, 1),
            })
        );
        assert_eq!(
            "Tux@ 7, 8".parse::<TowerSpec>(),
            Ok(TowerSpec {
                kind: TowerKind::TuxTurret,
                cell: CellCoord::new(7, 8),
            })
        );
        assert!("cannon@1,1".parse::<TowerSpec>().is_err());
        assert!("recycler@1".parse::<TowerSpec>().is_err());
        assert!("recycler".parse::<TowerSpec>().is_err());
    }

    #[test]
    fn repeated_towers_are_collected() {
        let args = Args::try_parse_from([
            "nird-defence",
            "--tower",
            "tux@1,1",
            "--tower",
            "recycler@3,0",
            "--waves",
            "2",
            "--restart-at",
            "500",
            "--json",
        ])
        .expect("arguments parse");

        assert_eq!(args.towers.len(), 2);
        assert_eq!(args.waves, Some(2));
        assert_eq!(args.restart_at, Some(500));
        assert!(args.json);
        assert_eq!(args.max_ticks, 1_000_000);
    }
}
