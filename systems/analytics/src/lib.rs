#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that tallies match statistics.

mod metrics;

use nird_defence_core::Event;

pub use metrics::MatchStats;

/// Pure analytics system that folds world events into a [`MatchStats`] report.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: MatchStats,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics gathered so far.
    #[must_use]
    pub fn report(&self) -> &MatchStats {
        &self.stats
    }

    /// Consumes world events in the order they were broadcast.
    ///
    /// A `MatchReset` event clears the report, so events following it in the
    /// same batch count towards the new match.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.stats.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nird_defence_core::{CellCoord, TowerId, TowerKind};

    #[test]
    fn reset_clears_previous_tallies() {
        let mut analytics = Analytics::new();
        analytics.handle(&[
            Event::TimeAdvanced { tick: 40 },
            Event::TowerPlaced {
                tower: TowerId::new(0),
                kind: TowerKind::TuxTurret,
                cell: CellCoord::new(1, 1),
                cost: 60,
            },
            Event::MatchReset,
            Event::WaveStarted { wave: 1 },
        ]);

        let report = analytics.report();
        assert_eq!(report.ticks, 0);
        assert_eq!(report.currency_spent, 0);
        assert_eq!(report.waves_started, 1);
    }
}
