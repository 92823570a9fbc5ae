#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the path.
//!
//! Every tick each enemy advances by `speed * slow_factor`, using the factor
//! it held when the tick began. The relaxed factor is stored for the next
//! tick. Crossing the end of a segment snaps progress back to zero without
//! carrying the overflow. Enemies that reach the final waypoint escape, and
//! the lives they cost are reported once, after every enemy has moved.

use nird_defence_core::{
    Command, EnemySnapshot, EnemyView, Event, PathTable, Phase, SLOW_RECOVERY_PER_TICK,
};

/// Outcome of moving a single enemy for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The enemy is still on the path.
    Advanced {
        /// Index of the waypoint the enemy departed from.
        path_index: usize,
        /// Fraction of the current segment travelled.
        progress: f64,
        /// Speed multiplier to hold for the next tick.
        slow_factor: f64,
    },
    /// The enemy reached the final waypoint.
    Escaped,
}

/// Computes the movement of a single enemy along a path whose final waypoint
/// has index `last_index`.
#[must_use]
pub fn advance_enemy(enemy: &EnemySnapshot, last_index: usize) -> Step {
    let slow_factor = (enemy.slow_factor + SLOW_RECOVERY_PER_TICK).min(1.0);
    let mut progress = enemy.progress + enemy.speed * enemy.slow_factor;
    let mut path_index = enemy.path_index;

    if progress >= 1.0 {
        progress = 0.0;
        path_index += 1;
    }

    if path_index >= last_index {
        return Step::Escaped;
    }

    Step::Advanced {
        path_index,
        progress,
        slow_factor,
    }
}

/// Pure system that reacts to ticks and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    escaped: u32,
}

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and immutable views to emit movement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: Phase,
        enemies: &EnemyView,
        path: &PathTable,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Playing || enemies.is_empty() {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.escaped = 0;
        let last_index = path.last_index();

        for enemy in enemies.iter() {
            match advance_enemy(enemy, last_index) {
                Step::Advanced {
                    path_index,
                    progress,
                    slow_factor,
                } => out.push(Command::AdvanceEnemy {
                    enemy: enemy.id,
                    path_index,
                    progress,
                    slow_factor,
                }),
                Step::Escaped => {
                    self.escaped += 1;
                    out.push(Command::EscapeEnemy { enemy: enemy.id });
                }
            }
        }

        if self.escaped > 0 {
            out.push(Command::LoseLives {
                count: self.escaped,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nird_defence_core::{CellCoord, CellPoint, EnemyId, EnemyKind, SLOWED_FACTOR};

    fn snapshot(id: u32, path_index: usize, progress: f64, slow_factor: f64) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Tracker,
            path_index,
            progress,
            position: CellPoint::default(),
            health: 140,
            max_health: 140,
            speed: 0.25,
            slow_factor,
        }
    }

    fn straight_path(len: u32) -> PathTable {
        PathTable::new((0..len).map(|column| CellCoord::new(column, 0)).collect())
    }

    #[test]
    fn slowed_enemies_move_with_the_factor_held_at_tick_start() {
        let step = advance_enemy(&snapshot(0, 0, 0.0, SLOWED_FACTOR), 5);

        assert_eq!(
            step,
            Step::Advanced {
                path_index: 0,
                progress: 0.125,
                slow_factor: SLOWED_FACTOR + SLOW_RECOVERY_PER_TICK,
            }
        );
    }

    #[test]
    fn overflow_is_discarded_at_segment_end() {
        let step = advance_enemy(&snapshot(0, 1, 0.9, 1.0), 5);

        assert_eq!(
            step,
            Step::Advanced {
                path_index: 2,
                progress: 0.0,
                slow_factor: 1.0,
            }
        );
    }

    #[test]
    fn shipped_speeds_cross_a_segment_in_whole_ticks() {
        for (speed, expected) in [(0.01, 100), (0.015, 67), (0.03, 34)] {
            let mut enemy = EnemySnapshot {
                speed,
                ..snapshot(0, 0, 0.0, 1.0)
            };
            let mut ticks = 0;
            while enemy.path_index == 0 {
                ticks += 1;
                match advance_enemy(&enemy, 5) {
                    Step::Advanced {
                        path_index,
                        progress,
                        slow_factor,
                    } => {
                        enemy.path_index = path_index;
                        enemy.progress = progress;
                        enemy.slow_factor = slow_factor;
                    }
                    Step::Escaped => panic!("path has five waypoints"),
                }
            }
            assert_eq!(ticks, expected, "speed {speed}");
        }
    }

    #[test]
    fn reaching_final_waypoint_escapes() {
        assert_eq!(advance_enemy(&snapshot(0, 3, 0.8, 1.0), 4), Step::Escaped);
        assert!(matches!(
            advance_enemy(&snapshot(0, 2, 0.8, 1.0), 4),
            Step::Advanced { path_index: 3, .. }
        ));
    }

    #[test]
    fn escapes_are_reported_as_one_life_deduction() {
        let mut movement = Movement::new();
        let enemies = EnemyView::from_snapshots(vec![
            snapshot(2, 3, 0.9, 1.0),
            snapshot(0, 3, 0.8, 1.0),
            snapshot(1, 0, 0.0, 1.0),
        ]);
        let mut out = Vec::new();

        movement.handle(
            &[Event::TimeAdvanced { tick: 1 }],
            Phase::Playing,
            &enemies,
            &straight_path(5),
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::EscapeEnemy {
                    enemy: EnemyId::new(0)
                },
                Command::AdvanceEnemy {
                    enemy: EnemyId::new(1),
                    path_index: 0,
                    progress: 0.25,
                    slow_factor: 1.0,
                },
                Command::EscapeEnemy {
                    enemy: EnemyId::new(2)
                },
                Command::LoseLives { count: 2 },
            ]
        );
    }

    #[test]
    fn idle_phase_is_silent() {
        let mut movement = Movement::new();
        let enemies = EnemyView::from_snapshots(vec![snapshot(0, 0, 0.0, 1.0)]);
        let mut out = Vec::new();

        movement.handle(
            &[Event::TimeAdvanced { tick: 1 }],
            Phase::Idle,
            &enemies,
            &straight_path(5),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
