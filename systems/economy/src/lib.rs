#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! End-of-tick sweep that converts defeated enemies into bounty.

use nird_defence_core::{Command, EnemyView, Phase};

/// Pure system that claims the reward of every enemy whose health ran out.
#[derive(Debug, Default)]
pub struct Economy;

impl Economy {
    /// Creates a new economy system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a bounty claim for each defeated enemy, in spawn order.
    pub fn handle(&mut self, phase: Phase, enemies: &EnemyView, out: &mut Vec<Command>) {
        if phase != Phase::Playing {
            return;
        }

        out.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.is_defeated())
                .map(|enemy| Command::CollectBounty { enemy: enemy.id }),
        );
    }
}
