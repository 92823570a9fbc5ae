#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower readiness and targeting data into actions.
//!
//! A tower on cooldown only counts down. A ready passive tower harvests its
//! income. A ready attacking tower fires at the target acquired for it this
//! tick, or waits at zero cooldown when it has none.

use nird_defence_core::{Command, Phase, TowerId, TowerTarget, TowerView};

/// Tower combat system that queues cooldown, income and firing commands.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one command per tower that has something to do this tick.
    ///
    /// `tower_targets` must be ordered by tower identifier, as produced by the
    /// targeting system.
    pub fn handle(
        &mut self,
        phase: Phase,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Playing || towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter() {
            if tower.cooldown_remaining > 0 {
                self.scratch.push(Command::CoolDownTower { tower: tower.id });
            } else if tower.kind.is_passive() {
                self.scratch.push(Command::HarvestIncome { tower: tower.id });
            } else if let Some(target) = find_target(tower_targets, tower.id) {
                self.scratch.push(Command::FireProjectile {
                    tower: tower.id,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_target(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    targets
        .binary_search_by_key(&tower, |target| target.tower)
        .ok()
        .map(|index| &targets[index])
}
