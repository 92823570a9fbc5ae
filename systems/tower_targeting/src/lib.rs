#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Each ready attacking tower locks onto the first enemy, in spawn order,
//! whose position lies within the tower's range. No nearest or furthest
//! preference is applied.

use nird_defence_core::{
    CellPoint, EnemyId, EnemyView, Phase, TowerCatalog, TowerTarget, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments, which are ordered by tower identifier.
    pub fn handle(
        &mut self,
        phase: Phase,
        towers: &TowerView,
        enemies: &EnemyView,
        catalog: &TowerCatalog,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if phase != Phase::Playing || towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            if tower.kind.is_passive() || tower.cooldown_remaining > 0 {
                continue;
            }

            let origin = tower.cell.to_point();
            let range = catalog.stats(tower.kind).range;
            let target = self
                .enemy_workspace
                .iter()
                .find(|candidate| origin.distance(candidate.position) <= range);

            if let Some(candidate) = target {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|enemy| !enemy.is_defeated())
                .map(|enemy| EnemyCandidate {
                    id: enemy.id,
                    position: enemy.position,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    position: CellPoint,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nird_defence_core::{
        CellCoord, EnemyKind, EnemySnapshot, TowerId, TowerKind, TowerSnapshot,
    };

    fn tower(id: u32, kind: TowerKind, cell: CellCoord, cooldown: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell,
            cooldown_remaining: cooldown,
        }
    }

    fn enemy(id: u32, x: f64, y: f64) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Tracker,
            path_index: 0,
            progress: 0.0,
            position: CellPoint::new(x, y),
            health: 140,
            max_health: 140,
            speed: 0.03,
            slow_factor: 1.0,
        }
    }

    #[test]
    fn first_enemy_in_range_wins_over_nearer_ones() {
        let mut targeting = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            TowerKind::TuxTurret,
            CellCoord::new(3, 3),
            0,
        )]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(4, 3.0, 3.5),
            enemy(1, 9.0, 9.0),
            enemy(2, 3.0, 6.0),
        ]);
        let mut out = Vec::new();

        targeting.handle(
            Phase::Playing,
            &towers,
            &enemies,
            &TowerCatalog::standard(),
            &mut out,
        );

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(0),
                enemy: EnemyId::new(2),
            }]
        );
    }

    #[test]
    fn passive_and_cooling_towers_do_not_target() {
        let mut targeting = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower(0, TowerKind::Recycler, CellCoord::new(1, 1), 0),
            tower(1, TowerKind::TuxTurret, CellCoord::new(1, 1), 3),
            tower(2, TowerKind::Firewall, CellCoord::new(1, 1), 0),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(0, 1.0, 1.0)]);
        let mut out = vec![TowerTarget {
            tower: TowerId::new(9),
            enemy: EnemyId::new(9),
        }];

        targeting.handle(
            Phase::Playing,
            &towers,
            &enemies,
            &TowerCatalog::standard(),
            &mut out,
        );

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(2),
                enemy: EnemyId::new(0),
            }]
        );
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut targeting = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            TowerKind::TuxTurret,
            CellCoord::new(0, 0),
            0,
        )]);
        let mut out = Vec::new();

        targeting.handle(
            Phase::Playing,
            &towers,
            &EnemyView::from_snapshots(vec![enemy(0, 3.0, 0.0)]),
            &TowerCatalog::standard(),
            &mut out,
        );
        assert_eq!(out.len(), 1);

        targeting.handle(
            Phase::Playing,
            &towers,
            &EnemyView::from_snapshots(vec![enemy(0, 3.01, 0.0)]),
            &TowerCatalog::standard(),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
