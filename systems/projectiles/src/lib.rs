#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies homing projectiles and resolves their impacts.

use nird_defence_core::{
    Command, EnemyId, EnemySnapshot, EnemyView, Phase, ProjectileSnapshot, ProjectileView,
    IMPACT_RADIUS,
};

/// Projectile system that emits movement, detonation and discard commands.
#[derive(Debug, Default)]
pub struct Projectiles {
    victims: Vec<EnemyId>,
}

impl Projectiles {
    /// Creates a new projectile system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one command per projectile in flight.
    ///
    /// Targets are re-resolved by identifier every tick. A projectile whose
    /// target has left play is discarded without effect.
    pub fn handle(
        &mut self,
        phase: Phase,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Playing || projectiles.is_empty() {
            return;
        }

        for projectile in projectiles.iter() {
            let Some(target) = enemies.get(projectile.target) else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            if projectile.position.distance(target.position) < IMPACT_RADIUS {
                self.collect_victims(projectile, target, enemies);
                out.push(Command::DetonateProjectile {
                    projectile: projectile.id,
                    victims: self.victims.clone(),
                });
            } else {
                out.push(Command::MoveProjectile {
                    projectile: projectile.id,
                    position: projectile
                        .position
                        .step_toward(target.position, projectile.speed),
                });
            }
        }
    }

    fn collect_victims(
        &mut self,
        projectile: &ProjectileSnapshot,
        target: &EnemySnapshot,
        enemies: &EnemyView,
    ) {
        self.victims.clear();
        if !projectile.is_splash() {
            self.victims.push(target.id);
            return;
        }

        // Splash is centred on the target, not on the projectile.
        let radius = projectile.splash_radius;
        self.victims.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.position.distance(target.position) <= radius)
                .map(|enemy| enemy.id),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nird_defence_core::{CellPoint, EnemyKind, ProjectileId, ProjectileKind};

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

    fn projectile(id: u32, target: u32, x: f64, y: f64, splash_radius: f64) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            kind: if splash_radius > 0.0 {
                ProjectileKind::Frost
            } else {
                ProjectileKind::Bullet
            },
            position: CellPoint::new(x, y),
            target: EnemyId::new(target),
            damage: 12,
            speed: 0.3,
            splash_radius,
        }
    }

    #[test]
    fn orphaned_projectiles_are_discarded() {
        let mut system = Projectiles::new();
        let projectiles = ProjectileView::from_snapshots(vec![projectile(0, 5, 0.0, 0.0, 0.0)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 0.0, 0.0)]);
        let mut out = Vec::new();

        system.handle(Phase::Playing, &projectiles, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::DiscardProjectile {
                projectile: ProjectileId::new(0)
            }]
        );
    }

    #[test]
    fn distant_projectiles_home_in() {
        let mut system = Projectiles::new();
        let projectiles = ProjectileView::from_snapshots(vec![projectile(0, 1, 0.0, 0.0, 0.0)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 0.0, 3.0)]);
        let mut out = Vec::new();

        system.handle(Phase::Playing, &projectiles, &enemies, &mut out);

        let [Command::MoveProjectile { position, .. }] = out.as_slice() else {
            panic!("unexpected commands: {out:?}");
        };
        assert!(position.x().abs() < 1e-6);
        assert!((position.y() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn direct_hit_only_damages_the_target() {
        let mut system = Projectiles::new();
        let projectiles = ProjectileView::from_snapshots(vec![projectile(0, 1, 2.0, 2.0, 0.0)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(0, 2.1, 2.0), enemy(1, 2.2, 2.0)]);
        let mut out = Vec::new();

        system.handle(Phase::Playing, &projectiles, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::DetonateProjectile {
                projectile: ProjectileId::new(0),
                victims: vec![EnemyId::new(1)],
            }]
        );
    }

    #[test]
    fn splash_is_measured_from_the_target() {
        let mut system = Projectiles::new();
        let projectiles = ProjectileView::from_snapshots(vec![projectile(0, 1, 4.6, 4.0, 2.0)]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(0, 2.0, 4.0),
            enemy(1, 5.0, 4.0),
            enemy(2, 7.0, 4.0),
            enemy(3, 7.5, 4.0),
        ]);
        let mut out = Vec::new();

        system.handle(Phase::Playing, &projectiles, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::DetonateProjectile {
                projectile: ProjectileId::new(0),
                victims: vec![EnemyId::new(1), EnemyId::new(2)],
            }]
        );
    }
}
