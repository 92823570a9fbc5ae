//! Projectiles in flight.

use nird_defence_core::{CellPoint, EnemyId, ProjectileId, ProjectileKind, ProjectileSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) position: CellPoint,
    pub(crate) target: EnemyId,
    pub(crate) damage: u32,
    pub(crate) speed: f64,
    pub(crate) splash_radius: f64,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            target: self.target,
            damage: self.damage,
            speed: self.speed,
            splash_radius: self.splash_radius,
        }
    }
}

/// Launch parameters for a new projectile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) kind: ProjectileKind,
    pub(crate) origin: CellPoint,
    pub(crate) target: EnemyId,
    pub(crate) damage: u32,
    pub(crate) speed: f64,
    pub(crate) splash_radius: f64,
}

#[derive(Debug)]
pub(crate) struct ProjectileArena {
    entries: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileArena {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.entries.push(Projectile {
            id,
            kind: launch.kind,
            position: launch.origin,
            target: launch.target,
            damage: launch.damage,
            speed: launch.speed,
            splash_radius: launch.splash_radius,
        });
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.index(id).map(move |index| &mut self.entries[index])
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.index(id).map(|index| self.entries.remove(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }

    fn index(&self, id: ProjectileId) -> Option<usize> {
        self.entries
            .binary_search_by_key(&id, |projectile| projectile.id)
            .ok()
    }
}
