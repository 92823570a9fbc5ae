//! Enemy arena owned by the world.

use nird_defence_core::{
    CellPoint, EnemyId, EnemyKind, EnemySnapshot, EnemyStats, SLOWED_FACTOR,
};

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) path_index: usize,
    pub(crate) progress: f64,
    pub(crate) position: CellPoint,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f64,
    pub(crate) slow_factor: f64,
}

impl Enemy {
    /// Applies an impact, returning the health actually removed.
    pub(crate) fn take_hit(&mut self, damage: u32, slows: bool) -> u32 {
        let dealt = damage.min(self.health);
        self.health -= dealt;
        if slows {
            self.slow_factor = SLOWED_FACTOR;
        }
        dealt
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            path_index: self.path_index,
            progress: self.progress,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            slow_factor: self.slow_factor,
        }
    }
}

/// Enemies stored in spawn order.
///
/// Identifiers are allocated monotonically, so the backing vector stays sorted
/// by id and lookups can binary search.
#[derive(Debug)]
pub(crate) struct EnemyArena {
    entries: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyArena {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, kind: EnemyKind, stats: EnemyStats, at: CellPoint) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        self.entries.push(Enemy {
            id,
            kind,
            path_index: 0,
            progress: 0.0,
            position: at,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            slow_factor: 1.0,
        });
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.index(id).map(|index| &self.entries[index])
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.index(id).map(move |index| &mut self.entries[index])
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.index(id).map(|index| self.entries.remove(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index(&self, id: EnemyId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |enemy| enemy.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> EnemyStats {
        EnemyStats {
            health: 30,
            speed: 0.1,
            reward: 4,
        }
    }

    #[test]
    fn identifiers_increase_in_spawn_order() {
        let mut arena = EnemyArena::new();
        let first = arena.spawn(EnemyKind::Tracker, stats(), CellPoint::default());
        let second = arena.spawn(EnemyKind::Bloatware, stats(), CellPoint::default());
        assert!(first < second);

        let removed = arena.remove(first).expect("first enemy exists");
        assert_eq!(removed.kind, EnemyKind::Tracker);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second).map(|enemy| enemy.kind), Some(EnemyKind::Bloatware));
    }

    #[test]
    fn hits_never_push_health_below_zero() {
        let mut arena = EnemyArena::new();
        let id = arena.spawn(EnemyKind::Tracker, stats(), CellPoint::default());
        let enemy = arena.get_mut(id).expect("enemy exists");

        assert_eq!(enemy.take_hit(12, false), 12);
        assert_eq!(enemy.take_hit(50, true), 18);
        assert_eq!(enemy.health, 0);
        assert_eq!(enemy.slow_factor, SLOWED_FACTOR);
        assert_eq!(enemy.take_hit(12, false), 0);
    }
}
