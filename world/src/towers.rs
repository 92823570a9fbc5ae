//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use nird_defence_core::{CellCoord, TowerId, TowerKind, TowerSnapshot};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Ticks left before the tower may act again.
    pub(crate) cooldown_remaining: u32,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            cooldown_remaining: self.cooldown_remaining,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new tower with a ready cooldown and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                cell,
                cooldown_remaining: 0,
            },
        );
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Tower standing on the provided cell, if any.
    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn insert_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::TuxTurret, CellCoord::new(1, 1));
        let second = registry.insert(TowerKind::Recycler, CellCoord::new(3, 0));

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        let order: Vec<_> = registry.iter().map(|tower| tower.id).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn occupant_reports_tower_on_cell() {
        let mut registry = TowerRegistry::new();
        let tower = registry.insert(TowerKind::Firewall, CellCoord::new(5, 3));

        assert_eq!(registry.occupant(CellCoord::new(5, 3)), Some(tower));
        assert_eq!(registry.occupant(CellCoord::new(3, 5)), None);
    }
}
