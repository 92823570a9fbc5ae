use nird_defence_core::Event;
use serde::Serialize;

/// Match statistics tallied from the world's event stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MatchStats {
    /// Ticks processed since the match began.
    pub ticks: u64,
    /// Waves launched.
    pub waves_started: u32,
    /// Waves fully cleared.
    pub waves_cleared: u32,
    /// Enemies released onto the path.
    pub enemies_spawned: u32,
    /// Enemies destroyed by towers.
    pub enemies_defeated: u32,
    /// Enemies that reached the final waypoint.
    pub enemies_escaped: u32,
    /// Lives deducted by escapes.
    pub lives_lost: u32,
    /// Towers built.
    pub towers_placed: u32,
    /// Placement requests refused.
    pub placements_rejected: u32,
    /// Projectiles launched.
    pub projectiles_fired: u32,
    /// Projectiles dropped because their target left play.
    pub projectiles_expired: u32,
    /// Enemy hits resolved, counting each splash victim.
    pub hits_landed: u32,
    /// Health removed from enemies.
    pub damage_dealt: u64,
    /// Currency earned from defeated enemies.
    pub bounty_earned: u64,
    /// Currency earned from passive towers.
    pub income_earned: u64,
    /// Currency spent on towers.
    pub currency_spent: u64,
}

impl MatchStats {
    /// Folds a single event into the tallies.
    pub fn record(&mut self, event: &Event) {
        match *event {
            Event::TimeAdvanced { tick } => self.ticks = tick,
            Event::WaveStarted { .. } => self.waves_started += 1,
            Event::WaveCleared { .. } => self.waves_cleared += 1,
            Event::EnemySpawned { .. } => self.enemies_spawned += 1,
            Event::EnemyEscaped { .. } => self.enemies_escaped += 1,
            Event::LivesLost { count, .. } => self.lives_lost += count,
            Event::TowerPlaced { cost, .. } => {
                self.towers_placed += 1;
                self.currency_spent += u64::from(cost);
            }
            Event::TowerPlacementRejected { .. } => self.placements_rejected += 1,
            Event::IncomeHarvested { amount, .. } => self.income_earned += u64::from(amount),
            Event::ProjectileFired { .. } => self.projectiles_fired += 1,
            Event::ProjectileExpired { .. } => self.projectiles_expired += 1,
            Event::EnemyDamaged { amount, .. } => {
                self.hits_landed += 1;
                self.damage_dealt += u64::from(amount);
            }
            Event::EnemyDefeated { reward, .. } => {
                self.enemies_defeated += 1;
                self.bounty_earned += u64::from(reward);
            }
            Event::MatchReset => *self = Self::default(),
            Event::WaveStartRejected { .. } | Event::PhaseChanged { .. } => {}
        }
    }

    /// Currency earned from every source.
    #[must_use]
    pub fn currency_earned(&self) -> u64 {
        self.bounty_earned + self.income_earned
    }

    /// Share of finished enemies that were destroyed rather than escaping.
    ///
    /// Returns `None` until at least one enemy has left play.
    #[must_use]
    pub fn defence_rate(&self) -> Option<f64> {
        let finished = self.enemies_defeated + self.enemies_escaped;
        if finished == 0 {
            return None;
        }
        Some(f64::from(self.enemies_defeated) / f64::from(finished))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nird_defence_core::{EnemyId, EnemyKind, TowerId};

    #[test]
    fn defence_rate_requires_finished_enemies() {
        let mut stats = MatchStats::default();
        assert_eq!(stats.defence_rate(), None);

        for id in 0..3 {
            stats.record(&Event::EnemyDefeated {
                enemy: EnemyId::new(id),
                kind: EnemyKind::Tracker,
                reward: 5,
            });
        }
        stats.record(&Event::EnemyEscaped {
            enemy: EnemyId::new(3),
            kind: EnemyKind::Tracker,
        });

        assert_eq!(stats.defence_rate(), Some(0.75));
        assert_eq!(stats.bounty_earned, 15);
    }

    #[test]
    fn income_and_bounty_sum_into_currency_earned() {
        let mut stats = MatchStats::default();
        stats.record(&Event::IncomeHarvested {
            tower: TowerId::new(0),
            amount: 20,
        });
        stats.record(&Event::EnemyDefeated {
            enemy: EnemyId::new(0),
            kind: EnemyKind::LicenseBoss,
            reward: 150,
        });

        assert_eq!(stats.currency_earned(), 170);
    }
}
