//! Final match report.

use std::io::Write;

use anyhow::Result;
use nird_defence_core::{MatchStatus, Phase};
use nird_defence_system_analytics::MatchStats;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    outcome: &'static str,
    status: MatchStatus,
    stats: &'a MatchStats,
    currency_earned: u64,
    defence_rate: Option<f64>,
}

impl<'a> Report<'a> {
    pub(crate) fn new(status: MatchStatus, stats: &'a MatchStats) -> Self {
        let outcome = match status.phase {
            Phase::Won => "won",
            Phase::Lost => "lost",
            Phase::Idle | Phase::Playing => "unfinished",
        };
        Self {
            outcome,
            status,
            stats,
            currency_earned: stats.currency_earned(),
            defence_rate: stats.defence_rate(),
        }
    }

    pub(crate) fn write_json(&self, writer: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    pub(crate) fn write_text(&self, writer: &mut impl Write) -> Result<()> {
        let status = &self.status;
        let stats = self.stats;
        writeln!(writer, "outcome:          {}", self.outcome)?;
        writeln!(
            writer,
            "waves:            {}/{} launched, {} cleared",
            status.wave_index, status.wave_count, stats.waves_cleared
        )?;
        writeln!(writer, "ticks:            {}", status.tick)?;
        writeln!(writer, "lives:            {}", status.lives)?;
        writeln!(writer, "currency:         {}", status.currency)?;
        writeln!(
            writer,
            "enemies:          {} spawned, {} defeated, {} escaped",
            stats.enemies_spawned, stats.enemies_defeated, stats.enemies_escaped
        )?;
        writeln!(
            writer,
            "projectiles:      {} fired, {} hits, {} damage",
            stats.projectiles_fired, stats.hits_landed, stats.damage_dealt
        )?;
        writeln!(
            writer,
            "economy:          {} earned ({} bounty, {} income), {} spent",
            self.currency_earned, stats.bounty_earned, stats.income_earned, stats.currency_spent
        )?;
        if let Some(rate) = self.defence_rate {
            writeln!(writer, "defence rate:     {:.1}%", rate * 100.0)?;
        }
        Ok(())
    }
}
