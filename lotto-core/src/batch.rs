use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{MAX_BATCH_COUNT, apply_budget};
use crate::error::ConfigError;
use crate::filter::TicketFilter;
use crate::generator::{Generator, Strategy};
use crate::models::{GameInfo, GameSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub strategy: Strategy,
    pub count: usize,
}

/// Une ou plusieurs stratégies, générées dans l'ordre, même taille de grille.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub size: usize,
    pub entries: Vec<PlanEntry>,
}

impl GenerationPlan {
    pub fn single(strategy: Strategy, count: usize, size: usize) -> Self {
        Self {
            size,
            entries: vec![PlanEntry { strategy, count }],
        }
    }

    pub fn total_count(&self) -> usize {
        self.entries.iter().fold(0usize, |acc, e| acc.saturating_add(e.count))
    }

    pub fn validate(&self, spec: &GameSpec) -> Result<(), ConfigError> {
        spec.check_ticket_size(self.size)?;
        for entry in &self.entries {
            entry.strategy.validate()?;
            if entry.count > MAX_BATCH_COUNT {
                return Err(ConfigError::CountTooLarge {
                    count: entry.count,
                    max: MAX_BATCH_COUNT,
                });
            }
        }
        Ok(())
    }
}

/// Génère, filtre, numérote à partir de 1 puis applique le budget.
pub fn build_batch(
    generator: &mut Generator,
    plan: &GenerationPlan,
    filter: &TicketFilter,
    budget: f64,
) -> Result<Vec<GameInfo>, ConfigError> {
    plan.validate(generator.spec())?;

    let fixed = filter.config().fixed.len();
    if fixed > plan.size {
        return Err(ConfigError::TooManyFixed { fixed, size: plan.size });
    }

    let mut accepted = Vec::new();
    for entry in &plan.entries {
        let tickets = generator.generate(&entry.strategy, entry.count, plan.size)?;
        let generated = tickets.len();
        accepted.extend(
            tickets
                .into_iter()
                .filter(|t| filter.accepts(t))
                .map(|t| (entry.strategy.label(), t)),
        );
        debug!(strategy = entry.strategy.label(), generated, "grilles générées");
    }

    let games: Vec<GameInfo> = accepted
        .into_iter()
        .enumerate()
        .map(|(i, (label, ticket))| GameInfo {
            id: i + 1,
            strategy: label.to_string(),
            ticket,
        })
        .collect();
    let accepted_count = games.len();

    let games = apply_budget(games, generator.spec(), budget);
    debug!(
        requested = plan.total_count(),
        accepted = accepted_count,
        kept = games.len(),
        budget,
        "lot construit"
    );
    Ok(games)
}
