use serde::{Deserialize, Serialize};

use crate::models::{GameInfo, GameSpec, Ticket};
use crate::numbers::{count_primes, even_odd, low_high};
use crate::pricing::{approx_top_prize_odds, batch_cost};

/// Colonnes d'analyse d'une grille.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketProfile {
    pub sum: u32,
    pub evens: usize,
    pub odds: usize,
    pub lows: usize,
    pub highs: usize,
    pub primes: usize,
    pub repeats_from_last: usize,
}

impl TicketProfile {
    pub fn of(ticket: &Ticket, spec: &GameSpec, last_draw: &[u8]) -> Self {
        let numbers = ticket.numbers();
        let (evens, odds) = even_odd(numbers);
        let (lows, highs) = low_high(numbers, spec.low_high_threshold);
        Self {
            sum: ticket.sum(),
            evens,
            odds,
            lows,
            highs,
            primes: count_primes(numbers),
            repeats_from_last: last_draw.iter().filter(|&&n| ticket.contains(n)).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: usize,
    pub total_cost: f64,
    /// 0 pour un lot vide (non applicable).
    pub top_prize_probability: f64,
    pub mean_size: Option<f64>,
    pub size_range: Option<(usize, usize)>,
}

impl BatchSummary {
    pub fn of(games: &[GameInfo], spec: &GameSpec) -> Self {
        let tickets = games.iter().map(|g| &g.ticket);
        let sizes: Vec<usize> = games.iter().map(|g| g.ticket.len()).collect();

        let mean_size = if sizes.is_empty() {
            None
        } else {
            Some(sizes.iter().sum::<usize>() as f64 / sizes.len() as f64)
        };
        let size_range = match (sizes.iter().min(), sizes.iter().max()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        };

        Self {
            games: games.len(),
            total_cost: batch_cost(tickets.clone(), spec.ticket_min, spec.base_price),
            top_prize_probability: approx_top_prize_odds(tickets, spec.ticket_min, spec.target_combination_count),
            mean_size,
            size_range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBreakdown {
    pub strategy: String,
    pub games: usize,
    pub mean_sum: f64,
    pub mean_repeats_from_last: f64,
}

/// Agrégats par stratégie, triés par nombre de grilles décroissant.
pub fn strategy_breakdown(games: &[GameInfo], spec: &GameSpec, last_draw: &[u8]) -> Vec<StrategyBreakdown> {
    // Ordre de première apparition, conservé pour les égalités
    let mut groups: Vec<(String, Vec<TicketProfile>)> = Vec::new();
    for game in games {
        let profile = TicketProfile::of(&game.ticket, spec, last_draw);
        match groups.iter_mut().find(|(label, _)| *label == game.strategy) {
            Some((_, profiles)) => profiles.push(profile),
            None => groups.push((game.strategy.clone(), vec![profile])),
        }
    }

    let mut out: Vec<StrategyBreakdown> = groups
        .into_iter()
        .map(|(strategy, profiles)| {
            let n = profiles.len() as f64;
            StrategyBreakdown {
                strategy,
                games: profiles.len(),
                mean_sum: profiles.iter().map(|p| p.sum as f64).sum::<f64>() / n,
                mean_repeats_from_last: profiles.iter().map(|p| p.repeats_from_last as f64).sum::<f64>() / n,
            }
        })
        .collect();
    out.sort_by(|a, b| b.games.cmp(&a.games));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Variant;

    fn game(id: usize, strategy: &str, numbers: &[u8]) -> GameInfo {
        GameInfo {
            id,
            strategy: strategy.to_string(),
            ticket: Ticket::new(numbers.to_vec(), 60).unwrap(),
        }
    }

    #[test]
    fn test_ticket_profile() {
        let spec = Variant::MegaSena.spec();
        let t = Ticket::new(vec![2, 3, 10, 31, 47, 60], 60).unwrap();
        let p = TicketProfile::of(&t, &spec, &[3, 47, 58]);
        assert_eq!(
            p,
            TicketProfile {
                sum: 153,
                evens: 3,
                odds: 3,
                lows: 3,
                highs: 3,
                primes: 4,
                repeats_from_last: 2,
            }
        );
    }

    #[test]
    fn test_summary_empty_batch() {
        let spec = Variant::MegaSena.spec();
        let s = BatchSummary::of(&[], &spec);
        assert_eq!(s.games, 0);
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.top_prize_probability, 0.0);
        assert_eq!(s.mean_size, None);
        assert_eq!(s.size_range, None);
    }

    #[test]
    fn test_summary() {
        let spec = Variant::MegaSena.spec();
        let games = vec![
            game(1, "A", &[1, 2, 3, 4, 5, 6]),
            game(2, "A", &[1, 2, 3, 4, 5, 6, 7]),
        ];
        let s = BatchSummary::of(&games, &spec);
        assert_eq!(s.games, 2);
        assert!((s.total_cost - 48.0).abs() < 1e-9);
        assert!(s.top_prize_probability > 0.0);
        assert_eq!(s.mean_size, Some(6.5));
        assert_eq!(s.size_range, Some((6, 7)));
    }

    #[test]
    fn test_strategy_breakdown() {
        let spec = Variant::MegaSena.spec();
        let games = vec![
            game(1, "Aléatoire pur", &[1, 2, 3, 4, 5, 6]),
            game(2, "Sans longues suites", &[1, 3, 5, 7, 9, 11]),
            game(3, "Sans longues suites", &[2, 4, 6, 8, 10, 12]),
        ];
        let rows = strategy_breakdown(&games, &spec, &[1, 2]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].strategy, "Sans longues suites");
        assert_eq!(rows[0].games, 2);
        assert!((rows[0].mean_sum - 39.0).abs() < 1e-9);
        assert!((rows[0].mean_repeats_from_last - 1.0).abs() < 1e-9);
        assert_eq!(rows[1].games, 1);
        assert!((rows[1].mean_repeats_from_last - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_strategy_breakdown_empty() {
        let spec = Variant::Lotofacil.spec();
        assert!(strategy_breakdown(&[], &spec, &[]).is_empty());
    }
}
