use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{GameSpec, Ticket};
use crate::numbers::{count_evens, count_primes, low_high, validate_numbers};

/// Intervalle fermé ; une borne absente ne contraint pas ce côté.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Bounds {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn validate(&self, label: &'static str) -> Result<(), ConfigError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(ConfigError::InvalidBounds { label, min, max }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub fixed: Vec<u8>,
    pub forbidden: Vec<u8>,
    pub sum: Bounds,
    pub evens: Bounds,
    pub primes: Bounds,
    pub lows: Bounds,
    pub max_repeat_last: Option<usize>,
}

impl FilterConfig {
    /// À appeler avant le filtrage : `TicketFilter` ne revérifie rien.
    pub fn validate(&self, spec: &GameSpec) -> Result<(), ConfigError> {
        validate_numbers(&self.fixed, spec.universe_size, "Fixes")?;
        validate_numbers(&self.forbidden, spec.universe_size, "Interdits")?;

        let mut conflict: Vec<u8> = self
            .fixed
            .iter()
            .copied()
            .filter(|n| self.forbidden.contains(n))
            .collect();
        if !conflict.is_empty() {
            conflict.sort_unstable();
            return Err(ConfigError::FixedForbiddenConflict(conflict));
        }

        self.sum.validate("Somme")?;
        self.evens.validate("Pairs")?;
        self.primes.validate("Premiers")?;
        self.lows.validate("Bas")?;
        Ok(())
    }
}

/// Premier critère non respecté par une grille.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFixed(u8),
    Forbidden(u8),
    Sum(u32),
    Evens(usize),
    Primes(usize),
    Lows(usize),
    RepeatsLast(usize),
}

#[derive(Debug, Clone)]
pub struct TicketFilter {
    config: FilterConfig,
    low_high_threshold: u8,
    last_draw: Vec<u8>,
}

impl TicketFilter {
    /// `last_draw` : numéros du concours le plus récent (vide sans historique).
    pub fn new(config: FilterConfig, spec: &GameSpec, last_draw: &[u8]) -> Self {
        Self {
            config,
            low_high_threshold: spec.low_high_threshold,
            last_draw: last_draw.to_vec(),
        }
    }

    pub fn unrestricted(spec: &GameSpec) -> Self {
        Self::new(FilterConfig::default(), spec, &[])
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Critères évalués dans l'ordre, arrêt au premier échec.
    pub fn check(&self, ticket: &Ticket) -> Result<(), Rejection> {
        let c = &self.config;
        let numbers = ticket.numbers();

        if let Some(&n) = c.fixed.iter().find(|&&n| !ticket.contains(n)) {
            return Err(Rejection::MissingFixed(n));
        }
        if let Some(&n) = c.forbidden.iter().find(|&&n| ticket.contains(n)) {
            return Err(Rejection::Forbidden(n));
        }

        let sum = ticket.sum();
        if !c.sum.contains(sum) {
            return Err(Rejection::Sum(sum));
        }

        let evens = count_evens(numbers);
        if !c.evens.contains(evens as u32) {
            return Err(Rejection::Evens(evens));
        }

        let primes = count_primes(numbers);
        if !c.primes.contains(primes as u32) {
            return Err(Rejection::Primes(primes));
        }

        let (lows, _) = low_high(numbers, self.low_high_threshold);
        if !c.lows.contains(lows as u32) {
            return Err(Rejection::Lows(lows));
        }

        if let Some(max) = c.max_repeat_last {
            let repeats = self.last_draw.iter().filter(|&&n| ticket.contains(n)).count();
            if repeats > max {
                return Err(Rejection::RepeatsLast(repeats));
            }
        }

        Ok(())
    }

    pub fn accepts(&self, ticket: &Ticket) -> bool {
        self.check(ticket).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Variant;

    fn ticket(numbers: &[u8]) -> Ticket {
        Ticket::new(numbers.to_vec(), 60).unwrap()
    }

    fn filter(config: FilterConfig) -> TicketFilter {
        TicketFilter::new(config, &Variant::MegaSena.spec(), &[5, 15, 25, 35, 45, 55])
    }

    #[test]
    fn test_unrestricted_accepts_all() {
        let f = TicketFilter::unrestricted(&Variant::MegaSena.spec());
        assert!(f.accepts(&ticket(&[1, 2, 3, 4, 5, 6])));
        assert!(f.accepts(&ticket(&[55, 56, 57, 58, 59, 60])));
    }

    #[test]
    fn test_forbidden_wins_over_fixed() {
        let f = filter(FilterConfig {
            fixed: vec![10, 11, 12],
            forbidden: vec![1],
            ..Default::default()
        });
        let t = ticket(&[1, 2, 3, 10, 11, 12]);
        assert_eq!(f.check(&t), Err(Rejection::Forbidden(1)));
        assert!(!f.accepts(&t));
    }

    #[test]
    fn test_missing_fixed_checked_first() {
        let f = filter(FilterConfig {
            fixed: vec![10, 11, 12],
            forbidden: vec![1],
            ..Default::default()
        });
        assert_eq!(f.check(&ticket(&[1, 2, 3, 4, 11, 12])), Err(Rejection::MissingFixed(10)));
        assert!(f.accepts(&ticket(&[2, 3, 4, 10, 11, 12])));
    }

    #[test]
    fn test_sum_bounds() {
        let f = filter(FilterConfig {
            sum: Bounds::new(Some(21), Some(30)),
            ..Default::default()
        });
        assert!(f.accepts(&ticket(&[1, 2, 3, 4, 5, 6])));
        assert_eq!(f.check(&ticket(&[1, 2, 3, 4, 5, 20])), Err(Rejection::Sum(35)));

        let open_max = filter(FilterConfig {
            sum: Bounds::new(Some(100), None),
            ..Default::default()
        });
        assert!(!open_max.accepts(&ticket(&[1, 2, 3, 4, 5, 6])));
        assert!(open_max.accepts(&ticket(&[55, 56, 57, 58, 59, 60])));
    }

    #[test]
    fn test_evens_bounds() {
        let f = filter(FilterConfig {
            evens: Bounds::new(Some(2), Some(4)),
            ..Default::default()
        });
        assert!(f.accepts(&ticket(&[1, 2, 3, 4, 5, 7])));
        assert_eq!(f.check(&ticket(&[2, 4, 6, 8, 10, 1])), Err(Rejection::Evens(5)));
        assert_eq!(f.check(&ticket(&[1, 3, 5, 7, 9, 11])), Err(Rejection::Evens(0)));
    }

    #[test]
    fn test_primes_bounds() {
        let f = filter(FilterConfig {
            primes: Bounds::new(None, Some(1)),
            ..Default::default()
        });
        assert!(f.accepts(&ticket(&[1, 4, 6, 8, 9, 59])));
        assert_eq!(f.check(&ticket(&[2, 3, 4, 6, 8, 9])), Err(Rejection::Primes(2)));
    }

    #[test]
    fn test_lows_bounds() {
        let f = filter(FilterConfig {
            lows: Bounds::new(Some(3), Some(3)),
            ..Default::default()
        });
        assert!(f.accepts(&ticket(&[1, 2, 30, 31, 40, 50])));
        assert_eq!(f.check(&ticket(&[1, 2, 3, 4, 40, 50])), Err(Rejection::Lows(4)));
    }

    #[test]
    fn test_repeats_from_last_draw() {
        let f = filter(FilterConfig {
            max_repeat_last: Some(1),
            ..Default::default()
        });
        assert!(f.accepts(&ticket(&[5, 6, 7, 8, 9, 10])));
        assert_eq!(f.check(&ticket(&[5, 15, 7, 8, 9, 10])), Err(Rejection::RepeatsLast(2)));
    }

    #[test]
    fn test_short_circuit_order() {
        // Échoue sur la somme et sur les pairs : la somme est rapportée
        let f = filter(FilterConfig {
            sum: Bounds::new(None, Some(10)),
            evens: Bounds::new(Some(6), None),
            ..Default::default()
        });
        assert_eq!(f.check(&ticket(&[1, 3, 5, 7, 9, 11])), Err(Rejection::Sum(36)));
    }

    #[test]
    fn test_primes_table_fixed_for_lotofacil() {
        let spec = Variant::Lotofacil.spec();
        let f = TicketFilter::new(
            FilterConfig {
                primes: Bounds::new(Some(9), Some(9)),
                ..Default::default()
            },
            &spec,
            &[],
        );
        let t = Ticket::new((1..=15).chain([17, 19, 23, 24, 25]).collect(), 25).unwrap();
        // Premiers <= 25 : 2 3 5 7 11 13 17 19 23
        assert!(f.accepts(&t));
    }

    #[test]
    fn test_validate_conflict() {
        let spec = Variant::MegaSena.spec();
        let config = FilterConfig {
            fixed: vec![12, 3, 7],
            forbidden: vec![7, 3],
            ..Default::default()
        };
        assert_eq!(config.validate(&spec), Err(ConfigError::FixedForbiddenConflict(vec![3, 7])));
    }

    #[test]
    fn test_validate_ranges_and_bounds() {
        let spec = Variant::Lotofacil.spec();
        let out_of_range = FilterConfig {
            fixed: vec![26],
            ..Default::default()
        };
        assert!(matches!(out_of_range.validate(&spec), Err(ConfigError::OutOfRange { number: 26, .. })));

        let inverted = FilterConfig {
            sum: Bounds::new(Some(250), Some(200)),
            ..Default::default()
        };
        assert_eq!(
            inverted.validate(&spec),
            Err(ConfigError::InvalidBounds { label: "Somme", min: 250, max: 200 })
        );

        let inverted_lows = FilterConfig {
            lows: Bounds::new(Some(9), Some(2)),
            ..Default::default()
        };
        assert!(matches!(inverted_lows.validate(&spec), Err(ConfigError::InvalidBounds { label: "Bas", .. })));

        assert!(FilterConfig::default().validate(&spec).is_ok());
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::default();
        assert!(b.contains(0));
        assert!(b.contains(u32::MAX));
        let b = Bounds::new(Some(2), Some(4));
        assert!(!b.contains(1));
        assert!(b.contains(2));
        assert!(b.contains(4));
        assert!(!b.contains(5));
    }
}
