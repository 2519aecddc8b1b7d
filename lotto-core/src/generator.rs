use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConfigError;
use crate::models::{GameSpec, Ticket};
use crate::numbers::{count_evens, has_long_run};
use crate::stats::FrequencyRow;

pub const BALANCED_MAX_ATTEMPTS: usize = 50;
pub const NO_LONG_RUN_MAX_ATTEMPTS: usize = 100;
/// Taille des groupes "chauds" et "froids".
pub const HOT_COLD_POOL_SIZE: usize = 10;

/// Répartition demandée chaudes / froides / neutres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixSplit {
    pub hot: usize,
    pub cold: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    PureRandom,
    BalancedParity,
    HotColdMix(MixSplit),
    NoLongRun { limit: usize },
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::PureRandom => "Aléatoire pur",
            Strategy::BalancedParity => "Équilibré pair/impair",
            Strategy::HotColdMix(_) => "Chaudes/Froides/Mix",
            Strategy::NoLongRun { .. } => "Sans longues suites",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Strategy::NoLongRun { limit } if *limit < 2 => Err(ConfigError::InvalidRunLimit(*limit)),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classement des numéros selon la table de fréquences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPools {
    pub hot: Vec<u8>,
    pub cold: Vec<u8>,
    pub neutral: Vec<u8>,
}

impl NumberPools {
    /// Chaudes = 10 plus fréquentes, froides = 10 moins fréquentes hors chaudes,
    /// neutres = le reste. Tri stable : les égalités suivent l'ordre de la table.
    pub fn classify(frequencies: &[FrequencyRow], universe_size: u8) -> Self {
        let mut by_count = frequencies.to_vec();

        by_count.sort_by(|a, b| b.count.cmp(&a.count));
        let mut hot: Vec<u8> = by_count.iter().take(HOT_COLD_POOL_SIZE).map(|r| r.number).collect();

        by_count.sort_by(|a, b| a.count.cmp(&b.count));
        let mut cold: Vec<u8> = by_count
            .iter()
            .take(HOT_COLD_POOL_SIZE)
            .map(|r| r.number)
            .filter(|n| !hot.contains(n))
            .collect();

        hot.sort_unstable();
        cold.sort_unstable();

        let neutral = (1..=universe_size)
            .filter(|n| !hot.contains(n) && !cold.contains(n))
            .collect();

        Self { hot, cold, neutral }
    }
}

fn sample_universe<R: Rng + ?Sized>(rng: &mut R, universe_size: u8, size: usize) -> Vec<u8> {
    index::sample(rng, universe_size as usize, size)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect()
}

fn sample_pool<R: Rng + ?Sized>(rng: &mut R, pool: &[u8], amount: usize) -> Vec<u8> {
    index::sample(rng, pool.len(), amount.min(pool.len()))
        .into_iter()
        .map(|i| pool[i])
        .collect()
}

/// Tire jusqu'à `max_attempts` fois ; au-delà, le dernier tirage est gardé tel quel.
fn sample_with_retry<R, F>(rng: &mut R, universe_size: u8, size: usize, max_attempts: usize, accept: F) -> Vec<u8>
where
    R: Rng + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    let mut numbers = sample_universe(rng, universe_size, size);
    for _ in 1..max_attempts {
        if accept(&numbers) {
            return numbers;
        }
        numbers = sample_universe(rng, universe_size, size);
    }
    if !accept(&numbers) {
        trace!(max_attempts, ?numbers, "plafond de tentatives atteint, dernier tirage conservé");
    }
    numbers
}

/// # Panics
/// Si `size > universe_size`.
pub fn pure_random<R: Rng + ?Sized>(rng: &mut R, count: usize, size: usize, universe_size: u8) -> Vec<Ticket> {
    (0..count)
        .map(|_| Ticket::from_unsorted(sample_universe(rng, universe_size, size)))
        .collect()
}

/// Au moins un pair et un impair, sauf si le plafond de tentatives est atteint.
pub fn balanced_parity<R: Rng + ?Sized>(rng: &mut R, count: usize, size: usize, universe_size: u8) -> Vec<Ticket> {
    let balanced = |numbers: &[u8]| {
        let evens = count_evens(numbers);
        evens > 0 && evens < numbers.len()
    };
    (0..count)
        .map(|_| {
            Ticket::from_unsorted(sample_with_retry(
                rng,
                universe_size,
                size,
                BALANCED_MAX_ATTEMPTS,
                balanced,
            ))
        })
        .collect()
}

pub fn hot_cold_mix<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    size: usize,
    universe_size: u8,
    pools: &NumberPools,
    split: MixSplit,
) -> Vec<Ticket> {
    let want_hot = split.hot.min(size);
    let want_cold = split.cold.min(size - want_hot);
    let want_neutral = split.neutral.min(size - want_hot - want_cold);

    (0..count)
        .map(|_| {
            let mut numbers = Vec::with_capacity(size);
            numbers.extend(sample_pool(rng, &pools.hot, want_hot));
            numbers.extend(sample_pool(rng, &pools.cold, want_cold));
            numbers.extend(sample_pool(rng, &pools.neutral, want_neutral));

            // Complément uniforme parmi les numéros non encore pris
            if numbers.len() < size {
                let rest: Vec<u8> = (1..=universe_size).filter(|n| !numbers.contains(n)).collect();
                let missing = size - numbers.len();
                numbers.extend(sample_pool(rng, &rest, missing));
            }

            Ticket::from_unsorted(numbers)
        })
        .collect()
}

/// Pas de suite de `limit` entiers consécutifs, sauf si le plafond est atteint.
pub fn no_long_run<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    size: usize,
    universe_size: u8,
    limit: usize,
) -> Vec<Ticket> {
    (0..count)
        .map(|_| {
            Ticket::from_unsorted(sample_with_retry(
                rng,
                universe_size,
                size,
                NO_LONG_RUN_MAX_ATTEMPTS,
                |numbers| !has_long_run(numbers, limit),
            ))
        })
        .collect()
}

/// Générateur lié à une variante et à une table de fréquences figée pour le lot.
pub struct Generator {
    spec: GameSpec,
    pools: NumberPools,
    rng: StdRng,
}

impl Generator {
    pub fn new(spec: &GameSpec, frequencies: &[FrequencyRow], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            spec: spec.clone(),
            pools: NumberPools::classify(frequencies, spec.universe_size),
            rng,
        }
    }

    pub fn spec(&self) -> &GameSpec {
        &self.spec
    }

    pub fn pools(&self) -> &NumberPools {
        &self.pools
    }

    pub fn generate(&mut self, strategy: &Strategy, count: usize, size: usize) -> Result<Vec<Ticket>, ConfigError> {
        self.spec.check_ticket_size(size)?;
        strategy.validate()?;

        let n = self.spec.universe_size;
        let tickets = match *strategy {
            Strategy::PureRandom => pure_random(&mut self.rng, count, size, n),
            Strategy::BalancedParity => balanced_parity(&mut self.rng, count, size, n),
            Strategy::HotColdMix(split) => hot_cold_mix(&mut self.rng, count, size, n, &self.pools, split),
            Strategy::NoLongRun { limit } => no_long_run(&mut self.rng, count, size, n, limit),
        };
        Ok(tickets)
    }
}
