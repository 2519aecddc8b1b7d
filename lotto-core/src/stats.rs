//! Statistiques sur l'historique des tirages.
//!
//! Toutes les fonctions sont pures : mêmes entrées, même sortie, ce qui
//! permet à l'appelant de les mémoïser sur (historique, draw_size, universe_size).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::HistoryTable;
use crate::numbers::{even_odd, low_high};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub number: u8,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRow {
    pub number: u8,
    pub frequency: u32,
    pub last_seen: Option<u32>,
    pub delay: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPattern {
    pub contest_id: u32,
    pub evens: usize,
    pub odds: usize,
    pub lows: usize,
    pub highs: usize,
}

/// Nombre de tirages partageant une même répartition (pairs/impairs ou bas/hauts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCount {
    pub split: (usize, usize),
    pub draws: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternReport {
    pub per_draw: Vec<DrawPattern>,
    pub parity: Vec<SplitCount>,
    pub range: Vec<SplitCount>,
}

/// Tranche de somme `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SumBin {
    pub lower: u32,
    pub upper: u32,
}

pub const SUM_BINS: [SumBin; 6] = [
    SumBin { lower: 0, upper: 150 },
    SumBin { lower: 150, upper: 200 },
    SumBin { lower: 200, upper: 250 },
    SumBin { lower: 250, upper: 300 },
    SumBin { lower: 300, upper: 350 },
    SumBin { lower: 350, upper: 500 },
];

impl SumBin {
    pub fn for_sum(sum: u32) -> Option<SumBin> {
        SUM_BINS.iter().copied().find(|b| b.contains(sum))
    }

    pub fn contains(&self, sum: u32) -> bool {
        sum > self.lower && sum <= self.upper
    }
}

impl std::fmt::Display for SumBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lower == 0 {
            write!(f, "0-{}", self.upper)
        } else {
            write!(f, "{}-{}", self.lower + 1, self.upper)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSum {
    pub contest_id: u32,
    pub sum: u32,
    /// `None` : somme hors de toutes les tranches.
    pub bin: Option<SumBin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCount {
    pub bin: Option<SumBin>,
    pub draws: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumReport {
    pub per_draw: Vec<DrawSum>,
    pub bins: Vec<BinCount>,
}

pub fn frequency(history: &HistoryTable, draw_size: usize, universe_size: u8) -> Vec<FrequencyRow> {
    let mut counts = vec![0u32; universe_size as usize];

    for record in history.records() {
        for &n in record.numbers.iter().take(draw_size) {
            let idx = (n as usize).wrapping_sub(1);
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    (1..=universe_size)
        .map(|number| FrequencyRow {
            number,
            count: counts[(number - 1) as usize],
        })
        .collect()
}

pub fn delay(
    frequencies: &[FrequencyRow],
    history: &HistoryTable,
    draw_size: usize,
    universe_size: u8,
) -> Vec<DelayRow> {
    let mut last_seen: Vec<Option<u32>> = vec![None; universe_size as usize];

    for record in history.records() {
        for &n in record.numbers.iter().take(draw_size) {
            let idx = (n as usize).wrapping_sub(1);
            if idx < last_seen.len() {
                last_seen[idx] = Some(last_seen[idx].map_or(record.contest_id, |s| s.max(record.contest_id)));
            }
        }
    }

    let max_contest = history.max_contest_id();

    (1..=universe_size)
        .map(|number| {
            let seen = last_seen[(number - 1) as usize];
            let frequency = frequencies
                .iter()
                .find(|r| r.number == number)
                .map_or(0, |r| r.count);
            DelayRow {
                number,
                frequency,
                last_seen: seen,
                delay: match (max_contest, seen) {
                    (Some(max), Some(s)) => Some(max - s),
                    _ => None,
                },
            }
        })
        .collect()
}

pub fn pattern_distribution(history: &HistoryTable, draw_size: usize, low_high_threshold: u8) -> PatternReport {
    let per_draw: Vec<DrawPattern> = history
        .records()
        .iter()
        .map(|record| {
            let numbers = &record.numbers[..draw_size.min(record.numbers.len())];
            let (evens, odds) = even_odd(numbers);
            let (lows, highs) = low_high(numbers, low_high_threshold);
            DrawPattern {
                contest_id: record.contest_id,
                evens,
                odds,
                lows,
                highs,
            }
        })
        .collect();

    let parity = group_counts(per_draw.iter().map(|p| (p.evens, p.odds)));
    let range = group_counts(per_draw.iter().map(|p| (p.lows, p.highs)));

    PatternReport {
        per_draw,
        parity,
        range,
    }
}

/// Comptage par clé, trié par effectif décroissant (égalités : clé croissante).
fn group_counts(keys: impl Iterator<Item = (usize, usize)>) -> Vec<SplitCount> {
    let mut groups: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for key in keys {
        *groups.entry(key).or_default() += 1;
    }
    let mut out: Vec<SplitCount> = groups
        .into_iter()
        .map(|(split, draws)| SplitCount { split, draws })
        .collect();
    out.sort_by(|a, b| b.draws.cmp(&a.draws));
    out
}

pub fn sum_distribution(history: &HistoryTable, draw_size: usize) -> SumReport {
    let per_draw: Vec<DrawSum> = history
        .records()
        .iter()
        .map(|record| {
            let sum: u32 = record.numbers.iter().take(draw_size).map(|&n| n as u32).sum();
            DrawSum {
                contest_id: record.contest_id,
                sum,
                bin: SumBin::for_sum(sum),
            }
        })
        .collect();

    let mut bins: Vec<BinCount> = SUM_BINS
        .iter()
        .map(|&bin| BinCount {
            bin: Some(bin),
            draws: per_draw.iter().filter(|d| d.bin == Some(bin)).count(),
        })
        .collect();

    let unbinned = per_draw.iter().filter(|d| d.bin.is_none()).count();
    if unbinned > 0 {
        bins.push(BinCount {
            bin: None,
            draws: unbinned,
        });
    }

    SumReport { per_draw, bins }
}

/// Les `k` numéros les plus fréquents (égalités : numéro croissant).
pub fn top_by_frequency(rows: &[FrequencyRow], k: usize) -> Vec<FrequencyRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    sorted.truncate(k);
    sorted
}

/// Les `k` numéros les plus en retard ; jamais tirés en dernier.
pub fn top_by_delay(rows: &[DelayRow], k: usize) -> Vec<DelayRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        match (a.delay, b.delay) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then(b.frequency.cmp(&a.frequency))
        .then(a.number.cmp(&b.number))
    });
    sorted.truncate(k);
    sorted
}

/// Les `last_n` dernières sommes, par concours croissant.
pub fn sum_series(report: &SumReport, last_n: usize) -> Vec<(u32, u32)> {
    let mut series: Vec<(u32, u32)> = report.per_draw.iter().map(|d| (d.contest_id, d.sum)).collect();
    series.sort_by_key(|&(contest, _)| contest);
    let start = series.len().saturating_sub(last_n);
    series.split_off(start)
}
