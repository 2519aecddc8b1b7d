use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pricing::binomial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    MegaSena,
    Lotofacil,
}

impl Variant {
    pub fn spec(&self) -> GameSpec {
        match self {
            Variant::MegaSena => GameSpec {
                universe_size: 60,
                ticket_min: 6,
                ticket_max: 15,
                draw_size: 6,
                base_price: 6.00,
                low_high_threshold: 30,
                target_combination_count: binomial(60, 6),
            },
            Variant::Lotofacil => GameSpec {
                universe_size: 25,
                ticket_min: 15,
                ticket_max: 20,
                draw_size: 15,
                base_price: 3.50,
                low_high_threshold: 13,
                target_combination_count: binomial(25, 15),
            },
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::MegaSena => write!(f, "Mega-Sena"),
            Variant::Lotofacil => write!(f, "Lotofácil"),
        }
    }
}

/// Règles fixes d'une loterie.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSpec {
    pub universe_size: u8,
    pub ticket_min: usize,
    pub ticket_max: usize,
    pub draw_size: usize,
    pub base_price: f64,
    pub low_high_threshold: u8,
    pub target_combination_count: u64,
}

impl GameSpec {
    pub fn new(
        universe_size: u8,
        ticket_min: usize,
        ticket_max: usize,
        draw_size: usize,
        base_price: f64,
        low_high_threshold: u8,
    ) -> Result<Self, ConfigError> {
        let spec = GameSpec {
            universe_size,
            ticket_min,
            ticket_max,
            draw_size,
            base_price,
            low_high_threshold,
            target_combination_count: binomial(universe_size as u64, draw_size as u64),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Vérifie 1 <= ticket_min <= draw_size <= ticket_max <= universe_size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.universe_size as usize;
        if self.ticket_min < 1
            || self.ticket_min > self.draw_size
            || self.draw_size > self.ticket_max
            || self.ticket_max > n
        {
            return Err(ConfigError::InvalidSpec(format!(
                "attendu 1 <= {} <= {} <= {} <= {}",
                self.ticket_min, self.draw_size, self.ticket_max, n
            )));
        }
        if self.base_price.is_nan() || self.base_price < 0.0 {
            return Err(ConfigError::InvalidSpec(format!("prix de base {}", self.base_price)));
        }
        Ok(())
    }

    pub fn universe(&self) -> impl Iterator<Item = u8> {
        1..=self.universe_size
    }

    pub fn check_ticket_size(&self, size: usize) -> Result<(), ConfigError> {
        if size < self.ticket_min || size > self.ticket_max {
            return Err(ConfigError::TicketSizeOutOfRange {
                size,
                min: self.ticket_min,
                max: self.ticket_max,
            });
        }
        Ok(())
    }
}

/// Un tirage officiel, tel que fourni par le chargeur d'historique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub contest_id: u32,
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
}

/// Historique trié par numéro de concours, sans doublon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTable {
    records: Vec<HistoryRecord>,
}

impl HistoryTable {
    /// Normalise la sortie du chargeur : numéros triés, concours triés,
    /// en cas de doublon le dernier enregistrement lu l'emporte.
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let mut records: Vec<HistoryRecord> = records
            .into_iter()
            .map(|mut r| {
                r.numbers.sort_unstable();
                r
            })
            .collect();

        // Tri stable puis dédoublonnage en gardant la dernière occurrence
        records.sort_by_key(|r| r.contest_id);
        let mut out: Vec<HistoryRecord> = Vec::with_capacity(records.len());
        for record in records {
            match out.last_mut() {
                Some(last) if last.contest_id == record.contest_id => *last = record,
                _ => out.push(record),
            }
        }

        Self { records: out }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn max_contest_id(&self) -> Option<u32> {
        self.records.iter().map(|r| r.contest_id).max()
    }

    /// Les `n` derniers concours, toujours dans l'ordre croissant.
    pub fn last(&self, n: usize) -> HistoryTable {
        let start = self.records.len().saturating_sub(n);
        HistoryTable {
            records: self.records[start..].to_vec(),
        }
    }
}

/// Grille : ensemble de numéros distincts, stocké trié.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(Vec<u8>);

impl Ticket {
    pub fn new(numbers: Vec<u8>, universe_size: u8) -> Result<Self, ConfigError> {
        for &n in &numbers {
            if n < 1 || n > universe_size {
                return Err(ConfigError::OutOfRange {
                    label: "Grille",
                    number: n,
                    universe: universe_size,
                });
            }
        }
        let ticket = Self::from_unsorted(numbers);
        if let Some(w) = ticket.0.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Duplicate { label: "Grille", number: w[0] });
        }
        Ok(ticket)
    }

    pub(crate) fn from_unsorted(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::numbers::format_numbers(&self.0))
    }
}

/// Unité visible d'un lot généré. `id` n'est stable qu'à l'intérieur du lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: usize,
    pub strategy: String,
    pub ticket: Ticket,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(contest_id: u32, numbers: &[u8]) -> HistoryRecord {
        HistoryRecord {
            contest_id,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            numbers: numbers.to_vec(),
        }
    }

    #[test]
    fn test_variant_specs_valid() {
        for variant in [Variant::MegaSena, Variant::Lotofacil] {
            assert!(variant.spec().validate().is_ok(), "{variant}");
        }
    }

    #[test]
    fn test_variant_target_counts() {
        assert_eq!(Variant::MegaSena.spec().target_combination_count, 50_063_860);
        assert_eq!(Variant::Lotofacil.spec().target_combination_count, 3_268_760);
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::MegaSena.to_string(), "Mega-Sena");
        assert_eq!(Variant::Lotofacil.to_string(), "Lotofácil");
    }

    #[test]
    fn test_spec_invariant_rejected() {
        assert!(GameSpec::new(60, 7, 15, 6, 6.0, 30).is_err());
        assert!(GameSpec::new(10, 1, 11, 6, 1.0, 5).is_err());
        assert!(GameSpec::new(10, 0, 6, 6, 1.0, 5).is_err());
        assert!(GameSpec::new(2, 1, 2, 2, 1.0, 1).is_ok());
    }

    #[test]
    fn test_check_ticket_size() {
        let spec = Variant::MegaSena.spec();
        assert!(spec.check_ticket_size(6).is_ok());
        assert!(spec.check_ticket_size(15).is_ok());
        assert!(spec.check_ticket_size(5).is_err());
        assert!(spec.check_ticket_size(16).is_err());
    }

    #[test]
    fn test_history_normalized() {
        let table = HistoryTable::from_records(vec![
            record(3, &[9, 1, 5]),
            record(1, &[4, 2, 3]),
            record(3, &[7, 8, 6]),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].contest_id, 1);
        assert_eq!(table.records()[0].numbers, vec![2, 3, 4]);
        // Le dernier doublon lu l'emporte
        assert_eq!(table.records()[1].numbers, vec![6, 7, 8]);
        assert_eq!(table.max_contest_id(), Some(3));
        assert_eq!(table.latest().unwrap().contest_id, 3);
    }

    #[test]
    fn test_history_last_window() {
        let table = HistoryTable::from_records((1..=5).map(|i| record(i, &[1, 2])).collect());
        let recent = table.last(2);
        let ids: Vec<u32> = recent.records().iter().map(|r| r.contest_id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(table.last(10).len(), 5);
        assert!(table.last(0).is_empty());
    }

    #[test]
    fn test_empty_history() {
        let table = HistoryTable::default();
        assert!(table.is_empty());
        assert_eq!(table.max_contest_id(), None);
        assert!(table.latest().is_none());
    }

    #[test]
    fn test_ticket_new_sorts() {
        let ticket = Ticket::new(vec![12, 3, 7], 60).unwrap();
        assert_eq!(ticket.numbers(), &[3, 7, 12]);
        assert_eq!(ticket.sum(), 22);
        assert!(ticket.contains(7));
        assert!(!ticket.contains(8));
        assert_eq!(ticket.to_string(), "03 - 07 - 12");
    }

    #[test]
    fn test_ticket_new_rejects_invalid() {
        assert!(matches!(
            Ticket::new(vec![0, 1], 60),
            Err(ConfigError::OutOfRange { number: 0, .. })
        ));
        assert!(matches!(
            Ticket::new(vec![26], 25),
            Err(ConfigError::OutOfRange { number: 26, .. })
        ));
        assert!(matches!(
            Ticket::new(vec![5, 2, 5], 60),
            Err(ConfigError::Duplicate { number: 5, .. })
        ));
    }
}
