use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

use lotto_core::models::{GameSpec, HistoryRecord, HistoryTable};

/// Accepte JJ/MM/AAAA (export officiel) ou AAAA-MM-JJ.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

fn parse_record(record: &csv::StringRecord, spec: &GameSpec) -> Result<HistoryRecord> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    if record.len() < 2 + spec.draw_size {
        bail!(
            "{} champs trouvés, {} attendus (concours;date;{} numéros)",
            record.len(),
            2 + spec.draw_size,
            spec.draw_size
        );
    }

    let raw_contest = get(0)?;
    let contest_id: u32 = raw_contest
        .parse()
        .with_context(|| format!("Numéro de concours invalide: '{}'", raw_contest))?;
    let date = parse_date(get(1)?)?;

    let mut numbers = Vec::with_capacity(spec.draw_size);
    for idx in 2..2 + spec.draw_size {
        let s = get(idx)?;
        let n: u8 = s
            .parse()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))?;
        if n < 1 || n > spec.universe_size {
            bail!("Numéro {} hors limites (1-{})", n, spec.universe_size);
        }
        if numbers.contains(&n) {
            bail!("Numéro en double : {}", n);
        }
        numbers.push(n);
    }

    Ok(HistoryRecord {
        contest_id,
        date,
        numbers,
    })
}

/// Lit un historique `concours;date;n1;...;nK` avec ligne d'en-tête.
pub fn load_history(path: &Path, spec: &GameSpec) -> Result<HistoryTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut records = Vec::new();
    for (i, record_result) in reader.records().enumerate() {
        // +2 : ligne d'en-tête et numérotation à partir de 1
        let line = i + 2;
        let record = record_result.with_context(|| format!("Erreur lecture ligne {}", line))?;
        let parsed = parse_record(&record, spec).with_context(|| format!("Erreur parsing ligne {}", line))?;
        records.push(parsed);
    }

    let table = HistoryTable::from_records(records);
    info!(path = %path.display(), draws = table.len(), "historique chargé");
    Ok(table)
}
