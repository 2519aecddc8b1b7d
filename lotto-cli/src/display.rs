use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use lotto_core::analysis::{BatchSummary, StrategyBreakdown, TicketProfile};
use lotto_core::models::{GameInfo, GameSpec, HistoryTable};
use lotto_core::numbers::format_numbers;
use lotto_core::pricing::{format_money, format_odds, ticket_price};
use lotto_core::stats::{DelayRow, FrequencyRow, PatternReport, SplitCount, SumReport};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn or_dash(value: Option<u32>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

pub fn display_draws(history: &HistoryTable) {
    if history.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Concours", "Date", "Numéros", "Somme"]);
    // Plus récent en premier
    for record in history.records().iter().rev() {
        let sum: u32 = record.numbers.iter().map(|&n| n as u32).sum();
        table.add_row(vec![
            record.contest_id.to_string(),
            record.date.format("%d/%m/%Y").to_string(),
            format_numbers(&record.numbers),
            sum.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_stats(rows: &[DelayRow], hot: &[FrequencyRow], overdue: &[DelayRow], window: usize) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = new_table(vec!["Numéro", "Fréquence", "Dernier concours", "Retard"]);
    for row in rows {
        table.add_row(vec![
            format!("{:02}", row.number),
            row.frequency.to_string(),
            or_dash(row.last_seen),
            or_dash(row.delay),
        ]);
    }
    println!("{table}");

    let hot: Vec<u8> = hot.iter().map(|r| r.number).collect();
    let overdue: Vec<u8> = overdue.iter().map(|r| r.number).collect();
    println!("\n🔥 Plus fréquents : {}", format_numbers(&hot));
    println!("⏳ Plus en retard  : {}", format_numbers(&overdue));
}

pub fn display_patterns(report: &PatternReport, draws: usize) {
    println!("\n── Pairs / Impairs ──");
    display_split_table(&report.parity, ("Pairs", "Impairs"), draws);

    println!("\n── Bas / Hauts ──");
    display_split_table(&report.range, ("Bas", "Hauts"), draws);
}

fn display_split_table(splits: &[SplitCount], labels: (&str, &str), draws: usize) {
    let mut table = new_table(vec![labels.0, labels.1, "Tirages", "%"]);
    for split in splits {
        let pct = if draws == 0 {
            0.0
        } else {
            split.draws as f64 * 100.0 / draws as f64
        };
        table.add_row(vec![
            split.split.0.to_string(),
            split.split.1.to_string(),
            split.draws.to_string(),
            format!("{:.1}", pct),
        ]);
    }
    println!("{table}");
}

pub fn display_sums(report: &SumReport, series: &[(u32, u32)]) {
    println!("\n── Sommes ──");
    let mut table = new_table(vec!["Tranche", "Tirages"]);
    for count in &report.bins {
        let label = count.bin.map_or_else(|| "Hors tranches".to_string(), |b| b.to_string());
        table.add_row(vec![label, count.draws.to_string()]);
    }
    println!("{table}");

    if !series.is_empty() {
        let line: Vec<String> = series.iter().map(|(contest, sum)| format!("{contest}:{sum}")).collect();
        println!("Dernières sommes : {}", line.join("  "));
    }
}

pub fn display_games(games: &[GameInfo], spec: &GameSpec, last_draw: &[u8]) {
    if games.is_empty() {
        println!("Aucune grille retenue (filtres ou budget trop stricts).");
        return;
    }

    println!("\n🎲 Grilles générées\n");
    let mut table = new_table(vec![
        "#", "Stratégie", "Numéros", "Somme", "Pairs", "Bas", "Premiers", "Répétés", "Prix",
    ]);
    for game in games {
        let profile = TicketProfile::of(&game.ticket, spec, last_draw);
        let price = ticket_price(game.ticket.len(), spec.ticket_min, spec.base_price);
        table.add_row(vec![
            Cell::new(game.id),
            Cell::new(&game.strategy),
            Cell::new(game.ticket.to_string()).fg(Color::Green),
            Cell::new(profile.sum),
            Cell::new(format!("{}/{}", profile.evens, profile.odds)),
            Cell::new(format!("{}/{}", profile.lows, profile.highs)),
            Cell::new(profile.primes),
            Cell::new(profile.repeats_from_last),
            Cell::new(format_money(price)),
        ]);
    }
    println!("{table}");
}

pub fn display_summary(summary: &BatchSummary) {
    println!("\nRésumé :");
    println!("  Grilles          : {}", summary.games);
    println!("  Coût total       : {}", format_money(summary.total_cost));
    println!("  Chance gros lot  : {}", format_odds(summary.top_prize_probability));
    if let (Some(mean), Some((lo, hi))) = (summary.mean_size, summary.size_range) {
        println!("  Taille moyenne   : {:.1} ({}-{})", mean, lo, hi);
    }
}

pub fn display_breakdown(rows: &[StrategyBreakdown]) {
    if rows.is_empty() {
        return;
    }

    println!("\n── Par stratégie ──");
    let mut table = new_table(vec!["Stratégie", "Grilles", "Somme moyenne", "Répétés moyens"]);
    for row in rows {
        table.add_row(vec![
            row.strategy.clone(),
            row.games.to_string(),
            format!("{:.1}", row.mean_sum),
            format!("{:.2}", row.mean_repeats_from_last),
        ]);
    }
    println!("{table}");
}
