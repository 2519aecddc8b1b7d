mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::prelude::*;

use lotto_core::analysis::{BatchSummary, strategy_breakdown};
use lotto_core::batch::{GenerationPlan, build_batch};
use lotto_core::budget::tickets_within_budget;
use lotto_core::filter::{Bounds, FilterConfig, TicketFilter};
use lotto_core::generator::{Generator, MixSplit, Strategy};
use lotto_core::models::{GameSpec, HistoryTable, Variant};
use lotto_core::numbers::parse_number_list;
use lotto_core::pricing::ticket_price;
use lotto_core::stats::{delay, frequency, pattern_distribution, sum_distribution, sum_series, top_by_delay, top_by_frequency};

use crate::display::{
    display_breakdown, display_draws, display_games, display_patterns, display_stats, display_summary,
    display_sums,
};

/// Longueur de suite par défaut pour "Sans longues suites".
const DEFAULT_RUN_LIMIT: usize = 3;
const MAX_RUN_LIMIT: usize = 10;
const DEFAULT_MIX_PART: usize = 5;
const SUM_SERIES_LEN: usize = 20;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyKind {
    #[default]
    PureRandom,
    BalancedParity,
    HotColdMix,
    NoLongRun,
}

#[derive(Parser)]
#[command(name = "lotto", about = "Statistiques et générateur de grilles Mega-Sena / Lotofácil")]
struct Cli {
    /// Loterie
    #[arg(long, global = true, default_value = "mega-sena")]
    variant: Variant,

    /// Logs détaillés (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Afficher les statistiques (fréquences, retards, répartitions, sommes)
    Stats {
        /// Historique CSV (concours;date;n1;...)
        #[arg(short, long)]
        file: PathBuf,

        /// Fenêtre d'analyse (nombre de tirages, tout l'historique par défaut)
        #[arg(short, long)]
        window: Option<usize>,

        /// Nombre de numéros dans les classements
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Lister les derniers tirages
    List {
        #[arg(short, long)]
        file: PathBuf,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Générer un lot de grilles
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    #[arg(short, long)]
    file: PathBuf,

    /// Stratégie de génération
    #[arg(short, long, default_value = "pure-random")]
    strategy: StrategyKind,

    /// Nombre de grilles (déduit du budget si absent)
    #[arg(short, long)]
    count: Option<usize>,

    /// Numéros par grille (minimum de la loterie par défaut)
    #[arg(long)]
    size: Option<usize>,

    /// Numéros chauds par grille
    #[arg(long)]
    hot: Option<usize>,

    /// Numéros froids par grille
    #[arg(long)]
    cold: Option<usize>,

    /// Numéros neutres par grille
    #[arg(long)]
    neutral: Option<usize>,

    /// Longueur de suite interdite (ramenée à min(10, taille))
    #[arg(long, default_value_t = DEFAULT_RUN_LIMIT)]
    limit: usize,

    /// Plan JSON multi-stratégies (remplace --strategy, --count et --size)
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Numéros obligatoires, ex. "5, 12 33"
    #[arg(long, default_value = "")]
    fixed: String,

    /// Numéros exclus
    #[arg(long, default_value = "")]
    forbidden: String,

    #[arg(long)]
    sum_min: Option<u32>,
    #[arg(long)]
    sum_max: Option<u32>,
    #[arg(long)]
    evens_min: Option<u32>,
    #[arg(long)]
    evens_max: Option<u32>,
    #[arg(long)]
    primes_min: Option<u32>,
    #[arg(long)]
    primes_max: Option<u32>,
    #[arg(long)]
    lows_min: Option<u32>,
    #[arg(long)]
    lows_max: Option<u32>,

    /// Maximum de numéros repris du dernier concours
    #[arg(long)]
    max_repeat_last: Option<usize>,

    /// Budget en reais (0 : pas de limite)
    #[arg(short, long, default_value = "0")]
    budget: f64,

    /// Seed pour la reproductibilité
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let spec = cli.variant.spec();
    info!(variant = %cli.variant, "démarrage");

    match cli.command {
        Command::Stats { file, window, top } => cmd_stats(&file, &spec, window, top),
        Command::List { file, last } => cmd_list(&file, &spec, last),
        Command::Generate(args) => cmd_generate(&args, &spec),
    }
}

fn load(file: &Path, spec: &GameSpec) -> Result<Option<HistoryTable>> {
    let history = import::load_history(file, spec)?;
    if history.is_empty() {
        println!("Historique vide : {} ne contient aucun concours.", file.display());
        return Ok(None);
    }
    Ok(Some(history))
}

fn cmd_list(file: &Path, spec: &GameSpec, last: usize) -> Result<()> {
    let Some(history) = load(file, spec)? else {
        return Ok(());
    };
    display_draws(&history.last(last));
    Ok(())
}

fn cmd_stats(file: &Path, spec: &GameSpec, window: Option<usize>, top: usize) -> Result<()> {
    let Some(history) = load(file, spec)? else {
        return Ok(());
    };
    let history = match window {
        Some(w) => history.last(w),
        None => history,
    };

    let freq = frequency(&history, spec.draw_size, spec.universe_size);
    let delays = delay(&freq, &history, spec.draw_size, spec.universe_size);

    let hot = top_by_frequency(&freq, top);
    let overdue = top_by_delay(&delays, top);

    display_stats(&delays, &hot, &overdue, history.len());
    display_patterns(
        &pattern_distribution(&history, spec.draw_size, spec.low_high_threshold),
        history.len(),
    );

    let sums = sum_distribution(&history, spec.draw_size);
    display_sums(&sums, &sum_series(&sums, SUM_SERIES_LEN));
    Ok(())
}

fn build_strategy(args: &GenerateArgs, size: usize) -> Strategy {
    match args.strategy {
        StrategyKind::PureRandom => Strategy::PureRandom,
        StrategyKind::BalancedParity => Strategy::BalancedParity,
        StrategyKind::HotColdMix => {
            let hot = args.hot.unwrap_or(DEFAULT_MIX_PART.min(size));
            let cold = args.cold.unwrap_or(DEFAULT_MIX_PART.min(size));
            let neutral = args.neutral.unwrap_or(size.saturating_sub(hot + cold));
            Strategy::HotColdMix(MixSplit { hot, cold, neutral })
        }
        StrategyKind::NoLongRun => Strategy::NoLongRun {
            limit: args.limit.min(MAX_RUN_LIMIT.min(size)),
        },
    }
}

fn build_plan(args: &GenerateArgs, spec: &GameSpec) -> Result<GenerationPlan> {
    if let Some(path) = &args.plan {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Impossible de lire {:?}", path))?;
        let plan: GenerationPlan =
            serde_json::from_str(&raw).with_context(|| format!("Plan JSON invalide : {:?}", path))?;
        return Ok(plan);
    }

    let size = args.size.unwrap_or(spec.ticket_min);
    let count = args
        .count
        .unwrap_or_else(|| tickets_within_budget(args.budget, ticket_price(size, spec.ticket_min, spec.base_price)));
    Ok(GenerationPlan::single(build_strategy(args, size), count, size))
}

fn cmd_generate(args: &GenerateArgs, spec: &GameSpec) -> Result<()> {
    let Some(history) = load(&args.file, spec)? else {
        return Ok(());
    };

    let freq = frequency(&history, spec.draw_size, spec.universe_size);
    let last_draw: Vec<u8> = history.latest().map(|r| r.numbers.clone()).unwrap_or_default();

    let config = FilterConfig {
        fixed: parse_number_list(&args.fixed)?,
        forbidden: parse_number_list(&args.forbidden)?,
        sum: Bounds::new(args.sum_min, args.sum_max),
        evens: Bounds::new(args.evens_min, args.evens_max),
        primes: Bounds::new(args.primes_min, args.primes_max),
        lows: Bounds::new(args.lows_min, args.lows_max),
        max_repeat_last: args.max_repeat_last,
    };
    config.validate(spec)?;
    let filter = TicketFilter::new(config, spec, &last_draw);

    let plan = build_plan(args, spec)?;
    let mut generator = Generator::new(spec, &freq, args.seed);
    let games = build_batch(&mut generator, &plan, &filter, args.budget)?;

    display_games(&games, spec, &last_draw);
    display_summary(&BatchSummary::of(&games, spec));
    display_breakdown(&strategy_breakdown(&games, spec, &last_draw));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> GenerateArgs {
        let mut argv = vec!["lotto", "generate", "--file", "h.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Generate(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_count_from_budget() {
        let spec = Variant::MegaSena.spec();
        let plan = build_plan(&args(&["--budget", "100"]), &spec).unwrap();
        assert_eq!(plan.size, 6);
        assert_eq!(plan.total_count(), 16);

        let plan = build_plan(&args(&[]), &spec).unwrap();
        assert_eq!(plan.total_count(), 10);

        let plan = build_plan(&args(&["--count", "3", "--size", "8"]), &spec).unwrap();
        assert_eq!(plan.total_count(), 3);
        assert_eq!(plan.size, 8);
    }

    #[test]
    fn test_mix_defaults() {
        let a = args(&["--strategy", "hot-cold-mix", "--size", "15"]);
        assert_eq!(build_strategy(&a, 15), Strategy::HotColdMix(MixSplit { hot: 5, cold: 5, neutral: 5 }));

        let a = args(&["--strategy", "hot-cold-mix", "--hot", "2", "--cold", "1"]);
        assert_eq!(build_strategy(&a, 6), Strategy::HotColdMix(MixSplit { hot: 2, cold: 1, neutral: 3 }));
    }

    #[test]
    fn test_no_long_run_limit() {
        let a = args(&["--strategy", "no-long-run"]);
        assert_eq!(build_strategy(&a, 6), Strategy::NoLongRun { limit: 3 });
        let a = args(&["--strategy", "no-long-run", "--limit", "2"]);
        assert_eq!(build_strategy(&a, 6), Strategy::NoLongRun { limit: 2 });
        let a = args(&["--strategy", "no-long-run", "--limit", "40"]);
        assert_eq!(build_strategy(&a, 15), Strategy::NoLongRun { limit: 10 });
        assert_eq!(build_strategy(&a, 6), Strategy::NoLongRun { limit: 6 });
    }

    #[test]
    fn test_variant_flag() {
        let cli = Cli::parse_from(["lotto", "--variant", "lotofacil", "list", "--file", "h.csv"]);
        assert_eq!(cli.variant, Variant::Lotofacil);
    }
}
