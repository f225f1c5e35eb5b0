//! Daily spell list generator.
//!
//! Draws a reproducible list of spells for a full caster of the given
//! character level. The draw is seeded by the calendar date, so running the
//! command twice on the same day prints the same list.
//!
//! ```bash
//! spellbook 8
//! spellbook 8 --filter exclude-consumed-only --reroll "Shield"
//! RUST_LOG=debug spellbook 3 --date 2024-03-01
//! ```
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use spellbook_catalog::{
    AllowList, CorpusAcquirer, CorpusRepository, Fetch, FileCorpusRepository, HttpFetcher,
};
use spellbook_core::{CostFilter, Sampler, Spell, format_spell, slot_table};

use config::SpellbookConfig;

/// Draw today's spells for a character level
#[derive(Parser, Debug)]
#[command(name = "spellbook")]
#[command(about = "Draws a reproducible daily spell list", long_about = None)]
#[command(version)]
struct Cli {
    /// Character level (0-20)
    #[arg(value_parser = clap::value_parser!(u8).range(0..=20))]
    level: u8,

    /// Which material-cost classes may be drawn
    #[arg(long, value_enum, default_value_t = FilterArg::AcceptAll)]
    filter: FilterArg,

    /// Seed the draw with this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Replace a drawn spell by name (repeatable)
    #[arg(long, value_name = "NAME")]
    reroll: Vec<String>,

    /// Cache directory (overrides SPELLBOOK_CACHE_DIR)
    #[arg(long, value_name = "PATH")]
    cache_dir: Option<PathBuf>,

    /// Allowed source by full name (repeatable, replaces the default list)
    #[arg(long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// Discard the cached corpus before acquiring
    #[arg(long)]
    refresh: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    /// Any spell may be drawn
    AcceptAll,
    /// Skip spells whose material component has a gp cost
    ExcludeAllMaterialCost,
    /// Skip only spells that consume a costly component
    ExcludeConsumedOnly,
}

impl From<FilterArg> for CostFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::AcceptAll => CostFilter::AcceptAll,
            FilterArg::ExcludeAllMaterialCost => CostFilter::ExcludeAllMaterialCost,
            FilterArg::ExcludeConsumedOnly => CostFilter::ExcludeConsumedOnly,
        }
    }
}

impl Cli {
    /// Date that seeds the draw: `--date` if given, otherwise the local calendar date.
    fn draw_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Apply command-line overrides on top of the environment configuration.
    fn apply(&self, config: &mut SpellbookConfig) {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if !self.sources.is_empty() {
            config.allow_list = AllowList::new(self.sources.iter().cloned());
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::setup_logging()?;

    let mut config = SpellbookConfig::from_env();
    cli.apply(&mut config);

    for line in run(&cli, &config)? {
        println!("{line}");
    }

    Ok(())
}

fn run(cli: &Cli, config: &SpellbookConfig) -> Result<Vec<String>> {
    let fetcher = HttpFetcher::new(config.http_timeout).context("Failed to set up HTTP client")?;
    draw_spells(fetcher, cli, config)
}

/// Acquire the corpus through `fetcher` and render the drawn spells.
fn draw_spells<F: Fetch>(fetcher: F, cli: &Cli, config: &SpellbookConfig) -> Result<Vec<String>> {
    let repository = FileCorpusRepository::new(&config.cache_dir).with_context(|| {
        format!("Failed to open cache directory: {}", config.cache_dir.display())
    })?;
    tracing::debug!("Cache directory: {}", config.cache_dir.display());

    if cli.refresh {
        repository.clear().context("Failed to clear cached corpus")?;
    }

    let corpus = CorpusAcquirer::new(fetcher, repository)
        .with_endpoints(config.endpoints.clone())
        .with_allow_list(config.allow_list.clone())
        .acquire_corpus()
        .context("Failed to acquire spell corpus")?;

    let date = cli.draw_date();
    let filter = CostFilter::from(cli.filter);
    let slots = slot_table(cli.level);
    tracing::info!(
        "Drawing {} spells for level {} on {} ({})",
        slots.total(),
        cli.level,
        date,
        filter
    );

    let mut sampler = Sampler::for_date(date);
    let mut drawn = sampler
        .draw(&corpus, &slots, filter)
        .context("Failed to draw spells")?;

    for name in &cli.reroll {
        let position = find_spell(&drawn, name)?;
        let replaced = sampler
            .reroll(&mut drawn, position, &corpus, filter)
            .with_context(|| format!("Failed to reroll {name}"))?;
        tracing::info!("Rerolled {} -> {}", replaced.name, drawn[position].name);
    }

    Ok(drawn.iter().map(format_spell).collect())
}

/// Position of the drawn spell called `name`, ignoring case.
fn find_spell(drawn: &[Spell], name: &str) -> Result<usize> {
    match drawn
        .iter()
        .position(|spell| spell.name.eq_ignore_ascii_case(name.trim()))
    {
        Some(position) => Ok(position),
        None => bail!("{name} is not in the drawn list"),
    }
}
