mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use nexus_db::DrawStore;
use nexus_db::cache::{CsvCache, csv_path};
use nexus_db::db::{SqliteStore, db_path};
use nexus_engine::NexusError;
use nexus_engine::config::{EngineConfig, FetchMode, Strategy};
use nexus_engine::history::{HistorySeries, HistoryStore};
use nexus_engine::pipeline::analyze;
use nexus_engine::remote::LottoApi;
use nexus_engine::sampler::{date_seed, seeded_rng};
use nexus_engine::search::{PatternSearchEngine, rank_candidates};

use crate::display::{
    display_draws, display_fetch_summary, display_matches, display_recommendations,
    display_similarity_chart, display_top_picks,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StoreKind {
    /// Fichier CSV (round,numbers)
    #[default]
    Csv,
    /// Base SQLite
    Sqlite,
}

#[derive(Parser)]
#[command(name = "nexus", about = "Recherche de motifs et recommandations Lotto 6/45")]
struct Cli {
    /// Stockage local des tirages
    #[arg(long, global = true, default_value = "csv")]
    store: StoreKind,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mettre à jour le cache depuis le service distant
    Fetch {
        /// Nombre de tirages à conserver
        #[arg(short, long)]
        depth: Option<usize>,

        /// Mode de collecte
        #[arg(short, long)]
        mode: Option<FetchMode>,
    },

    /// Lister les derniers tirages du cache
    History {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Chercher les fenêtres passées les plus proches de la fenêtre courante
    Search {
        /// Nombre de correspondances à afficher
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Fenêtre glissante (nombre de tirages)
        #[arg(short, long)]
        window: Option<usize>,

        /// Utiliser le cache sans requête réseau
        #[arg(long)]
        offline: bool,
    },

    /// Générer des grilles
    Recommend {
        /// Stratégie de génération
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Seed pour la reproductibilité (défaut : date du jour)
        #[arg(long)]
        seed: Option<u64>,

        /// Nombre de grilles par stratégie
        #[arg(short, long)]
        count: Option<usize>,

        /// Utiliser le cache sans requête réseau
        #[arg(long)]
        offline: bool,
    },

    /// Afficher ou exporter la configuration effective
    Config {
        /// Fichier de sortie JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Afficher le chemin du cache
    CachePath,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<NexusError>() {
            Some(err @ (NexusError::DataUnavailable { .. } | NexusError::InsufficientHistory { .. })) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
            _ => Err(e),
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let store = open_store(cli.store);
    log::debug!("Stockage : {}", store.location());

    match cli.command {
        Command::Fetch { depth, mode } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.fetch.mode = mode;
            }
            let depth = depth.unwrap_or(config.history_depth);
            let series = load_history(store, &config, depth, false)?;
            display_fetch_summary(&series);
            Ok(())
        }
        Command::History { last } => cmd_history(&*store, last),
        Command::Search { top, window, offline } => {
            let mut config = config;
            if let Some(window) = window {
                config.window_size = window;
            }
            config.validate()?;
            cmd_search(store, &config, top, offline)
        }
        Command::Recommend { strategy, seed, count, offline } => {
            let mut config = config;
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(count) = count {
                config.games_per_run = count;
            }
            cmd_recommend(store, &config, seed, offline)
        }
        Command::Config { output } => cmd_config(&config, output.as_deref()),
        Command::CachePath => {
            println!("{}", store.location());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p)
            .with_context(|| format!("Impossible de charger la configuration {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn open_store(kind: StoreKind) -> Box<dyn DrawStore> {
    match kind {
        StoreKind::Csv => Box::new(CsvCache::new(csv_path())),
        StoreKind::Sqlite => Box::new(SqliteStore::new(db_path())),
    }
}

fn load_history(store: Box<dyn DrawStore>, config: &EngineConfig, depth: usize, offline: bool) -> Result<HistorySeries> {
    let api = LottoApi::new(&config.fetch.base_url, Duration::from_secs(config.fetch.timeout_secs))?;
    let history = HistoryStore::from_config(api, store, config);

    if offline {
        return Ok(history.load_cached(depth)?);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Style de progression invalide")?,
    );
    pb.set_message(format!("Synchronisation depuis {}...", config.fetch.base_url));
    pb.enable_steady_tick(Duration::from_millis(120));
    let series = history.fetch(depth);
    pb.finish_and_clear();

    Ok(series?)
}

fn cmd_history(store: &dyn DrawStore, last: usize) -> Result<()> {
    let Some(latest) = store.latest_round()? else {
        println!("Cache vide. Lancez d'abord : nexus fetch");
        return Ok(());
    };
    println!("{} tirages en cache (dernier : {})", store.count()?, latest);

    let mut draws = store.load()?;
    draws.sort_by(|a, b| b.round().cmp(&a.round()));
    draws.truncate(last);
    display_draws(&draws);
    Ok(())
}

fn cmd_search(store: Box<dyn DrawStore>, config: &EngineConfig, top: usize, offline: bool) -> Result<()> {
    let series = load_history(store, config, config.history_depth, offline)?;
    let engine = PatternSearchEngine::from_config(config);

    let scan = engine.scan(series.draws())?;
    let mut ranked = rank_candidates(scan.clone());
    ranked.truncate(top.max(1));

    display_matches(series.draws(), &ranked, engine.window());
    display_similarity_chart(&scan);
    Ok(())
}

fn cmd_recommend(store: Box<dyn DrawStore>, config: &EngineConfig, seed: Option<u64>, offline: bool) -> Result<()> {
    let series = load_history(store, config, config.history_depth, offline)?;
    let seed = seed.unwrap_or_else(date_seed);
    let mut rng = seeded_rng(Some(seed));

    let report = analyze(&series, config, &mut rng)?;

    println!(
        "\nAnalyse de {} tirages (dernier : {}), seed {}",
        report.history_len, report.latest_round, seed
    );
    display_matches(series.draws(), &report.matches, config.window_size);
    display_recommendations(&report);
    display_top_picks(&report);
    Ok(())
}

fn cmd_config(config: &EngineConfig, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Configuration écrite dans {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
