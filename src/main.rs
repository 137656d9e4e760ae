//! HUD - resource alerts and log filtering
//!
//! Command-line front end for the HUD alert and filter engine.
//!
//! ## Usage
//!
//! ```bash
//! # Alerts shown in the alert pane for a snapshot
//! hud alerts view.json
//!
//! # Only build errors mentioning docker, as JSON
//! hud alerts view.json --query 'level=error&source=build&term=docker' --json
//!
//! # Apply filter edits to a query string
//! hud filter 'level=warn' --source runtime
//!
//! # Filter JSON-lines log output for one resource
//! hud logs logs.jsonl --query 'source=build' --manifest web
//!
//! # Replay timed search edits through the debounce window
//! hud replay --edit 0:d --edit 100:do --edit 200:doc
//! ```

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use hud_alerts::AlertClassifier;
use hud_core::{FilterLevel, FilterSource, HudConfig, LogGuard, View, init_logging};
use hud_filter::{
    DebounceState, FilterEdits, FilterEvaluator, LogFilter, LogLine, create_log_search,
    filter_alerts, filter_set_from_query,
};
use tracing::{debug, error, info, info_span, warn};

/// HUD resource alerts and log filters
///
/// Derives alerts from resource snapshots and evaluates the log filter
/// encoded in a query string.
#[derive(Parser, Debug)]
#[command(name = "hud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.hud/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.hud/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show alerts derived from a resource snapshot
    Alerts {
        /// JSON snapshot: a view object or an array of resources
        snapshot: PathBuf,

        /// Filter query string, e.g. `level=error&term=docker`
        #[arg(short, long, default_value = "")]
        query: String,

        /// Show the existence set (pod problems only) instead of the pane items
        #[arg(long)]
        existence: bool,

        /// Print alerts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply edits to a filter query string
    Filter {
        /// Current query string
        query: String,

        /// New level: all, warn, or error
        #[arg(long)]
        level: Option<String>,

        /// New source: all, build, or runtime
        #[arg(long)]
        source: Option<String>,

        /// New search term
        #[arg(long)]
        term: Option<String>,
    },

    /// Filter JSON-lines log output
    Logs {
        /// File with one JSON log line per row
        file: PathBuf,

        /// Filter query string
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only show lines for this resource
        #[arg(short, long, default_value = "")]
        manifest: String,
    },

    /// Replay timed search edits and print the resulting commits
    Replay {
        /// Starting query string
        #[arg(short, long, default_value = "")]
        query: String,

        /// Edit as `<ms>:<term>`, may be repeated
        #[arg(short, long = "edit", value_name = "MS:TERM")]
        edits: Vec<String>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Alerts { .. } => "alerts",
            Command::Filter { .. } => "filter",
            Command::Logs { .. } => "logs",
            Command::Replay { .. } => "replay",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    // Initialize logging
    let _guard = match setup_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    debug!(command = ?cli.command, "starting hud");

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("hud error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<HudConfig> {
    let config = match &cli.config {
        Some(path) => HudConfig::load_from(path)?,
        None => HudConfig::load()?,
    };
    Ok(config)
}

/// Set up logging from CLI arguments, falling back to the config file.
fn setup_logging(cli: &Cli, config: &HudConfig) -> hud_core::Result<LogGuard> {
    let verbose = cli.verbose > 0 || config.logging.verbose;
    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    init_logging(log_dir, verbose)
}

fn run(command: Command, config: &HudConfig) -> anyhow::Result<()> {
    let _span = info_span!("command", name = command.name()).entered();
    match command {
        Command::Alerts {
            snapshot,
            query,
            existence,
            json,
        } => show_alerts(config, &snapshot, &query, existence, json),
        Command::Filter {
            query,
            level,
            source,
            term,
        } => edit_filter(&query, level.as_deref(), source.as_deref(), term),
        Command::Logs {
            file,
            query,
            manifest,
        } => show_logs(&file, &query, &manifest),
        Command::Replay { query, edits } => replay_edits(config, &query, &edits),
    }
}

fn show_alerts(
    config: &HudConfig,
    snapshot: &Path,
    query: &str,
    existence: bool,
    json: bool,
) -> anyhow::Result<()> {
    let view = View::load(snapshot)?;
    let classifier = AlertClassifier::new(&config.pods);
    let alerts: Vec<_> = if existence {
        view.resources
            .iter()
            .flat_map(|r| classifier.compute_alerts(r))
            .collect()
    } else {
        classifier.compute_display_alerts(&view.resources)
    };

    let filters = filter_set_from_query(query);
    let shown = filter_alerts(&filters, &alerts);
    info!(
        resources = view.resources.len(),
        alerts = alerts.len(),
        shown = shown.len(),
        "computed alerts"
    );

    if filters.term.invalid {
        warn!(
            "term {:?} is not a valid pattern, matching literally",
            filters.term.source_text
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    for alert in &shown {
        println!("{}", alert.format_compact());
    }

    let eval = FilterEvaluator::new(&alerts);
    let counts = eval.level_counts();
    println!();
    println!(
        "{} | {} | {}",
        counts.label(FilterLevel::All),
        counts.label(FilterLevel::Error),
        counts.label(FilterLevel::Warn)
    );
    for level in [FilterLevel::Error, FilterLevel::Warn] {
        if let Some(menu) = eval.source_menu_counts(level) {
            println!(
                "  {}: {}, {}, {}",
                level,
                menu.label(FilterSource::All),
                menu.label(FilterSource::Build),
                menu.label(FilterSource::Runtime)
            );
        }
    }
    Ok(())
}

fn edit_filter(
    query: &str,
    level: Option<&str>,
    source: Option<&str>,
    term: Option<String>,
) -> anyhow::Result<()> {
    let edits = FilterEdits {
        level: level.map(parse_level).transpose()?,
        source: source.map(parse_source).transpose()?,
        term,
    };
    let search = create_log_search(query, &edits);
    let filters = filter_set_from_query(&search);

    println!("{}", search);
    println!("level:  {}", display_or_all(filters.level.as_param()));
    println!("source: {}", display_or_all(filters.source.as_param()));
    println!("term:   {:?}", filters.term.source_text);
    if filters.term.invalid {
        println!("        (not a valid pattern, matching literally)");
    }
    Ok(())
}

fn display_or_all(param: &str) -> &str {
    if param.is_empty() { "all" } else { param }
}

fn parse_level(value: &str) -> anyhow::Result<FilterLevel> {
    match value {
        "all" | "" => Ok(FilterLevel::All),
        "warn" => Ok(FilterLevel::Warn),
        "error" => Ok(FilterLevel::Error),
        other => bail!("unknown level '{}' (expected all, warn, or error)", other),
    }
}

fn parse_source(value: &str) -> anyhow::Result<FilterSource> {
    match value {
        "all" | "" => Ok(FilterSource::All),
        "build" => Ok(FilterSource::Build),
        "runtime" => Ok(FilterSource::Runtime),
        other => bail!("unknown source '{}' (expected all, build, or runtime)", other),
    }
}

fn show_logs(file: &Path, query: &str, manifest: &str) -> anyhow::Result<()> {
    let reader = std::fs::File::open(file)
        .map(BufReader::new)
        .with_context(|| format!("failed to open {}", file.display()))?;

    let mut lines = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", file.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: LogLine = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid log line", file.display(), number + 1))?;
        lines.push(parsed);
    }

    let filters = filter_set_from_query(query);
    if filters.term.invalid {
        warn!(
            "term {:?} is not a valid pattern, matching literally",
            filters.term.source_text
        );
    }
    let filter = LogFilter::from_filter_set(&filters, manifest);
    let shown = filter.apply(&lines);
    info!(read = lines.len(), shown = shown.len(), "filtered log lines");

    for line in shown {
        println!("{}", line.text);
    }
    Ok(())
}

fn replay_edits(config: &HudConfig, query: &str, edits: &[String]) -> anyhow::Result<()> {
    let mut timeline = edits
        .iter()
        .map(String::as_str)
        .map(parse_timed_edit)
        .collect::<anyhow::Result<Vec<_>>>()?;
    timeline.sort_by_key(|(at, _)| *at);

    let mut state = DebounceState::new(config.filter.debounce_ms);
    let mut search = query.trim_start_matches('?').to_string();
    for (at, term) in timeline {
        if let Some(due) = state.due_at()
            && let Some(value) = state.poll(at)
        {
            commit_term(&mut search, value, due);
        }
        state.edit(term, at);
    }
    if let Some(due) = state.due_at()
        && let Some(value) = state.poll(due)
    {
        commit_term(&mut search, value, due);
    }
    Ok(())
}

fn commit_term(search: &mut String, term: String, at: u64) {
    *search = create_log_search(search, &FilterEdits::new().with_term(term));
    println!("{}ms ?{}", at, search);
}

fn parse_timed_edit(edit: &str) -> anyhow::Result<(u64, String)> {
    let Some((at, term)) = edit.split_once(':') else {
        bail!("edit '{}' must look like <ms>:<term>", edit);
    };
    let at = at
        .parse()
        .with_context(|| format!("invalid time in edit '{}'", edit))?;
    Ok((at, term.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_and_source() {
        assert_eq!(parse_level("warn").unwrap(), FilterLevel::Warn);
        assert_eq!(parse_level("all").unwrap(), FilterLevel::All);
        assert!(parse_level("info").is_err());
        assert_eq!(parse_source("runtime").unwrap(), FilterSource::Runtime);
        assert!(parse_source("pod").is_err());
    }

    #[test]
    fn test_parse_timed_edit() {
        assert_eq!(parse_timed_edit("100:do").unwrap(), (100, "do".to_string()));
        assert_eq!(parse_timed_edit("0:a:b").unwrap(), (0, "a:b".to_string()));
        assert!(parse_timed_edit("soon:x").is_err());
        assert!(parse_timed_edit("nope").is_err());
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hud", "filter", "level=warn", "-v", "--term", "x"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Filter { query, term, .. } => {
                assert_eq!(query, "level=warn");
                assert_eq!(term.as_deref(), Some("x"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
