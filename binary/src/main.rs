use std::path::{Path, PathBuf};

use alpha_miner::{
    alpha::full::{
        alpha_discover_with_timing_fn, build_petri_net, get_current_time_millis,
        DegenerateAlphabetPolicy, DEFAULT_MAX_ALPHABET_SIZE,
    },
    event_log::statistics::activity_frequencies,
    import_trace_log_file, import_xes_file, AlphaConfig, LogStatistics, TraceLog,
    XESImportOptions,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Pick by file extension (`.xes`, `.xes.gz` or `.gz` are XES, anything else is text)
    Auto,
    /// One trace per line, activities separated by whitespace
    Text,
    /// XES (optionally gzip-compressed)
    Xes,
}

impl InputFormat {
    fn resolve(self, path: &Path) -> InputFormat {
        match self {
            InputFormat::Auto => {
                let name = path.to_string_lossy().to_lowercase();
                if name.ends_with(".xes") || name.ends_with(".gz") {
                    InputFormat::Xes
                } else {
                    InputFormat::Text
                }
            }
            other => other,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "alpha-miner", version)]
#[command(about = "Discover a workflow net from an event log using the Alpha algorithm", long_about = None)]
struct Args {
    /// Event log to mine
    input: PathBuf,
    /// Input format
    #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,
    /// Reject logs with more distinct activities than this
    #[arg(long, default_value_t = DEFAULT_MAX_ALPHABET_SIZE)]
    max_alphabet_size: usize,
    /// Do not limit the number of distinct activities
    #[arg(long, conflicts_with = "max_alphabet_size")]
    no_alphabet_limit: bool,
    /// Fail instead of returning no places if the log has fewer than two activities
    #[arg(long)]
    fail_on_degenerate: bool,
    /// Print log statistics before mining
    #[arg(short, long)]
    statistics: bool,
    /// Write the result (footprint, Ti, To, Xl, Yl) as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Write the discovered Petri net as PNML
    #[arg(long)]
    pnml: Option<PathBuf>,
    /// Write the discovered Petri net as Graphviz DOT
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Render the discovered Petri net as SVG (requires graphviz)
    #[arg(long)]
    svg: Option<PathBuf>,
}

impl Args {
    fn alpha_config(&self) -> AlphaConfig {
        AlphaConfig {
            max_alphabet_size: (!self.no_alphabet_limit).then_some(self.max_alphabet_size),
            degenerate_alphabet: if self.fail_on_degenerate {
                DegenerateAlphabetPolicy::Fail
            } else {
                DegenerateAlphabetPolicy::EmptyResult
            },
        }
    }
}

fn import_log(path: &Path, format: InputFormat) -> Result<TraceLog> {
    match format.resolve(path) {
        InputFormat::Xes => import_xes_file(path, &XESImportOptions::default())
            .with_context(|| format!("Could not import XES from {}", path.display())),
        _ => import_trace_log_file(path)
            .with_context(|| format!("Could not import trace log from {}", path.display())),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let log = import_log(&args.input, args.format)?;
    if args.statistics {
        println!("{}", LogStatistics::from_log(&log));
        for (act, count) in activity_frequencies(&log, false) {
            println!("  {act}: {count}");
        }
        println!();
    }

    let (result, dur) =
        alpha_discover_with_timing_fn(&(&log).into(), &args.alpha_config(), &get_current_time_millis)
            .context("Alpha discovery failed")?;
    println!("{}", result.footprint);
    println!();
    println!("{}", result.footprint.render_matrix());
    println!();
    println!("{result}");

    let pn = build_petri_net(&result);
    info!(
        places = pn.places.len(),
        transitions = pn.transitions.len(),
        secs = dur.total,
        "Discovery done"
    );

    if let Some(path) = &args.json {
        std::fs::write(path, result.to_json()?)
            .with_context(|| format!("Could not write JSON to {}", path.display()))?;
    }
    if let Some(path) = &args.pnml {
        pn.export_pnml(path)
            .with_context(|| format!("Could not write PNML to {}", path.display()))?;
    }
    if let Some(path) = &args.dot {
        std::fs::write(path, pn.to_dot())
            .with_context(|| format!("Could not write DOT to {}", path.display()))?;
    }
    if let Some(path) = &args.svg {
        pn.export_svg(path)
            .with_context(|| format!("Could not render SVG to {}", path.display()))?;
    }
    Ok(())
}
