use crate::compare::compare_layout_quality;
use crate::config::{Config, load_config};
use crate::graph::{LayoutEdge, PositionedNode};
use crate::history::{FileStore, MetricsHistory, RegressionResult, SaveOptions};
use crate::layout::grid_layout;
use crate::model::MetaModel;
use crate::quality::{LayoutQualityReport, LayoutType};
use crate::scoring::DiagramType;
use crate::transform::transform_model;
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dqr", version, about = "Diagram layout quality scoring and regression tracking")]
pub struct Args {
    /// Config JSON file
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding persisted metrics history
    #[arg(long = "history-dir", global = true)]
    pub history_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a positioned layout (or a model placed on a grid)
    Score {
        /// Input file with `{nodes, edges}` or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
        /// Treat the input as a model, transform it, and place it on a grid
        #[arg(long = "from-model")]
        from_model: bool,
        #[arg(short = 'l', long = "layout", default_value = "hierarchical")]
        layout: LayoutType,
        #[arg(short = 'd', long = "diagram", default_value = "c4")]
        diagram: DiagramType,
        /// Save the report to history (requires --history-dir)
        #[arg(long)]
        save: bool,
        /// Save and promote the report to baseline
        #[arg(long)]
        baseline: bool,
        #[arg(long = "model-id")]
        model_id: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Transform a model into drawable nodes and edges
    Transform {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Compare two saved quality reports
    Compare {
        current: PathBuf,
        baseline: PathBuf,
    },
    /// Inspect or move persisted history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    Stats,
    List {
        #[arg(short = 'd', long = "diagram")]
        diagram: DiagramType,
        #[arg(short = 'l', long = "layout")]
        layout: LayoutType,
        #[arg(long)]
        limit: Option<usize>,
    },
    Export {
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    Import {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct LayoutInput {
    nodes: Vec<PositionedNode>,
    #[serde(default)]
    edges: Vec<LayoutEdge>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput {
    report: LayoutQualityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    regression: Option<RegressionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<String>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Score {
            input,
            from_model,
            layout,
            diagram,
            save,
            baseline,
            model_id,
            label,
            output,
        } => {
            let raw = read_input(input.as_deref())?;
            let (nodes, edges) = if from_model {
                let model: MetaModel = serde_json::from_str(&raw)?;
                grid_layout(&transform_model(&model)?, &config.grid)
            } else {
                let parsed: LayoutInput = serde_json::from_str(&raw)?;
                (parsed.nodes, parsed.edges)
            };
            let report = config.evaluator().evaluate(&nodes, &edges, layout, diagram);

            let mut result = ScoreOutput {
                report,
                regression: None,
                snapshot_id: None,
            };
            if let Some(dir) = args.history_dir.as_deref() {
                let mut history = open_history(&config, dir)?;
                result.regression = Some(history.detect_regression(&result.report));
                if save || baseline {
                    let snapshot = history.save_snapshot(
                        result.report.clone(),
                        SaveOptions {
                            model_id,
                            label,
                            set_as_baseline: baseline,
                        },
                    )?;
                    result.snapshot_id = Some(snapshot.id);
                }
            } else if save || baseline {
                return Err(anyhow::anyhow!("--save/--baseline require --history-dir"));
            }
            write_json(&result, output.as_deref())
        }
        Command::Transform { input, output } => {
            let model: MetaModel = serde_json::from_str(&read_input(input.as_deref())?)?;
            write_json(&transform_model(&model)?, output.as_deref())
        }
        Command::Compare { current, baseline } => {
            let current: LayoutQualityReport = read_json_file(&current)?;
            let baseline: LayoutQualityReport = read_json_file(&baseline)?;
            write_json(&compare_layout_quality(&current, &baseline), None)
        }
        Command::History { action } => {
            let dir = args
                .history_dir
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("history commands require --history-dir"))?;
            let mut history = open_history(&config, dir)?;
            match action {
                HistoryAction::Stats => write_json(&history.get_storage_stats(), None),
                HistoryAction::List {
                    diagram,
                    layout,
                    limit,
                } => write_json(&history.get_metrics_history(diagram, layout, limit), None),
                HistoryAction::Export { output } => {
                    write_json(&history.export_data(), output.as_deref())
                }
                HistoryAction::Import { input } => {
                    let data = serde_json::from_str(&read_input(input.as_deref())?)?;
                    history.import_data(data)?;
                    write_json(&history.get_storage_stats(), None)
                }
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn open_history(config: &Config, dir: &Path) -> Result<MetricsHistory<FileStore>> {
    let store = FileStore::new(dir)?;
    Ok(MetricsHistory::open(config.history.clone(), store)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
