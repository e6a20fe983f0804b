use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use depmap::export::{EdgePolicy, ExportFormat};
use depmap::graph::{BuildOptions, SkipReason};
use depmap::pipeline;
use depmap::render::{RenderOptions, DEFAULT_LABEL_THRESHOLD, DEFAULT_MIN_SIZE};

#[derive(Parser)]
#[command(name = "depmap")]
#[command(version)]
#[command(about = "Builds, slices and lays out the dependency graph of a package index", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph and write the seed's connected component
    Build {
        /// JSONL metadata dump, one package per line
        #[arg(short, long, env = "DEPMAP_INPUT", default_value = "deps.jsonl")]
        input: PathBuf,

        /// Package whose component is kept
        #[arg(short, long, env = "DEPMAP_SEED", default_value = "numpy")]
        seed: String,

        /// Output document
        #[arg(short, long, default_value = "pypi_deps.gexf")]
        output: PathBuf,

        /// Output format (gexf or json); guessed from the output extension if omitted
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Stop after this many records (0 means no limit)
        #[arg(long)]
        max_records: Option<usize>,
    },
    /// Convert a laid-out GEXF file into the JSON interchange document
    Export {
        /// Laid-out graph (GEXF or JSON)
        #[arg(short, long, default_value = "g_big.gexf")]
        input: PathBuf,

        /// Output JSON document
        #[arg(short, long, default_value = "pypi_data_big.json")]
        output: PathBuf,

        /// Fail on edges that reference undeclared nodes
        #[arg(long)]
        strict: bool,
    },
    /// Produce a Plotly figure from a laid-out graph
    Render {
        /// Laid-out graph (GEXF or JSON)
        #[arg(short, long, default_value = "g.gexf")]
        input: PathBuf,

        /// JSONL dump used for the minimum Python version lookup
        #[arg(long, env = "DEPMAP_VERSIONS", default_value = "deps_smol.jsonl")]
        versions: PathBuf,

        /// Skip the version lookup and color every node with the default
        #[arg(long)]
        no_versions: bool,

        /// Output figure
        #[arg(short, long, default_value = "figure.json")]
        output: PathBuf,

        /// Minimum number of dependents before a label is drawn
        #[arg(long, default_value_t = DEFAULT_LABEL_THRESHOLD)]
        label_threshold: usize,

        /// Smallest marker size
        #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
        min_size: f64,

        /// Fail on edges that reference undeclared nodes
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DEPMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "depmap=debug,info"
        } else {
            "depmap=info,warn"
        })
    });

    let format = env::var("DEPMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn edge_policy(strict: bool) -> EdgePolicy {
    if strict {
        EdgePolicy::Reject
    } else {
        EdgePolicy::AutoRegister
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            seed,
            output,
            format,
            max_records,
        } => {
            let format = format
                .or_else(|| ExportFormat::from_path(&output))
                .unwrap_or(ExportFormat::Gexf);
            let summary = pipeline::run_build(
                &input,
                &seed,
                &output,
                format,
                BuildOptions { max_records },
            )?;

            info!(
                spam = summary.stats.skipped_for(SkipReason::SpamName),
                digits = summary.stats.skipped_for(SkipReason::DigitInName),
                no_deps = summary.stats.skipped_for(SkipReason::NoDependencies),
                "records filtered"
            );
            println!("Graph building complete!");
            println!(
                "Full graph: {} nodes, {} edges",
                summary.full_nodes, summary.full_edges
            );
            println!("Number of nodes: {}", summary.component_nodes);
            println!("Number of edges: {}", summary.component_edges);
        }
        Commands::Export {
            input,
            output,
            strict,
        } => {
            let document = pipeline::run_export(&input, &output, edge_policy(strict))?;
            println!(
                "Exported {} nodes and {} edges to {}",
                document.nodes.len(),
                document.edges.len(),
                output.display()
            );
        }
        Commands::Render {
            input,
            versions,
            no_versions,
            output,
            label_threshold,
            min_size,
            strict,
        } => {
            let options = RenderOptions {
                label_threshold,
                min_size,
                ..RenderOptions::default()
            };
            let versions = (!no_versions).then_some(versions.as_path());
            let frame =
                pipeline::run_render(&input, versions, &output, options, edge_policy(strict))?;
            println!("Rendered {} nodes to {}", frame.len(), output.display());
        }
    }

    Ok(())
}
