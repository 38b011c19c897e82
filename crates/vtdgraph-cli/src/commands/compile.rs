//! Compile a prepared precinct collection.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use vtdgraph_config::{JobConfig, OutputSet};
use vtdgraph_core::{CancelToken, PlanarEngine, PrecinctCollection, apportion, assign_districts};
use vtdgraph_io::{StateJob, compile_state};

use super::format_bytes;
use super::input::{load_districts, load_precincts, load_sources};

/// Compile precincts into .idx and JSON artifacts.
#[derive(Args)]
pub struct CompileArgs {
    /// JSON array of prepared precincts
    #[arg(long)]
    pub precincts: PathBuf,

    /// JSON array of district polygons; reassigns every precinct's district
    #[arg(long)]
    pub districts: Option<PathBuf>,

    /// JSON array of census regions; reapportions every precinct's demographics
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// TOML job file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// State name or postal code (overrides the job file)
    #[arg(long)]
    pub state: Option<String>,

    /// Comma-separated outputs: binary, readable, full-json, vertex-free-json, district-mapping
    #[arg(long, value_parser = parse_outputs)]
    pub outputs: Option<OutputSet>,

    /// Output directory (overrides the job file)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Build adjacency on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Compare every precinct pair instead of pruning with an R-tree
    #[arg(long)]
    pub no_index: bool,
}

fn parse_outputs(text: &str) -> Result<OutputSet, String> {
    OutputSet::parse(text).map_err(|e| e.to_string())
}

fn job_config(args: &CompileArgs) -> anyhow::Result<JobConfig> {
    let mut config = match (&args.config, &args.state) {
        (Some(path), _) => JobConfig::load(path)?,
        (None, Some(state)) => JobConfig::new(state.clone()),
        (None, None) => anyhow::bail!("either --config or --state is required"),
    };
    if let Some(state) = &args.state {
        config.state.clone_from(state);
    }
    if let Some(outputs) = &args.outputs {
        config.outputs = outputs.clone();
    }
    if let Some(out) = &args.out {
        config.output_dir.clone_from(out);
    }
    config.parallel |= args.parallel;
    config.index &= !args.no_index;
    Ok(config)
}

/// Reapportions demographics and reassigns districts when their inputs are given.
fn refine_collection(
    args: &CompileArgs,
    engine: &PlanarEngine,
    collection: &mut PrecinctCollection,
    spinner: &ProgressBar,
    cancel: &CancelToken,
) -> anyhow::Result<()> {
    if args.sources.is_none() && args.districts.is_none() {
        return Ok(());
    }
    let shapes = collection.prepare_shapes(engine)?;

    if let Some(path) = &args.sources {
        let sources = load_sources(engine, path)?;
        spinner.set_message(format!("Apportioning {} source regions", sources.len()));
        let result = apportion(engine, &shapes, &sources);
        collection.set_demographics(&result.per_target);
        tracing::info!(
            "apportioned {} source regions onto {} precincts",
            sources.len(),
            shapes.len()
        );
        cancel.check()?;
    }

    if let Some(path) = &args.districts {
        let districts = load_districts(engine, path)?;
        spinner.set_message(format!("Assigning {} district regions", districts.len()));
        collection.set_districts(&assign_districts(engine, &shapes, &districts)?);
        tracing::info!("assigned districts from {}", path.display());
        cancel.check()?;
    }
    Ok(())
}

/// Run the compile command.
pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let job = StateJob::from_config(&job_config(&args)?)?;
    let engine = PlanarEngine::new();

    let records = load_precincts(&args.precincts)?;
    let mut collection = PrecinctCollection::from_records(records)?;
    if collection.is_empty() {
        anyhow::bail!("{} contains no precincts", args.precincts.display());
    }

    // Ctrl+C stops the run at the next stage boundary or adjacency row
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling...");
        handler_token.cancel();
    })
    .context("installing Ctrl+C handler")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = refine_collection(&args, &engine, &mut collection, &spinner, &cancel)
        .and_then(|()| {
            spinner.set_message(format!(
                "Compiling {} ({} precincts)",
                job.state_name,
                collection.len()
            ));
            Ok(compile_state(&engine, &collection, &job, &cancel)?)
        });
    spinner.finish_and_clear();
    let summary = result?;

    println!(
        "{} ({}): {} precincts, {} edges, checksum {:#010X}",
        job.state_name, summary.state, summary.node_count, summary.edge_count, summary.checksum
    );
    for artifact in &summary.artifacts {
        println!(
            "  {:<18} {} ({})",
            artifact.kind.as_str(),
            artifact.path.display(),
            format_bytes(artifact.bytes)
        );
    }
    println!(
        "Done in {:.2?} (adjacency {:.2?})",
        summary.timings.adjacency
            + summary.timings.graph
            + summary.timings.render
            + summary.timings.write,
        summary.timings.adjacency
    );

    Ok(())
}
