use clap::Parser;
use eyre::{WrapErr, bail};
use project_assigner::config::Config;
use project_assigner::display::{display_details, display_empty, display_stats};
use project_assigner::loaders::LoaderKind;
use project_assigner::model::Cohort;
use project_assigner::solver::LpSolver;
use project_assigner::{ProjectAssigner, checks};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

const DEFAULT_CONFIG: &str = "project-assigner.toml";

#[derive(Parser)]
#[command(version, author, about)]
struct Options {
    #[arg(short, long)]
    /// Use FILE instead of project-assigner.toml
    config: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    /// Input and output format
    loader: Option<LoaderKind>,
    #[arg(short, long)]
    /// Read the projects and students tables from PATH
    input: Option<PathBuf>,
    #[arg(short, long)]
    /// Write the assignments and projects tables to PATH
    output: Option<PathBuf>,
    #[arg(short = 'n', long)]
    /// Do not write back results
    dry_run: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    /// Set verbosity level
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
        None => Config::default(),
    };
    if let Some(loader) = options.loader {
        config.solver.loader = loader;
    }
    if let Some(input) = options.input {
        config.solver.input = input;
    }
    if let Some(output) = options.output {
        config.solver.output = output;
    }
    let mut loader = config
        .solver
        .loader
        .open(&config.solver.input, &config.solver.output);
    let data = loader.load()?;
    let cohort = Cohort::from_dataset(&data).wrap_err("invalid input tables")?;
    let solution = ProjectAssigner::new(&cohort, &config.penalties)
        .solve(&mut LpSolver::new())
        .wrap_err("cannot assign projects")?;
    info!(
        objective = solution.objective,
        total_penalty = solution.total_penalty(),
        "projects assigned"
    );
    let problems = checks::check_solution(&cohort, &solution);
    for problem in &problems {
        warn!("{problem}");
    }
    if !problems.is_empty() {
        bail!("{} inconsistencies found in the solution", problems.len());
    }
    if options.dry_run {
        info!("dry run, results not written");
    } else {
        loader.save(&cohort, &solution)?;
    }
    let mut out = io::stdout().lock();
    display_details(&mut out, &cohort, &solution)?;
    display_stats(&mut out, &cohort, &solution)?;
    display_empty(&mut out, &cohort, &solution)?;
    out.flush()?;
    Ok(())
}
