use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use forager::{engine::Engine, params::ParameterSet, report};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Simulates a forager band's diet-breadth decisions and the domestication \
             of the cereal patches it exploits"
)]
struct Cli {
    /// Path to a YAML parameter file (calibrated defaults when omitted)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Override the number of years to simulate
    #[arg(long)]
    years: Option<u32>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Experiment/run label embedded in output file names, e.g. "1.01"
    #[arg(long, default_value = "1.01")]
    label: String,

    /// Directory for the output tables
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Print each year's row as it completes
    #[arg(long)]
    progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut params = match &cli.params {
        Some(path) => ParameterSet::load(path)?,
        None => ParameterSet::default(),
    };
    if let Some(years) = cli.years {
        params.years = years;
    }
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    params.validate()?;

    let years = params.years;
    let mut engine = Engine::standard(params);
    let mut world = engine.new_world();
    engine.run_with_hook(&mut world, years, |row| {
        if cli.progress {
            println!(
                "year {}: people {}, prey {:.0}, patches used {}, domesticated {:.4}",
                row.year,
                row.human_population,
                row.prey_population,
                row.patches_exploited,
                row.domesticated_proportion
            );
        }
    })?;

    let label = &cli.label;
    report::write_general_stats(
        cli.out_dir.join(format!("general_stats.{label}.csv")),
        world.series(),
    )?;
    report::write_patch_table(
        cli.out_dir.join(format!("patch_density.{label}.csv")),
        world.density_trace(),
    )?;
    report::write_patch_table(
        cli.out_dir.join(format!("patch_wild_proportion.{label}.csv")),
        world.proportion_trace(),
    )?;
    report::write_summary(
        cli.out_dir.join(format!("summary.{label}.json")),
        label,
        engine.params(),
        &world,
    )?;

    let last = world.last_record();
    println!(
        "Run {label} completed after {} years. People: {}, prey: {:.0}, domesticated proportion: {:.4}",
        last.year, last.human_population, last.prey_population, last.domesticated_proportion
    );
    Ok(())
}
