//! Writers for the run's output tables. These sit on the consumer side of the
//! library boundary: the engine only accumulates the series, and the binary
//! (or any other host) decides what to do with them.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::params::ParameterSet;
use crate::world::{World, YearRecord};

const GENERAL_STATS_HEADER: &str = "Year,HumanPopulation,HumanKcalDeficit,PreyPopulation,\
PreyEaten,TotalCerealYield,PatchesExploited,DomesticatedProportion,MeanPatchDensity";

/// Writes the year-indexed series, one row per year including year 0.
pub fn write_general_stats(path: impl AsRef<Path>, series: &[YearRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::new();
    out.push_str(GENERAL_STATS_HEADER);
    out.push('\n');
    for row in series {
        out.push_str(&format!(
            "{},{},{:.5},{:.5},{:.5},{:.5},{},{:.5},{:.5}\n",
            row.year,
            row.human_population,
            row.human_kcal_deficit,
            row.prey_population,
            row.prey_eaten,
            row.total_cereal_yield,
            row.patches_exploited,
            row.domesticated_proportion,
            row.mean_patch_density,
        ));
    }
    write_file(path, out.as_bytes())
}

/// Writes a patch-by-year table: one row per patch (1-based), one column per
/// year starting at year 0.
pub fn write_patch_table(path: impl AsRef<Path>, table: &[Vec<f64>]) -> Result<()> {
    let path = path.as_ref();
    let years = table.first().map(Vec::len).unwrap_or(0);
    let mut out = String::new();
    out.push_str("Patch");
    for year in 0..years {
        out.push_str(&format!(",{year}"));
    }
    out.push('\n');
    for (index, row) in table.iter().enumerate() {
        out.push_str(&format!("{}", index + 1));
        for value in row {
            out.push_str(&format!(",{value:.5}"));
        }
        out.push('\n');
    }
    write_file(path, out.as_bytes())
}

#[derive(Serialize)]
struct RunSummary<'a> {
    label: &'a str,
    years_simulated: u32,
    final_human_population: u32,
    final_prey_population: f64,
    final_domesticated_proportion: f64,
    final_mean_patch_density: f64,
    params: &'a ParameterSet,
}

/// Writes an end-of-run JSON summary next to the CSV tables.
pub fn write_summary(
    path: impl AsRef<Path>,
    label: &str,
    params: &ParameterSet,
    world: &World,
) -> Result<()> {
    let last = world.last_record();
    let summary = RunSummary {
        label,
        years_simulated: world.year(),
        final_human_population: last.human_population,
        final_prey_population: last.prey_population,
        final_domesticated_proportion: last.domesticated_proportion,
        final_mean_patch_density: last.mean_patch_density,
        params,
    };
    let json = serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?;
    write_file(path.as_ref(), json.as_bytes())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let mut file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn general_stats_csv_has_one_row_per_year_plus_header() {
        let mut params = ParameterSet::default();
        params.years = 3;
        let mut engine = Engine::standard(params);
        let mut world = engine.new_world();
        engine.run(&mut world, 3).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("general_stats.csv");
        write_general_stats(&path, world.series()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5); // header + year 0..=3
        assert!(lines[0].starts_with("Year,HumanPopulation"));
        assert!(lines[1].starts_with("0,50,"));
    }

    #[test]
    fn patch_table_shape_matches_run() {
        let mut params = ParameterSet::default();
        params.years = 2;
        params.cereal_patches = 4;
        let mut engine = Engine::standard(params);
        let mut world = engine.new_world();
        engine.run(&mut world, 2).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density.csv");
        write_patch_table(&path, world.density_trace()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5); // header + 4 patches
        assert_eq!(lines[0], "Patch,0,1,2");
        assert!(lines[1].starts_with("1,"));
    }
}
