use serde::Serialize;

use crate::params::ParameterSet;
use crate::patch::PatchCollection;

/// One row of the run's primary output series. Appended once per simulated
/// year (plus a year-0 row for the initial state) and never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    pub year: u32,
    pub human_population: u32,
    /// Unmet kcal: max(0, annual need - kcal actually foraged).
    pub human_kcal_deficit: f64,
    pub prey_population: f64,
    pub prey_eaten: f64,
    /// Sum of kernel yields over all patches.
    pub total_cereal_yield: f64,
    pub patches_exploited: u32,
    /// Mean domestic-type fraction over all patches.
    pub domesticated_proportion: f64,
    pub mean_patch_density: f64,
}

/// What the within-year foraging loop hands to the between-year updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearHarvest {
    pub prey_eaten: f64,
    pub patches_exploited: u32,
    pub kcal_deficit: f64,
}

/// All mutable state for one run: the population scalars, the patch set, the
/// current year's harvest tallies, and the accumulated output series. Owned
/// exclusively by the engine; nothing here is shared across runs.
pub struct World {
    year: u32,
    people: u32,
    prey: f64,
    patches: PatchCollection,
    harvest: YearHarvest,
    series: Vec<YearRecord>,
    density_trace: Vec<Vec<f64>>,
    proportion_trace: Vec<Vec<f64>>,
}

impl World {
    pub fn new(params: &ParameterSet) -> Self {
        let patches = PatchCollection::new(
            params.cereal_patches as usize,
            params.initial_patch_density,
            params.initial_wild_proportion,
        );
        let mut world = Self {
            year: 0,
            people: params.people,
            prey: params.prey as f64,
            patches,
            harvest: YearHarvest::default(),
            series: Vec::with_capacity(params.years as usize + 1),
            density_trace: vec![Vec::with_capacity(params.years as usize + 1); params.cereal_patches as usize],
            proportion_trace: vec![Vec::with_capacity(params.years as usize + 1); params.cereal_patches as usize],
        };
        // Year-0 row: the initial state, before any foraging.
        world.append_record(0);
        world
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn set_people(&mut self, people: u32) {
        self.people = people;
    }

    pub fn prey(&self) -> f64 {
        self.prey
    }

    pub fn set_prey(&mut self, prey: f64) {
        self.prey = prey;
    }

    pub fn patches(&self) -> &PatchCollection {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut PatchCollection {
        &mut self.patches
    }

    pub fn harvest(&self) -> &YearHarvest {
        &self.harvest
    }

    pub fn set_harvest(&mut self, harvest: YearHarvest) {
        self.harvest = harvest;
    }

    pub fn series(&self) -> &[YearRecord] {
        &self.series
    }

    pub fn last_record(&self) -> &YearRecord {
        self.series.last().expect("series always holds the year-0 row")
    }

    /// Patch-by-year kernel yields; outer index is the patch, inner the year.
    pub fn density_trace(&self) -> &[Vec<f64>] {
        &self.density_trace
    }

    /// Patch-by-year wild-type proportions.
    pub fn proportion_trace(&self) -> &[Vec<f64>] {
        &self.proportion_trace
    }

    /// Closes out a simulated year: snapshots current state into the series
    /// and trace tables, then advances the year counter.
    pub fn close_year(&mut self, year: u32) {
        self.append_record(year);
        self.year = year;
    }

    fn append_record(&mut self, year: u32) {
        let domesticated_proportion = if self.patches.is_empty() {
            0.0
        } else {
            1.0 - self.patches.mean_wild_proportion()
        };
        self.series.push(YearRecord {
            year,
            human_population: self.people,
            human_kcal_deficit: self.harvest.kcal_deficit,
            prey_population: self.prey,
            prey_eaten: self.harvest.prey_eaten,
            total_cereal_yield: self.patches.total_density(),
            patches_exploited: self.harvest.patches_exploited,
            domesticated_proportion,
            mean_patch_density: self.patches.mean_density(),
        });
        for (patch, trace) in self.patches.iter().zip(self.density_trace.iter_mut()) {
            trace.push(patch.density);
        }
        for (patch, trace) in self.patches.iter().zip(self.proportion_trace.iter_mut()) {
            trace.push(patch.wild_proportion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_zero_row_reflects_initial_state() {
        let params = ParameterSet::default();
        let world = World::new(&params);
        assert_eq!(world.series().len(), 1);
        let row = world.last_record();
        assert_eq!(row.year, 0);
        assert_eq!(row.human_population, 50);
        assert_eq!(row.prey_population, 200.0);
        assert_eq!(row.prey_eaten, 0.0);
        assert_eq!(row.patches_exploited, 0);
        assert!((row.domesticated_proportion - 0.02).abs() < 1e-9);
        assert_eq!(world.density_trace().len(), 100);
        assert_eq!(world.density_trace()[0].len(), 1);
    }
}
