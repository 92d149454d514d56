use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How births and deaths are drawn each year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DemographyPolicy {
    /// One uniform draw per individual against the per-capita rate. Exact but
    /// O(population); kept for small bands and for validating the calibrated
    /// policy against it.
    Bernoulli,
    /// A single rate drawn from Normal(rate, filter), multiplied by the
    /// population and rounded. The calibrated default.
    #[default]
    Gaussian,
}

/// How the annual foraging-hour pool is allocated between hunting and gathering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborPolicy {
    /// One pooled budget spent on whichever resource is chosen. Lets the
    /// hunter:gatherer split emerge from the diet-breadth decisions.
    Shared,
    /// Fixed split: hunting gets `hunter_ratio` of the pool, gathering the
    /// remainder. A resource whose budget runs dry scores zero while the other
    /// side may keep foraging.
    Split { hunter_ratio: f64 },
}

impl Default for LaborPolicy {
    fn default() -> Self {
        LaborPolicy::Shared
    }
}

/// Which patches get harvested first within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExploitOrder {
    /// Always lowest-index first. Keeps runs comparable with the historical
    /// convention where the same patches bear selection year after year.
    #[default]
    Prefix,
    /// A fresh random permutation every year, spreading selection pressure
    /// across the whole patch set.
    Shuffled,
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("parameter `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

fn invalid(field: &'static str, reason: &'static str) -> ParamsError {
    ParamsError::Invalid { field, reason }
}

/// The full, immutable configuration for one run. Every field has a calibrated
/// default, so a YAML file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub seed: u64,
    /// Number of years to simulate.
    pub years: u32,

    // Humans
    pub people: u32,
    pub max_people: u32,
    pub human_birth_rate: f64,
    pub human_death_rate: f64,
    /// Width of the Gaussian filter on human vital rates.
    pub human_rate_filter: f64,
    /// Fraction of the annual kcal need below which the band starves: births
    /// are skipped and deaths are drawn at an elevated rate.
    pub starvation_threshold: f64,
    pub starvation_death_multiplier: f64,
    /// Annual kcal requirement per person (912,500 is a 2,500 kcal/day diet).
    pub kcal_per_person: f64,
    /// Annual foraging hours available per person (4,380 is 12 h/day).
    pub foraging_hours: f64,
    /// Width of the perceptual noise on return rates in the diet-breadth
    /// decision, as a fraction of the true score.
    pub foraging_uncertainty: f64,

    // Prey
    pub prey: u32,
    pub max_prey: u32,
    pub max_prey_migrants: u32,
    pub prey_birth_rate: f64,
    pub prey_death_rate: f64,
    pub prey_rate_filter: f64,
    /// Kcal returned per prey animal taken.
    pub prey_kcal: f64,
    /// Hours of search per prey at the reference density.
    pub prey_search_cost: f64,
    pub prey_reference_density: f64,
    pub min_prey_encounter: u32,
    pub max_prey_encounter: u32,
    /// Hours of handling per prey once encountered.
    pub prey_handling_cost: f64,

    // Cereal
    pub cereal_patches: u32,
    /// Kcal per wild-type kernel.
    pub wild_cereal_kcal: f64,
    /// Kcal per domestic-type kernel.
    pub domestic_cereal_kcal: f64,
    /// Starting wild-type fraction of every patch (1.0 = fully wild).
    pub initial_wild_proportion: f64,
    /// Annual shift toward the domestic phenotype in exploited patches.
    pub selection_rate: f64,
    /// Annual regression toward wild type in all patches; weakens as the
    /// metapopulation domesticates.
    pub diffusion_rate: f64,
    /// Width of the Gaussian filter on selection and diffusion, as a fraction
    /// of the base rate.
    pub selection_diffusion_filter: f64,
    /// Hours to find one patch.
    pub cereal_search_cost: f64,
    /// Kernels harvestable per patch at the start of the run.
    pub initial_patch_density: f64,
    pub min_patch_density: f64,
    pub max_patch_density: f64,
    /// Kernels a patch gains per year of proto-cultivation, and loses per year
    /// of neglect.
    pub cultivation_increment: f64,
    pub wild_handling_cost: f64,
    pub domestic_handling_cost: f64,

    // Policies
    pub demography_policy: DemographyPolicy,
    pub labor_policy: LaborPolicy,
    pub exploit_order: ExploitOrder,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            seed: 7,
            years: 3000,

            people: 50,
            max_people: 3000,
            human_birth_rate: 0.032,
            human_death_rate: 0.03,
            human_rate_filter: 0.005,
            starvation_threshold: 0.8,
            starvation_death_multiplier: 2.0,
            kcal_per_person: 912_500.0,
            foraging_hours: 4380.0,
            foraging_uncertainty: 0.1,

            prey: 200,
            max_prey: 500,
            max_prey_migrants: 0,
            prey_birth_rate: 0.06,
            prey_death_rate: 0.04,
            prey_rate_filter: 0.005,
            prey_kcal: 200_000.0,
            prey_search_cost: 72.0,
            prey_reference_density: 1000.0,
            min_prey_encounter: 1,
            max_prey_encounter: 4,
            prey_handling_cost: 16.0,

            cereal_patches: 100,
            wild_cereal_kcal: 0.05,
            domestic_cereal_kcal: 0.1,
            initial_wild_proportion: 0.98,
            selection_rate: 0.03,
            diffusion_rate: 0.02,
            selection_diffusion_filter: 0.001,
            cereal_search_cost: 1.0,
            initial_patch_density: 1.0e7,
            min_patch_density: 1.0e7,
            max_patch_density: 1.0e8,
            cultivation_increment: 1.0e6,
            wild_handling_cost: 1.0e-4,
            domestic_handling_cost: 1.0e-5,

            demography_policy: DemographyPolicy::default(),
            labor_policy: LaborPolicy::default(),
            exploit_order: ExploitOrder::default(),
        }
    }
}

impl ParameterSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read parameter file {}", path.display()))?;
        let params: ParameterSet = serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        params
            .validate()
            .with_context(|| format!("invalid parameters in {}", path.display()))?;
        Ok(params)
    }

    /// Checks every field's domain before any year is simulated. Errors name
    /// the offending field; nothing is ever partially applied.
    pub fn validate(&self) -> Result<(), ParamsError> {
        fn rate(field: &'static str, value: f64) -> Result<(), ParamsError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be within [0, 1]"));
            }
            Ok(())
        }
        fn non_negative(field: &'static str, value: f64) -> Result<(), ParamsError> {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be finite and non-negative"));
            }
            Ok(())
        }
        fn positive(field: &'static str, value: f64) -> Result<(), ParamsError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be finite and positive"));
            }
            Ok(())
        }

        if self.years == 0 {
            return Err(invalid("years", "must be at least 1"));
        }

        rate("human_birth_rate", self.human_birth_rate)?;
        rate("human_death_rate", self.human_death_rate)?;
        rate("starvation_threshold", self.starvation_threshold)?;
        rate("prey_birth_rate", self.prey_birth_rate)?;
        rate("prey_death_rate", self.prey_death_rate)?;
        rate("initial_wild_proportion", self.initial_wild_proportion)?;
        rate("selection_rate", self.selection_rate)?;
        rate("diffusion_rate", self.diffusion_rate)?;

        non_negative("human_rate_filter", self.human_rate_filter)?;
        non_negative("prey_rate_filter", self.prey_rate_filter)?;
        non_negative("selection_diffusion_filter", self.selection_diffusion_filter)?;
        non_negative("foraging_uncertainty", self.foraging_uncertainty)?;
        non_negative("starvation_death_multiplier", self.starvation_death_multiplier)?;
        non_negative("cultivation_increment", self.cultivation_increment)?;

        positive("kcal_per_person", self.kcal_per_person)?;
        positive("foraging_hours", self.foraging_hours)?;
        positive("prey_kcal", self.prey_kcal)?;
        positive("prey_search_cost", self.prey_search_cost)?;
        positive("prey_reference_density", self.prey_reference_density)?;
        positive("prey_handling_cost", self.prey_handling_cost)?;
        positive("wild_cereal_kcal", self.wild_cereal_kcal)?;
        positive("domestic_cereal_kcal", self.domestic_cereal_kcal)?;
        positive("cereal_search_cost", self.cereal_search_cost)?;
        positive("initial_patch_density", self.initial_patch_density)?;
        positive("min_patch_density", self.min_patch_density)?;
        positive("max_patch_density", self.max_patch_density)?;
        positive("wild_handling_cost", self.wild_handling_cost)?;
        positive("domestic_handling_cost", self.domestic_handling_cost)?;

        if self.min_prey_encounter == 0 {
            return Err(invalid("min_prey_encounter", "must be at least 1"));
        }
        if self.min_prey_encounter > self.max_prey_encounter {
            return Err(invalid(
                "min_prey_encounter",
                "must not exceed max_prey_encounter",
            ));
        }
        if self.min_patch_density > self.initial_patch_density
            || self.initial_patch_density > self.max_patch_density
        {
            return Err(invalid(
                "initial_patch_density",
                "must lie within [min_patch_density, max_patch_density]",
            ));
        }
        if let LaborPolicy::Split { hunter_ratio } = self.labor_policy {
            if !hunter_ratio.is_finite() || hunter_ratio <= 0.0 || hunter_ratio >= 1.0 {
                return Err(invalid(
                    "labor_policy.hunter_ratio",
                    "must lie strictly between 0 and 1",
                ));
            }
        }

        Ok(())
    }
}
