use anyhow::Result;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    engine::{System, SystemContext},
    params::DemographyPolicy,
    rng::SystemRng,
    world::World,
};

/// One year's births or deaths for a population of size `n` at per-capita
/// rate `rate`, under the configured policy.
fn vital_events(
    policy: DemographyPolicy,
    rng: &mut SystemRng<'_>,
    rate: f64,
    filter: f64,
    n: f64,
) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    match policy {
        DemographyPolicy::Bernoulli => {
            let mut events = 0u64;
            for _ in 0..n as u64 {
                if rng.gen::<f64>() < rate {
                    events += 1;
                }
            }
            events as f64
        }
        DemographyPolicy::Gaussian => {
            let drawn_rate = if filter > 0.0 {
                match Normal::new(rate, filter) {
                    Ok(normal) => normal.sample(rng),
                    Err(_) => rate,
                }
            } else {
                rate
            };
            (drawn_rate * n).round()
        }
    }
}

/// Applies the between-year demographic update: starvation-gated human births
/// and deaths, then prey births, deaths, and immigration, both clamped to
/// their configured ceilings.
pub struct DemographySystem;

impl DemographySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemographySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DemographySystem {
    fn name(&self) -> &'static str {
        "demography"
    }

    fn run(&mut self, ctx: &SystemContext, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        let params = ctx.params;
        let policy = params.demography_policy;

        let people = world.people() as f64;
        let annual_need = people * params.kcal_per_person;
        let supplied = annual_need - world.harvest().kcal_deficit;
        let starving = supplied <= annual_need * params.starvation_threshold;

        let next_people = if starving {
            // A hungry year: no births, and deaths at an elevated rate.
            let deaths = vital_events(
                policy,
                rng,
                params.human_death_rate * params.starvation_death_multiplier,
                params.human_rate_filter,
                people,
            );
            people - deaths
        } else {
            let births = vital_events(
                policy,
                rng,
                params.human_birth_rate,
                params.human_rate_filter,
                people,
            );
            let deaths = vital_events(
                policy,
                rng,
                params.human_death_rate,
                params.human_rate_filter,
                people,
            );
            people + births - deaths
        };
        world.set_people(next_people.clamp(0.0, params.max_people as f64) as u32);

        // Prey vital rates apply to the post-hunt stock the foraging loop
        // left behind, then the migrant trickle tops it up.
        let prey_now = world.prey();
        let prey_births = vital_events(
            policy,
            rng,
            params.prey_birth_rate,
            params.prey_rate_filter,
            prey_now,
        );
        let prey_deaths = vital_events(
            policy,
            rng,
            params.prey_death_rate,
            params.prey_rate_filter,
            prey_now,
        );
        let migrants = if params.max_prey_migrants == 0 {
            0.0
        } else {
            rng.gen_range(0..=params.max_prey_migrants) as f64
        };
        let next_prey = prey_now + prey_births - prey_deaths + migrants;
        world.set_prey(next_prey.clamp(0.0, params.max_prey as f64));
        Ok(())
    }
}
