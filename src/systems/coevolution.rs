use anyhow::Result;
use rand_distr::{Distribution, Normal};

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

fn yearly_rate(rng: &mut SystemRng<'_>, base: f64, filter: f64) -> f64 {
    let sigma = base * filter;
    if sigma > 0.0 {
        match Normal::new(base, sigma) {
            Ok(normal) => normal.sample(rng),
            Err(_) => base,
        }
    } else {
        base
    }
}

/// Evolves every patch once per year. Exploited patches feel selection toward
/// the domestic phenotype and gain yield from proto-cultivation; unexploited
/// patches regress toward wild type and lose yield. One pair of effective
/// rates is drawn per year and shared by all patches, with diffusion scaled
/// down by how domesticated the metapopulation already was last year.
pub struct CoevolutionSystem;

impl CoevolutionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoevolutionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CoevolutionSystem {
    fn name(&self) -> &'static str {
        "coevolution"
    }

    fn run(&mut self, ctx: &SystemContext, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        let params = ctx.params;
        // The last appended row is the previous year's closing state.
        let last_domesticated = world.last_record().domesticated_proportion;
        let diffusion = yearly_rate(rng, params.diffusion_rate, params.selection_diffusion_filter)
            * (1.0 - last_domesticated);
        let selection = yearly_rate(rng, params.selection_rate, params.selection_diffusion_filter);

        let min_density = params.min_patch_density;
        let max_density = params.max_patch_density;
        let cultivation = params.cultivation_increment;

        for patch in world.patches_mut().iter_mut() {
            let (proportion_delta, density_delta) = if patch.exploited {
                (diffusion - selection, cultivation)
            } else {
                (diffusion, -cultivation)
            };

            // Bound guards skip the whole update rather than clipping to the
            // bound; a patch at its limit holds still until pressure reverses.
            let next_density = patch.density + density_delta;
            if !(next_density > max_density - cultivation || next_density < min_density + cultivation)
            {
                patch.density = next_density;
            }

            let next_proportion = patch.wild_proportion + proportion_delta;
            if !(next_proportion > 1.0 - diffusion || next_proportion < selection) {
                patch.wild_proportion = next_proportion;
            }
        }
        Ok(())
    }
}
