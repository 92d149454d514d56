use anyhow::Result;
use rand::seq::SliceRandom;

use crate::{
    engine::{System, SystemContext},
    forage::{self, CerealBlend, DietChoice},
    params::{ExploitOrder, LaborPolicy},
    rng::SystemRng,
    world::{World, YearHarvest},
};

/// The year's labor pool. Under the shared policy there is a single budget;
/// under the split policy hunting and gathering draw on separate budgets and
/// a resource whose side is spent scores zero while the other continues.
#[derive(Debug, Clone, Copy)]
enum LaborBudget {
    Shared { hours: f64 },
    Split { hunting: f64, gathering: f64 },
}

impl LaborBudget {
    fn new(policy: LaborPolicy, total_hours: f64) -> Self {
        match policy {
            LaborPolicy::Shared => LaborBudget::Shared { hours: total_hours },
            LaborPolicy::Split { hunter_ratio } => LaborBudget::Split {
                hunting: total_hours * hunter_ratio,
                gathering: total_hours * (1.0 - hunter_ratio),
            },
        }
    }

    fn can_hunt(&self) -> bool {
        match self {
            LaborBudget::Shared { hours } => *hours > 0.0,
            LaborBudget::Split { hunting, .. } => *hunting > 0.0,
        }
    }

    fn can_gather(&self) -> bool {
        match self {
            LaborBudget::Shared { hours } => *hours > 0.0,
            LaborBudget::Split { gathering, .. } => *gathering > 0.0,
        }
    }

    fn spend_hunting(&mut self, spent: f64) {
        match self {
            LaborBudget::Shared { hours } => *hours -= spent,
            LaborBudget::Split { hunting, .. } => *hunting -= spent,
        }
    }

    fn spend_gathering(&mut self, spent: f64) {
        match self {
            LaborBudget::Shared { hours } => *hours -= spent,
            LaborBudget::Split { gathering, .. } => *gathering -= spent,
        }
    }

    fn exhausted(&self) -> bool {
        !self.can_hunt() && !self.can_gather()
    }
}

/// Runs one year of sub-annual diet-breadth foraging: repeatedly scores both
/// resources against their depleting stocks and commits harvests until the
/// band's caloric need is met, labor runs out, or nothing scores above zero.
/// Writes the post-hunt prey stock and the year's harvest tallies back to the
/// world; population and patch state are updated by the later systems.
pub struct ForagingSystem;

impl ForagingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ForagingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ForagingSystem {
    fn name(&self) -> &'static str {
        "foraging"
    }

    fn run(&mut self, ctx: &SystemContext, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        let params = ctx.params;
        let people = world.people() as f64;
        let annual_need = people * params.kcal_per_person;
        let mut kcal_need = annual_need;
        let mut labor = LaborBudget::new(params.labor_policy, people * params.foraging_hours);
        let mut prey_now = world.prey();
        let mut prey_eaten = 0.0;
        let mut patches_exploited = 0u32;

        let patch_count = world.patches().len();
        let mut order: Vec<usize> = (0..patch_count).collect();
        if params.exploit_order == ExploitOrder::Shuffled {
            order.shuffle(rng);
        }
        world.patches_mut().begin_year(order);

        while kcal_need > 0.0 {
            if labor.exhausted() {
                break;
            }
            let patches_left = world.patches().unexploited_remaining();
            let (mean_wild, mean_density) =
                world.patches().mean_unexploited().unwrap_or((0.0, 0.0));
            let blend = CerealBlend::new(params, mean_wild, mean_density);

            let prey_score = if labor.can_hunt() {
                forage::prey_score(params, prey_now)
            } else {
                0.0
            };
            let cereal_score = if labor.can_gather() {
                forage::cereal_score(params, &blend, patches_left)
            } else {
                0.0
            };

            match forage::choose(rng, prey_score, cereal_score, params.foraging_uncertainty) {
                DietChoice::Prey => {
                    let encountered = forage::encounter_size(params, rng);
                    let search = forage::prey_search_cost_now(params, prey_now);
                    kcal_need -= params.prey_kcal;
                    labor.spend_hunting(search + params.prey_handling_cost * encountered);
                    prey_eaten += encountered;
                    prey_now -= encountered;
                }
                DietChoice::Cereal => {
                    world
                        .patches_mut()
                        .exploit_next()
                        .expect("positive cereal score implies a patch remains");
                    kcal_need -= blend.patch_gain();
                    labor.spend_gathering(blend.patch_hours(params.cereal_search_cost));
                    patches_exploited += 1;
                }
                DietChoice::Neither => break,
            }
        }

        // Overshooting the last encounter can take the herd below zero on
        // paper; the stock itself never goes negative.
        world.set_prey(prey_now.max(0.0));
        world.set_harvest(YearHarvest {
            prey_eaten,
            patches_exploited,
            kcal_deficit: kcal_need.max(0.0),
        });
        Ok(())
    }
}
