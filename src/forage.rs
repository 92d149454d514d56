//! Return-rate math and the noisy diet-breadth choice. Everything here is a
//! pure function of its inputs plus RNG draws; stock depletion is the caller's
//! business.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::params::ParameterSet;
use crate::rng::SystemRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietChoice {
    Prey,
    Cereal,
    /// Nothing left worth pursuing; the year's foraging is over.
    Neither,
}

/// Per-kernel return and handling cost blended over the mean wild proportion
/// of the patches still available, plus their mean yield.
#[derive(Debug, Clone, Copy)]
pub struct CerealBlend {
    pub kcal_per_kernel: f64,
    pub handling_per_kernel: f64,
    pub mean_density: f64,
}

impl CerealBlend {
    pub fn new(params: &ParameterSet, mean_wild: f64, mean_density: f64) -> Self {
        let w = mean_wild;
        Self {
            kcal_per_kernel: params.wild_cereal_kcal * w + params.domestic_cereal_kcal * (1.0 - w),
            handling_per_kernel: params.wild_handling_cost * w
                + params.domestic_handling_cost * (1.0 - w),
            mean_density,
        }
    }

    /// Kcal yielded by harvesting one patch.
    pub fn patch_gain(&self) -> f64 {
        self.kcal_per_kernel * self.mean_density
    }

    /// Hours spent finding and processing one patch.
    pub fn patch_hours(&self, search_cost: f64) -> f64 {
        search_cost + self.handling_per_kernel * self.mean_density
    }
}

/// Hours of search per prey at the current stock level. Search cost scales
/// inversely with stock relative to the reference density, so it diverges as
/// the herd is hunted out.
pub fn prey_search_cost_now(params: &ParameterSet, prey_now: f64) -> f64 {
    params.prey_search_cost / (prey_now / params.prey_reference_density)
}

/// Return rate (kcal/hr) for prey at the current stock, or 0 when exhausted.
pub fn prey_score(params: &ParameterSet, prey_now: f64) -> f64 {
    if prey_now <= 0.0 {
        return 0.0;
    }
    params.prey_kcal / (prey_search_cost_now(params, prey_now) + params.prey_handling_cost)
}

/// Return rate (kcal/hr) for cereal over the unexploited patches, or 0 when
/// none remain.
pub fn cereal_score(params: &ParameterSet, blend: &CerealBlend, patches_left: usize) -> f64 {
    if patches_left == 0 {
        return 0.0;
    }
    blend.patch_gain() / blend.patch_hours(params.cereal_search_cost)
}

/// Herd size taken per successful prey encounter, uniform over the configured
/// range (degenerate to the minimum when the range is empty).
pub fn encounter_size(params: &ParameterSet, rng: &mut SystemRng<'_>) -> f64 {
    if params.min_prey_encounter >= params.max_prey_encounter {
        return params.min_prey_encounter as f64;
    }
    rng.gen_range(params.min_prey_encounter..=params.max_prey_encounter) as f64
}

fn realized(rng: &mut SystemRng<'_>, score: f64, uncertainty: f64) -> f64 {
    let sigma = score * uncertainty;
    if sigma > 0.0 {
        match Normal::new(score, sigma) {
            Ok(normal) => normal.sample(rng),
            Err(_) => score,
        }
    } else {
        score
    }
}

/// The diet-breadth decision. Each side's realized score is drawn from a
/// Gaussian centered on its true return rate with width proportional to it,
/// so choices are stochastic near parity and increasingly one-sided as the
/// gap widens. A resource whose true score is zero is never chosen, which is
/// what forces the caller to re-evaluate instead of committing a dead harvest.
pub fn choose(
    rng: &mut SystemRng<'_>,
    prey_score: f64,
    cereal_score: f64,
    uncertainty: f64,
) -> DietChoice {
    match (prey_score > 0.0, cereal_score > 0.0) {
        (false, false) => DietChoice::Neither,
        (true, false) => DietChoice::Prey,
        (false, true) => DietChoice::Cereal,
        (true, true) => {
            let prey_draw = realized(rng, prey_score, uncertainty);
            let cereal_draw = realized(rng, cereal_score, uncertainty);
            if prey_draw > cereal_draw {
                DietChoice::Prey
            } else if cereal_draw > prey_draw {
                DietChoice::Cereal
            } else if rng.gen_bool(0.5) {
                DietChoice::Prey
            } else {
                DietChoice::Cereal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    fn params() -> ParameterSet {
        ParameterSet::default()
    }

    #[test]
    fn exhausted_stocks_score_zero() {
        let p = params();
        assert_eq!(prey_score(&p, 0.0), 0.0);
        assert_eq!(prey_score(&p, -3.0), 0.0);
        let blend = CerealBlend::new(&p, 0.98, 1.0e7);
        assert_eq!(cereal_score(&p, &blend, 0), 0.0);
        assert!(cereal_score(&p, &blend, 1) > 0.0);
    }

    #[test]
    fn prey_score_falls_with_stock() {
        let p = params();
        assert!(prey_score(&p, 1000.0) > prey_score(&p, 100.0));
        assert!(prey_score(&p, 100.0) > prey_score(&p, 1.0));
    }

    #[test]
    fn choice_never_picks_an_exhausted_resource() {
        let mut mgr = RngManager::new(1);
        let mut rng = mgr.stream("test");
        for _ in 0..50 {
            assert_eq!(choose(&mut rng, 0.0, 500.0, 0.1), DietChoice::Cereal);
            assert_eq!(choose(&mut rng, 500.0, 0.0, 0.1), DietChoice::Prey);
        }
        assert_eq!(choose(&mut rng, 0.0, 0.0, 0.1), DietChoice::Neither);
    }

    #[test]
    fn choice_is_biased_toward_the_higher_score() {
        let mut mgr = RngManager::new(2);
        let mut rng = mgr.stream("test");
        let trials = 400;
        let prey_wins = (0..trials)
            .filter(|_| choose(&mut rng, 1000.0, 10.0, 0.1) == DietChoice::Prey)
            .count();
        assert!(
            prey_wins > trials * 9 / 10,
            "expected a wide score gap to dominate, got {prey_wins}/{trials}"
        );
    }

    #[test]
    fn exact_parity_without_noise_falls_to_a_coin_flip() {
        let mut mgr = RngManager::new(3);
        let mut rng = mgr.stream("test");
        let trials = 200;
        let prey_wins = (0..trials)
            .filter(|_| choose(&mut rng, 100.0, 100.0, 0.0) == DietChoice::Prey)
            .count();
        assert!(
            prey_wins > trials / 4 && prey_wins < trials * 3 / 4,
            "coin flip should be unbiased, got {prey_wins}/{trials}"
        );
    }

    #[test]
    fn encounter_size_respects_bounds() {
        let mut p = params();
        let mut mgr = RngManager::new(4);
        let mut rng = mgr.stream("test");
        for _ in 0..100 {
            let size = encounter_size(&p, &mut rng);
            assert!((1.0..=4.0).contains(&size));
        }
        p.min_prey_encounter = 2;
        p.max_prey_encounter = 2;
        assert_eq!(encounter_size(&p, &mut rng), 2.0);
    }
}
