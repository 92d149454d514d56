use anyhow::Result;

use crate::{
    params::ParameterSet,
    rng::{RngManager, SystemRng},
    systems::{BookkeepingSystem, CoevolutionSystem, DemographySystem, ForagingSystem},
    world::{World, YearRecord},
};

/// Read-only context handed to every system each year.
pub struct SystemContext<'a> {
    pub year: u32,
    pub params: &'a ParameterSet,
}

pub trait System {
    /// Stable name; also keys the system's RNG stream.
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &SystemContext, world: &mut World, rng: &mut SystemRng<'_>)
        -> Result<()>;
}

pub struct EngineBuilder {
    params: ParameterSet,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.params.seed),
            systems: self.systems,
            params: self.params,
        }
    }
}

/// Runs the year loop: foraging, demography, coevolution, bookkeeping, in
/// that fixed order, each against its own RNG stream. A run is deterministic
/// for a given seed and parameter set.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    params: ParameterSet,
}

impl Engine {
    /// The standard simulation stack.
    pub fn standard(params: ParameterSet) -> Engine {
        EngineBuilder::new(params)
            .with_system(ForagingSystem::new())
            .with_system(DemographySystem::new())
            .with_system(CoevolutionSystem::new())
            .with_system(BookkeepingSystem::new())
            .build()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn new_world(&self) -> World {
        World::new(&self.params)
    }

    pub fn run(&mut self, world: &mut World, years: u32) -> Result<()> {
        self.run_with_hook(world, years, |_| {})
    }

    /// Runs `years` years, invoking `hook` with the completed row after each
    /// one. Consumers stream output through the hook; the engine's behavior
    /// does not depend on what the hook does.
    pub fn run_with_hook(
        &mut self,
        world: &mut World,
        years: u32,
        mut hook: impl FnMut(&YearRecord),
    ) -> Result<()> {
        for _ in 0..years {
            let year = world.year() + 1;
            let params = &self.params;
            for system in &mut self.systems {
                let mut rng = self.rng.stream(system.name());
                let ctx = SystemContext { year, params };
                system.run(&ctx, world, &mut rng)?;
            }
            hook(world.last_record());
        }
        Ok(())
    }
}
