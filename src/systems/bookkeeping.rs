use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Closes out the year: appends the year's row to the output series and the
/// patch trace tables. Runs last so it records the state every other system
/// has finished writing.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &'static str {
        "bookkeeping"
    }

    fn run(&mut self, ctx: &SystemContext, world: &mut World, _rng: &mut SystemRng<'_>) -> Result<()> {
        world.close_year(ctx.year);
        Ok(())
    }
}
