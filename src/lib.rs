pub mod engine;
pub mod forage;
pub mod params;
pub mod patch;
pub mod report;
pub mod rng;
pub mod systems;
pub mod world;

pub use engine::{Engine, EngineBuilder, System, SystemContext};
pub use params::{DemographyPolicy, ExploitOrder, LaborPolicy, ParameterSet};
pub use world::{World, YearRecord};
