mod bookkeeping;
mod coevolution;
mod demography;
mod foraging;

pub use bookkeeping::BookkeepingSystem;
pub use coevolution::CoevolutionSystem;
pub use demography::DemographySystem;
pub use foraging::ForagingSystem;
