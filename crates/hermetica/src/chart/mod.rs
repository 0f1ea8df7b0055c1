pub mod builder;
pub mod input;
pub mod types;

pub use builder::{build_chart, house_of};
pub use input::{BirthInput, BirthLocation};
pub use types::{HouseInfo, NatalChart, PlanetPosition};
