pub mod builder;
pub mod data;
pub mod distribution;
pub mod transit;

pub use builder::{provider_from_config, ChartBuilder, ChartSettings};
pub use data::{BirthChart, BirthData, BodyPosition, ChartAngles, ChartDerived, HousePosition};
pub use distribution::{ElementDistribution, ModalityDistribution};
pub use transit::{synastry_aspects, transit_aspects};
