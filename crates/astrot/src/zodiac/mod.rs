//! Static reference tables: signs, elements, modalities, bodies, houses.

pub mod bodies;
pub mod houses;
pub mod signs;

pub use bodies::{Body, ALL_BODIES};
pub use houses::House;
pub use signs::{Element, Modality, Sign, ALL_SIGNS};
