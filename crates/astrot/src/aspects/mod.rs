pub mod calculator;
pub mod types;

pub use calculator::AspectCalculator;
pub use types::{Aspect, AspectCore, AspectSettings, AspectType, CrossAspect, ALL_ASPECT_TYPES};
