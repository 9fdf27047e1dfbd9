pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod position;
pub mod store;
pub mod summary;
pub mod time;
pub mod zodiac;

pub use aspects::{Aspect, AspectCalculator, AspectSettings, AspectType, CrossAspect};
pub use chart::{
    BirthChart, BirthData, BodyPosition, ChartBuilder, ChartDerived, ChartSettings,
    ElementDistribution, ModalityDistribution,
};
pub use ephemeris::{AnalyticEphemeris, EphemerisProvider, GeoLocation, HouseSystem};
pub use error::{AstrotError, Result};
pub use store::{ChartService, ChartStore, InMemoryChartStore};
pub use summary::{ChartInterpretation, ChartSummary, Interpreter, TemplateInterpreter};
pub use zodiac::{Body, Element, House, Modality, Sign};
