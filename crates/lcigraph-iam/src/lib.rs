//! IAM scenario data for lcigraph
//!
//! The IAM loader hands over an [`IamDataCollection`]: arrays keyed by
//! (variable, region) holding time series that are linearly interpolated to
//! the target year and clamped outside the declared breakpoints.

pub mod array;
pub mod collection;
pub mod config;
pub mod metals;
pub mod series;

pub use array::{DataArray, SeriesEntry};
pub use collection::IamDataCollection;
pub use config::ScenarioConfig;
pub use metals::{MetalEntry, MetalIntensity, MEDIAN};
pub use series::{interp, TimeSeries};
