//! Filter-and-aggregate engine for a grocery sales dashboard.
//!
//! Load a [`Dataset`](data::model::Dataset) (or fall back to seeded sample
//! data), narrow it with a [`FilterSelection`](data::filter::FilterSelection),
//! and hand the resulting [`AggregationCatalog`](analytics::AggregationCatalog)
//! to whatever draws the charts.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod session;

pub use analytics::{aggregate, aggregate_with, AggregationCatalog};
pub use config::DashboardConfig;
pub use data::filter::{apply, FilterSelection, FilteredView, YearRange};
pub use data::loader::{load, load_or_sample};
pub use data::model::{Dataset, Record};
pub use data::synthetic::generate;
pub use error::LoadError;
pub use session::DashboardSession;
