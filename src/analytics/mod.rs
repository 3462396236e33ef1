/// Aggregation layer: turns a filtered view into the dashboard's figures.
///
/// Architecture:
/// ```text
///   FilteredView
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  Accumulator (sum / count / mean), first-seen group-by
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  KPIs, grouped sums and means, pivots, top-K
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ histogram │  equal-width binning for distribution charts
///   └──────────┘
/// ```

pub mod catalog;
pub mod histogram;
pub mod stats;

pub use catalog::{aggregate, aggregate_with, AggregationCatalog};
