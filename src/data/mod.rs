/// Data layer: core types, loading, filtering, and sample generation.
///
/// Architecture:
/// ```text
///  .csv .json .parquet .xlsx      (no file)
///        │                            │
///        ▼                            ▼
///   ┌──────────┐  LoadError   ┌────────────┐
///   │  loader   │ ───────────► │ synthetic  │  seeded sample records
///   └──────────┘              └────────────┘
///        │                            │
///        ▼                            ▼
///   ┌──────────────┐
///   │   Dataset     │  immutable Arc<[Record]>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod synthetic;
