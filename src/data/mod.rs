/// Data layer: core types, loading, and the metric computations.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<NeighborhoodRecord>, typed (year, kind) maps
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  extract / completeness gate / normalize → views
///   └──────────┘
/// ```

pub mod loader;
pub mod metrics;
pub mod model;
