/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → EmployeeDataset (memoized per path)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ EmployeeDataset  │  Vec<Employee>, column kinds, departments
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age window ∧ department set → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  counts, histogram, box summary, correlation
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
