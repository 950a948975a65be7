/// Data layer: core types, loading, and reshaping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Vec<DistrictRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ HouseholdDataset │  validated, immutable district table
///   └──────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  filter / sort / group-by / join / melt → chart tables
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
