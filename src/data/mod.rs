/// Data layer: core types, loading, filtering and the derived views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → StudentDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StudentDataset │  Vec<StudentRecord>, distinct groups / semesters
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  group ∈ G and semester ∈ S → filtered rows
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌───────────┐     ┌──────────┐
///   │ aggregate │     │  select  │  final average ≥ threshold
///   └───────────┘     └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
