/// Data layer: core types and table loading.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, forward-fill temperature → Vec<Measurement>
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ SolubilityDataset   │  temperature groups, derived H2O, eutectic points
///   └────────────────────┘
/// ```
pub mod loader;
pub mod model;
