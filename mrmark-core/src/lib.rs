// mrmark-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Read-only access to a table-oriented backing store.
pub mod ports;

// 2. Domain (Business core)
// Records, dataset kinds, quality rules and the scorer itself.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, config files, report artifacts, data file discovery.
pub mod infrastructure;

// 4. Application (Use Cases)
// Multi-file checks and the warehouse-wide report.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use domain::dataset::DatasetKind;
pub use domain::quality::{QualityScorer, ValidationResult, WarehouseReport};
pub use error::MrMarkError;
