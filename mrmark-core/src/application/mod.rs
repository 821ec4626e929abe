// mrmark-core/src/application/mod.rs

pub mod check;
pub mod warehouse;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use mrmark_core::application::{check_files, generate_warehouse_report};`
// sans connaître la structure interne des fichiers.

pub use check::{FileCheckOutcome, check_files};
pub use warehouse::{generate_warehouse_report, generate_warehouse_report_at};
