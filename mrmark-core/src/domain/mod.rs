pub mod dataset;
pub mod error;
pub mod project;
pub mod quality;
pub mod record;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
