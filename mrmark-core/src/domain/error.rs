// mrmark-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Malformed record collection: {0}")]
    #[diagnostic(
        code(mrmark::domain::collection),
        help("Expected a JSON array of objects, or an object holding one under 'posts', 'records' or 'data'.")
    )]
    MalformedCollection(String),

    #[error("Unknown dataset kind '{0}'")]
    #[diagnostic(
        code(mrmark::domain::dataset_kind),
        help("Known kinds: sns_posts, posts, users, hashtags, engagement, trends.")
    )]
    UnknownDatasetKind(String),

    #[error("Unknown quality dimension '{0}'")]
    #[diagnostic(
        code(mrmark::domain::dimension),
        help("Known dimensions: completeness, accuracy, consistency, timeliness, validity, uniqueness.")
    )]
    UnknownDimension(String),

    #[error("Invalid rule for dataset '{kind}': {reason}")]
    #[diagnostic(code(mrmark::domain::rule))]
    InvalidRule { kind: String, reason: String },

    #[error("Invalid quality configuration: {0}")]
    #[diagnostic(
        code(mrmark::domain::config),
        help("Thresholds must lie in [0, 1], weights must be >= 0 and the freshness window >= 1s.")
    )]
    InvalidConfig(String),
}
