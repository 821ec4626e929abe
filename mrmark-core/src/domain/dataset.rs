// mrmark-core/src/domain/dataset.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Known record types. Each kind owns its own rule set in the catalog;
/// supporting a new record type means adding a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Raw posts produced by the SNS collector (JSON files).
    SnsPosts,
    Posts,
    Users,
    Hashtags,
    Engagement,
    Trends,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 6] = [
        Self::SnsPosts,
        Self::Posts,
        Self::Users,
        Self::Hashtags,
        Self::Engagement,
        Self::Trends,
    ];

    /// Tables of the analytics warehouse, in report order.
    pub const WAREHOUSE_TABLES: [DatasetKind; 5] = [
        Self::Posts,
        Self::Users,
        Self::Hashtags,
        Self::Engagement,
        Self::Trends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SnsPosts => "sns_posts",
            Self::Posts => "posts",
            Self::Users => "users",
            Self::Hashtags => "hashtags",
            Self::Engagement => "engagement",
            Self::Trends => "trends",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sns_posts" | "sns-posts" => Ok(Self::SnsPosts),
            "posts" => Ok(Self::Posts),
            "users" => Ok(Self::Users),
            "hashtags" => Ok(Self::Hashtags),
            "engagement" => Ok(Self::Engagement),
            "trends" => Ok(Self::Trends),
            _ => Err(DomainError::UnknownDatasetKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        for kind in DatasetKind::ALL {
            assert_eq!(DatasetKind::from_str(&kind.to_string())?, kind);
        }
        assert_eq!(DatasetKind::from_str("SNS-Posts")?, DatasetKind::SnsPosts);
        assert!(matches!(
            DatasetKind::from_str("comments"),
            Err(DomainError::UnknownDatasetKind(_))
        ));
        Ok(())
    }

    #[test]
    fn test_warehouse_tables_exclude_collector_output() {
        assert!(!DatasetKind::WAREHOUSE_TABLES.contains(&DatasetKind::SnsPosts));
        assert_eq!(DatasetKind::WAREHOUSE_TABLES.len(), 5);
    }
}
