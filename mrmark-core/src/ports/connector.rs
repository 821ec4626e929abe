// mrmark-core/src/ports/connector.rs

// What the application needs from a table store, without knowing which engine
// sits behind it. The warehouse report only ever reads through this trait.

use crate::domain::record::RecordCollection;
use crate::error::MrMarkError;
use async_trait::async_trait;

#[async_trait]
pub trait Connector: Send + Sync {
    async fn table_exists(&self, table_name: &str) -> Result<bool, MrMarkError>;

    /// Reads every row of `table_name` as records keyed by column name.
    async fn fetch_records(&self, table_name: &str) -> Result<RecordCollection, MrMarkError>;

    fn engine_name(&self) -> &str;
}
