use async_trait::async_trait;
use serde_json::Value;

use crate::error::IcatResult;

/// The capability set provisioning needs from the catalog. Implemented by
/// [`crate::IcatSession`] over the REST API; tests implement it with a
/// recording mock so routines can be checked without a live server.
///
/// Records cross this seam already wrapped in the wire envelope
/// (`{"EntityType": {..fields..}}`, see [`crate::entity::IcatEntity`]).
#[async_trait]
pub trait CatalogOps {
    /// Authenticate and hold the resulting session for subsequent calls.
    async fn login(&mut self, mechanism: &str, credentials: &[(String, String)]) -> IcatResult<()>;

    /// Fetch one entity by id, with all non-relationship fields populated.
    async fn get(&self, entity_type: &str, id: i64) -> IcatResult<Value>;

    /// Persist a single record.
    async fn create(&self, entity: Value) -> IcatResult<()>;

    /// Persist a batch of records in one call. Server-side this is
    /// best-effort, not transactional.
    async fn create_many(&self, entities: Vec<Value>) -> IcatResult<()>;

    /// Create one ungrouped (public) whole-table authorization rule per
    /// table, in a single call.
    async fn create_rules(&self, crud_flags: &str, tables: &[&str]) -> IcatResult<()>;
}
