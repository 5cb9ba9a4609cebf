use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Outcome of a partial update, serialized with the field names clients of the
/// previous document-store backend already read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(rename = "UpsertedID")]
    pub upserted_id: Option<Uuid>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            matched_count,
            modified_count,
            ..Self::default()
        }
    }

    /// Postgres only reports affected rows, which count as both matched and modified.
    pub fn from_rows_affected(rows: u64) -> Self {
        Self::new(rows, rows)
    }
}
