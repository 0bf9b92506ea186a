use async_trait::async_trait;
use serde_json::{Map, Value};

use super::StoreError;
use crate::models::{EntityId, ID_FIELD};

/// One collection of a document database.
///
/// Every operation addresses documents by their `_id` field. A miss is never
/// an error: lookups return `None` and writes report how many documents they
/// matched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn collection(&self) -> &str;

    /// Stores `document` under its own integer `_id` field. Fails with
    /// [`StoreError::DuplicateKey`] when that key is taken.
    async fn insert_one(&self, document: Value) -> Result<(), StoreError>;
    async fn find_all(&self) -> Result<Vec<Value>, StoreError>;
    async fn find_one(&self, id: EntityId) -> Result<Option<Value>, StoreError>;
    /// Replaces the whole document. Returns the matched count (0 or 1).
    async fn replace_one(&self, id: EntityId, document: Value) -> Result<u64, StoreError>;
    /// Sets only the given top-level fields. Returns the matched count (0 or 1).
    async fn update_one(&self, id: EntityId, fields: Map<String, Value>)
        -> Result<u64, StoreError>;
    /// Returns the deleted count (0 or 1).
    async fn delete_one(&self, id: EntityId) -> Result<u64, StoreError>;
}

/// Reads the identity out of a document.
pub fn document_id(document: &Value) -> Result<EntityId, StoreError> {
    let object = document
        .as_object()
        .ok_or_else(|| StoreError::InvalidDocument("document must be a JSON object".to_string()))?;
    object
        .get(ID_FIELD)
        .and_then(Value::as_i64)
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing integer {ID_FIELD} field")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_id_reads_integer_identity() {
        assert_eq!(document_id(&json!({ "_id": 42, "html": "" })).unwrap(), 42);
    }

    #[test]
    fn document_id_rejects_bad_shapes() {
        for doc in [json!([1, 2]), json!({ "id": 1 }), json!({ "_id": "1" }), json!({ "_id": 1.5 })] {
            assert!(matches!(document_id(&doc), Err(StoreError::InvalidDocument(_))));
        }
    }
}
