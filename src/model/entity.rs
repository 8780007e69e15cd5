use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::FieldRule;

/// Creation and last-modification stamps carried by every stored document,
/// flattened into the document body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A uniqueness rule extracted from a concrete record: which field must be
/// unique, the value to probe for, and the conflict message on collision.
#[derive(Debug, Clone, Copy)]
pub struct UniquenessCheck<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub conflict_message: &'static str,
}

/// Entity descriptor: everything the generic CRUD handlers, repository and
/// router need to know about one collection kind. Implemented once per
/// entity; the handlers are instantiated over it instead of being copied
/// four times.
pub trait StoreEntity:
    Serialize + DeserializeOwned + Unpin + Send + Sync + 'static
{
    /// Display label used in response messages, e.g. "Grocery".
    const LABEL: &'static str;
    /// Lowercase label for mid-sentence use, e.g. "Invalid grocery ID format".
    const LABEL_LOWER: &'static str;
    /// URL path segment, e.g. "groceries".
    const SEGMENT: &'static str;
    /// MongoDB collection name.
    const COLLECTION: &'static str;

    /// Declarative validation table for this entity's input records.
    fn rules() -> &'static [FieldRule];

    /// Build the entity from a payload that already passed `rules()`.
    /// String fields are stored trimmed.
    fn from_payload(payload: &Map<String, Value>) -> Self;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Set both stamps at creation time.
    fn stamp_created(&mut self, ts: &str) {
        let stamps = self.timestamps_mut();
        stamps.created_at = Some(ts.to_string());
        stamps.updated_at = Some(ts.to_string());
    }

    /// Refresh the modification stamp before a replace.
    fn stamp_updated(&mut self, ts: &str) {
        self.timestamps_mut().updated_at = Some(ts.to_string());
    }

    /// Collection-wide uniqueness constraint, if this entity has one.
    fn uniqueness(&self) -> Option<UniquenessCheck<'_>> {
        None
    }
}

/// Trimmed string field from a validated payload.
pub(crate) fn text_field(payload: &Map<String, Value>, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Numeric field from a validated payload.
pub(crate) fn number_field(payload: &Map<String, Value>, field: &str) -> f64 {
    payload.get(field).and_then(Value::as_f64).unwrap_or_default()
}
