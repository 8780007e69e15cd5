use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::entity::{number_field, text_field, StoreEntity, Timestamps};
use crate::validation::{FieldKind, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clothes {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub size: String,
    pub price: f64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        kind: FieldKind::Text { min_len: 1 },
        message: "Name is required and must be a non-empty string",
    },
    FieldRule {
        field: "size",
        kind: FieldKind::Text { min_len: 1 },
        message: "Size is required and must be a non-empty string",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number { min: 0.0, exclusive: true },
        message: "Price is required and must be a positive number",
    },
];

impl StoreEntity for Clothes {
    const LABEL: &'static str = "Clothes";
    const LABEL_LOWER: &'static str = "clothes";
    const SEGMENT: &'static str = "clothes";
    const COLLECTION: &'static str = "clothes";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_payload(payload: &Map<String, Value>) -> Self {
        Clothes {
            id: None,
            name: text_field(payload, "name"),
            size: text_field(payload, "size"),
            price: number_field(payload, "price"),
            timestamps: Timestamps::default(),
        }
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
