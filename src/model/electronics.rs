use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::entity::{number_field, text_field, StoreEntity, Timestamps};
use crate::validation::{FieldKind, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Electronics {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub brand: String,
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
        field: "brand",
        kind: FieldKind::Text { min_len: 1 },
        message: "Brand is required and must be a non-empty string",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number { min: 0.0, exclusive: true },
        message: "Price is required and must be a positive number",
    },
];

impl StoreEntity for Electronics {
    const LABEL: &'static str = "Electronics";
    const LABEL_LOWER: &'static str = "electronics";
    const SEGMENT: &'static str = "electronics";
    const COLLECTION: &'static str = "electronics";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_payload(payload: &Map<String, Value>) -> Self {
        Electronics {
            id: None,
            name: text_field(payload, "name"),
            brand: text_field(payload, "brand"),
            price: number_field(payload, "price"),
            timestamps: Timestamps::default(),
        }
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
