use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::entity::{number_field, text_field, StoreEntity, Timestamps};
use crate::validation::{FieldKind, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grocery {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

// Unlike clothes and electronics, a grocery price of zero is allowed.
const RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        kind: FieldKind::Text { min_len: 1 },
        message: "Name is required and must be a non-empty string",
    },
    FieldRule {
        field: "quantity",
        kind: FieldKind::Number { min: 0.0, exclusive: false },
        message: "Quantity is required and must be a non-negative number",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number { min: 0.0, exclusive: false },
        message: "Price is required and must be a non-negative number",
    },
];

impl StoreEntity for Grocery {
    const LABEL: &'static str = "Grocery";
    const LABEL_LOWER: &'static str = "grocery";
    const SEGMENT: &'static str = "groceries";
    const COLLECTION: &'static str = "groceries";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_payload(payload: &Map<String, Value>) -> Self {
        Grocery {
            id: None,
            name: text_field(payload, "name"),
            quantity: number_field(payload, "quantity"),
            price: number_field(payload, "price"),
            timestamps: Timestamps::default(),
        }
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
