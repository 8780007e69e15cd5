use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::entity::{text_field, StoreEntity, Timestamps, UniquenessCheck};
use crate::validation::{FieldKind, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "firstname",
        kind: FieldKind::Text { min_len: 1 },
        message: "Firstname is required and must be a non-empty string",
    },
    FieldRule {
        field: "lastname",
        kind: FieldKind::Text { min_len: 1 },
        message: "Lastname is required and must be a non-empty string",
    },
    FieldRule {
        field: "username",
        kind: FieldKind::Text { min_len: 1 },
        message: "Username is required and must be a non-empty string",
    },
    FieldRule {
        field: "password",
        kind: FieldKind::Text { min_len: 6 },
        message: "Password is required and must be at least 6 characters long",
    },
];

impl StoreEntity for User {
    const LABEL: &'static str = "User";
    const LABEL_LOWER: &'static str = "user";
    const SEGMENT: &'static str = "user";
    const COLLECTION: &'static str = "user";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_payload(payload: &Map<String, Value>) -> Self {
        User {
            id: None,
            firstname: text_field(payload, "firstname"),
            lastname: text_field(payload, "lastname"),
            username: text_field(payload, "username"),
            password: text_field(payload, "password"),
            timestamps: Timestamps::default(),
        }
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn uniqueness(&self) -> Option<UniquenessCheck<'_>> {
        Some(UniquenessCheck {
            field: "username",
            value: &self.username,
            conflict_message: "Username already exists",
        })
    }
}
