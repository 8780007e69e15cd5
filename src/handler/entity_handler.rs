use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bson::oid::ObjectId;
use chrono::Local;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::model::StoreEntity;
use crate::repository::{EntityRepository, RepositoryError};
use crate::util::error::ApiError;
use crate::util::identifier::{parse_document_id, IdentifierError};
use crate::validation::validate_fields;

/// Per-entity handler state: the injected repository plus the deployment
/// flag that gates raw error detail in response bodies.
pub struct EntityState<E> {
    pub repo: Arc<dyn EntityRepository<E>>,
    pub expose_errors: bool,
}

impl<E> EntityState<E> {
    pub fn new(repo: Arc<dyn EntityRepository<E>>, expose_errors: bool) -> Self {
        EntityState { repo, expose_errors }
    }

    /// Downgrade a storage fault to a generic response body. The full detail
    /// is always logged server-side; the client sees it only when the
    /// deployment flag allows.
    fn storage_error(&self, err: RepositoryError) -> ApiError {
        error!(error = %err, "Storage operation failed");
        let raw = err.to_string();
        match err {
            RepositoryError::SerializationError(_) | RepositoryError::UnacknowledgedWrite(_) => {
                ApiError::internal("Internal server error", self.expose_errors, raw)
            }
            _ => ApiError::storage(self.expose_errors, raw),
        }
    }
}

impl<E> Clone for EntityState<E> {
    fn clone(&self) -> Self {
        EntityState {
            repo: Arc::clone(&self.repo),
            expose_errors: self.expose_errors,
        }
    }
}

fn parse_key<E: StoreEntity>(raw: &str) -> Result<ObjectId, ApiError> {
    parse_document_id(raw).map_err(|err| match err {
        IdentifierError::Missing => {
            ApiError::bad_request(format!("{} ID is required", E::LABEL))
        }
        IdentifierError::Malformed => {
            ApiError::bad_request(format!("Invalid {} ID format", E::LABEL_LOWER))
        }
    })
}

fn require_object_body(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(payload))) => Ok(payload),
        _ => Err(ApiError::bad_request(
            "Request body is required and must be an object",
        )),
    }
}

/// Response view of a stored record: the key is rendered as its plain hex
/// string instead of the driver's extended-JSON form.
fn public_json<E: Serialize>(entity: &E) -> Value {
    let mut value = serde_json::to_value(entity).unwrap_or(Value::Null);
    if let Value::Object(record) = &mut value {
        let hex = record
            .get("_id")
            .and_then(|id| id.get("$oid"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(hex) = hex {
            record.insert("_id".to_string(), Value::String(hex));
        }
    }
    value
}

// GET /<entity>
pub async fn list_entities<E: StoreEntity>(
    State(state): State<EntityState<E>>,
) -> Result<Response, ApiError> {
    let entities = state
        .repo
        .list_all()
        .await
        .map_err(|e| state.storage_error(e))?;
    let body: Vec<Value> = entities.iter().map(public_json).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

// GET /<entity>/:id
pub async fn get_entity<E: StoreEntity>(
    State(state): State<EntityState<E>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let key = parse_key::<E>(&id)?;
    let found = state
        .repo
        .find_by_key(key)
        .await
        .map_err(|e| state.storage_error(e))?;
    match found {
        Some(entity) => Ok((StatusCode::OK, Json(public_json(&entity))).into_response()),
        None => Err(ApiError::not_found(format!("{} item not found", E::LABEL))),
    }
}

// POST /<entity>
pub async fn create_entity<E: StoreEntity>(
    State(state): State<EntityState<E>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let payload = require_object_body(body)?;
    let violations = validate_fields(E::rules(), &payload);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    let mut entity = E::from_payload(&payload);
    if let Some(check) = entity.uniqueness() {
        // Probe-then-write, deliberately not atomic: two concurrent creates
        // with the same new value can both pass this probe.
        let taken = state
            .repo
            .exists_where(check.field, check.value, None)
            .await
            .map_err(|e| state.storage_error(e))?;
        if taken {
            return Err(ApiError::conflict(check.conflict_message));
        }
    }

    entity.stamp_created(&Local::now().to_rfc3339());
    match state.repo.insert(entity).await {
        Ok(key) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "id": key.to_hex(),
                "message": format!("{} created successfully", E::LABEL),
            })),
        )
            .into_response()),
        Err(RepositoryError::UnacknowledgedWrite(detail)) => {
            error!(detail = %detail, "Write not acknowledged");
            Err(ApiError::internal(
                format!("Failed to create {}", E::LABEL_LOWER),
                state.expose_errors,
                detail,
            ))
        }
        Err(err) => Err(state.storage_error(err)),
    }
}

// PUT /<entity>/:id
pub async fn update_entity<E: StoreEntity>(
    State(state): State<EntityState<E>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let key = parse_key::<E>(&id)?;
    let payload = require_object_body(body)?;
    let violations = validate_fields(E::rules(), &payload);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    let mut entity = E::from_payload(&payload);
    if let Some(check) = entity.uniqueness() {
        // Same non-atomic probe as create, excluding the record's own key.
        let taken = state
            .repo
            .exists_where(check.field, check.value, Some(key))
            .await
            .map_err(|e| state.storage_error(e))?;
        if taken {
            return Err(ApiError::conflict(check.conflict_message));
        }
    }

    entity.stamp_updated(&Local::now().to_rfc3339());
    let outcome = state
        .repo
        .replace(key, entity)
        .await
        .map_err(|e| state.storage_error(e))?;
    if !outcome.matched {
        return Err(ApiError::not_found(format!("{} item not found", E::LABEL)));
    }
    let message = if outcome.modified {
        format!("{} updated successfully", E::LABEL)
    } else {
        format!("{} data unchanged", E::LABEL)
    };
    Ok((StatusCode::OK, Json(json!({ "message": message }))).into_response())
}

// DELETE /<entity>/:id
pub async fn delete_entity<E: StoreEntity>(
    State(state): State<EntityState<E>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let key = parse_key::<E>(&id)?;
    let deleted = state
        .repo
        .delete(key)
        .await
        .map_err(|e| state.storage_error(e))?;
    if deleted {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": format!("{} deleted successfully", E::LABEL) })),
        )
            .into_response())
    } else {
        Err(ApiError::not_found(format!("{} item not found", E::LABEL)))
    }
}
