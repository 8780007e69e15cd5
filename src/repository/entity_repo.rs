use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::Database;
use tracing::{debug, error, info};

use crate::model::StoreEntity;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// What a replace did: `matched` is whether the key resolved to a document,
/// `modified` whether anything was actually written. An unchanged record is
/// a reported outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub matched: bool,
    pub modified: bool,
}

/// The storage operations for one collection, plus the uniqueness probe.
/// Pure pass-through to the storage engine; no business logic. Handlers
/// receive this as an injected trait object so tests can substitute an
/// in-memory double.
#[async_trait]
pub trait EntityRepository<E>: Send + Sync
where
    E: Send + Sync,
{
    async fn list_all(&self) -> RepositoryResult<Vec<E>>;
    async fn find_by_key(&self, key: ObjectId) -> RepositoryResult<Option<E>>;
    /// Insert a record the caller already validated; the storage engine
    /// assigns and returns the key.
    async fn insert(&self, entity: E) -> RepositoryResult<ObjectId>;
    async fn replace(&self, key: ObjectId, entity: E) -> RepositoryResult<ReplaceOutcome>;
    async fn delete(&self, key: ObjectId) -> RepositoryResult<bool>;
    /// Whether any document (other than `exclude`, if given) has `value` in
    /// `field`. Used for the username uniqueness pre-check.
    async fn exists_where(
        &self,
        field: &'static str,
        value: &str,
        exclude: Option<ObjectId>,
    ) -> RepositoryResult<bool>;
}

/// Compare two stored documents ignoring the key and the timestamp stamps.
/// This is the "data unchanged" test for replace.
pub fn content_matches(stored: &Document, incoming: &Document) -> bool {
    let strip = |document: &Document| {
        let mut stripped = document.clone();
        stripped.remove("_id");
        stripped.remove("createdAt");
        stripped.remove("updatedAt");
        stripped
    };
    strip(stored) == strip(incoming)
}

pub struct MongoEntityRepository<E> {
    collection: mongodb::Collection<E>,
    // Untyped view of the same collection, for probes and raw overwrites
    documents: mongodb::Collection<Document>,
}

impl<E: StoreEntity> MongoEntityRepository<E> {
    pub fn new(db: &Database) -> Self {
        MongoEntityRepository {
            collection: db.collection::<E>(E::COLLECTION),
            documents: db.collection::<Document>(E::COLLECTION),
        }
    }
}

#[async_trait]
impl<E: StoreEntity> EntityRepository<E> for MongoEntityRepository<E> {
    #[tracing::instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn list_all(&self) -> RepositoryResult<Vec<E>> {
        debug!("Listing all documents");
        let mut cursor = self.collection.find(None, None).await?;
        let mut entities = Vec::new();
        while let Some(entity) = cursor.next().await {
            match entity {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    error!("Failed to deserialize document: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize document: {}",
                        e
                    )));
                }
            }
        }
        debug!("Fetched {} documents", entities.len());
        Ok(entities)
    }

    #[tracing::instrument(skip(self), fields(collection = E::COLLECTION, key = %key))]
    async fn find_by_key(&self, key: ObjectId) -> RepositoryResult<Option<E>> {
        let filter = doc! { "_id": key };
        Ok(self.collection.find_one(filter, None).await?)
    }

    #[tracing::instrument(skip(self, entity), fields(collection = E::COLLECTION))]
    async fn insert(&self, entity: E) -> RepositoryResult<ObjectId> {
        info!("Inserting new document");
        let result = self.collection.insert_one(&entity, None).await?;
        match result.inserted_id.as_object_id() {
            Some(key) => {
                info!(key = %key, "Document inserted");
                Ok(key)
            }
            None => {
                error!("Insert was not acknowledged with a generated key");
                Err(RepositoryError::unacknowledged(
                    "Insert was not acknowledged with a generated key",
                ))
            }
        }
    }

    #[tracing::instrument(skip(self, entity), fields(collection = E::COLLECTION, key = %key))]
    async fn replace(&self, key: ObjectId, entity: E) -> RepositoryResult<ReplaceOutcome> {
        let filter = doc! { "_id": key };
        let stored = match self.documents.find_one(filter.clone(), None).await? {
            Some(document) => document,
            None => {
                return Ok(ReplaceOutcome {
                    matched: false,
                    modified: false,
                })
            }
        };

        let mut incoming = bson::to_document(&entity)?;
        if content_matches(&stored, &incoming) {
            debug!("Replacement identical to stored document, skipping write");
            return Ok(ReplaceOutcome {
                matched: true,
                modified: false,
            });
        }

        // Full overwrite of everything but the key; the creation stamp is
        // carried over from the stored document.
        incoming.remove("_id");
        if let Some(created_at) = stored.get("createdAt") {
            incoming.insert("createdAt", created_at.clone());
        }
        let result = self.documents.replace_one(filter, incoming, None).await?;
        info!(
            matched = result.matched_count,
            modified = result.modified_count,
            "Document replaced"
        );
        Ok(ReplaceOutcome {
            matched: result.matched_count > 0,
            modified: result.modified_count > 0,
        })
    }

    #[tracing::instrument(skip(self), fields(collection = E::COLLECTION, key = %key))]
    async fn delete(&self, key: ObjectId) -> RepositoryResult<bool> {
        let filter = doc! { "_id": key };
        let result = self.documents.delete_one(filter, None).await?;
        info!(deleted = result.deleted_count, "Delete executed");
        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip(self), fields(collection = E::COLLECTION, field = field))]
    async fn exists_where(
        &self,
        field: &'static str,
        value: &str,
        exclude: Option<ObjectId>,
    ) -> RepositoryResult<bool> {
        let mut filter = Document::new();
        filter.insert(field, value);
        if let Some(key) = exclude {
            filter.insert("_id", doc! { "$ne": key });
        }
        Ok(self.documents.find_one(filter, None).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_matches_ignores_key_and_stamps() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "name": "Milk",
            "price": 3.5,
            "createdAt": "2025-01-01T00:00:00+00:00",
            "updatedAt": "2025-01-02T00:00:00+00:00",
        };
        let incoming = doc! {
            "name": "Milk",
            "price": 3.5,
            "updatedAt": "2025-06-01T00:00:00+00:00",
        };
        assert!(content_matches(&stored, &incoming));
    }

    #[test]
    fn test_content_matches_detects_field_change() {
        let stored = doc! { "name": "Milk", "price": 3.5 };
        let incoming = doc! { "name": "Milk", "price": 4.0 };
        assert!(!content_matches(&stored, &incoming));
    }
}
