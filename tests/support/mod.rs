use std::sync::Mutex;

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

use store_backend::model::StoreEntity;
use store_backend::repository::{
    content_matches, EntityRepository, ReplaceOutcome, RepositoryError, RepositoryResult,
};

/// In-memory stand-in for the Mongo-backed repository, injected through the
/// same trait the real one implements. `unreachable()` builds one whose
/// every operation fails like a dead connection.
pub struct MemoryRepository {
    documents: Mutex<Vec<Document>>,
    unreachable: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        MemoryRepository {
            documents: Mutex::new(Vec::new()),
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        MemoryRepository {
            documents: Mutex::new(Vec::new()),
            unreachable: true,
        }
    }

    fn guard(&self) -> RepositoryResult<()> {
        if self.unreachable {
            Err(RepositoryError::connection("storage offline"))
        } else {
            Ok(())
        }
    }
}

fn has_key(document: &Document, key: ObjectId) -> bool {
    document
        .get_object_id("_id")
        .map_or(false, |stored| stored == key)
}

#[async_trait]
impl<E: StoreEntity> EntityRepository<E> for MemoryRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<E>> {
        self.guard()?;
        let documents = self.documents.lock().unwrap();
        documents
            .iter()
            .map(|document| bson::from_document::<E>(document.clone()).map_err(RepositoryError::from))
            .collect()
    }

    async fn find_by_key(&self, key: ObjectId) -> RepositoryResult<Option<E>> {
        self.guard()?;
        let documents = self.documents.lock().unwrap();
        match documents.iter().find(|document| has_key(document, key)) {
            Some(document) => Ok(Some(bson::from_document(document.clone())?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, entity: E) -> RepositoryResult<ObjectId> {
        self.guard()?;
        let mut document = bson::to_document(&entity)?;
        let key = ObjectId::new();
        document.insert("_id", key);
        self.documents.lock().unwrap().push(document);
        Ok(key)
    }

    async fn replace(&self, key: ObjectId, entity: E) -> RepositoryResult<ReplaceOutcome> {
        self.guard()?;
        let mut documents = self.documents.lock().unwrap();
        let position = match documents.iter().position(|document| has_key(document, key)) {
            Some(position) => position,
            None => {
                return Ok(ReplaceOutcome {
                    matched: false,
                    modified: false,
                })
            }
        };

        let mut incoming = bson::to_document(&entity)?;
        if content_matches(&documents[position], &incoming) {
            return Ok(ReplaceOutcome {
                matched: true,
                modified: false,
            });
        }
        if let Some(created_at) = documents[position].get("createdAt") {
            incoming.insert("createdAt", created_at.clone());
        }
        incoming.insert("_id", key);
        documents[position] = incoming;
        Ok(ReplaceOutcome {
            matched: true,
            modified: true,
        })
    }

    async fn delete(&self, key: ObjectId) -> RepositoryResult<bool> {
        self.guard()?;
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|document| !has_key(document, key));
        Ok(documents.len() < before)
    }

    async fn exists_where(
        &self,
        field: &'static str,
        value: &str,
        exclude: Option<ObjectId>,
    ) -> RepositoryResult<bool> {
        self.guard()?;
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().any(|document| {
            document.get_str(field).map_or(false, |stored| stored == value)
                && exclude.map_or(true, |own| !has_key(document, own))
        }))
    }
}
