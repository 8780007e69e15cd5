use bson::oid::ObjectId;

/// Why an external identifier string could not be turned into a document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier was absent or blank.
    Missing,
    /// The identifier does not match the storage engine's key format.
    Malformed,
}

/// Parse an opaque external identifier into a document key. Runs before any
/// storage access; failure short-circuits the request.
pub fn parse_document_id(raw: &str) -> Result<ObjectId, IdentifierError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(IdentifierError::Missing);
    }
    ObjectId::parse_str(raw).map_err(|_| IdentifierError::Malformed)
}
