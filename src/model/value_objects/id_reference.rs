//! IdReference value object: a foreign-key-style identifier.
//!
//! An `IdReference` carries no ownership of the referenced record, only its
//! identity plus the name of the collection it must exist in. The existence
//! check runs against the remote store every time a reference is resolved —
//! construction and field re-assignment both re-validate, and the result is
//! never cached.

use crate::error::{RecordError, RecordResult, ValidationError};
use crate::model::record::RecordId;
use crate::storage::DocumentStore;
use std::fmt;

/// A validated reference to a record in a named foreign collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdReference {
    id: RecordId,
    collection: &'static str,
}

impl IdReference {
    /// Resolve a raw id against the foreign collection.
    ///
    /// Fails with a reference violation when no such document exists at
    /// call time; backend failures propagate as store errors.
    pub async fn resolve<S: DocumentStore>(
        backend: &S,
        collection: &'static str,
        raw: &str,
    ) -> RecordResult<Self> {
        let id = RecordId::new(raw)?;
        let exists = backend
            .exists(collection, id.as_str())
            .await
            .map_err(RecordError::store)?;
        if !exists {
            return Err(ValidationError::unknown_reference(collection, raw).into());
        }
        Ok(Self { id, collection })
    }

    /// Resolve an ordered list of raw ids, preserving order and duplicates.
    pub async fn resolve_list<S: DocumentStore>(
        backend: &S,
        collection: &'static str,
        raw_ids: &[String],
    ) -> RecordResult<Vec<Self>> {
        let mut resolved = Vec::with_capacity(raw_ids.len());
        for raw in raw_ids {
            resolved.push(Self::resolve(backend, collection, raw).await?);
        }
        Ok(resolved)
    }

    /// Message-returning validator for form code: `""` when the reference
    /// resolves, otherwise the violation (backend failures included).
    pub async fn check<S: DocumentStore>(
        backend: &S,
        collection: &'static str,
        raw: &str,
    ) -> String {
        match Self::resolve(backend, collection, raw).await {
            Ok(_) => String::new(),
            Err(e) => e.to_string(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }

    /// The foreign collection this reference points into.
    pub fn collection(&self) -> &'static str {
        self.collection
    }
}

impl fmt::Display for IdReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
