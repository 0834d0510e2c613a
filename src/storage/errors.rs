//! Error types for document store operations.
//!
//! These represent failures in the persistence layer only; constraint
//! violations and record-level failures live in [`crate::error`].

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A document or patch was expected to be a JSON object.
    #[error("document {collection}/{id} is not a JSON object")]
    NotAnObject { collection: String, id: String },

    /// The backend is temporarily unreachable.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// Any other backend failure.
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn not_an_object(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotAnObject {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this failure means the document simply was not there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
