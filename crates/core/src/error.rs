//! Domain error taxonomy.
//!
//! Services raise exactly four kinds of error:
//!
//! - [`DomainError::Validation`] — bad input shape or a missing required
//!   field; the caller can correct and retry.
//! - [`DomainError::NotFound`] — a referenced entity id does not exist.
//! - [`DomainError::BusinessRule`] — the operation violates a domain
//!   invariant (duplicate name/contact, illegal status transition).
//! - [`DomainError::Infrastructure`] — an unexpected lower-layer failure
//!   (database, file I/O, serialization) wrapped with a context message and
//!   the original error preserved as the source.
//!
//! Domain errors pass through service boundaries unwrapped; everything else
//! is wrapped as `Infrastructure` at the call site that observed it.

/// Error raised by the domain services.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Input failed validation (missing or malformed field).
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The operation violates a domain invariant.
    #[error("{0}")]
    BusinessRule(String),

    /// An unexpected lower-layer failure.
    #[error("{context}")]
    Infrastructure {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Wraps a lower-layer failure with a context message.
    pub fn infrastructure(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Infrastructure {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity_and_id() {
        let err = DomainError::not_found("Patient", 42);
        assert_eq!(err.to_string(), "Patient with id 42 was not found");
    }

    #[test]
    fn infrastructure_preserves_the_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = DomainError::infrastructure("Failed to add patient.", io);

        assert_eq!(err.to_string(), "Failed to add patient.");
        let source = std::error::Error::source(&err).expect("source must be preserved");
        assert!(source.to_string().contains("disk on fire"));
    }
}
