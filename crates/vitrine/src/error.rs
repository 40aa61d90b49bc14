// File: src/error.rs
// Purpose: Error taxonomy for the section store, resolver and composition pipeline

use thiserror::Error;

/// Failures reported by a catalog collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog resource not found: {0}")]
    NotFound(String),

    #[error("catalog resource requires authorization: {0}")]
    Unauthorized(String),

    #[error("catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed section payload (missing name, unknown type, bad config)
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Data for a section could not be resolved; the section is skipped
    #[error("could not resolve data for section {section_id}: {reason}")]
    Resolution { section_id: String, reason: String },

    /// A banner location could not be resolved; the banner goes to the bottom
    #[error("banner location '{location}' could not be resolved")]
    PlacementFallback { location: String },

    /// The section list itself could not be obtained
    #[error("homepage build aborted: {0}")]
    PipelineAbort(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn resolution(section_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Resolution {
            section_id: section_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stays inside one section and never aborts a build
    pub fn is_section_local(&self) -> bool {
        matches!(
            self,
            Error::Resolution { .. } | Error::PlacementFallback { .. } | Error::Catalog(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_local_errors() {
        assert!(Error::resolution("s1", "empty").is_section_local());
        assert!(Error::PlacementFallback { location: "after-x".into() }.is_section_local());
        assert!(Error::from(CatalogError::NotFound("/banners/detail/1".into())).is_section_local());
        assert!(!Error::PipelineAbort("db down".into()).is_section_local());
        assert!(!Error::validation("missing name").is_section_local());
    }

    #[test]
    fn test_messages() {
        let err = Error::Validation("type is required".into());
        assert_eq!(err.to_string(), "validation failed: type is required");

        let err = CatalogError::Status { status: 502, url: "/products".into() };
        assert_eq!(err.to_string(), "catalog returned status 502 for /products");
    }
}
