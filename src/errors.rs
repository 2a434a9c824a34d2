//! Error types for instance parameter mapping

use std::fmt;
use thiserror::Error;

use crate::availability_zone::AvailabilityZoneConflict;
use crate::security_group::SecurityGroupResolutionError;

/// Aggregated pre-flight failure listing every missing manifest property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConfiguration {
    missing: Vec<String>,
    documentation_url: String,
}

impl MissingConfiguration {
    pub fn new(missing: Vec<String>, documentation_url: impl Into<String>) -> Self {
        Self {
            missing,
            documentation_url: documentation_url.into(),
        }
    }

    /// Names of the missing properties, in the order they were checked
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn documentation_url(&self) -> &str {
        &self.documentation_url
    }
}

impl fmt::Display for MissingConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing properties: {}. See {} for the list of supported properties.",
            self.missing.join(", "),
            self.documentation_url
        )
    }
}

impl std::error::Error for MissingConfiguration {}

/// Errors that can occur while mapping a manifest to an instance request
#[derive(Debug, Error)]
pub enum MappingError {
    /// One or more required properties are absent
    #[error("{0}")]
    MissingConfiguration(#[from] MissingConfiguration),

    /// Zone hints disagree
    #[error("{0}")]
    AvailabilityZoneConflict(#[from] AvailabilityZoneConflict),

    /// Raised by the security group resolver, passed through unchanged
    #[error(transparent)]
    SecurityGroupResolution(#[from] SecurityGroupResolutionError),

    /// User data could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

impl From<serde_json::Error> for MappingError {
    fn from(err: serde_json::Error) -> Self {
        MappingError::Serialization(err.to_string())
    }
}
