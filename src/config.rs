// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mapper configuration

use serde::{Deserialize, Serialize};

/// Default location of the supported-properties reference
pub const DEFAULT_DOCUMENTATION_URL: &str = "http://bosh.io/docs/aws-cpi.html";

/// Configuration for an [`InstanceParamMapper`](crate::InstanceParamMapper)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// URL quoted in missing-configuration errors
    #[serde(default = "default_documentation_url")]
    pub documentation_url: String,

    /// Require `vm_type.availability_zone` to be set explicitly, even when a
    /// zone could be derived from volumes or the subnet mapping
    #[serde(default = "default_require_vm_type_availability_zone")]
    pub require_vm_type_availability_zone: bool,
}

fn default_documentation_url() -> String {
    DEFAULT_DOCUMENTATION_URL.to_string()
}

fn default_require_vm_type_availability_zone() -> bool {
    true
}

impl MapperConfig {
    /// Set the documentation URL
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = url.into();
        self
    }

    /// Toggle the explicit `vm_type.availability_zone` requirement
    pub fn with_required_vm_type_availability_zone(mut self, required: bool) -> Self {
        self.require_vm_type_availability_zone = required;
        self
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            documentation_url: default_documentation_url(),
            require_vm_type_availability_zone: default_require_vm_type_availability_zone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.documentation_url, DEFAULT_DOCUMENTATION_URL);
        assert!(config.require_vm_type_availability_zone);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"require_vm_type_availability_zone": false}"#).unwrap();
        assert_eq!(config.documentation_url, DEFAULT_DOCUMENTATION_URL);
        assert!(!config.require_vm_type_availability_zone);
    }
}
