// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structural validation of a manifest
//!
//! Every required input is checked before anything is built, and all missing
//! inputs are reported together.

use crate::config::MapperConfig;
use crate::domain::ManifestParams;
use crate::errors::MissingConfiguration;

pub const STEMCELL_ID: &str = "stemcell_id";
pub const REGISTRY_ENDPOINT: &str = "registry_endpoint";
pub const INSTANCE_TYPE: &str = "cloud_properties.instance_type";
pub const AVAILABILITY_ZONE: &str = "cloud_properties.availability_zone";
pub const KEY_NAME: &str = "(cloud_properties.key_name or defaults.default_key_name)";
pub const SECURITY_GROUPS: &str =
    "(cloud_properties.security_groups or defaults.default_security_groups)";
pub const SUBNET_ID: &str = "cloud_properties.subnet_id";

/// Required inputs, guaranteed present
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequiredInputs<'a> {
    pub stemcell_id: &'a str,
    pub registry_endpoint: &'a str,
    pub instance_type: &'a str,
    pub key_name: &'a str,
    pub security_groups: Vec<String>,
    pub subnet_id: &'a str,
}

/// Check every required input, collecting all that are missing
pub(crate) fn check_required_inputs<'a>(
    params: &'a ManifestParams,
    config: &MapperConfig,
) -> Result<RequiredInputs<'a>, MissingConfiguration> {
    let mut missing: Vec<String> = Vec::new();
    let mut require = |value: bool, name: &str| {
        if !value {
            missing.push(name.to_string());
        }
    };

    let stemcell_id = params.stemcell_id.as_deref();
    let registry_endpoint = params.registry_endpoint.as_deref();
    let instance_type = params.vm_type.instance_type.as_deref();
    let key_name = params.key_name();
    let security_groups = params.security_groups();
    let subnet_id = params.subnet_id();

    require(stemcell_id.is_some(), STEMCELL_ID);
    require(registry_endpoint.is_some(), REGISTRY_ENDPOINT);
    require(instance_type.is_some(), INSTANCE_TYPE);
    if config.require_vm_type_availability_zone {
        require(params.vm_type.availability_zone.is_some(), AVAILABILITY_ZONE);
    }
    require(key_name.is_some(), KEY_NAME);
    require(!security_groups.is_empty(), SECURITY_GROUPS);
    require(subnet_id.is_some(), SUBNET_ID);

    match (stemcell_id, registry_endpoint, instance_type, key_name, subnet_id) {
        (
            Some(stemcell_id),
            Some(registry_endpoint),
            Some(instance_type),
            Some(key_name),
            Some(subnet_id),
        ) if missing.is_empty() => {
            Ok(RequiredInputs {
                stemcell_id,
                registry_endpoint,
                instance_type,
                key_name,
                security_groups,
                subnet_id,
            })
        }
        _ => Err(MissingConfiguration::new(missing, config.documentation_url.clone())),
    }
}
