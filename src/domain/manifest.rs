// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manifest Parameters
//!
//! The typed form of a VM provisioning manifest. Every field is optional at
//! this level; presence of the required ones is checked once by the mapper's
//! validation pass.
//!
//! Accessors here compute *effective* values: a `vm_type` override wins over
//! `defaults`, and network-derived values are taken from the first matching
//! network spec in manifest order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::network::{deserialize_string_list, NetworkSpec, NetworkSpecs};

/// Instance-shape properties (`vm_type` cloud properties)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub security_groups: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<String>,

    /// Only `"dedicated"` has an effect on the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_assign_public_ip: Option<bool>,
}

/// Director-wide fallbacks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_key_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_security_groups: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_iam_instance_profile: Option<String>,
}

/// Everything the mapper knows about the VM to create
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestParams {
    /// Boot image id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stemcell_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_endpoint: Option<String>,

    #[serde(default)]
    pub vm_type: VmType,

    #[serde(default)]
    pub networks_spec: NetworkSpecs,

    #[serde(default)]
    pub defaults: Defaults,

    /// Zones of the persistent disks the VM will attach
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_zones: Vec<String>,

    /// subnet id -> availability zone
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subnet_az_mapping: BTreeMap<String, String>,

    /// Passed through to the request untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_device_mappings: Option<serde_json::Value>,
}

impl ManifestParams {
    pub fn key_name(&self) -> Option<&str> {
        self.vm_type
            .key_name
            .as_deref()
            .or(self.defaults.default_key_name.as_deref())
    }

    pub fn iam_instance_profile(&self) -> Option<&str> {
        self.vm_type
            .iam_instance_profile
            .as_deref()
            .or(self.defaults.default_iam_instance_profile.as_deref())
    }

    /// Effective security group identifiers, sorted and de-duplicated
    ///
    /// `vm_type.security_groups` wins when present. Otherwise the groups of
    /// every network spec are merged. An empty result falls back to
    /// `defaults.default_security_groups`.
    pub fn security_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = match &self.vm_type.security_groups {
            Some(groups) => groups.clone(),
            None => self
                .networks_spec
                .specs()
                .flat_map(|spec| spec.security_groups().iter().cloned())
                .collect(),
        };

        if groups.is_empty() {
            groups = self.defaults.default_security_groups.clone().unwrap_or_default();
        }

        groups.sort();
        groups.dedup();
        groups
    }

    /// Spec supplying the subnet: first manual/dynamic/unset spec with one
    pub fn subnet_network(&self) -> Option<&NetworkSpec> {
        self.networks_spec
            .first_where(|spec| spec.network_type.provides_subnet() && spec.subnet().is_some())
    }

    pub fn subnet_id(&self) -> Option<&str> {
        self.subnet_network().and_then(NetworkSpec::subnet)
    }

    /// Zone the selected subnet lives in, if the mapping knows it
    pub fn subnet_zone(&self) -> Option<&str> {
        self.subnet_id()
            .and_then(|subnet| self.subnet_az_mapping.get(subnet))
            .map(String::as_str)
    }

    /// `ip` of the first manual (or untyped) network spec
    pub fn private_ip_address(&self) -> Option<&str> {
        self.networks_spec
            .first_where(|spec| spec.network_type.assigns_private_ip())
            .and_then(|spec| spec.ip.as_deref())
    }

    /// Nameservers of the first network spec declaring any
    pub fn dns_nameservers(&self) -> Option<&[String]> {
        self.networks_spec
            .first_where(|spec| spec.dns.is_some())
            .and_then(|spec| spec.dns.as_deref())
    }

    /// Block device mappings, with an explicit JSON `null` treated as absent
    pub fn block_device_mappings(&self) -> Option<&serde_json::Value> {
        self.block_device_mappings.as_ref().filter(|v| !v.is_null())
    }

    pub fn dedicated_tenancy(&self) -> bool {
        self.vm_type.tenancy.as_deref() == Some("dedicated")
    }

    pub fn auto_assign_public_ip(&self) -> bool {
        self.vm_type.auto_assign_public_ip.unwrap_or(false)
    }
}
