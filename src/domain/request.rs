// Copyright (c) 2025 - Cowboy AI, Inc.
//! Create-Instance Request
//!
//! The body of a provider "run instance" call. Optional fields are omitted
//! from the serialized form rather than emitted as `null`, and the optional
//! sub-objects are only built when at least one of their fields applies.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::manifest::ManifestParams;
use crate::errors::{MappingError, MappingResult};

/// IAM instance profile reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamInstanceProfile {
    pub name: String,
}

/// Physical placement hints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<String>,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.group_name.is_none() && self.availability_zone.is_none() && self.tenancy.is_none()
    }
}

/// Primary network interface of the instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associate_public_ip_address: Option<bool>,

    pub device_index: u32,
}

impl NetworkInterface {
    /// True when no field other than the device index is set
    pub fn is_empty(&self) -> bool {
        self.groups.is_none()
            && self.subnet_id.is_none()
            && self.private_ip_address.is_none()
            && self.associate_public_ip_address.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSettings {
    pub nameserver: Vec<String>,
}

/// Bootstrap settings handed to the agent on the instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistrySettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsSettings>,
}

impl UserData {
    /// Collect user data from a manifest; `None` when there is nothing to send
    pub fn from_manifest(params: &ManifestParams) -> Option<Self> {
        let registry = params
            .registry_endpoint
            .as_ref()
            .map(|endpoint| RegistrySettings {
                endpoint: endpoint.clone(),
            });
        let dns = params.dns_nameservers().map(|nameserver| DnsSettings {
            nameserver: nameserver.to_vec(),
        });

        if registry.is_none() && dns.is_none() {
            return None;
        }
        Some(Self { registry, dns })
    }

    /// Compact JSON, base64 encoded without line breaks
    pub fn encode(&self) -> MappingResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> MappingResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| MappingError::Serialization(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Parameters for a create-instance call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRequest {
    pub image_id: String,

    pub instance_type: String,

    pub key_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<IamInstanceProfile>,

    /// Base64 encoded [`UserData`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_device_mappings: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,

    /// Zero or one interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interfaces: Option<Vec<NetworkInterface>>,
}

impl InstanceRequest {
    pub fn to_json(&self) -> MappingResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decoded user data, if any was attached
    pub fn decoded_user_data(&self) -> MappingResult<Option<UserData>> {
        self.user_data.as_deref().map(UserData::decode).transpose()
    }
}
