// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Resolution
//!
//! Security groups may be named in a manifest either by provider id
//! (`sg-...`) or by human-readable name. Names are only unique within the
//! virtual network that owns the instance's subnet, so resolution is scoped by
//! subnet.
//!
//! [`SecurityGroupResolver`] is the seam to the provider. A lookup against the
//! live API lives with the caller; [`SecurityGroupDirectory`] is an in-memory
//! implementation for offline mapping and tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Security group resolution error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityGroupResolutionError {
    #[error("Security group not found: {identifier} (network {network_id})")]
    NotFound {
        identifier: String,
        network_id: String,
    },

    #[error("Subnet not found: {0}")]
    UnknownSubnet(String),

    #[error("Security group lookup failed: {0}")]
    Lookup(String),
}

/// Turns security group names or ids into provider-native ids
pub trait SecurityGroupResolver {
    /// Resolve `identifiers` within the network owning `subnet_id`
    ///
    /// Returns the ids in input order with duplicates removed.
    fn resolve(
        &self,
        identifiers: &[String],
        subnet_id: &str,
    ) -> Result<Vec<String>, SecurityGroupResolutionError>;
}

impl<R: SecurityGroupResolver + ?Sized> SecurityGroupResolver for &R {
    fn resolve(
        &self,
        identifiers: &[String],
        subnet_id: &str,
    ) -> Result<Vec<String>, SecurityGroupResolutionError> {
        (**self).resolve(identifiers, subnet_id)
    }
}

impl<R: SecurityGroupResolver + ?Sized> SecurityGroupResolver for Box<R> {
    fn resolve(
        &self,
        identifiers: &[String],
        subnet_id: &str,
    ) -> Result<Vec<String>, SecurityGroupResolutionError> {
        (**self).resolve(identifiers, subnet_id)
    }
}

/// A security group known to a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
}

impl SecurityGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// In-memory view of subnets, their networks and each network's groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupDirectory {
    /// subnet id -> owning network id
    #[serde(default)]
    pub subnets: BTreeMap<String, String>,

    /// network id -> security groups in that network
    #[serde(default)]
    pub networks: BTreeMap<String, Vec<SecurityGroup>>,
}

impl SecurityGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subnet as belonging to `network_id`
    pub fn with_subnet(
        mut self,
        subnet_id: impl Into<String>,
        network_id: impl Into<String>,
    ) -> Self {
        self.subnets.insert(subnet_id.into(), network_id.into());
        self
    }

    /// Register a security group in `network_id`
    pub fn with_group(mut self, network_id: impl Into<String>, group: SecurityGroup) -> Self {
        self.networks.entry(network_id.into()).or_default().push(group);
        self
    }

    fn lookup<'a>(groups: &'a [SecurityGroup], identifier: &str) -> Option<&'a SecurityGroup> {
        groups
            .iter()
            .find(|g| g.id == identifier)
            .or_else(|| groups.iter().find(|g| g.name == identifier))
    }
}

impl SecurityGroupResolver for SecurityGroupDirectory {
    fn resolve(
        &self,
        identifiers: &[String],
        subnet_id: &str,
    ) -> Result<Vec<String>, SecurityGroupResolutionError> {
        let network_id = self
            .subnets
            .get(subnet_id)
            .ok_or_else(|| SecurityGroupResolutionError::UnknownSubnet(subnet_id.to_string()))?;
        let groups = self.networks.get(network_id).map(Vec::as_slice).unwrap_or(&[]);

        let mut ids: Vec<String> = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let group = Self::lookup(groups, identifier).ok_or_else(|| {
                SecurityGroupResolutionError::NotFound {
                    identifier: identifier.clone(),
                    network_id: network_id.clone(),
                }
            })?;
            if !ids.contains(&group.id) {
                ids.push(group.id.clone());
            }
        }

        debug!("Resolved security groups {:?} to {:?} in {}", identifiers, ids, network_id);
        Ok(ids)
    }
}
