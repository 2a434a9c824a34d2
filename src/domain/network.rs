// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Specifications
//!
//! A manifest names one or more networks the VM joins. Several request fields
//! are taken from "the first network that ...", so the collection of specs is
//! ordered: [`NetworkSpecs`] keeps entries in insertion order, and
//! deserializing it from a JSON object keeps document order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Kind of network a spec describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Statically addressed network
    Manual,
    /// DHCP-addressed network
    Dynamic,
    /// Elastic/public IP network
    Vip,
    /// No `type` given; treated as manual
    #[default]
    Unset,
}

impl NetworkType {
    /// Whether a spec of this type may supply the instance subnet
    pub fn provides_subnet(&self) -> bool {
        matches!(self, NetworkType::Manual | NetworkType::Dynamic | NetworkType::Unset)
    }

    /// Whether a spec of this type carries the instance's private address
    pub fn assigns_private_ip(&self) -> bool {
        matches!(self, NetworkType::Manual | NetworkType::Unset)
    }

    pub fn is_unset(&self) -> bool {
        *self == NetworkType::Unset
    }
}

fn deserialize_network_type<'de, D>(deserializer: D) -> Result<NetworkType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NetworkType>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept either a single string or a list of strings
pub(crate) fn deserialize_string_list<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    }))
}

/// Provider-specific properties of a network spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCloudProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub security_groups: Option<Vec<String>>,
}

/// One network the VM joins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_network_type",
        skip_serializing_if = "NetworkType::is_unset"
    )]
    pub network_type: NetworkType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_properties: Option<NetworkCloudProperties>,

    /// Nameservers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl NetworkSpec {
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            network_type,
            ..Self::default()
        }
    }

    pub fn with_subnet(mut self, subnet: impl Into<String>) -> Self {
        self.cloud_properties.get_or_insert_with(Default::default).subnet = Some(subnet.into());
        self
    }

    pub fn with_security_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cloud_properties.get_or_insert_with(Default::default).security_groups =
            Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dns<I, S>(mut self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dns = Some(nameservers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Subnet named in the cloud properties
    pub fn subnet(&self) -> Option<&str> {
        self.cloud_properties.as_ref()?.subnet.as_deref()
    }

    /// Security groups named in the cloud properties
    pub fn security_groups(&self) -> &[String] {
        self.cloud_properties
            .as_ref()
            .and_then(|cp| cp.security_groups.as_deref())
            .unwrap_or(&[])
    }
}

/// Network specs keyed by network name, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSpecs {
    entries: Vec<(String, NetworkSpec)>,
}

impl NetworkSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a spec; replacing an existing name keeps its position
    pub fn insert(&mut self, name: impl Into<String>, spec: NetworkSpec) -> Option<NetworkSpec> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, spec)),
            None => {
                self.entries.push((name, spec));
                None
            }
        }
    }

    pub fn with(mut self, name: impl Into<String>, spec: NetworkSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NetworkSpec> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, spec)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NetworkSpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Iterate specs in insertion order
    pub fn specs(&self) -> impl Iterator<Item = &NetworkSpec> {
        self.entries.iter().map(|(_, s)| s)
    }

    /// First spec, in insertion order, matching `predicate`
    pub fn first_where<P>(&self, mut predicate: P) -> Option<&NetworkSpec>
    where
        P: FnMut(&NetworkSpec) -> bool,
    {
        self.specs().find(|s| predicate(s))
    }
}

impl<N: Into<String>> FromIterator<(N, NetworkSpec)> for NetworkSpecs {
    fn from_iter<T: IntoIterator<Item = (N, NetworkSpec)>>(iter: T) -> Self {
        let mut specs = NetworkSpecs::new();
        for (name, spec) in iter {
            specs.insert(name, spec);
        }
        specs
    }
}

impl Serialize for NetworkSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, spec) in &self.entries {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NetworkSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NetworkSpecsVisitor;

        impl<'de> Visitor<'de> for NetworkSpecsVisitor {
            type Value = NetworkSpecs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of network name to network spec")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut specs = NetworkSpecs::new();
                while let Some((name, spec)) = map.next_entry::<String, NetworkSpec>()? {
                    specs.insert(name, spec);
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_map(NetworkSpecsVisitor)
    }
}
