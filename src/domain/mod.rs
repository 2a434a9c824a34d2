// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Domain Models
//!
//! - [`ManifestParams`] - the typed provisioning manifest
//! - [`NetworkSpecs`] - ordered network topology of the VM
//! - [`InstanceRequest`] - the create-instance request built from a manifest

pub mod manifest;
pub mod network;
pub mod request;

pub use manifest::{Defaults, ManifestParams, VmType};
pub use network::{NetworkCloudProperties, NetworkSpec, NetworkSpecs, NetworkType};
pub use request::{
    DnsSettings, IamInstanceProfile, InstanceRequest, NetworkInterface, Placement,
    RegistrySettings, UserData,
};
