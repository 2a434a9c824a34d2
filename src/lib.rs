//! Instance parameter mapping for VM provisioning
//!
//! This crate translates a declarative provisioning manifest (VM type, network
//! topology and defaults) into the minimal, conflict-free parameter set of a
//! cloud provider's create-instance call.
//!
//! The network call itself and the lookup of security groups against the live
//! provider are left to the caller; the latter plugs in through
//! [`SecurityGroupResolver`].

pub mod availability_zone;
pub mod config;
pub mod domain;
pub mod errors;
pub mod mapper;
pub mod security_group;

// Re-export commonly used types
pub use availability_zone::{resolve_availability_zone, AvailabilityZoneConflict};
pub use config::MapperConfig;
pub use domain::{
    Defaults, InstanceRequest, ManifestParams, NetworkSpec, NetworkSpecs, NetworkType, UserData,
    VmType,
};
pub use errors::{MappingError, MappingResult, MissingConfiguration};
pub use mapper::{InstanceParamMapper, ValidatedManifest};
pub use security_group::{
    SecurityGroup, SecurityGroupDirectory, SecurityGroupResolutionError, SecurityGroupResolver,
};
