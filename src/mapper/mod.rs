// Copyright (c) 2025 - Cowboy AI, Inc.
//! Instance Parameter Mapper
//!
//! Turns a [`ManifestParams`] bag into the [`InstanceRequest`] for a
//! create-instance call.
//!
//! # Lifecycle
//!
//! ```text
//! new(resolver) → populate manifest → validate() → instance_params() → discard
//! ```
//!
//! `validate()` runs a structural pass, which reports every missing input in
//! one error, followed by a zone-consistency pass. The availability zone is
//! resolved once per mapper and the outcome is memoized, so `validate()` and
//! `instance_params()` always observe the same zone (or the same conflict).
//!
//! # Example
//!
//! ```rust
//! use cim_instance_params::{
//!     InstanceParamMapper, NetworkSpec, NetworkSpecs, SecurityGroup, SecurityGroupDirectory,
//! };
//!
//! let directory = SecurityGroupDirectory::new()
//!     .with_subnet("subnet-1", "vpc-1")
//!     .with_group("vpc-1", SecurityGroup::new("sg-123", "bosh"));
//!
//! let mut mapper = InstanceParamMapper::new(directory);
//! let params = mapper.manifest_params_mut();
//! params.stemcell_id = Some("ami-1".to_string());
//! params.registry_endpoint = Some("http://registry:25777".to_string());
//! params.vm_type.instance_type = Some("m5.large".to_string());
//! params.vm_type.availability_zone = Some("us-east-1a".to_string());
//! params.vm_type.key_name = Some("bosh".to_string());
//! params.vm_type.security_groups = Some(vec!["bosh".to_string()]);
//! params.networks_spec = NetworkSpecs::new()
//!     .with("default", NetworkSpec::default().with_subnet("subnet-1"));
//!
//! mapper.validate().unwrap();
//! let request = mapper.instance_params().unwrap();
//! assert_eq!(request.image_id, "ami-1");
//! ```

mod validation;

pub use validation::{
    AVAILABILITY_ZONE, INSTANCE_TYPE, KEY_NAME, REGISTRY_ENDPOINT, SECURITY_GROUPS, STEMCELL_ID,
    SUBNET_ID,
};

use std::cell::OnceCell;
use tracing::{debug, info, warn};

use crate::availability_zone::{resolve_availability_zone, AvailabilityZoneConflict};
use crate::config::MapperConfig;
use crate::domain::{
    IamInstanceProfile, InstanceRequest, ManifestParams, NetworkInterface, Placement, UserData,
};
use crate::errors::MappingResult;
use crate::security_group::SecurityGroupResolver;
use validation::{check_required_inputs, RequiredInputs};

/// Maps one manifest to one create-instance request
pub struct InstanceParamMapper<R> {
    resolver: R,
    config: MapperConfig,
    manifest_params: ManifestParams,
    availability_zone: OnceCell<Result<Option<String>, AvailabilityZoneConflict>>,
}

impl<R: SecurityGroupResolver> InstanceParamMapper<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, MapperConfig::default())
    }

    pub fn with_config(resolver: R, config: MapperConfig) -> Self {
        Self {
            resolver,
            config,
            manifest_params: ManifestParams::default(),
            availability_zone: OnceCell::new(),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn manifest_params(&self) -> &ManifestParams {
        &self.manifest_params
    }

    /// Mutable access to the manifest; clears any memoized zone
    pub fn manifest_params_mut(&mut self) -> &mut ManifestParams {
        self.availability_zone = OnceCell::new();
        &mut self.manifest_params
    }

    pub fn set_manifest_params(&mut self, params: ManifestParams) {
        *self.manifest_params_mut() = params;
    }

    /// Builder form of [`set_manifest_params`](Self::set_manifest_params)
    pub fn with_manifest_params(mut self, params: ManifestParams) -> Self {
        self.set_manifest_params(params);
        self
    }

    /// Check the manifest for missing inputs and zone conflicts
    pub fn validate(&self) -> MappingResult<ValidatedManifest<'_>> {
        let required = check_required_inputs(&self.manifest_params, &self.config).map_err(|e| {
            warn!("Manifest is missing properties: {}", e.missing().join(", "));
            e
        })?;
        let availability_zone = self.availability_zone()?;

        Ok(ValidatedManifest {
            params: &self.manifest_params,
            required,
            availability_zone,
        })
    }

    /// Build the create-instance request
    ///
    /// Validates first; errors from the security group resolver are returned
    /// unchanged.
    pub fn instance_params(&self) -> MappingResult<InstanceRequest> {
        let validated = self.validate()?;
        let request = validated.instance_request(&self.resolver)?;
        info!(
            "Built instance request for {} ({})",
            request.image_id, request.instance_type
        );
        Ok(request)
    }

    /// Memoized zone resolution
    fn availability_zone(&self) -> Result<Option<String>, AvailabilityZoneConflict> {
        self.availability_zone
            .get_or_init(|| {
                let params = &self.manifest_params;
                let resolved = resolve_availability_zone(
                    &params.volume_zones,
                    params.vm_type.availability_zone.as_deref(),
                    params.subnet_zone(),
                );
                match &resolved {
                    Ok(zone) => debug!("Resolved availability zone: {:?}", zone),
                    Err(conflict) => warn!("{}", conflict),
                }
                resolved
            })
            .clone()
    }
}

/// A manifest that passed validation
///
/// Required inputs are available without further checks.
#[derive(Debug, Clone)]
pub struct ValidatedManifest<'a> {
    params: &'a ManifestParams,
    required: RequiredInputs<'a>,
    availability_zone: Option<String>,
}

impl<'a> ValidatedManifest<'a> {
    pub fn params(&self) -> &'a ManifestParams {
        self.params
    }

    pub fn stemcell_id(&self) -> &'a str {
        self.required.stemcell_id
    }

    pub fn registry_endpoint(&self) -> &'a str {
        self.required.registry_endpoint
    }

    pub fn instance_type(&self) -> &'a str {
        self.required.instance_type
    }

    pub fn key_name(&self) -> &'a str {
        self.required.key_name
    }

    /// Sorted, de-duplicated security group names or ids
    pub fn security_groups(&self) -> &[String] {
        &self.required.security_groups
    }

    pub fn subnet_id(&self) -> &'a str {
        self.required.subnet_id
    }

    pub fn availability_zone(&self) -> Option<&str> {
        self.availability_zone.as_deref()
    }

    /// Build the request, resolving security groups through `resolver`
    pub fn instance_request<R>(&self, resolver: &R) -> MappingResult<InstanceRequest>
    where
        R: SecurityGroupResolver + ?Sized,
    {
        let params = self.params;
        let user_data = UserData::from_manifest(params)
            .map(|user_data| user_data.encode())
            .transpose()?;

        debug!(
            "Resolving security groups {:?} in subnet {}",
            self.security_groups(),
            self.subnet_id()
        );
        let groups = resolver.resolve(self.security_groups(), self.subnet_id())?;

        Ok(InstanceRequest {
            image_id: self.stemcell_id().to_string(),
            instance_type: self.instance_type().to_string(),
            key_name: self.key_name().to_string(),
            iam_instance_profile: params
                .iam_instance_profile()
                .map(|name| IamInstanceProfile {
                    name: name.to_string(),
                }),
            user_data,
            block_device_mappings: params.block_device_mappings().cloned(),
            placement: self.placement(),
            network_interfaces: self.network_interface(groups).map(|nic| vec![nic]),
        })
    }

    fn placement(&self) -> Option<Placement> {
        let vm_type = &self.params.vm_type;
        let placement = Placement {
            group_name: vm_type.placement_group.clone(),
            availability_zone: self.availability_zone.clone(),
            tenancy: self
                .params
                .dedicated_tenancy()
                .then(|| "dedicated".to_string()),
        };
        (!placement.is_empty()).then_some(placement)
    }

    fn network_interface(&self, groups: Vec<String>) -> Option<NetworkInterface> {
        let nic = NetworkInterface {
            groups: (!groups.is_empty()).then_some(groups),
            subnet_id: Some(self.subnet_id().to_string()),
            private_ip_address: self.params.private_ip_address().map(str::to_string),
            associate_public_ip_address: self.params.auto_assign_public_ip().then_some(true),
            device_index: 0,
        };
        (!nic.is_empty()).then_some(nic)
    }
}
