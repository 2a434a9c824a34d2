// Copyright (c) 2025 - Cowboy AI, Inc.
//! Availability Zone Resolution
//!
//! Reconciles the zone hints carried by a manifest into a single zone:
//!
//! - zones of the persistent volumes the VM will attach
//! - an explicit `vm_type.availability_zone`
//! - the zone of the selected subnet
//!
//! Absent hints impose no constraint. Any two distinct values are a conflict.

use std::fmt;

/// Raised when zone hints disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityZoneConflict {
    /// Every distinct zone that was requested, in source order
    pub zones: Vec<String>,
    pub volume_zones: Vec<String>,
    pub vm_type_zone: Option<String>,
    pub subnet_zone: Option<String>,
}

impl fmt::Display for AvailabilityZoneConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "can't use multiple availability zones: subnet in {}, VM in {}, and volume in {}",
            self.subnet_zone.as_deref().unwrap_or(""),
            self.vm_type_zone.as_deref().unwrap_or(""),
            self.volume_zones.join(", ")
        )
    }
}

impl std::error::Error for AvailabilityZoneConflict {}

/// Resolve the common availability zone
///
/// Returns `Ok(None)` when no source names a zone, `Ok(Some(zone))` when all
/// sources agree, and a conflict otherwise.
pub fn resolve_availability_zone(
    volume_zones: &[String],
    vm_type_zone: Option<&str>,
    subnet_zone: Option<&str>,
) -> Result<Option<String>, AvailabilityZoneConflict> {
    let mut zones: Vec<&str> = Vec::new();
    let candidates = volume_zones
        .iter()
        .map(String::as_str)
        .chain(vm_type_zone)
        .chain(subnet_zone);

    for zone in candidates {
        if !zones.contains(&zone) {
            zones.push(zone);
        }
    }

    match zones.as_slice() {
        [] => Ok(None),
        [zone] => Ok(Some((*zone).to_string())),
        _ => Err(AvailabilityZoneConflict {
            zones: zones.iter().map(|z| z.to_string()).collect(),
            volume_zones: volume_zones.to_vec(),
            vm_type_zone: vm_type_zone.map(str::to_string),
            subnet_zone: subnet_zone.map(str::to_string),
        }),
    }
}
