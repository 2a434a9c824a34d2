// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Instance Parameter Mapping
//!
//! Properties that must hold for every manifest: validation reports exactly
//! the missing inputs, zone resolution agrees with the distinct set of hints,
//! security groups reach the resolver sorted and unique, and the produced
//! request never carries a null.

use cim_instance_params::mapper::{
    AVAILABILITY_ZONE, INSTANCE_TYPE, KEY_NAME, REGISTRY_ENDPOINT, SECURITY_GROUPS, STEMCELL_ID,
    SUBNET_ID,
};
use cim_instance_params::{
    resolve_availability_zone, InstanceParamMapper, ManifestParams, MappingError, NetworkSpec,
    NetworkSpecs, NetworkType,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use crate::fixtures::{valid_manifest, RecordingResolver, SUBNET_ID as FIXTURE_SUBNET};

// ============================================================================
// Helpers
// ============================================================================

/// Required inputs in validation order, with how to remove each
const REMOVALS: [(&str, fn(&mut ManifestParams)); 7] = [
    (STEMCELL_ID, |p| p.stemcell_id = None),
    (REGISTRY_ENDPOINT, |p| p.registry_endpoint = None),
    (INSTANCE_TYPE, |p| p.vm_type.instance_type = None),
    (AVAILABILITY_ZONE, |p| p.vm_type.availability_zone = None),
    (KEY_NAME, |p| p.vm_type.key_name = None),
    (SECURITY_GROUPS, |p| p.vm_type.security_groups = None),
    (SUBNET_ID, |p| p.networks_spec = NetworkSpecs::new()),
];

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn zone() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c"]).prop_map(str::to_string)
}

fn group_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["bosh", "ssh", "web", "db", "metrics"]).prop_map(str::to_string)
}

fn group_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(group_name(), 0..5)
}

fn block_devices() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(
        (1u32..100).prop_map(|size| {
            json!([{"device_name": "/dev/sdb", "ebs": {"volume_size": size}}])
        }),
    )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: validation reports exactly the removed inputs
    #[test]
    fn prop_missing_inputs_reported_exactly(mask in prop::array::uniform7(any::<bool>())) {
        let mut params = valid_manifest();
        let mut expected = Vec::new();
        for (remove, (name, apply)) in mask.iter().zip(REMOVALS.iter()) {
            if *remove {
                apply(&mut params);
                expected.push(name.to_string());
            }
        }

        let mapper = InstanceParamMapper::new(RecordingResolver::default())
            .with_manifest_params(params);
        match mapper.validate() {
            Ok(_) => {
                prop_assert!(expected.is_empty(), "Validation passed with {:?} missing", expected)
            }
            Err(MappingError::MissingConfiguration(missing)) => {
                prop_assert_eq!(missing.missing(), expected.as_slice());
            }
            Err(other) => prop_assert!(false, "Unexpected error: {}", other),
        }
    }

    /// Property: zone resolution agrees with the number of distinct hints
    #[test]
    fn prop_zone_resolution_matches_distinct_hints(
        volume_zones in prop::collection::vec(zone(), 0..4),
        vm_type_zone in prop::option::of(zone()),
        subnet_zone in prop::option::of(zone()),
    ) {
        let distinct: BTreeSet<&String> = volume_zones
            .iter()
            .chain(vm_type_zone.iter())
            .chain(subnet_zone.iter())
            .collect();

        let resolved = resolve_availability_zone(
            &volume_zones,
            vm_type_zone.as_deref(),
            subnet_zone.as_deref(),
        );

        match distinct.len() {
            0 => prop_assert_eq!(resolved, Ok(None)),
            1 => prop_assert_eq!(resolved, Ok(distinct.into_iter().next().cloned())),
            n => {
                let conflict = resolved.unwrap_err();
                prop_assert_eq!(conflict.zones.len(), n);
            }
        }
    }

    /// Property: network security groups reach the resolver as a sorted union
    #[test]
    fn prop_network_groups_sorted_union(first in group_list(), second in group_list()) {
        prop_assume!(!first.is_empty() || !second.is_empty());

        let mut params = valid_manifest();
        params.vm_type.security_groups = None;
        params.networks_spec = NetworkSpecs::new()
            .with(
                "first",
                NetworkSpec::new(NetworkType::Manual)
                    .with_subnet(FIXTURE_SUBNET)
                    .with_security_groups(first.clone()),
            )
            .with(
                "second",
                NetworkSpec::new(NetworkType::Dynamic).with_security_groups(second.clone()),
            );

        let mapper = InstanceParamMapper::new(RecordingResolver::default())
            .with_manifest_params(params);
        mapper.instance_params().unwrap();

        let expected: Vec<String> = first
            .into_iter()
            .chain(second)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let calls = mapper.resolver().calls.borrow();
        prop_assert_eq!(calls.len(), 1);
        prop_assert_eq!(&calls[0].0, &expected);
    }

    /// Property: the request never contains a null value
    #[test]
    fn prop_request_has_no_nulls(
        iam_profile in prop::option::of("[a-z]{1,8}"),
        placement_group in prop::option::of("[a-z]{1,8}"),
        tenancy in prop::option::of(prop::sample::select(vec!["dedicated", "default", "host"])),
        auto_assign in prop::option::of(any::<bool>()),
        dns in prop::option::of(prop::collection::vec("10\\.0\\.0\\.[1-9]", 1..3)),
        ip in prop::option::of("10\\.0\\.1\\.[1-9]"),
        block_device_mappings in block_devices(),
    ) {
        let mut params = valid_manifest();
        params.vm_type.iam_instance_profile = iam_profile;
        params.vm_type.placement_group = placement_group;
        params.vm_type.tenancy = tenancy.map(str::to_string);
        params.vm_type.auto_assign_public_ip = auto_assign;
        params.block_device_mappings = block_device_mappings;

        let mut spec = NetworkSpec::new(NetworkType::Manual).with_subnet(FIXTURE_SUBNET);
        spec.dns = dns;
        spec.ip = ip;
        params.networks_spec = NetworkSpecs::new().with("default", spec);

        let mapper = InstanceParamMapper::new(RecordingResolver::default())
            .with_manifest_params(params);
        let value = mapper.instance_params().unwrap().to_json().unwrap();

        prop_assert!(!contains_null(&value), "Request contains null: {}", value);
        if let Some(nic) = value.get("network_interfaces") {
            prop_assert_eq!(nic.as_array().map(Vec::len), Some(1));
            prop_assert_eq!(&nic[0]["device_index"], &json!(0));
        }
        prop_assert!(value.get("associate_public_ip_address").is_none());
    }
}
