// Copyright (c) 2025 - Cowboy AI, Inc.
//! Instance Params
//!
//! Reads a provisioning manifest (JSON) and prints the create-instance request
//! it maps to.
//!
//! Run with: cargo run --bin instance-params -- manifest.json
//!
//! Environment:
//! - `MANIFEST_PATH` - manifest file, if no argument is given
//! - `SECURITY_GROUP_DIRECTORY` - JSON file describing subnets and security
//!   groups; without it identifiers are passed through as ids
//! - `DOCUMENTATION_URL` - URL quoted in missing-property errors
//! - `REQUIRE_VM_TYPE_AZ` - `false` to accept a zone derived from volumes or
//!   the subnet mapping

use anyhow::{bail, Context, Result};
use cim_instance_params::{
    InstanceParamMapper, ManifestParams, MapperConfig, SecurityGroupDirectory,
    SecurityGroupResolutionError, SecurityGroupResolver,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Configuration for the command
#[derive(Debug, Clone)]
struct CommandConfig {
    manifest_path: PathBuf,
    directory_path: Option<PathBuf>,
    mapper: MapperConfig,
}

impl CommandConfig {
    /// Load configuration from arguments and environment variables
    fn from_env() -> Result<Self> {
        let manifest_path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("MANIFEST_PATH").ok())
            .map(PathBuf::from)
            .context("No manifest given. Pass a path or set MANIFEST_PATH")?;

        let directory_path = std::env::var("SECURITY_GROUP_DIRECTORY").ok().map(PathBuf::from);

        let mut mapper = MapperConfig::default();
        if let Ok(url) = std::env::var("DOCUMENTATION_URL") {
            mapper = mapper.with_documentation_url(url);
        }
        if let Ok(value) = std::env::var("REQUIRE_VM_TYPE_AZ") {
            let required = match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => bail!("REQUIRE_VM_TYPE_AZ must be true or false, got {other}"),
            };
            mapper = mapper.with_required_vm_type_availability_zone(required);
        }

        Ok(Self {
            manifest_path,
            directory_path,
            mapper,
        })
    }
}

/// Treats every identifier as an id already
struct PassThrough;

impl SecurityGroupResolver for PassThrough {
    fn resolve(
        &self,
        identifiers: &[String],
        _subnet_id: &str,
    ) -> Result<Vec<String>, SecurityGroupResolutionError> {
        Ok(identifiers.to_vec())
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = CommandConfig::from_env()?;
    debug!("Configuration: {:?}", config);

    let manifest = std::fs::read_to_string(&config.manifest_path)
        .with_context(|| format!("Failed to read {}", config.manifest_path.display()))?;
    // Parse from text so network order follows the document
    let params: ManifestParams =
        serde_json::from_str(&manifest).context("Failed to parse manifest")?;

    let resolver: Box<dyn SecurityGroupResolver> = match &config.directory_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let directory: SecurityGroupDirectory =
                serde_json::from_str(&text).context("Failed to parse security group directory")?;
            info!("Resolving security groups from {}", path.display());
            Box::new(directory)
        }
        None => Box::new(PassThrough),
    };

    let mapper = InstanceParamMapper::with_config(resolver, config.mapper.clone())
        .with_manifest_params(params);
    mapper.validate().context("Manifest validation failed")?;
    let request = mapper
        .instance_params()
        .context("Failed to build instance request")?;

    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
