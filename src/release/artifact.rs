use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use alloy::primitives::Address;
use eyre::{Result, WrapErr};
use regex::Regex;
use serde::Deserialize;

use crate::chain::chain_id_to_network;

/// `<chainId>.<contractName>.json`
static ARTIFACT_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.(.+)\.json$").expect("valid artifact pattern"));

/// Deployment artifact written by the deploy scripts, one per chain and contract
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentAddress {
    pub address: String,
}

impl DeploymentAddress {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {:?}", path))?;

        serde_json::from_str(&content).wrap_err_with(|| format!("Failed to parse {:?}", path))
    }

    /// EIP-55 form of the address, whatever case it was written in
    pub fn checksummed(&self) -> Result<String> {
        let address: Address = self
            .address
            .parse()
            .wrap_err_with(|| format!("Invalid address {:?}", self.address))?;

        Ok(address.to_checksum(None))
    }
}

/// Split an artifact file name into `(chain_id, contract_name)`
pub fn parse_artifact_file_name(file_name: &str) -> Option<(&str, &str)> {
    let captures = ARTIFACT_FILE_NAME.captures(file_name)?;
    let chain_id = captures.get(1)?.as_str();
    let contract_name = captures.get(2)?.as_str();
    Some((chain_id, contract_name))
}

/// Read every artifact in `dir` into contract name -> (chain id -> checksummed address).
///
/// A missing directory yields an empty map. Entries are visited in file name
/// order, so when two artifacts resolve to the same contract and chain the
/// later name wins.
pub fn collect_deployments(dir: &Path) -> Result<BTreeMap<String, BTreeMap<String, String>>> {
    let mut contracts: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

    if !dir.exists() {
        tracing::info!("Artifact directory does not exist: {:?}", dir);
        return Ok(contracts);
    }

    let mut entries = fs::read_dir(dir)
        .wrap_err_with(|| format!("Failed to read {:?}", dir))?
        .collect::<Result<Vec<_>, _>>()
        .wrap_err_with(|| format!("Failed to list {:?}", dir))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let path = entry.path();

        // follows symlinks, so linked artifacts are picked up
        if !path.is_file() {
            tracing::debug!("Skipping {:?}: not a file", file_name);
            continue;
        }

        let Some((chain_id, contract_name)) = file_name
            .to_str()
            .and_then(parse_artifact_file_name)
        else {
            tracing::debug!("Skipping {:?}: not a deployment artifact", file_name);
            continue;
        };

        let address = DeploymentAddress::load(&path)?
            .checksummed()
            .wrap_err_with(|| format!("Failed to read address from {:?}", path))?;

        tracing::debug!(
            "{} on {} ({}): {}",
            contract_name,
            chain_id,
            chain_id
                .parse::<u64>()
                .map(chain_id_to_network)
                .unwrap_or_else(|_| format!("chain-{}", chain_id)),
            address
        );

        contracts
            .entry(contract_name.to_string())
            .or_default()
            .insert(chain_id.to_string(), address);
    }

    Ok(contracts)
}
