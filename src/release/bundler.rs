use std::fs;
use std::path::PathBuf;

use eyre::{Result, WrapErr};

use super::artifact::collect_deployments;
use super::record::{Release, release_file_name};
use super::{Environment, ReleaseVersion};
use crate::contracts::{AbiSummary, load_compiled_abi};

/// Everything a bundle run needs, already validated
#[derive(Debug, Clone)]
pub struct BundleRequest {
    /// Holds one subdirectory per environment with `<chainId>.<Contract>.json` files
    pub artifact_dir: PathBuf,
    pub output_dir: PathBuf,
    pub environment: Environment,
    pub version: ReleaseVersion,
    /// Compiler output directory to take ABIs from
    pub compiled_dir: PathBuf,
}

/// Release files written by a bundle run
#[derive(Debug, Default)]
pub struct BundleReport {
    pub written: Vec<PathBuf>,
}

/// Merge the environment's deployment artifacts into the release files under
/// `output_dir`, creating a release for each contract that has none yet.
///
/// Contracts are written one at a time; a failure part way leaves the files
/// already written in place.
pub fn bundle(request: &BundleRequest) -> Result<BundleReport> {
    let source_dir = request.artifact_dir.join(request.environment.as_str());
    let contracts = collect_deployments(&source_dir)?;

    tracing::info!(
        "Found {} contracts in {:?} for {}",
        contracts.len(),
        source_dir,
        request.environment
    );

    fs::create_dir_all(&request.output_dir)
        .wrap_err_with(|| format!("Failed to create {:?}", request.output_dir))?;

    let mut report = BundleReport::default();

    for (contract_name, addresses) in &contracts {
        let path = request.output_dir.join(release_file_name(contract_name));
        let mut release = Release::load_or_new(&path, contract_name, &request.version)?;

        if let Some(abi) = load_compiled_abi(&request.compiled_dir, contract_name)? {
            tracing::debug!("{}: ABI with {}", contract_name, AbiSummary::from_abi(&abi));
            release.abi = abi;
        }

        release.merge_deployments(request.environment, addresses);
        release.save(&path)?;

        tracing::info!(
            "Wrote {:?} ({} of {} {} chains updated)",
            path,
            addresses.len(),
            release.deployments.get(request.environment).len(),
            request.environment
        );
        report.written.push(path);
    }

    Ok(report)
}
