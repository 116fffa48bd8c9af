use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::Deserialize;
use serde_json::Value;

/// Foundry compiler output, of which only the ABI is needed
#[derive(Debug, Deserialize)]
struct CompiledArtifact {
    abi: Vec<Value>,
}

/// Entry counts of an ABI, used for progress output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbiSummary {
    pub functions: usize,
    pub events: usize,
    pub errors: usize,
}

impl AbiSummary {
    pub fn from_abi(abi: &[Value]) -> Self {
        let mut summary = Self::default();

        for item in abi {
            match item.get("type").and_then(|t| t.as_str()) {
                Some("function") => summary.functions += 1,
                Some("event") => summary.events += 1,
                Some("error") => summary.errors += 1,
                _ => {}
            }
        }

        summary
    }
}

impl fmt::Display for AbiSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} functions, {} events, {} errors",
            self.functions, self.events, self.errors
        )
    }
}

/// Foundry lays artifacts out as `out/<ContractName>.sol/<ContractName>.json`
pub fn compiled_artifact_path(out_dir: &Path, contract_name: &str) -> PathBuf {
    out_dir
        .join(format!("{}.sol", contract_name))
        .join(format!("{}.json", contract_name))
}

/// Load the ABI for `contract_name`, or `None` if it has not been compiled
pub fn load_compiled_abi(out_dir: &Path, contract_name: &str) -> Result<Option<Vec<Value>>> {
    let path = compiled_artifact_path(out_dir, contract_name);

    if !path.exists() {
        tracing::debug!("No compiled artifact for {} at {:?}", contract_name, path);
        return Ok(None);
    }

    let content =
        fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read {:?}", path))?;

    let artifact: CompiledArtifact =
        serde_json::from_str(&content).wrap_err_with(|| format!("Failed to parse {:?}", path))?;

    Ok(Some(artifact.abi))
}
