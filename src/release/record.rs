use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use convert_case::{Boundary, Case, Converter};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Environment, ReleaseVersion};

/// Chain id -> checksummed address, per environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployments {
    #[serde(default)]
    pub staging: BTreeMap<String, String>,
    #[serde(default)]
    pub production: BTreeMap<String, String>,
}

impl Deployments {
    pub fn get(&self, environment: Environment) -> &BTreeMap<String, String> {
        match environment {
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }

    pub fn get_mut(&mut self, environment: Environment) -> &mut BTreeMap<String, String> {
        match environment {
            Environment::Staging => &mut self.staging,
            Environment::Production => &mut self.production,
        }
    }
}

/// One contract's release record, stored as `<releases>/<version>/<snake_name>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub deployments: Deployments,
    #[serde(default)]
    pub abi: Vec<Value>,
}

impl Release {
    pub fn new(name: &str, version: &ReleaseVersion) -> Self {
        Self {
            name: name.to_string(),
            version: version.as_str().to_string(),
            deployments: Deployments::default(),
            abi: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {:?}", path))?;

        serde_json::from_str(&content).wrap_err_with(|| format!("Failed to parse {:?}", path))
    }

    /// Load the release at `path`, or start a fresh one if there is none yet
    pub fn load_or_new(path: &Path, name: &str, version: &ReleaseVersion) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new(name, version))
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(self).wrap_err("Failed to serialize release")?;
        content.push('\n');

        fs::write(path, content).wrap_err_with(|| format!("Failed to write {:?}", path))
    }

    /// Merge `addresses` into one environment. Chain ids already present are
    /// overwritten, everything else in the record is left as is.
    pub fn merge_deployments(
        &mut self,
        environment: Environment,
        addresses: &BTreeMap<String, String>,
    ) {
        let target = self.deployments.get_mut(environment);
        for (chain_id, address) in addresses {
            target.insert(chain_id.clone(), address.clone());
        }
    }
}

/// File name of the release record for `contract_name`.
///
/// `UsdPlus` is folded to `Usdplus` first so that renamed contracts keep the
/// `usdplus_*` file names earlier releases were published under.
pub fn release_file_name(contract_name: &str) -> String {
    let normalized = contract_name.replace("UsdPlus", "Usdplus");

    let snake = Converter::new()
        .set_boundaries(&[
            Boundary::Underscore,
            Boundary::Hyphen,
            Boundary::Space,
            Boundary::LowerUpper,
            Boundary::DigitUpper,
            Boundary::Acronym,
        ])
        .to_case(Case::Snake)
        .convert(normalized);

    format!("{}.json", snake)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(v: &str) -> ReleaseVersion {
        v.parse().unwrap()
    }

    #[test]
    fn test_release_file_name() {
        assert_eq!(release_file_name("Vault"), "vault.json");
        assert_eq!(release_file_name("UsdPlusVault"), "usdplus_vault.json");
        assert_eq!(release_file_name("UsdPlus"), "usdplus.json");
        assert_eq!(release_file_name("OrderProcessor"), "order_processor.json");
        assert_eq!(release_file_name("ERC20Token"), "erc20_token.json");
        assert_eq!(release_file_name("TransferRestrictor"), "transfer_restrictor.json");
    }

    #[test]
    fn test_merge_keeps_other_entries() {
        let mut release = Release::new("Vault", &version("1.0.0"));
        release
            .deployments
            .production
            .insert("1".to_string(), "0xAAA".to_string());
        release
            .deployments
            .staging
            .insert("5".to_string(), "0xOLD".to_string());
        release
            .deployments
            .staging
            .insert("10".to_string(), "0xKEEP".to_string());

        let batch = BTreeMap::from([
            ("5".to_string(), "0xNEW".to_string()),
            ("137".to_string(), "0xBBB".to_string()),
        ]);
        release.merge_deployments(Environment::Staging, &batch);

        assert_eq!(
            release.deployments.get(Environment::Production),
            &BTreeMap::from([("1".to_string(), "0xAAA".to_string())])
        );
        assert_eq!(
            release.deployments.get(Environment::Staging),
            &BTreeMap::from([
                ("5".to_string(), "0xNEW".to_string()),
                ("10".to_string(), "0xKEEP".to_string()),
                ("137".to_string(), "0xBBB".to_string()),
            ])
        );
    }

    #[test]
    fn test_load_tolerates_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        fs::write(
            &path,
            r#"{"name":"Vault","version":"0.1.0","deployments":{"production":{"1":"0xAAA"}}}"#,
        )
        .unwrap();

        let release = Release::load(&path).unwrap();
        assert_eq!(release.version, "0.1.0");
        assert_eq!(release.deployments.production["1"], "0xAAA");
        assert!(release.deployments.staging.is_empty());
        assert!(release.abi.is_empty());
    }

    #[test]
    fn test_save_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");

        let mut release = Release::new("Vault", &version("1.0"));
        release
            .deployments
            .staging
            .insert("137".to_string(), "0xBBB".to_string());
        release.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let expected = r#"{
  "name": "Vault",
  "version": "1.0",
  "deployments": {
    "staging": {
      "137": "0xBBB"
    },
    "production": {}
  },
  "abi": []
}
"#;
        assert_eq!(content, expected);
        assert_eq!(Release::load(&path).unwrap(), release);
    }
}
