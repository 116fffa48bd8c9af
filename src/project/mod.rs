mod foundry;

use std::path::{Path, PathBuf};

use eyre::Result;

const DEFAULT_OUT_DIR: &str = "out";

/// Contract project whose compiler output the release files take ABIs from
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub out_dir: PathBuf,
}

impl Project {
    /// Read foundry.toml if there is one, otherwise assume the default layout
    pub fn load(path: &Path) -> Result<Self> {
        if path.join("foundry.toml").exists() {
            tracing::debug!("Detected Foundry project at {:?}", path);
            return foundry::load_project(path);
        }

        Ok(Self {
            root: path.to_path_buf(),
            out_dir: path.join(DEFAULT_OUT_DIR),
        })
    }
}
