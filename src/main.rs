mod chain;
mod config;
mod contracts;
mod project;
mod release;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use eyre::eyre;

use crate::config::AppConfig;
use crate::project::Project;
use crate::release::{BundleRequest, Environment, ReleaseVersion};

#[derive(Parser, Debug)]
#[command(name = "deploy-scripts")]
#[command(about = "Complementary CLI for smart contract deployment")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bundle deployment artifacts into release files in OUTPUT_DIR
    Bundle {
        /// Directory holding a staging/ and production/ folder of artifacts
        artifact_dir: PathBuf,
        /// Directory the release files are written to
        output_dir: PathBuf,
        /// staging or production
        environment: Environment,
        /// Semantic version of the release
        version: ReleaseVersion,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Bundle deployment artifacts into releases/v<VERSION>
    Release {
        /// Directory holding a staging/ and production/ folder of artifacts
        artifact_dir: PathBuf,
        /// staging or production
        environment: Environment,
        /// Semantic version of the release
        version: ReleaseVersion,
        /// Write release files here instead of the versioned default
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Print the latest block number of a chain
    BlockNumber {
        /// RPC endpoint to query
        #[arg(long, conflicts_with = "network")]
        rpc_url: Option<String>,
        /// Network from the config file, defaults to the configured default
        #[arg(short, long)]
        network: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Foundry project whose compiler output provides the ABIs
    #[arg(long, default_value = ".")]
    project: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    run(cli).await
}

/// Dispatch a parsed command. The config file is only read by the commands
/// that use it.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Bundle {
            artifact_dir,
            output_dir,
            environment,
            version,
            project,
        } => run_bundle(artifact_dir, output_dir, environment, version, &project),
        Command::Release {
            artifact_dir,
            environment,
            version,
            output,
            project,
        } => {
            let output_dir = match output {
                Some(dir) => dir,
                None => AppConfig::load(cli.config.as_deref())?.default_output_dir(&version),
            };
            run_bundle(artifact_dir, output_dir, environment, version, &project)
        }
        Command::BlockNumber { rpc_url, network } => {
            let (rpc_url, expected_chain_id) = match rpc_url {
                Some(url) => (url, None),
                None => AppConfig::load(cli.config.as_deref())?
                    .get_network(network.as_deref())
                    .map(|(_, n)| (n.rpc_url.clone(), n.chain_id))
                    .ok_or_else(|| eyre!("No RPC URL given and no matching network configured"))?,
            };

            let head = chain::chain_head(&rpc_url).await?;
            tracing::debug!(
                "Connected to {} ({})",
                chain::chain_id_to_network(head.chain_id),
                head.chain_id
            );
            if let Some(expected) = expected_chain_id.filter(|id| *id != head.chain_id) {
                tracing::warn!(
                    "Configured chain id {} does not match the node's chain id {}",
                    expected,
                    head.chain_id
                );
            }
            println!("Block number: {}", head.block_number);
            Ok(())
        }
    }
}

fn run_bundle(
    artifact_dir: PathBuf,
    output_dir: PathBuf,
    environment: Environment,
    version: ReleaseVersion,
    project: &ProjectArgs,
) -> Result<()> {
    let project = Project::load(&project.project)?;
    tracing::debug!(
        "Using compiler output {:?} of project {:?}",
        project.out_dir,
        project.root
    );

    let request = BundleRequest {
        artifact_dir,
        output_dir,
        environment,
        version,
        compiled_dir: project.out_dir,
    };

    let report = release::bundle(&request)?;
    tracing::info!(
        "Bundled {} {} releases into {:?}",
        report.written.len(),
        request.environment,
        request.output_dir
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bundle() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "bundle",
            "artifacts",
            "releases/custom",
            "staging",
            "1.0",
        ])
        .unwrap();

        match cli.command {
            Command::Bundle {
                artifact_dir,
                output_dir,
                environment,
                version,
                project,
            } => {
                assert_eq!(artifact_dir, PathBuf::from("artifacts"));
                assert_eq!(output_dir, PathBuf::from("releases/custom"));
                assert_eq!(environment, Environment::Staging);
                assert_eq!(version.as_str(), "1.0");
                assert_eq!(project.project, PathBuf::from("."));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_release_defaults_output() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "release",
            "artifacts",
            "production",
            "0.4.0",
        ])
        .unwrap();

        match cli.command {
            Command::Release {
                output, version, ..
            } => {
                assert!(output.is_none());
                assert_eq!(
                    AppConfig::default().default_output_dir(&version),
                    PathBuf::from("releases/v0.4.0")
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bundle_does_not_read_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let config_path = format!("{}/config.toml", root);
        std::fs::write(&config_path, "[networks\nnot toml").unwrap();
        let artifact_dir = format!("{}/artifacts", root);
        let output_dir = format!("{}/releases", root);

        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "--config",
            config_path.as_str(),
            "bundle",
            artifact_dir.as_str(),
            output_dir.as_str(),
            "staging",
            "1.0.0",
            "--project",
            root,
        ])
        .unwrap();
        run(cli).await.unwrap();
        assert!(PathBuf::from(&output_dir).is_dir());

        // release falls back to the config for its output directory
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "--config",
            config_path.as_str(),
            "release",
            artifact_dir.as_str(),
            "staging",
            "1.0.0",
            "--project",
            root,
        ])
        .unwrap();
        assert!(run(cli).await.is_err());
    }

    #[test]
    fn test_reject_invalid_arguments() {
        let bad_environment = Cli::try_parse_from([
            "deploy-scripts",
            "release",
            "artifacts",
            "prod",
            "1.0.0",
        ]);
        assert!(bad_environment.is_err());

        let bad_version = Cli::try_parse_from([
            "deploy-scripts",
            "bundle",
            "artifacts",
            "out",
            "staging",
            "v1",
        ]);
        assert!(bad_version.is_err());

        let missing_version =
            Cli::try_parse_from(["deploy-scripts", "bundle", "artifacts", "out", "staging"]);
        assert!(missing_version.is_err());
    }
}
