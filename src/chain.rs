use alloy::providers::{Provider, ProviderBuilder};
use eyre::{Result, WrapErr};

/// Where a node's chain currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainHead {
    pub chain_id: u64,
    pub block_number: u64,
}

/// Query the chain id and latest block number of the node at `rpc_url`
pub async fn chain_head(rpc_url: &str) -> Result<ChainHead> {
    let provider = ProviderBuilder::new()
        .connect(rpc_url)
        .await
        .wrap_err("Failed to connect to RPC")?;

    let chain_id = provider
        .get_chain_id()
        .await
        .wrap_err("Failed to fetch chain id")?;

    let block_number = provider
        .get_block_number()
        .await
        .wrap_err("Failed to fetch block number")?;

    Ok(ChainHead {
        chain_id,
        block_number,
    })
}

pub fn chain_id_to_network(chain_id: u64) -> String {
    match chain_id {
        1 => "mainnet".to_string(),
        11155111 => "sepolia".to_string(),
        137 => "polygon".to_string(),
        80002 => "amoy".to_string(),
        42161 => "arbitrum".to_string(),
        421614 => "arbitrum-sepolia".to_string(),
        10 => "optimism".to_string(),
        11155420 => "optimism-sepolia".to_string(),
        8453 => "base".to_string(),
        84532 => "base-sepolia".to_string(),
        81457 => "blast".to_string(),
        31337 => "anvil".to_string(),
        _ => format!("chain-{}", chain_id),
    }
}
