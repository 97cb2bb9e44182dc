//! Runtime configuration from flags, the environment and `.env`

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use clap::Args;
use thiserror::Error;
use tracing::{debug, info};

use crate::contract::abi::{load_abi, verify_abi};
use crate::contract::ContractError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CONTRACT_ADDRESS is not set")]
    MissingContractAddress,
    #[error("invalid contract address '{0}'")]
    InvalidContractAddress(String),
    #[error("contract ABI rejected: {0}")]
    Abi(#[from] ContractError),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// JSON-RPC endpoint of the wallet provider; without it no wallet is available
    #[arg(long = "rpc-url", env = "WALLET_RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Address of the deployed Transactions contract
    #[arg(long = "contract", env = "CONTRACT_ADDRESS", global = true)]
    pub contract_address: Option<String>,

    /// ABI document (ABI array or compiled artifact) to check the contract against
    #[arg(long = "abi", env = "CONTRACT_ABI", global = true)]
    pub contract_abi: Option<PathBuf>,

    /// Local storage for the mirrored transaction count
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        default_value = "sqlite://krypt.db",
        global = true
    )]
    pub database_url: String,

    /// Interval between receipt polls while waiting for confirmation
    #[arg(long = "receipt-poll-ms", env = "RECEIPT_POLL_MS", default_value_t = 1000, global = true)]
    pub receipt_poll_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub contract_abi: Option<PathBuf>,
    pub database_url: String,
    pub receipt_poll_interval: Duration,
}

/// Static description of the deployed contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractConfig {
    pub address: Address,
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            rpc_url: non_empty(args.rpc_url),
            contract_address: non_empty(args.contract_address),
            contract_abi: args.contract_abi,
            database_url: args.database_url,
            receipt_poll_interval: Duration::from_millis(args.receipt_poll_ms.max(1)),
        }
    }
}

impl Config {
    /// Resolve the contract address and, when an ABI document is configured,
    /// check that it declares the functions this client calls.
    pub fn contract(&self) -> Result<ContractConfig, ConfigError> {
        let raw = self
            .contract_address
            .as_deref()
            .ok_or(ConfigError::MissingContractAddress)?;
        let address = raw
            .trim()
            .parse::<Address>()
            .map_err(|_| ConfigError::InvalidContractAddress(raw.to_string()))?;

        match &self.contract_abi {
            Some(path) => {
                let items = load_abi(path)?;
                verify_abi(&items)?;
                debug!("ABI {} declares {} items", path.display(), items.len());
            }
            None => debug!("no ABI document configured, using built-in bindings"),
        }

        info!("using contract at {}", address);
        Ok(ContractConfig { address })
    }
}
