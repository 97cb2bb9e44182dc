use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::app::wallet_from_config;
use crate::config::{Config, ConfigError};
use crate::contract::load_artifact;
use crate::services::deploy_service;
use crate::utils::AppError;

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Compiled contract artifact (JSON with `abi` and `bytecode`)
    pub artifact: PathBuf,
}

pub async fn execute(config: &Config, args: &DeployArgs) -> Result<(), AppError> {
    let artifact = load_artifact(&args.artifact).map_err(ConfigError::Abi)?;
    let wallet = wallet_from_config(config);

    let deployed =
        deploy_service::deploy_contract(&wallet, &artifact, config.receipt_poll_interval).await?;
    info!(
        "{} deployed in transaction {}",
        deployed.contract_name, deployed.transaction_hash
    );
    println!("{} deployed to {}", deployed.contract_name, deployed.address);
    Ok(())
}
