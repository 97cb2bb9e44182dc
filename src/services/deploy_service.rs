use std::time::Duration;

use alloy_primitives::Address;
use tracing::info;

use crate::api::wallet::{encode_hex, TransactionRequest, WalletAdapter, WalletError};
use crate::config::ConfigError;
use crate::contract::proxy::wait_for_receipt;
use crate::contract::{ContractArtifact, ContractError};
use crate::models::DeployResult;
use crate::services::fail;
use crate::utils::AppError;

/// Deploy a compiled contract from the wallet's account and wait for it to be mined
pub async fn deploy_contract(
    wallet: &WalletAdapter,
    artifact: &ContractArtifact,
    poll_interval: Duration,
) -> Result<DeployResult, AppError> {
    if !wallet.is_available() {
        return Err(AppError::NoWallet);
    }

    let code = artifact
        .creation_code()
        .map_err(|e| AppError::Config(ConfigError::Abi(e)))?;
    let contract_name = artifact
        .contract_name
        .clone()
        .unwrap_or_else(|| "contract".to_string());

    let from = deployer_account(wallet).await?;
    info!("deploying {} ({} bytes) from {}", contract_name, code.len(), from);

    let request = TransactionRequest {
        from: from.to_string(),
        data: Some(encode_hex(&code)),
        ..Default::default()
    };
    let transaction_hash = wallet
        .send_transaction(request)
        .await
        .map_err(|e| fail("submit the deployment", e))?;

    let receipt = wait_for_receipt(wallet, transaction_hash, poll_interval)
        .await
        .map_err(|e| fail("confirm the deployment", e))?;

    let address = receipt
        .contract_address
        .as_deref()
        .and_then(|a| a.parse::<Address>().ok())
        .ok_or_else(|| {
            fail(
                "confirm the deployment",
                ContractError::Wallet(WalletError::InvalidResponse(
                    "receipt has no contract address".to_string(),
                )),
            )
        })?;

    Ok(DeployResult {
        contract_name,
        address,
        transaction_hash,
    })
}

/// Use an already authorized account, otherwise ask the wallet for one
async fn deployer_account(wallet: &WalletAdapter) -> Result<Address, AppError> {
    let accounts = wallet
        .list_authorized_accounts()
        .await
        .map_err(|e| fail("list authorized accounts", e))?;

    match accounts.first() {
        Some(&account) => Ok(account),
        None => wallet
            .request_authorization()
            .await
            .map_err(|e| fail("authorize a deployer account", e)),
    }
}
