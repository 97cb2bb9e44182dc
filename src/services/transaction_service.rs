use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use crate::api::wallet::NATIVE_TRANSFER_GAS;
use crate::app::App;
use crate::contract::ContractError;
use crate::db;
use crate::models::{FormData, SendResult};
use crate::services::fail;
use crate::services::wallet_service::require_wallet;
use crate::state::{StateEvent, SubmissionStage};
use crate::utils::{parse_ether, AppError};

/// Send the staged form: transfer the value through the wallet, then record it
/// in the contract and wait for the record to be mined.
///
/// The transfer and the record are two unrelated transactions. If the record
/// fails after the transfer went through, the funds have moved without a
/// record and nothing compensates for it; the error says which step failed.
pub async fn send_transaction(app: &App) -> Result<SendResult, AppError> {
    require_wallet(app, "send a transaction")?;

    let form = app.state.form();
    let amount_wei = parse_ether(&form.amount)?;
    let to = form
        .recipient
        .trim()
        .parse::<Address>()
        .map_err(|_| AppError::InvalidRecipient(form.recipient.clone()))?;
    let from = app
        .state
        .current_account()
        .ok_or_else(|| fail("send a transaction", ContractError::Unavailable))?;

    let result = submit(app, from, to, amount_wei, &form).await;
    app.state.set_stage(SubmissionStage::Idle);

    let result = result?;
    app.state.emit(StateEvent::Invalidated);
    Ok(result)
}

async fn submit(
    app: &App,
    from: Address,
    to: Address,
    amount_wei: U256,
    form: &FormData,
) -> Result<SendResult, AppError> {
    app.state.set_stage(SubmissionStage::SubmittingWallet);
    let transfer_hash = app
        .wallet
        .submit_native_transfer(from, to, amount_wei, NATIVE_TRANSFER_GAS)
        .await
        .map_err(|e| fail("submit the transfer", e))?;
    debug!("transfer {} accepted by the wallet", transfer_hash);

    app.state.set_stage(SubmissionStage::SubmittingContract);
    let pending = app
        .contract
        .append_record(to, &form.message, amount_wei, &form.keyword)
        .await
        .map_err(|e| fail("record the transaction", e))?;

    app.state.set_stage(SubmissionStage::Confirming);
    info!("Loading - {}", pending.hash);
    app.contract
        .await_confirmation(&pending)
        .await
        .map_err(|e| fail("confirm the transaction", e))?;
    app.state.set_stage(SubmissionStage::Idle);
    info!("Success - {}", pending.hash);

    let transaction_count = app
        .contract
        .get_record_count()
        .await
        .map_err(|e| fail("refresh the transaction count", e))?;
    db::settings::store_transaction_count(&app.pool, transaction_count)
        .await
        .map_err(|e| fail("store the transaction count", e))?;
    app.state.set_transaction_count(transaction_count);

    Ok(SendResult {
        from,
        to,
        amount_wei,
        transfer_hash,
        record_hash: pending.hash,
        transaction_count,
    })
}
