use alloy_primitives::Address;
use tracing::{info, warn};

use crate::app::App;
use crate::db;
use crate::models::SessionReport;
use crate::services::fail;
use crate::services::history_service;
use crate::utils::AppError;

/// Start the session: adopt an already authorized account and mirror the
/// contract's transaction count locally.
///
/// Both steps run concurrently and neither waits on or is blocked by the
/// other; the report carries each outcome separately. Only the first call per
/// session does anything.
pub async fn bootstrap(app: &App) -> Result<SessionReport, AppError> {
    if !app.mark_bootstrapped() {
        warn!("session bootstrap requested twice");
        return Err(AppError::SessionAlreadyStarted);
    }

    let (account, transaction_count) =
        tokio::join!(check_connected_account(app), check_transaction_count(app));

    Ok(SessionReport {
        account,
        transaction_count,
    })
}

/// Adopt the first authorized account, if any, and load its history
pub async fn check_connected_account(app: &App) -> Result<Option<Address>, AppError> {
    let accounts = app
        .wallet
        .list_authorized_accounts()
        .await
        .map_err(|e| fail("check for a connected wallet", e))?;

    match accounts.first() {
        Some(&account) => {
            app.state.set_current_account(account);
            info!("found authorized account {}", account);
            // the account stays adopted even if its history cannot be read yet
            if let Err(e) = history_service::refresh(app).await {
                warn!("history not loaded at startup: {}", e);
            }
            Ok(Some(account))
        }
        None => {
            info!("No previous account found");
            Ok(None)
        }
    }
}

/// Read the contract's transaction count and persist it
pub async fn check_transaction_count(app: &App) -> Result<u64, AppError> {
    let count = app
        .contract
        .get_record_count()
        .await
        .map_err(|e| fail("read the transaction count", e))?;

    db::settings::store_transaction_count(&app.pool, count)
        .await
        .map_err(|e| fail("store the transaction count", e))?;
    app.state.set_transaction_count(count);

    Ok(count)
}
