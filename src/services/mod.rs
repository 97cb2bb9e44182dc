pub mod deploy_service;
pub mod history_service;
pub mod session_service;
pub mod transaction_service;
pub mod wallet_service;

use tracing::{error, warn};

use crate::utils::{AppError, Cause};

/// Collapse a lower-level failure into an [`AppError`], logging it once
pub(crate) fn fail(operation: &'static str, cause: impl Into<Cause>) -> AppError {
    let err = AppError::unavailable(operation, cause);
    match &err {
        AppError::NoWallet => warn!("cannot {}: no wallet provider", operation),
        other => error!("{}", other),
    }
    err
}
