use thiserror::Error;

use crate::api::wallet::WalletError;
use crate::config::ConfigError;
use crate::contract::ContractError;
use crate::utils::units::UnitsError;

/// The underlying failure behind [`AppError::EthereumUnavailable`]
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("local storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Top-level error of every public operation
#[derive(Debug, Error)]
pub enum AppError {
    /// No wallet provider is configured; nothing was sent anywhere
    #[error("Make sure you have a wallet provider configured (set WALLET_RPC_URL)")]
    NoWallet,
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),
    #[error("invalid recipient address '{0}'")]
    InvalidRecipient(String),
    #[error("the session has already been bootstrapped")]
    SessionAlreadyStarted,
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A wallet, contract or storage step failed; `cause` keeps the original error
    #[error("Ethereum unavailable while trying to {operation}: {cause}")]
    EthereumUnavailable {
        operation: &'static str,
        #[source]
        cause: Cause,
    },
}

/// Coarse classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoWallet,
    WalletRejection,
    Wallet,
    ContractCall,
    Storage,
    InvalidInput,
    Configuration,
}

impl AppError {
    /// Wrap a lower-level failure. A missing wallet stays [`AppError::NoWallet`]
    /// however deep it was detected.
    pub fn unavailable(operation: &'static str, cause: impl Into<Cause>) -> Self {
        match cause.into() {
            Cause::Wallet(WalletError::NoWallet)
            | Cause::Contract(ContractError::Wallet(WalletError::NoWallet)) => AppError::NoWallet,
            cause => AppError::EthereumUnavailable { operation, cause },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NoWallet => ErrorKind::NoWallet,
            AppError::InvalidAmount(_) | AppError::InvalidRecipient(_) => ErrorKind::InvalidInput,
            AppError::SessionAlreadyStarted | AppError::Config(_) => ErrorKind::Configuration,
            AppError::EthereumUnavailable { cause, .. } => match cause {
                Cause::Wallet(e) | Cause::Contract(ContractError::Wallet(e)) if e.is_rejection() => {
                    ErrorKind::WalletRejection
                }
                Cause::Wallet(_) | Cause::Contract(ContractError::Wallet(_)) => ErrorKind::Wallet,
                Cause::Contract(_) => ErrorKind::ContractCall,
                Cause::Storage(_) => ErrorKind::Storage,
            },
        }
    }

    /// Single line suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoWallet => format!("⚠️ {}", self),
            AppError::EthereumUnavailable { operation, cause } => match self.kind() {
                ErrorKind::WalletRejection => format!("❌ Request rejected in the wallet ({})", operation),
                _ => format!(
                    "❌ Could not {}: {}",
                    operation,
                    extract_clean_error(&cause.to_string())
                ),
            },
            other => format!("❌ {}", other),
        }
    }
}

/// Extract the revert reason from node error strings
///
/// "VM Exception while processing transaction: reverted with reason string 'not enough'"
/// becomes "not enough"; "execution reverted: paused" becomes "paused".
pub fn extract_clean_error(error_msg: &str) -> String {
    const REASON_MARKER: &str = "reverted with reason string '";
    const REVERT_MARKER: &str = "execution reverted: ";

    if let Some(start) = error_msg.find(REASON_MARKER) {
        let reason = &error_msg[start + REASON_MARKER.len()..];
        reason.trim_end_matches('\'').trim().to_string()
    } else if let Some(start) = error_msg.find(REVERT_MARKER) {
        error_msg[start + REVERT_MARKER.len()..].trim().to_string()
    } else {
        error_msg.to_string()
    }
}
