//! Access to the deployed Transactions contract

pub mod abi;
pub mod bindings;
pub mod proxy;

use alloy_primitives::B256;
use thiserror::Error;

use crate::api::wallet::WalletError;

pub use abi::{load_artifact, ContractArtifact};
pub use bindings::TransferStruct;
pub use proxy::ContractProxy;

#[derive(Debug, Error)]
pub enum ContractError {
    /// No account is authorized to sign contract transactions
    #[error("contract unavailable: no authorized account to sign with")]
    Unavailable,
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("failed to decode {function} result: {reason}")]
    Decode {
        function: &'static str,
        reason: String,
    },
    #[error("transaction {0} reverted")]
    Reverted(B256),
    #[error("contract ABI does not declare {0}")]
    AbiMismatch(String),
    #[error("invalid contract document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },
}
