//! Session bootstrap models

use alloy_primitives::Address;

use crate::utils::AppError;

/// Outcome of the two independent bootstrap steps
#[derive(Debug)]
pub struct SessionReport {
    /// Account adopted from the wallet's authorized list, if any
    pub account: Result<Option<Address>, AppError>,
    /// Count read from the contract and persisted locally
    pub transaction_count: Result<u64, AppError>,
}

impl SessionReport {
    pub fn is_ready(&self) -> bool {
        self.account.is_ok() && self.transaction_count.is_ok()
    }
}
