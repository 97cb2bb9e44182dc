//! Send/transfer models

use alloy_primitives::{Address, B256, U256};

/// Result of a confirmed send: the transfer and the record that describes it
#[derive(Debug, Clone)]
pub struct SendResult {
    pub from: Address,
    pub to: Address,
    pub amount_wei: U256,
    pub transfer_hash: B256,
    pub record_hash: B256,
    pub transaction_count: u64,
}
