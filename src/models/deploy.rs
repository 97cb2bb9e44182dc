//! Contract deployment models

use alloy_primitives::{Address, B256};

#[derive(Debug, Clone)]
pub struct DeployResult {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: B256,
}
