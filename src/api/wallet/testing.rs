//! In-memory wallet provider for tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{address, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue as _};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::adapter::{decode_hex, encode_hex};
use super::client::WalletProvider;
use super::models::{CallRequest, TransactionRequest, WalletError, USER_REJECTED_CODE};
use crate::contract::bindings::{
    addToBlockchainCall, getAllTransactionsCall, getTransactionCountCall, TransferStruct,
};

/// The kind of request, as the mock tells them apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Accounts,
    RequestAccounts,
    /// `eth_sendTransaction` without data
    Transfer,
    /// `eth_sendTransaction` to a contract with data
    ContractCall,
    /// `eth_sendTransaction` without a recipient
    Deploy,
    Call,
    Receipt,
    Other,
}

#[derive(Default)]
pub struct MockWallet {
    accounts: Mutex<Vec<Address>>,
    failures: Mutex<HashMap<MockCall, WalletError>>,
    record_count: Mutex<u64>,
    record_batches: Mutex<VecDeque<Vec<TransferStruct>>>,
    records_failure: Mutex<Option<WalletError>>,
    pending_polls: Mutex<u32>,
    reverted: Mutex<bool>,
    deployments: Mutex<HashSet<B256>>,
    requests: Mutex<Vec<(MockCall, Value)>>,
    next_hash: AtomicU64,
}

impl MockWallet {
    pub const CONTRACT_ADDRESS: Address = address!("4d09e987a81b648c4eca1360f1d2922c3c79f96f");
    pub const DEPLOYED_ADDRESS: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn user_rejection() -> WalletError {
        WalletError::Rejected {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".to_string(),
        }
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    /// Every later request of this kind fails with `error`
    pub fn fail_on(&self, call: MockCall, error: WalletError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    pub fn set_record_count(&self, count: u64) {
        *self.record_count.lock().unwrap() = count;
    }

    /// Queue the result of one `getAllTransactions` call; the last batch repeats
    pub fn push_records(&self, records: Vec<TransferStruct>) {
        self.record_batches.lock().unwrap().push_back(records);
    }

    /// `getAllTransactions` calls fail with `error`; other calls are unaffected
    pub fn fail_records(&self, error: WalletError) {
        *self.records_failure.lock().unwrap() = Some(error);
    }

    pub fn restore_records(&self) {
        *self.records_failure.lock().unwrap() = None;
    }

    /// Number of receipt polls answered with `null` before the receipt appears
    pub fn set_pending_polls(&self, polls: u32) {
        *self.pending_polls.lock().unwrap() = polls;
    }

    pub fn set_reverted(&self, reverted: bool) {
        *self.reverted.lock().unwrap() = reverted;
    }

    pub fn requests(&self) -> Vec<(MockCall, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<MockCall> {
        self.requests().into_iter().map(|(kind, _)| kind).collect()
    }

    pub fn count(&self, call: MockCall) -> usize {
        self.kinds().into_iter().filter(|k| *k == call).count()
    }

    fn sent(&self, call: MockCall) -> Vec<TransactionRequest> {
        self.requests()
            .into_iter()
            .filter(|(kind, _)| *kind == call)
            .map(|(_, params)| serde_json::from_value(params[0].clone()).unwrap())
            .collect()
    }

    pub fn transfers(&self) -> Vec<TransactionRequest> {
        self.sent(MockCall::Transfer)
    }

    pub fn contract_calls(&self) -> Vec<TransactionRequest> {
        self.sent(MockCall::ContractCall)
    }

    pub fn deployments(&self) -> Vec<TransactionRequest> {
        self.sent(MockCall::Deploy)
    }

    /// `addToBlockchain` calls decoded back into their arguments
    pub fn decoded_appends(&self) -> Vec<addToBlockchainCall> {
        self.contract_calls()
            .into_iter()
            .filter_map(|tx| tx.data)
            .map(|data| <addToBlockchainCall as SolCall>::abi_decode(&decode_hex(&data).unwrap()).unwrap())
            .collect()
    }

    fn classify(method: &str, params: &Value) -> MockCall {
        match method {
            "eth_accounts" => MockCall::Accounts,
            "eth_requestAccounts" => MockCall::RequestAccounts,
            "eth_call" => MockCall::Call,
            "eth_getTransactionReceipt" => MockCall::Receipt,
            "eth_sendTransaction" => {
                let tx = &params[0];
                if tx.get("to").is_none() {
                    MockCall::Deploy
                } else if tx.get("data").is_some() {
                    MockCall::ContractCall
                } else {
                    MockCall::Transfer
                }
            }
            _ => MockCall::Other,
        }
    }

    fn new_hash(&self) -> B256 {
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        B256::from(bytes)
    }

    fn answer_call(&self, params: &Value) -> Result<Value, WalletError> {
        let call: CallRequest = serde_json::from_value(params[0].clone())
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
        let data = decode_hex(&call.data)?;
        let selector = data.get(..4).unwrap_or_default();

        let encoded = if selector == getTransactionCountCall::SELECTOR {
            U256::from(*self.record_count.lock().unwrap()).abi_encode()
        } else if selector == getAllTransactionsCall::SELECTOR {
            if let Some(error) = self.records_failure.lock().unwrap().clone() {
                return Err(error);
            }
            let mut batches = self.record_batches.lock().unwrap();
            let records = if batches.len() > 1 {
                batches.pop_front().unwrap_or_default()
            } else {
                batches.front().cloned().unwrap_or_default()
            };
            records.abi_encode()
        } else {
            return Err(WalletError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            });
        };
        Ok(json!(encode_hex(&encoded)))
    }

    fn answer_receipt(&self, params: &Value) -> Value {
        {
            let mut pending = self.pending_polls.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Value::Null;
            }
        }

        let hash = params[0].as_str().unwrap_or_default().to_string();
        let deployed = hash
            .parse::<B256>()
            .map(|h| self.deployments.lock().unwrap().contains(&h))
            .unwrap_or(false);
        let status = if *self.reverted.lock().unwrap() { "0x0" } else { "0x1" };

        json!({
            "transactionHash": hash,
            "blockNumber": "0x1",
            "status": status,
            "contractAddress": if deployed { json!(Self::DEPLOYED_ADDRESS.to_string()) } else { Value::Null },
        })
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let kind = Self::classify(method, &params);
        self.requests.lock().unwrap().push((kind, params.clone()));

        if let Some(error) = self.failures.lock().unwrap().get(&kind) {
            return Err(error.clone());
        }

        match kind {
            MockCall::Accounts | MockCall::RequestAccounts => {
                let accounts: Vec<String> = self
                    .accounts
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|a| a.to_string())
                    .collect();
                Ok(json!(accounts))
            }
            MockCall::Transfer | MockCall::ContractCall => Ok(json!(self.new_hash().to_string())),
            MockCall::Deploy => {
                let hash = self.new_hash();
                self.deployments.lock().unwrap().insert(hash);
                Ok(json!(hash.to_string()))
            }
            MockCall::Call => self.answer_call(&params),
            MockCall::Receipt => Ok(self.answer_receipt(&params)),
            MockCall::Other => Err(WalletError::Rpc {
                code: -32601,
                message: format!("method {} not found", method),
            }),
        }
    }
}

/// A raw record with distinguishable fields
pub fn record(n: u8, message: &str) -> TransferStruct {
    TransferStruct {
        sender: Address::repeat_byte(n),
        receiver: Address::repeat_byte(n.wrapping_add(100)),
        timestamp: U256::from(1_700_000_000u64 + n as u64),
        message: message.to_string(),
        keyword: format!("kw{}", n),
        amount: U256::from(n as u64) * U256::from(1_000_000_000_000_000u64),
    }
}
