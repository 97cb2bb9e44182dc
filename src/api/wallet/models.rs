use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// EIP-1193 code a wallet returns when the user declines a prompt
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// Error member of a JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcResponse {
    /// Unwrap the response into its result, mapping wallet error objects
    pub fn into_result(self, expected_id: u64) -> Result<Value, WalletError> {
        if let Some(error) = self.error {
            return Err(WalletError::from(error));
        }
        if self.id != Some(expected_id) {
            return Err(WalletError::InvalidResponse(format!(
                "response id {:?} does not match request id {}",
                self.id, expected_id
            )));
        }
        // `null` is a legitimate result (pending receipts)
        Ok(self.result.unwrap_or(Value::Null))
    }
}

impl From<RpcErrorObject> for WalletError {
    fn from(error: RpcErrorObject) -> Self {
        if error.code == USER_REJECTED_CODE {
            WalletError::Rejected {
                code: error.code,
                message: error.message,
            }
        } else {
            WalletError::Rpc {
                code: error.code,
                message: error.message,
            }
        }
    }
}

/// Parameters of `eth_sendTransaction`
///
/// Quantities are hex strings as the wallet expects them. Leaving `to` empty
/// creates a contract from `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Parameters of `eth_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
}

/// The subset of a transaction receipt this client reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl TransactionReceipt {
    /// Pre-Byzantium receipts carry no status and count as successful
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}

/// Errors raised at the wallet provider boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No wallet provider is configured for this session
    #[error("no wallet provider detected")]
    NoWallet,
    /// The user declined the request in the wallet
    #[error("request rejected by the wallet ({code}): {message}")]
    Rejected { code: i64, message: String },
    /// Any other JSON-RPC error object
    #[error("wallet RPC error ({code}): {message}")]
    Rpc { code: i64, message: String },
    /// Network or HTTP failure reaching the provider
    #[error("wallet transport error: {0}")]
    Transport(String),
    /// The provider answered with something this client cannot read
    #[error("unexpected wallet response: {0}")]
    InvalidResponse(String),
}

impl WalletError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, WalletError::Rejected { .. })
    }
}
