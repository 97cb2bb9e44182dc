use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::client::WalletProvider;
use super::models::{CallRequest, TransactionReceipt, TransactionRequest, WalletError};

/// Gas limit of a plain value transfer
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Typed access to the wallet provider.
///
/// A session without a provider is represented by an adapter holding `None`;
/// every operation on it fails with [`WalletError::NoWallet`] before any request
/// is made.
#[derive(Clone, Default)]
pub struct WalletAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl WalletAdapter {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disconnected() -> Self {
        Self { provider: None }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>, WalletError> {
        self.provider.as_ref().ok_or(WalletError::NoWallet)
    }

    /// `eth_accounts`: accounts already authorized for this client, no prompt
    pub async fn list_authorized_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let result = self.provider()?.request("eth_accounts", json!([])).await?;
        parse_accounts(result)
    }

    /// `eth_requestAccounts`: asks the user to authorize and returns the chosen account
    pub async fn request_authorization(&self) -> Result<Address, WalletError> {
        let result = self
            .provider()?
            .request("eth_requestAccounts", json!([]))
            .await?;
        let account = parse_accounts(result)?.into_iter().next().ok_or_else(|| {
            WalletError::InvalidResponse("wallet authorized no accounts".to_string())
        })?;

        info!("wallet authorized account {}", account);
        Ok(account)
    }

    /// Submit a value transfer; resolves once the wallet accepts it for broadcast
    pub async fn submit_native_transfer(
        &self,
        from: Address,
        to: Address,
        value_wei: U256,
        gas_limit: u64,
    ) -> Result<B256, WalletError> {
        let request = TransactionRequest {
            from: from.to_string(),
            to: Some(to.to_string()),
            gas: Some(format!("{:#x}", gas_limit)),
            value: Some(format!("0x{:x}", value_wei)),
            data: None,
        };
        self.send_transaction(request).await
    }

    /// `eth_sendTransaction` with arbitrary parameters
    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError> {
        let params = serde_json::to_value(&request)
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
        let result = self
            .provider()?
            .request("eth_sendTransaction", json!([params]))
            .await?;
        let hash = parse_hash(&result)?;

        debug!("wallet accepted transaction {}", hash);
        Ok(hash)
    }

    /// `eth_call` against the latest block, returning the raw return data
    pub async fn call(&self, request: CallRequest) -> Result<Vec<u8>, WalletError> {
        let params = serde_json::to_value(&request)
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
        let result = self
            .provider()?
            .request("eth_call", json!([params, "latest"]))
            .await?;
        let data = result
            .as_str()
            .ok_or_else(|| WalletError::InvalidResponse(format!("eth_call returned {}", result)))?;
        decode_hex(data)
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending
    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, WalletError> {
        let result = self
            .provider()?
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        serde_json::from_value(result)
            .map(Some)
            .map_err(|e| WalletError::InvalidResponse(format!("malformed receipt: {}", e)))
    }
}

fn parse_accounts(result: Value) -> Result<Vec<Address>, WalletError> {
    let accounts: Vec<String> = serde_json::from_value(result)
        .map_err(|e| WalletError::InvalidResponse(format!("account list: {}", e)))?;
    accounts
        .iter()
        .map(|account| {
            account
                .parse::<Address>()
                .map_err(|e| WalletError::InvalidResponse(format!("account {}: {}", account, e)))
        })
        .collect()
}

fn parse_hash(result: &Value) -> Result<B256, WalletError> {
    result
        .as_str()
        .and_then(|s| s.parse::<B256>().ok())
        .ok_or_else(|| WalletError::InvalidResponse(format!("transaction hash {}", result)))
}

/// Decode a `0x`-prefixed hex payload
pub fn decode_hex(data: &str) -> Result<Vec<u8>, WalletError> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| WalletError::InvalidResponse(format!("hex data: {}", e)))
}

/// Encode bytes as `0x`-prefixed hex
pub fn encode_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wallet::testing::{MockCall, MockWallet};

    #[tokio::test]
    async fn test_no_wallet_fails_every_operation() {
        let wallet = WalletAdapter::disconnected();
        assert!(!wallet.is_available());
        assert_eq!(
            wallet.list_authorized_accounts().await,
            Err(WalletError::NoWallet)
        );
        assert_eq!(wallet.request_authorization().await, Err(WalletError::NoWallet));
        assert_eq!(
            wallet
                .submit_native_transfer(Address::ZERO, Address::ZERO, U256::ZERO, NATIVE_TRANSFER_GAS)
                .await,
            Err(WalletError::NoWallet)
        );
    }

    #[tokio::test]
    async fn test_native_transfer_params() {
        let mock = MockWallet::new();
        let wallet = WalletAdapter::new(mock.clone());
        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);

        wallet
            .submit_native_transfer(from, to, U256::from(10_000_000_000_000_000u64), NATIVE_TRANSFER_GAS)
            .await
            .expect("transfer accepted");

        let transfers = mock.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].gas.as_deref(), Some("0x5208"));
        assert_eq!(transfers[0].value.as_deref(), Some("0x2386f26fc10000"));
        assert_eq!(transfers[0].to.as_deref(), Some(to.to_string().as_str()));
        assert_eq!(transfers[0].from, from.to_string());
    }

    #[tokio::test]
    async fn test_accounts_and_rejection() {
        let mock = MockWallet::new();
        let account = Address::repeat_byte(0x42);
        mock.set_accounts(vec![account]);
        let wallet = WalletAdapter::new(mock.clone());

        assert_eq!(wallet.list_authorized_accounts().await, Ok(vec![account]));
        assert_eq!(wallet.request_authorization().await, Ok(account));

        mock.fail_on(MockCall::RequestAccounts, MockWallet::user_rejection());
        let err = wallet.request_authorization().await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_hex_helpers() {
        assert_eq!(encode_hex(&[0xde, 0xad]), "0xdead");
        assert_eq!(decode_hex("0xdead").unwrap(), vec![0xde, 0xad]);
        assert!(decode_hex("0xzz").is_err());
    }
}
