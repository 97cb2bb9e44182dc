use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue as _};
use tracing::{debug, info};

use super::bindings::{addToBlockchainCall, getAllTransactionsCall, getTransactionCountCall, TransferStruct};
use super::ContractError;
use crate::api::wallet::{encode_hex, CallRequest, TransactionReceipt, TransactionRequest, WalletAdapter};
use crate::state::AccountCell;

/// A submitted transaction that has not been confirmed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: B256,
}

/// Calls into the deployed contract, signed by the session's current account
#[derive(Clone)]
pub struct ContractProxy {
    wallet: WalletAdapter,
    address: Address,
    account: AccountCell,
    poll_interval: Duration,
}

impl ContractProxy {
    pub fn new(
        wallet: WalletAdapter,
        address: Address,
        account: AccountCell,
        poll_interval: Duration,
    ) -> Self {
        Self {
            wallet,
            address,
            account,
            poll_interval,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn signer(&self) -> Result<Address, ContractError> {
        self.account.get().ok_or(ContractError::Unavailable)
    }

    /// `addToBlockchain(to, message, amount, keyword)`
    pub async fn append_record(
        &self,
        to: Address,
        message: &str,
        amount_wei: U256,
        keyword: &str,
    ) -> Result<PendingTransaction, ContractError> {
        let from = self.signer()?;
        let call = addToBlockchainCall {
            to,
            message: message.to_string(),
            amount: amount_wei,
            keyword: keyword.to_string(),
        };

        let request = TransactionRequest {
            from: from.to_string(),
            to: Some(self.address.to_string()),
            data: Some(encode_hex(&SolCall::abi_encode(&call))),
            ..Default::default()
        };
        let hash = self.wallet.send_transaction(request).await?;

        debug!("addToBlockchain submitted as {}", hash);
        Ok(PendingTransaction { hash })
    }

    /// Wait until the transaction is mined. There is no timeout: a stalled
    /// network keeps this future pending.
    pub async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<TransactionReceipt, ContractError> {
        wait_for_receipt(&self.wallet, pending.hash, self.poll_interval).await
    }

    /// `getTransactionCount()`
    pub async fn get_record_count(&self) -> Result<u64, ContractError> {
        let data = self.view(SolCall::abi_encode(&getTransactionCountCall {})).await?;
        let count = U256::abi_decode(&data).map_err(|e| ContractError::Decode {
            function: getTransactionCountCall::SIGNATURE,
            reason: e.to_string(),
        })?;
        u64::try_from(count).map_err(|e| ContractError::Decode {
            function: getTransactionCountCall::SIGNATURE,
            reason: e.to_string(),
        })
    }

    /// `getAllTransactions()`, in contract storage order
    pub async fn list_all_records(&self) -> Result<Vec<TransferStruct>, ContractError> {
        let data = self.view(SolCall::abi_encode(&getAllTransactionsCall {})).await?;
        Vec::<TransferStruct>::abi_decode(&data).map_err(|e| ContractError::Decode {
            function: getAllTransactionsCall::SIGNATURE,
            reason: e.to_string(),
        })
    }

    /// Read-only calls do not need a signer; the current account is passed as
    /// `from` when there is one.
    async fn view(&self, calldata: Vec<u8>) -> Result<Vec<u8>, ContractError> {
        let request = CallRequest {
            from: self.account.get().map(|a| a.to_string()),
            to: self.address.to_string(),
            data: encode_hex(&calldata),
        };
        Ok(self.wallet.call(request).await?)
    }
}

/// Poll for a receipt until one exists; a failed status is a revert
pub async fn wait_for_receipt(
    wallet: &WalletAdapter,
    hash: B256,
    poll_interval: Duration,
) -> Result<TransactionReceipt, ContractError> {
    let mut polls: u64 = 0;
    loop {
        if let Some(receipt) = wallet.transaction_receipt(hash).await? {
            if !receipt.succeeded() {
                return Err(ContractError::Reverted(hash));
            }
            info!("transaction {} confirmed after {} polls", hash, polls);
            return Ok(receipt);
        }
        polls += 1;
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wallet::testing::{record, MockCall, MockWallet};
    use crate::api::wallet::WalletError;

    fn proxy(mock: &std::sync::Arc<MockWallet>, account: Option<Address>) -> ContractProxy {
        let cell = AccountCell::default();
        if let Some(account) = account {
            cell.set(account);
        }
        ContractProxy::new(
            WalletAdapter::new(mock.clone()),
            MockWallet::CONTRACT_ADDRESS,
            cell,
            Duration::from_millis(1),
        )
    }

    #[tokio::test]
    async fn test_append_requires_account() {
        let mock = MockWallet::new();
        let contract = proxy(&mock, None);

        let err = contract
            .append_record(Address::repeat_byte(2), "hi", U256::from(1u64), "greeting")
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Unavailable));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_append_encodes_call() {
        let mock = MockWallet::new();
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let contract = proxy(&mock, Some(from));

        contract
            .append_record(to, "hi", U256::from(7u64), "greeting")
            .await
            .expect("append submitted");

        let calls = mock.contract_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from, from.to_string());
        assert_eq!(
            calls[0].to.as_deref(),
            Some(MockWallet::CONTRACT_ADDRESS.to_string().as_str())
        );

        let decoded = mock.decoded_appends();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].to, to);
        assert_eq!(decoded[0].message, "hi");
        assert_eq!(decoded[0].amount, U256::from(7u64));
        assert_eq!(decoded[0].keyword, "greeting");
    }

    #[tokio::test]
    async fn test_views_work_without_account() {
        let mock = MockWallet::new();
        mock.set_record_count(3);
        mock.push_records(vec![record(1, "first"), record(2, "second")]);
        let contract = proxy(&mock, None);

        assert_eq!(contract.get_record_count().await.unwrap(), 3);
        let records = contract.list_all_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second");
    }

    #[tokio::test]
    async fn test_confirmation_polls_until_mined() {
        let mock = MockWallet::new();
        mock.set_pending_polls(3);
        let contract = proxy(&mock, Some(Address::repeat_byte(1)));

        let pending = contract
            .append_record(Address::repeat_byte(2), "m", U256::from(1u64), "k")
            .await
            .unwrap();
        let receipt = contract.await_confirmation(&pending).await.expect("mined");

        assert!(receipt.succeeded());
        assert_eq!(mock.count(MockCall::Receipt), 4);
    }

    #[tokio::test]
    async fn test_reverted_receipt() {
        let mock = MockWallet::new();
        mock.set_reverted(true);
        let contract = proxy(&mock, Some(Address::repeat_byte(1)));

        let pending = contract
            .append_record(Address::repeat_byte(2), "m", U256::from(1u64), "k")
            .await
            .unwrap();
        let err = contract.await_confirmation(&pending).await.unwrap_err();
        assert!(matches!(err, ContractError::Reverted(hash) if hash == pending.hash));
    }

    #[tokio::test]
    async fn test_wallet_errors_are_kept() {
        let mock = MockWallet::new();
        mock.fail_on(MockCall::Call, WalletError::Transport("connection refused".to_string()));
        let contract = proxy(&mock, None);

        let err = contract.get_record_count().await.unwrap_err();
        assert!(matches!(
            err,
            ContractError::Wallet(WalletError::Transport(ref msg)) if msg == "connection refused"
        ));
    }
}
