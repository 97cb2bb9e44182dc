use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::api::wallet::{HttpWalletProvider, WalletAdapter};
use crate::config::{Config, ContractConfig};
use crate::contract::ContractProxy;
use crate::db;
use crate::services::fail;
use crate::state::{AccountCell, AppState};
use crate::utils::AppError;

/// The wallet configured for this session; without an RPC URL there is none
pub fn wallet_from_config(config: &Config) -> WalletAdapter {
    match &config.rpc_url {
        Some(url) => {
            info!("using wallet provider at {}", url);
            WalletAdapter::new(Arc::new(HttpWalletProvider::new(url.clone())))
        }
        None => WalletAdapter::disconnected(),
    }
}

/// Everything a service needs, cheap to clone into tasks
#[derive(Clone)]
pub struct App {
    pub state: Arc<AppState>,
    pub wallet: WalletAdapter,
    pub contract: ContractProxy,
    pub pool: SqlitePool,
    bootstrapped: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        wallet: WalletAdapter,
        contract: ContractConfig,
        pool: SqlitePool,
        stored_count: Option<u64>,
        receipt_poll_interval: Duration,
    ) -> Self {
        let account = AccountCell::default();
        let state = Arc::new(AppState::new(account.clone(), stored_count));
        let contract = ContractProxy::new(
            wallet.clone(),
            contract.address,
            account,
            receipt_poll_interval,
        );

        Self {
            state,
            wallet,
            contract,
            pool,
            bootstrapped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open local storage and wire the wallet and contract from configuration
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let contract = config.contract()?;
        let pool = db::init_db(&config.database_url)
            .await
            .map_err(|e| fail("open local storage", e))?;
        let stored_count = db::settings::load_transaction_count(&pool)
            .await
            .map_err(|e| fail("read local storage", e))?;

        Ok(Self::new(
            wallet_from_config(config),
            contract,
            pool,
            stored_count,
            config.receipt_poll_interval,
        ))
    }

    /// Returns true the first time it is called for this session
    pub(crate) fn mark_bootstrapped(&self) -> bool {
        !self.bootstrapped.swap(true, Ordering::SeqCst)
    }
}
