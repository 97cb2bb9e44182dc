//! Session state shared by the services and observed by the UI

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use alloy_primitives::Address;
use tokio::sync::{broadcast, watch};

use crate::models::{FormData, FormField, TransactionRecord};

/// Shared slot for the current account; cloned into the contract proxy so
/// contract calls are signed by whoever the session adopted.
#[derive(Clone, Default)]
pub struct AccountCell(Arc<RwLock<Option<Address>>>);

impl AccountCell {
    pub fn get(&self) -> Option<Address> {
        *self.0.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, account: Address) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = Some(account);
    }
}

/// Where a submission currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    SubmittingWallet,
    SubmittingContract,
    Confirming,
}

/// Notifications for views; `Invalidated` asks them to reload everything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    AccountChanged(Address),
    RecordsReplaced(usize),
    TransactionCountChanged(u64),
    Invalidated,
}

const EVENT_CAPACITY: usize = 32;

pub struct AppState {
    account: AccountCell,
    form: Mutex<FormData>,
    stage: watch::Sender<SubmissionStage>,
    transactions: RwLock<Arc<Vec<TransactionRecord>>>,
    transactions_loaded: AtomicBool,
    transaction_count: RwLock<Option<u64>>,
    events: broadcast::Sender<StateEvent>,
}

impl AppState {
    /// `stored_count` is the last count persisted locally, if any
    pub fn new(account: AccountCell, stored_count: Option<u64>) -> Self {
        let (stage, _) = watch::channel(SubmissionStage::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            account,
            form: Mutex::new(FormData::default()),
            stage,
            transactions: RwLock::new(Arc::new(Vec::new())),
            transactions_loaded: AtomicBool::new(false),
            transaction_count: RwLock::new(stored_count),
            events,
        }
    }

    pub fn current_account(&self) -> Option<Address> {
        self.account.get()
    }

    pub fn set_current_account(&self, account: Address) {
        self.account.set(account);
        self.emit(StateEvent::AccountChanged(account));
    }

    pub fn form(&self) -> FormData {
        self.form.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_form_field(&self, field: FormField, value: impl Into<String>) {
        self.form
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set(field, value);
    }

    pub fn stage(&self) -> SubmissionStage {
        *self.stage.borrow()
    }

    pub fn set_stage(&self, stage: SubmissionStage) {
        self.stage.send_replace(stage);
    }

    pub fn watch_stage(&self) -> watch::Receiver<SubmissionStage> {
        self.stage.subscribe()
    }

    /// True while a submitted record waits for confirmation
    pub fn is_loading(&self) -> bool {
        self.stage() == SubmissionStage::Confirming
    }

    /// Snapshot of the record list; never a mix of two fetches
    pub fn transactions(&self) -> Arc<Vec<TransactionRecord>> {
        self.transactions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swap in a whole new list and return it
    pub fn replace_transactions(&self, records: Vec<TransactionRecord>) -> Arc<Vec<TransactionRecord>> {
        let records = Arc::new(records);
        *self
            .transactions
            .write()
            .unwrap_or_else(|e| e.into_inner()) = records.clone();
        self.transactions_loaded.store(true, Ordering::SeqCst);
        self.emit(StateEvent::RecordsReplaced(records.len()));
        records
    }

    /// False until a fetch has succeeded; an empty list may just mean nothing was loaded
    pub fn transactions_loaded(&self) -> bool {
        self.transactions_loaded.load(Ordering::SeqCst)
    }

    pub fn transaction_count(&self) -> Option<u64> {
        *self
            .transaction_count
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_transaction_count(&self, count: u64) {
        *self
            .transaction_count
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(count);
        self.emit(StateEvent::TransactionCountChanged(count));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    pub fn emit(&self, event: StateEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
