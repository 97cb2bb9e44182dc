use std::sync::Arc;

use tracing::debug;

use crate::app::App;
use crate::models::TransactionRecord;
use crate::services::fail;
use crate::services::wallet_service::require_wallet;
use crate::utils::{AppError, Table};

/// Fetch every record from the contract and replace the in-memory list in one swap
pub async fn refresh(app: &App) -> Result<Arc<Vec<TransactionRecord>>, AppError> {
    require_wallet(app, "list transactions")?;

    let raw = app
        .contract
        .list_all_records()
        .await
        .map_err(|e| fail("list transactions", e))?;

    let records: Vec<TransactionRecord> = raw.into_iter().map(TransactionRecord::from_raw).collect();
    debug!("fetched {} transaction records", records.len());

    Ok(app.state.replace_transactions(records))
}

/// Render records as a table, newest last (contract order)
pub fn render_history(records: &[TransactionRecord]) -> String {
    if records.is_empty() {
        return "No transactions found".to_string();
    }

    let mut table = Table::new(vec!["From", "To", "Amount", "Keyword", "Message", "Time"]);
    for record in records {
        table.add_row(vec![
            shorten_address(&record.address_from.to_string()),
            shorten_address(&record.address_to.to_string()),
            format!("{} ETH", record.amount),
            record.keyword.clone(),
            record.message.clone(),
            record.timestamp.clone(),
        ]);
    }
    table.render()
}

/// "0x5fbDB2315678afecb367f032d93F642f64180aa3" -> "0x5fbD...0aa3"
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
