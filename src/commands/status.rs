use crate::app::App;
use crate::models::SessionReport;
use crate::utils::AppError;

pub fn execute(app: &App, report: &SessionReport) -> Result<(), AppError> {
    println!("{}", describe(app, report));
    Ok(())
}

fn describe(app: &App, report: &SessionReport) -> String {
    let wallet = if app.wallet.is_available() { "available" } else { "not found" };
    let account = app
        .state
        .current_account()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "not connected".to_string());
    let count = app
        .state
        .transaction_count()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let loaded = if app.state.transactions_loaded() {
        app.state.transactions().len().to_string()
    } else {
        "not loaded".to_string()
    };

    [
        format!("Wallet:       {}", wallet),
        format!("Account:      {}", account),
        format!("Contract:     {}", app.contract.address()),
        format!("Transactions: {}", count),
        format!("Loaded:       {}", loaded),
        format!("Loading:      {}", if app.state.is_loading() { "yes" } else { "no" }),
        format!("Session:      {}", if report.is_ready() { "ready" } else { "degraded" }),
    ]
    .join("\n")
}
