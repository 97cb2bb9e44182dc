use crate::app::App;
use crate::services::history_service;
use crate::utils::AppError;

pub async fn execute(app: &App) -> Result<(), AppError> {
    // bootstrap may already have loaded the list
    let records = if app.state.transactions_loaded() {
        app.state.transactions()
    } else {
        history_service::refresh(app).await?
    };

    println!("{}", history_service::render_history(&records));
    Ok(())
}
