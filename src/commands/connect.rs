use crate::app::App;
use crate::services::{history_service, wallet_service};
use crate::utils::AppError;

pub async fn execute(app: &App) -> Result<(), AppError> {
    let account = wallet_service::connect_wallet(app).await?;
    println!("✅ Connected {}", account);

    let records = history_service::refresh(app).await?;
    println!("{} transactions recorded", records.len());
    Ok(())
}
