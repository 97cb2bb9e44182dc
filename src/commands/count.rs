use crate::app::App;
use crate::utils::AppError;

pub fn execute(app: &App) -> Result<(), AppError> {
    match app.state.transaction_count() {
        Some(count) => println!("{}", count),
        None => println!("Transaction count unknown"),
    }
    Ok(())
}
