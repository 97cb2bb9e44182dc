use clap::Args;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::watch;

use crate::app::App;
use crate::models::{FormField, SendResult};
use crate::services::{history_service, transaction_service};
use crate::state::{StateEvent, SubmissionStage};
use crate::utils::{format_ether, AppError};

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Recipient address
    #[arg(long)]
    pub to: String,
    /// Amount in ether, e.g. 0.01
    #[arg(long)]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub keyword: String,
    #[arg(long, default_value = "")]
    pub message: String,
}

pub async fn execute(app: &App, args: SendArgs) -> Result<(), AppError> {
    app.state.set_form_field(FormField::Recipient, args.to);
    app.state.set_form_field(FormField::Amount, args.amount);
    app.state.set_form_field(FormField::Keyword, args.keyword);
    app.state.set_form_field(FormField::Message, args.message);

    let mut events = app.state.subscribe();
    let progress = tokio::spawn(report_progress(app.state.watch_stage()));
    let result = transaction_service::send_transaction(app).await;
    progress.abort();
    let result = result?;
    println!("{}", describe(&result));

    if invalidated(&mut events) {
        let records = history_service::refresh(app).await?;
        println!("{}", history_service::render_history(&records));
    }
    Ok(())
}

async fn report_progress(mut stages: watch::Receiver<SubmissionStage>) {
    while stages.changed().await.is_ok() {
        let stage = *stages.borrow_and_update();
        match stage {
            SubmissionStage::SubmittingWallet => println!("Confirm the transfer in your wallet..."),
            SubmissionStage::SubmittingContract => println!("Confirm the record in your wallet..."),
            SubmissionStage::Confirming => println!("⏳ Waiting for the record to be mined..."),
            SubmissionStage::Idle => {}
        }
    }
}

fn invalidated(events: &mut tokio::sync::broadcast::Receiver<StateEvent>) -> bool {
    loop {
        match events.try_recv() {
            Ok(StateEvent::Invalidated) => return true,
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return false,
        }
    }
}

fn describe(result: &SendResult) -> String {
    format!(
        "✅ Sent {} ETH from {} to {}\n   transfer: {}\n   record:   {}\n   {} transactions recorded",
        format_ether(result.amount_wei),
        result.from,
        result.to,
        result.transfer_hash,
        result.record_hash,
        result.transaction_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};

    #[test]
    fn test_describe_send() {
        let result = SendResult {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            amount_wei: U256::from(1_500_000_000_000_000_000u64),
            transfer_hash: B256::repeat_byte(3),
            record_hash: B256::repeat_byte(4),
            transaction_count: 9,
        };
        let text = describe(&result);
        assert!(text.starts_with("✅ Sent 1.5 ETH from 0x0101"));
        assert!(text.ends_with("9 transactions recorded"));
    }

    #[tokio::test]
    async fn test_send_reloads_history() {
        let (app, mock) = crate::app::testing::mock_app().await;
        app.state.set_current_account(Address::repeat_byte(0x11));
        mock.push_records(vec![crate::api::wallet::testing::record(1, "hi")]);

        let args = SendArgs {
            to: Address::repeat_byte(0x22).to_string(),
            amount: "0.01".to_string(),
            keyword: "kw".to_string(),
            message: "hi".to_string(),
        };
        execute(&app, args).await.unwrap();

        assert_eq!(app.state.form().keyword, "kw");
        assert_eq!(app.state.transactions().len(), 1);
    }
}
