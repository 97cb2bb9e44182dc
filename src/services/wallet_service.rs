use alloy_primitives::Address;
use tracing::{info, warn};

use crate::app::App;
use crate::services::fail;
use crate::utils::AppError;

/// Every wallet-dependent operation starts here: a session without a wallet
/// provider gets [`AppError::NoWallet`] before anything is sent.
pub fn require_wallet(app: &App, operation: &str) -> Result<(), AppError> {
    if app.wallet.is_available() {
        Ok(())
    } else {
        warn!("cannot {}: no wallet provider", operation);
        Err(AppError::NoWallet)
    }
}

/// Ask the wallet to authorize an account and adopt it for the session
pub async fn connect_wallet(app: &App) -> Result<Address, AppError> {
    require_wallet(app, "connect the wallet")?;

    let account = app
        .wallet
        .request_authorization()
        .await
        .map_err(|e| fail("connect the wallet", e))?;

    app.state.set_current_account(account);
    info!("connected account {}", account);
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wallet::testing::{MockCall, MockWallet};
    use crate::app::testing::{mock_app, walletless_app};
    use crate::state::StateEvent;
    use crate::utils::ErrorKind;

    #[tokio::test]
    async fn test_connect_adopts_account() {
        let (app, mock) = mock_app().await;
        let account = Address::repeat_byte(0xaa);
        mock.set_accounts(vec![account, Address::repeat_byte(0xbb)]);
        let mut events = app.state.subscribe();

        assert_eq!(connect_wallet(&app).await.unwrap(), account);
        assert_eq!(app.state.current_account(), Some(account));
        assert_eq!(events.recv().await.unwrap(), StateEvent::AccountChanged(account));
    }

    #[tokio::test]
    async fn test_connect_rejected_by_user() {
        let (app, mock) = mock_app().await;
        mock.fail_on(MockCall::RequestAccounts, MockWallet::user_rejection());

        let err = connect_wallet(&app).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WalletRejection);
        assert_eq!(app.state.current_account(), None);
    }

    #[tokio::test]
    async fn test_connect_without_wallet() {
        let app = walletless_app().await;
        assert!(matches!(connect_wallet(&app).await, Err(AppError::NoWallet)));
    }
}
