pub mod connect;
pub mod count;
pub mod deploy;
pub mod history;
pub mod send;
pub mod status;

use clap::Subcommand;
use tracing::{error, info, warn};

use crate::app::App;
use crate::config::Config;
use crate::models::SessionReport;
use crate::services::session_service;
use crate::utils::{AppError, ErrorKind};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask the wallet to authorize an account
    Connect,
    /// Transfer ether and record the transfer in the contract
    Send(send::SendArgs),
    /// List every recorded transaction
    History,
    /// Show the transaction count mirrored from the contract
    Count,
    /// Show the session: wallet, account, count and records
    Status,
    /// Deploy the Transactions contract from a compiled artifact
    Deploy(deploy::DeployArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Connect => "connect",
            Command::Send(_) => "send",
            Command::History => "history",
            Command::Count => "count",
            Command::Status => "status",
            Command::Deploy(_) => "deploy",
        }
    }
}

/// Run one command to completion; errors are printed here and reported as
/// a failed run to the caller.
pub async fn handle_command(command: Command, config: &Config) -> bool {
    let name = command.name();
    info!("running command: {}", name);

    match run(command, config).await {
        Ok(()) => true,
        Err(e) => {
            match e.kind() {
                ErrorKind::NoWallet | ErrorKind::WalletRejection => warn!("{} failed: {}", name, e),
                _ => error!("{} failed: {}", name, e),
            }
            eprintln!("{}", e.user_message());
            false
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<(), AppError> {
    // deploying happens before there is a contract to talk to
    let command = match command {
        Command::Deploy(args) => return deploy::execute(config, &args).await,
        other => other,
    };

    let app = App::from_config(config).await?;
    let report = session_service::bootstrap(&app).await?;
    print_bootstrap_warnings(&report);

    match command {
        Command::Connect => connect::execute(&app).await,
        Command::Send(args) => send::execute(&app, args).await,
        Command::History => history::execute(&app).await,
        Command::Count => count::execute(&app),
        Command::Status => status::execute(&app, &report),
        Command::Deploy(_) => unreachable!("deploy runs without a session"),
    }
}

/// The session still opens when a bootstrap step fails; say what is missing
fn print_bootstrap_warnings(report: &SessionReport) {
    if let Err(e) = &report.account {
        eprintln!("{}", e.user_message());
    }
    if let Err(e) = &report.transaction_count {
        // with no wallet the account step already said so
        if !matches!(e, AppError::NoWallet) || report.account.is_ok() {
            eprintln!("{}", e.user_message());
        }
    }
}
