//! Data models for the client's commands and services
//!
//! Each model is either user input staged before a service call or the
//! display-ready output of one.

pub mod deploy;
pub mod send;
pub mod session;
pub mod transaction;

pub use deploy::DeployResult;
pub use send::SendResult;
pub use session::SessionReport;
pub use transaction::{FormData, FormField, TransactionRecord};
