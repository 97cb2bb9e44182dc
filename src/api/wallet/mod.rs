pub mod adapter;
pub mod client;
pub mod models;
#[cfg(test)]
pub mod testing;

pub use adapter::{decode_hex, encode_hex, WalletAdapter, NATIVE_TRANSFER_GAS};
pub use client::HttpWalletProvider;
pub use models::{CallRequest, TransactionReceipt, TransactionRequest, WalletError};
