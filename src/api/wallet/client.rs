use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{RpcRequest, RpcResponse, WalletError};

/// An EIP-1193 style wallet: a single `request` entry point taking a method name
/// and positional params.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;
}

/// Wallet provider reached over JSON-RPC on HTTP (a wallet bridge or a
/// development node with unlocked accounts)
pub struct HttpWalletProvider {
    http_client: HttpClient,
    url: String,
    next_id: AtomicU64,
}

impl HttpWalletProvider {
    pub fn new(url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
            next_id: AtomicU64::new(1),
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = RpcRequest::new(id, method, params);
        debug!("wallet request #{} {}", id, method);

        let response = self
            .http_client
            .post(&self.url)
            .headers(Self::create_headers())
            .json(&payload)
            .send()
            .await
            .map_err(|e| WalletError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| WalletError::Transport(format!("Failed to read response: {}", e)))?;

        // JSON-RPC servers may report errors with a non-2xx status and a valid envelope
        let envelope = serde_json::from_str::<RpcResponse>(&body_text);
        match envelope {
            Ok(envelope) => envelope.into_result(id),
            Err(e) if status.is_success() => Err(WalletError::InvalidResponse(format!(
                "Failed to parse response to {}: {}",
                method, e
            ))),
            Err(_) => {
                warn!("wallet HTTP error {} on {}: {}", status.as_u16(), method, body_text);
                Err(WalletError::Transport(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body_text
                )))
            }
        }
    }
}
