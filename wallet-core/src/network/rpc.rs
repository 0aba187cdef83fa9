// wallet-core/src/network/rpc.rs
//
// JSON-RPC 2.0 client over HTTPS (reqwest)

use crate::chains::solana::address::Pubkey;
use crate::chains::solana::signer::Signature;
use crate::chains::solana::transaction::SignedTransaction;
use crate::config::WalletConfig;
use crate::error::{ConfigError, NetworkError, WalletResult};
use crate::network::models::{Commitment, NetworkInfo, RecentBlockhash, SignatureStatus};
use crate::network::traits::{FaucetProvider, LedgerClient};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper của các method có context
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Client cho một endpoint duy nhất
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    network: NetworkInfo,
    commitment: Commitment,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("cluster", &self.network.cluster)
            .field("endpoint", &self.network.rpc_url)
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    pub fn new(config: &WalletConfig) -> WalletResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            network: config.cluster.network_info(config.redacted_endpoint()),
            commitment: config.commitment,
            poll_interval: config.poll_interval,
            next_id: AtomicU64::new(1),
        })
    }

    /// Gọi một method, decode `result` thành `T`
    ///
    /// Non-2xx -> `Http`, payload `error` -> `Rpc`, thiếu `result` -> `Decode`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> WalletResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        tracing::debug!(method, id, "rpc request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(method, id, status = status.as_u16(), "rpc http failure");
            return Err(NetworkError::Http {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let envelope: RpcResponse<T> = response.json().await?;
        if let Some(error) = envelope.error {
            tracing::warn!(method, id, code = error.code, message = %error.message, "rpc error");
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
            }
            .into());
        }
        envelope
            .result
            .ok_or_else(|| NetworkError::Decode(format!("{}: missing result", method)).into())
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }
}

fn parse_signature(method: &str, raw: &str) -> WalletResult<Signature> {
    raw.parse::<Signature>()
        .map_err(|_| NetworkError::Decode(format!("{}: invalid signature '{}'", method, raw)).into())
}

#[async_trait]
impl LedgerClient for RpcClient {
    fn network_info(&self) -> &NetworkInfo {
        &self.network
    }

    fn commitment(&self) -> Commitment {
        self.commitment
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> WalletResult<u64> {
        let res: WithContext<u64> = self
            .call(
                "getBalance",
                json!([pubkey.to_string(), self.commitment_config()]),
            )
            .await?;
        Ok(res.value)
    }

    async fn get_latest_blockhash(&self) -> WalletResult<RecentBlockhash> {
        let res: WithContext<RecentBlockhash> = self
            .call("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;
        tracing::debug!(
            blockhash = %res.value.blockhash,
            last_valid_block_height = res.value.last_valid_block_height,
            "fetched anchor"
        );
        Ok(res.value)
    }

    async fn get_block_height(&self) -> WalletResult<u64> {
        self.call("getBlockHeight", json!([self.commitment_config()]))
            .await
    }

    async fn send_transaction(&self, transaction: &SignedTransaction) -> WalletResult<Signature> {
        let encoded = transaction.to_base64()?;
        let raw: String = self
            .call(
                "sendTransaction",
                json!([
                    encoded,
                    {
                        "encoding": "base64",
                        "preflightCommitment": self.commitment.as_str(),
                    }
                ]),
            )
            .await?;
        parse_signature("sendTransaction", &raw)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> WalletResult<Option<SignatureStatus>> {
        let res: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;
        Ok(res.value.into_iter().next().flatten())
    }

    fn faucet(&self) -> Option<&dyn FaucetProvider> {
        if self.network.has_faucet {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl FaucetProvider for RpcClient {
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> WalletResult<Signature> {
        let raw: String = self
            .call(
                "requestAirdrop",
                json!([pubkey.to_string(), lamports, self.commitment_config()]),
            )
            .await?;
        parse_signature("requestAirdrop", &raw)
    }
}
