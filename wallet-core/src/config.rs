// wallet-core/src/config.rs
//
// Endpoint configuration từ environment. Không có public fallback:
// thiếu WALLET_RPC_URL là lỗi ngay khi khởi tạo.

use crate::chains::SolanaCluster;
use crate::error::{ConfigError, WalletResult};
use crate::network::models::Commitment;
use crate::network::traits::DEFAULT_POLL_INTERVAL;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

pub const ENV_RPC_URL: &str = "WALLET_RPC_URL";
pub const ENV_RPC_TOKEN: &str = "WALLET_RPC_TOKEN";
pub const ENV_CLUSTER: &str = "WALLET_CLUSTER";
pub const ENV_COMMITMENT: &str = "WALLET_COMMITMENT";
pub const ENV_POLL_INTERVAL_MS: &str = "WALLET_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "WALLET_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct WalletConfig {
    rpc_url: Url,
    rpc_token: Option<String>,
    pub cluster: SolanaCluster,
    pub commitment: Commitment,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl WalletConfig {
    /// Config với endpoint tường minh, các giá trị khác mặc định
    pub fn new(rpc_url: &str, cluster: SolanaCluster) -> WalletResult<Self> {
        Ok(Self {
            rpc_url: parse_endpoint(rpc_url)?,
            rpc_token: None,
            cluster,
            commitment: Commitment::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn from_env() -> WalletResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load từ một lookup bất kỳ (test, host app), không đụng tới process env
    pub fn from_lookup<F>(lookup: F) -> WalletResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = get(ENV_RPC_URL).ok_or(ConfigError::MissingRpcEndpoint)?;

        let cluster = match get(ENV_CLUSTER) {
            Some(raw) => raw
                .parse::<SolanaCluster>()
                .map_err(|_| invalid(ENV_CLUSTER, &raw))?,
            None => SolanaCluster::default(),
        };

        let mut config = Self::new(&rpc_url, cluster)?;

        if let Some(token) = get(ENV_RPC_TOKEN) {
            config = config.with_token(token.trim());
        }
        if let Some(raw) = get(ENV_COMMITMENT) {
            let commitment = raw
                .parse::<Commitment>()
                .map_err(|_| invalid(ENV_COMMITMENT, &raw))?;
            config = config.with_commitment(commitment);
        }
        if let Some(raw) = get(ENV_POLL_INTERVAL_MS) {
            let ms = parse_positive(ENV_POLL_INTERVAL_MS, &raw)?;
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = parse_positive(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
            config.request_timeout = Duration::from_secs(secs);
        }

        tracing::debug!(
            cluster = %config.cluster,
            endpoint = %config.redacted_endpoint(),
            commitment = %config.commitment,
            "loaded wallet config"
        );
        Ok(config)
    }

    /// Provider token, gắn vào cuối path của endpoint
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.rpc_token = Some(token.into());
        self
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// URL thực sự được gọi (có token)
    pub fn endpoint(&self) -> Url {
        let mut url = self.rpc_url.clone();
        if let Some(token) = &self.rpc_token {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(token);
            }
        }
        url
    }

    /// Endpoint an toàn để log / hiển thị (không có token)
    pub fn redacted_endpoint(&self) -> String {
        let host = self.rpc_url.host_str().unwrap_or_default();
        match self.rpc_url.port() {
            Some(port) => format!("{}://{}:{}", self.rpc_url.scheme(), host, port),
            None => format!("{}://{}", self.rpc_url.scheme(), host),
        }
    }
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("endpoint", &self.redacted_endpoint())
            .field("has_token", &self.rpc_token.is_some())
            .field("cluster", &self.cluster)
            .field("commitment", &self.commitment)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_endpoint(raw: &str) -> WalletResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingRpcEndpoint.into());
    }
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidRpcEndpoint(trimmed.into()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidRpcEndpoint(trimmed.into()).into()),
    }
}

fn parse_positive(key: &str, raw: &str) -> WalletResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(key, raw).into()),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
