use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Transaction Error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("State Error: {0}")]
    State(#[from] StateError),

    #[error("Network Error: {0}")]
    Network(#[from] NetworkError),

    /// Anchor hết hạn trước khi giao dịch được confirm.
    /// Cần build lại với blockhash mới, KHÔNG gửi lại payload cũ.
    #[error(
        "Transaction {signature} expired: block height {block_height} exceeded last valid height {last_valid_block_height}"
    )]
    Expired {
        signature: String,
        last_valid_block_height: u64,
        block_height: u64,
    },

    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Bất biến nội bộ bị vi phạm
    #[error("Internal Error: {0}")]
    Internal(String),
}

/// Phân loại lỗi thô, dùng để UI quyết định cách phục hồi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Input sai (word count, checksum, recipient, amount). Không retry.
    InputValidation,
    /// Thiếu điều kiện tiên quyết (chưa có seed, thiếu signer).
    State,
    /// HTTP / RPC / timeout. Retry bằng một attempt mới.
    Network,
    /// Anchor hết hạn. Rebuild với anchor mới.
    Expiry,
    Configuration,
    Internal,
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Mnemonic(MnemonicError::Bip39Error(_)) => ErrorKind::Internal,
            WalletError::Mnemonic(_) => ErrorKind::InputValidation,
            WalletError::Crypto(CryptoError::InvalidPath(_)) => ErrorKind::InputValidation,
            WalletError::Crypto(_) => ErrorKind::Internal,
            WalletError::Transaction(TransactionError::MissingSigner(_)) => ErrorKind::State,
            WalletError::Transaction(TransactionError::Encoding(_)) => ErrorKind::Internal,
            WalletError::Transaction(_) => ErrorKind::InputValidation,
            WalletError::State(_) => ErrorKind::State,
            WalletError::Network(_) => ErrorKind::Network,
            WalletError::Expired { .. } => ErrorKind::Expiry,
            WalletError::Config(_) => ErrorKind::Configuration,
            WalletError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Chỉ lỗi mạng mới có thể thử lại (bằng attempt mới, anchor mới)
    pub fn is_retryable(&self) -> bool {
        match self {
            WalletError::Network(NetworkError::TransactionFailed { .. }) => false,
            WalletError::Network(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: {0}. Expected 12 words.")]
    InvalidWordCount(usize),

    #[error("Word '{word}' at position {position} not found in the BIP39 wordlist.")]
    UnknownWord { word: String, position: usize },

    #[error("Checksum validation failed.")]
    ChecksumMismatch,

    #[error("BIP39 internal error: {0}")]
    Bip39Error(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid recipient '{0}': expected a base58 encoded 32-byte public key")]
    InvalidRecipient(String),

    #[error("Invalid amount '{0}': must be a positive decimal number")]
    InvalidAmount(String),

    #[error("Amount '{0}' overflows the lamport range")]
    AmountOverflow(String),

    #[error("Missing signature for required signer {0}")]
    MissingSigner(String),

    #[error("Serialization failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("No seed loaded. Generate or restore a recovery phrase first.")]
    NoSeedLoaded,

    #[error("No account with index {0}")]
    UnknownAccount(u32),

    #[error("Account index {0} is outside the hardened range")]
    IndexOutOfRange(u32),

    #[error("Invalid send transition {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed RPC response: {0}")]
    Decode(String),

    #[error("Transaction {signature} failed on-chain: {reason}")]
    TransactionFailed { signature: String, reason: String },
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_decode() {
            NetworkError::Decode(err.to_string())
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        WalletError::Network(err.into())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RPC endpoint not configured (set WALLET_RPC_URL)")]
    MissingRpcEndpoint,

    #[error("Invalid RPC endpoint '{0}'")]
    InvalidRpcEndpoint(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),
}
