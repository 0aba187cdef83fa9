// wallet-core/src/network/models.rs
//
// Data Models - Ledger-facing structures cho Solana wallet
//
// Tất cả structs đều:
// - Serialize/Deserialize friendly (JSON cho host app)
// - camelCase để khớp JSON-RPC và UI
// - Clone + Debug cho flexibility

use crate::chains::solana::address::Pubkey;
use crate::chains::solana::amount::{SOL_DECIMALS, SOL_SYMBOL};
use crate::chains::solana::signer::Signature;
use crate::chains::solana::transaction::Hash;
use crate::chains::SolanaCluster;
use crate::error::{ErrorKind, WalletError};
use serde::{Deserialize, Serialize};

// =============================================================================
// NETWORK IDENTIFICATION
// =============================================================================

/// Thông tin một cluster đang kết nối
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Cluster (devnet, testnet, mainnet-beta, localnet)
    pub cluster: SolanaCluster,
    /// Tên hiển thị (e.g., "Solana Devnet")
    pub name: String,
    /// Symbol của native token
    pub native_symbol: String,
    /// Số decimals của native token
    pub native_decimals: u8,
    /// RPC endpoint đã redact token (chỉ để hiển thị)
    pub rpc_url: String,
    /// Block explorer base URL
    pub explorer_url: Option<String>,
    pub is_testnet: bool,
    /// Cluster có faucet (airdrop) không
    pub has_faucet: bool,
}

/// Mức commitment khi đọc state / chờ confirm
///
/// Thứ tự: processed < confirmed < finalized
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!("unknown commitment '{}'", other)),
        }
    }
}

// =============================================================================
// BALANCE
// =============================================================================

/// Số dư (raw + formatted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Số dư raw (string để tránh overflow với số lớn)
    pub raw: String,
    /// Số dư đã format với decimals (e.g., "1.5")
    pub formatted: String,
    /// Symbol (e.g., "SOL")
    pub symbol: String,
    /// Số decimals
    pub decimals: u8,
}

impl Balance {
    /// Tạo Balance từ raw value và decimals
    pub fn new(raw: impl Into<String>, decimals: u8, symbol: impl Into<String>) -> Self {
        let raw_str = raw.into();
        let formatted = Self::format_balance(&raw_str, decimals);
        Self {
            raw: raw_str,
            formatted,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Balance native SOL từ lamports
    pub fn lamports(lamports: u64) -> Self {
        Self::new(lamports.to_string(), SOL_DECIMALS, SOL_SYMBOL)
    }

    /// Tạo Balance với giá trị = 0
    pub fn zero(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            raw: "0".to_string(),
            formatted: "0".to_string(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Raw value dạng u64 (lamports)
    pub fn raw_u64(&self) -> Option<u64> {
        self.raw.parse().ok()
    }

    /// Format raw balance thành human-readable string
    fn format_balance(raw: &str, decimals: u8) -> String {
        if decimals == 0 || raw == "0" {
            return raw.to_string();
        }

        let raw_len = raw.len();
        let decimals_usize = decimals as usize;

        if raw_len <= decimals_usize {
            // Số nhỏ hơn 1 (e.g., 0.001)
            let padding = decimals_usize - raw_len;
            let decimal_part = format!("{}{}", "0".repeat(padding), raw);
            let trimmed = decimal_part.trim_end_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                format!("0.{}", trimmed)
            }
        } else {
            let integer_part = &raw[..raw_len - decimals_usize];
            let decimal_part = &raw[raw_len - decimals_usize..];
            let trimmed_decimal = decimal_part.trim_end_matches('0');
            if trimmed_decimal.is_empty() {
                integer_part.to_string()
            } else {
                format!("{}.{}", integer_part, trimmed_decimal)
            }
        }
    }
}

/// Số dư gắn với một account trong registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub index: u32,
    pub address: Pubkey,
    pub balance: Balance,
}

// =============================================================================
// ANCHOR & SIGNATURE STATUS
// =============================================================================

/// Recent blockhash + block height cuối cùng mà transaction còn hợp lệ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl RecentBlockhash {
    /// Hết hạn khi block height vượt quá last valid height
    pub fn is_expired_at(&self, block_height: u64) -> bool {
        block_height > self.last_valid_block_height
    }
}

/// Một phần tử của `getSignatureStatuses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` khi đã rooted
    pub confirmations: Option<u64>,
    /// Lỗi on-chain (transaction đã land nhưng thất bại)
    pub err: Option<serde_json::Value>,
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Commitment thực tế đạt được
    pub fn commitment(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(status), _) => status,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Processed,
        }
    }

    pub fn reached(&self, target: Commitment) -> bool {
        self.commitment() >= target
    }

    /// Trạng thái so với commitment mục tiêu. Lỗi on-chain luôn là `Failed`.
    pub fn status(&self, target: Commitment) -> TransactionStatus {
        if self.err.is_some() {
            TransactionStatus::Failed
        } else if self.reached(target) {
            TransactionStatus::Confirmed
        } else {
            TransactionStatus::Pending
        }
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Trạng thái giao dịch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Đang chờ xác nhận
    Pending,
    /// Đã đạt commitment mục tiêu
    Confirmed,
    /// Thất bại
    Failed,
    /// Blockhash hết hạn trước khi confirm
    Expired,
}

/// Transaction Receipt (kết quả sau khi submit + confirm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Chữ ký đầu tiên, cũng là transaction id
    pub signature: Signature,
    pub status: TransactionStatus,
    pub slot: Option<u64>,
    pub confirmation_status: Option<Commitment>,
    /// Explorer URL
    pub explorer_url: Option<String>,
}

// =============================================================================
// ACCOUNT & ADDRESS
// =============================================================================

/// Thông tin account công khai (không có secret) cho UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Địa chỉ base58
    pub address: String,
    pub derivation_path: String,
    pub index: u32,
}

/// Kết quả validation địa chỉ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressValidation {
    /// Có hợp lệ không
    pub is_valid: bool,
    /// Địa chỉ đã normalize (trim)
    pub normalized: Option<String>,
    /// Lý do không hợp lệ (nếu có)
    pub error: Option<String>,
}

// =============================================================================
// NETWORK STATUS
// =============================================================================

/// Trạng thái mạng
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// Có đang hoạt động không
    pub is_online: bool,
    /// Block height mới nhất
    pub block_height: u64,
    /// Latency (ms)
    pub latency_ms: u64,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error response cho host app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error category (inputValidation, network, expiry, ...)
    pub code: ErrorKind,
    /// Human-readable message
    pub message: String,
    pub retryable: bool,
}

impl From<&WalletError> for ApiError {
    fn from(err: &WalletError) -> Self {
        Self {
            code: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
