// src/chains/mod.rs
pub mod solana;

use crate::chains::solana::amount::{SOL_DECIMALS, SOL_SYMBOL};
use crate::network::models::NetworkInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EXPLORER_URL: &str = "https://explorer.solana.com";

// Danh mục cluster. RPC URL công khai chỉ để hiển thị, client luôn
// dùng endpoint đã cấu hình.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolanaCluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl SolanaCluster {
    pub const ALL: [SolanaCluster; 4] = [
        SolanaCluster::Devnet,
        SolanaCluster::Testnet,
        SolanaCluster::MainnetBeta,
        SolanaCluster::Localnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
            Self::Localnet => "localnet",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Devnet => "Solana Devnet",
            Self::Testnet => "Solana Testnet",
            Self::MainnetBeta => "Solana Mainnet Beta",
            Self::Localnet => "Local Validator",
        }
    }

    pub fn public_rpc_url(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Mainnet không có faucet
    pub fn has_faucet(&self) -> bool {
        !matches!(self, Self::MainnetBeta)
    }

    pub fn is_testnet(&self) -> bool {
        !matches!(self, Self::MainnetBeta)
    }

    fn explorer_query(&self) -> &'static str {
        match self {
            Self::Devnet => "?cluster=devnet",
            Self::Testnet => "?cluster=testnet",
            Self::MainnetBeta => "",
            Self::Localnet => "?cluster=custom&customUrl=http%3A%2F%2F127.0.0.1%3A8899",
        }
    }

    pub fn explorer_tx_url(&self, signature: impl fmt::Display) -> String {
        format!("{}/tx/{}{}", EXPLORER_URL, signature, self.explorer_query())
    }

    pub fn explorer_address_url(&self, address: impl fmt::Display) -> String {
        format!("{}/address/{}{}", EXPLORER_URL, address, self.explorer_query())
    }

    /// NetworkInfo cho cluster này với endpoint (đã redact) đang dùng
    pub fn network_info(&self, rpc_url: impl Into<String>) -> NetworkInfo {
        NetworkInfo {
            cluster: *self,
            name: self.display_name().to_string(),
            native_symbol: SOL_SYMBOL.to_string(),
            native_decimals: SOL_DECIMALS,
            rpc_url: rpc_url.into(),
            explorer_url: Some(EXPLORER_URL.to_string()),
            is_testnet: self.is_testnet(),
            has_faucet: self.has_faucet(),
        }
    }
}

impl fmt::Display for SolanaCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolanaCluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Self::MainnetBeta),
            "localnet" | "localhost" => Ok(Self::Localnet),
            other => Err(format!("unknown cluster '{}'", other)),
        }
    }
}
