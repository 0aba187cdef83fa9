//! HD wallet core
//!
//! 12-word BIP-39 phrase -> SLIP-0010 ed25519 accounts (`m/44'/501'/i'/0'`)
//! -> Solana transfer build/sign -> JSON-RPC submit + confirm.

pub mod api;
pub mod chains;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod network;
pub mod wallet;

pub use config::WalletConfig;
pub use error::{ErrorKind, WalletError, WalletResult};
