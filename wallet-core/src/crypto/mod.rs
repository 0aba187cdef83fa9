// wallet-core/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! - **Mnemonic Generation**: 12-word BIP-39 phrases and seeds via [`WalletMnemonic`] / [`Seed`].
//! - **Key Derivation**: SLIP-0010 ed25519 account derivation via [`KeyDeriver`].
//! - **Derivation Paths**: typed, fully hardened `m/44'/501'/account'/0'` via [`DerivationPath`].

pub mod key_deriver;
pub mod mnemonic;
pub mod paths;

// Re-exports for cleaner API access
pub use key_deriver::{Ed25519Deriver, KeyDeriver};
pub use mnemonic::{Seed, WalletMnemonic};
pub use paths::DerivationPath;
