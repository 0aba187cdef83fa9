// wallet-core/src/crypto/key_deriver/mod.rs
//
// Key Derivation Engine - ed25519 accounts
//
// Kiến trúc:
// ┌──────────────────────────────────────────────┐
// │  Seed (64 bytes from BIP-39 Mnemonic)        │
// │                    │                         │
// │                    ▼                         │
// │  SLIP-0010 ed25519: m/44'/501'/account'/0'   │
// │                    │                         │
// │                    ▼                         │
// │  32-byte key → SigningKey (RFC 8032)         │
// │                    │                         │
// │                    ▼                         │
// │  Account { index, pubkey, secret (64B) }     │
// └──────────────────────────────────────────────┘

pub mod ed25519;

// Re-exports
pub use ed25519::Ed25519Deriver;

use crate::crypto::mnemonic::Seed;
use crate::crypto::paths::DerivationPath;
use crate::error::WalletResult;
use crate::wallet::account::Account;

// =============================================================================
// UNIFIED DERIVER
// =============================================================================
/// Key Deriver - entry point cho account derivation
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derive account `index` từ seed
    ///
    /// Pure function: cùng seed + index luôn cho cùng keypair trên mọi platform.
    pub fn derive_account(seed: &Seed, index: u32) -> WalletResult<Account> {
        let path = DerivationPath::account(index)?;
        let signing_key = Ed25519Deriver::derive_signing_key(seed.as_bytes(), &path)?;
        Ok(Account::new(index, path, signing_key))
    }

    /// Derive nhiều accounts liên tiếp (VD: quét lại ví khi recovery)
    pub fn derive_batch(
        seed: &Seed,
        indices: std::ops::Range<u32>,
    ) -> WalletResult<Vec<Account>> {
        indices
            .map(|index| Self::derive_account(seed, index))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
