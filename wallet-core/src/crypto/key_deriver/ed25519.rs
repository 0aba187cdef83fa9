// wallet-core/src/crypto/key_deriver/ed25519.rs
//
// Ed25519 Key Derivation - SLIP-0010 Standard
//
// Algorithm: HMAC-SHA512 (khác BIP-32, chỉ hỗ trợ hardened derivation)
// Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md
//
// QUAN TRỌNG: SLIP-0010 cho ed25519 CHỈ hỗ trợ hardened child derivation.
// VD: m/44'/501'/0'/0' (OK)    m/44'/501'/0'/0 (INVALID)

use crate::crypto::paths::{DerivationPath, HARDENED_OFFSET};
use crate::error::{CryptoError, WalletResult};
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

type HmacSha512 = Hmac<Sha512>;

/// Một node trong cây derivation: (private key, chain code)
type Node = (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>);

/// Ed25519 Key Deriver - SLIP-0010 Standard
///
/// # Khác biệt với secp256k1 (BIP-32)
/// - Master key seed: "ed25519 seed" (thay vì "Bitcoin seed")
/// - Chỉ hỗ trợ hardened derivation (index >= 2^31)
/// - Không cần validate key range (ed25519 key là bất kỳ 32 bytes)
///
/// # Security
/// - HMAC-SHA512 cho mỗi level derivation
/// - Private key + chain code tự động zeroize
pub struct Ed25519Deriver;

impl Ed25519Deriver {
    /// SLIP-0010 master key seed constant
    const MASTER_SECRET: &'static [u8] = b"ed25519 seed";

    /// Derive ed25519 private key (32 bytes) cho account path
    pub fn derive(seed: &[u8], path: &DerivationPath) -> WalletResult<Zeroizing<[u8; 32]>> {
        Self::derive_indices(seed, &path.segments())
    }

    /// Derive theo chuỗi index bất kỳ (tất cả được ép hardened)
    ///
    /// Dùng cho path không phải account path chuẩn, VD test vectors SLIP-0010.
    pub fn derive_indices(seed: &[u8], indices: &[u32]) -> WalletResult<Zeroizing<[u8; 32]>> {
        let (key, _chain_code) = Self::derive_node(seed, indices)?;
        Ok(key)
    }

    /// Derive key + dựng Ed25519 signing key (RFC 8032 seed expansion)
    pub fn derive_signing_key(seed: &[u8], path: &DerivationPath) -> WalletResult<SigningKey> {
        let key = Self::derive(seed, path)?;
        Ok(SigningKey::from_bytes(&key))
    }

    fn derive_node(seed: &[u8], indices: &[u32]) -> WalletResult<Node> {
        Self::validate_seed(seed)?;

        // Step 1: Master key generation
        // I = HMAC-SHA512(Key = "ed25519 seed", Data = seed)
        let (mut key, mut chain_code) = Self::hmac_split(Self::MASTER_SECRET, &[seed])?;

        // Step 2: Child key derivation (mỗi level)
        // I = HMAC-SHA512(Key = chain_code, Data = 0x00 || key || index)
        for &index in indices {
            if index >= HARDENED_OFFSET {
                return Err(CryptoError::InvalidPath(format!(
                    "Index {} must be given without the hardened bit",
                    index
                ))
                .into());
            }
            let hardened_index = (index | HARDENED_OFFSET).to_be_bytes();
            let (child_key, child_chain) =
                Self::hmac_split(&chain_code[..], &[&[0x00u8][..], &key[..], &hardened_index[..]])?;
            key = child_key;
            chain_code = child_chain;
        }

        Ok((key, chain_code))
    }

    /// HMAC-SHA512 rồi tách IL (key) / IR (chain code)
    fn hmac_split(mac_key: &[u8], data: &[&[u8]]) -> WalletResult<Node> {
        let mut mac = HmacSha512::new_from_slice(mac_key).map_err(|e| {
            CryptoError::DerivationFailed(format!("HMAC init failed: {}", e))
        })?;
        for chunk in data {
            mac.update(chunk);
        }
        let result = mac.finalize().into_bytes();

        // Copy into stack buffer we fully control, then zeroize
        let mut buf = [0u8; 64];
        buf.copy_from_slice(&result);

        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&buf[..32]);
        chain_code.copy_from_slice(&buf[32..]);

        buf.zeroize();

        Ok((key, chain_code))
    }

    /// SLIP-0010: seed dài 16..=64 bytes
    #[inline]
    fn validate_seed(seed: &[u8]) -> WalletResult<()> {
        if !(16..=64).contains(&seed.len()) {
            return Err(CryptoError::DerivationFailed(format!(
                "Invalid seed length: expected 16..=64 bytes, got {}",
                seed.len()
            ))
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
