// wallet-core/src/chains/solana/signer.rs
//
// Signer Module - Offline ed25519 signing cho Solana messages

use crate::chains::solana::address::Pubkey;
use crate::error::{CryptoError, WalletError, WalletResult};
use ed25519_dalek::{Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 64-byte ed25519 signature, hiển thị dạng base58 (cũng là transaction id)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl Signature {
    pub const LEN: usize = 64;

    #[inline]
    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(sig: ed25519_dalek::Signature) -> Self {
        Self(sig.to_bytes())
    }
}

impl FromStr for Signature {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CryptoError::InvalidKeyFormat(format!("invalid signature '{}'", s));
        let decoded = bs58::decode(s.trim()).into_vec().map_err(|_| invalid())?;
        let bytes: [u8; 64] = decoded.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Bất kỳ thứ gì có thể ký message thay cho một pubkey
///
/// Account trong registry implement trait này; hardware wallet hay
/// remote signer có thể cắm vào cùng chỗ.
pub trait TransactionSigner {
    fn pubkey(&self) -> Pubkey;

    fn sign_message(&self, message: &[u8]) -> WalletResult<Signature>;
}

/// Verify chữ ký của message theo pubkey
pub fn verify_signature(pubkey: &Pubkey, message: &[u8], signature: &Signature) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(pubkey.as_bytes()) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    key.verify(message, &sig).is_ok()
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    struct FixedKey(SigningKey);

    impl TransactionSigner for FixedKey {
        fn pubkey(&self) -> Pubkey {
            Pubkey::new(self.0.verifying_key().to_bytes())
        }

        fn sign_message(&self, message: &[u8]) -> WalletResult<Signature> {
            Ok(self.0.sign(message).into())
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = FixedKey(SigningKey::from_bytes(&[9u8; 32]));
        let message = b"Hello, Solana!";

        let signature = signer.sign_message(message).unwrap();
        assert!(verify_signature(&signer.pubkey(), message, &signature));
        assert!(!verify_signature(&signer.pubkey(), b"tampered", &signature));
    }

    #[test]
    fn test_signature_base58_round_trip() {
        let signer = FixedKey(SigningKey::from_bytes(&[3u8; 32]));
        let signature = signer.sign_message(b"msg").unwrap();
        let parsed: Signature = signature.to_string().parse().unwrap();
        assert_eq!(parsed, signature);
        assert!("abc".parse::<Signature>().is_err());
    }
}
