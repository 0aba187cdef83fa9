// wallet-core/src/chains/solana/address.rs
//
// Solana Address Module - base58 32-byte public identities

use crate::error::{TransactionError, WalletError, WalletResult};
use crate::network::models::AddressValidation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte public identity (ed25519 public key hoặc program address)
///
/// Solana chấp nhận mọi 32 bytes làm address (kể cả PDA không nằm trên
/// curve), nên validation chỉ kiểm tra base58 + độ dài.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const LEN: usize = 32;

    /// System Program: `11111111111111111111111111111111`
    pub const SYSTEM_PROGRAM: Pubkey = Pubkey([0u8; 32]);

    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl FromStr for Pubkey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || TransactionError::InvalidRecipient(trimmed.to_string());

        // base58 của 32 bytes dài tối đa 44 ký tự
        if trimmed.is_empty() || trimmed.len() > 44 {
            return Err(invalid().into());
        }
        let decoded = bs58::decode(trimmed).into_vec().map_err(|_| invalid())?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Solana Address helpers
pub struct SolanaAddress;

impl SolanaAddress {
    /// Parse recipient address, trả về `InvalidRecipient` nếu sai format
    pub fn parse(address: &str) -> WalletResult<Pubkey> {
        address.parse()
    }

    /// Validate địa chỉ cho UI (không trả lỗi, chỉ trả kết quả)
    pub fn validate(address: &str) -> AddressValidation {
        match Self::parse(address) {
            Ok(pubkey) => AddressValidation {
                is_valid: true,
                normalized: Some(pubkey.to_string()),
                error: None,
            },
            Err(e) => AddressValidation {
                is_valid: false,
                normalized: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Kiểm tra pubkey có nằm trên ed25519 curve (tức có private key tương ứng)
    pub fn is_on_curve(pubkey: &Pubkey) -> bool {
        ed25519_dalek::VerifyingKey::from_bytes(pubkey.as_bytes()).is_ok()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

    #[test]
    fn test_system_program_encoding() {
        assert_eq!(
            Pubkey::SYSTEM_PROGRAM.to_string(),
            "11111111111111111111111111111111"
        );
        let parsed: Pubkey = "11111111111111111111111111111111".parse().unwrap();
        assert_eq!(parsed, Pubkey::SYSTEM_PROGRAM);
    }

    #[test]
    fn test_round_trip() {
        let pubkey = Pubkey::new([7u8; 32]);
        let parsed: Pubkey = pubkey.to_string().parse().unwrap();
        assert_eq!(parsed, pubkey);
    }

    #[test]
    fn test_parse_valid() {
        let pubkey = SolanaAddress::parse(VALID).unwrap();
        assert_eq!(pubkey.to_string(), VALID);
        // Whitespace quanh address được bỏ qua
        assert_eq!(SolanaAddress::parse(&format!("  {}\n", VALID)).unwrap(), pubkey);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "0OIl", "abc", "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"] {
            let err = SolanaAddress::parse(bad).unwrap_err();
            assert!(matches!(
                err,
                WalletError::Transaction(TransactionError::InvalidRecipient(_))
            ));
        }
        // 33 bytes
        let too_long = bs58::encode([1u8; 33]).into_string();
        assert!(SolanaAddress::parse(&too_long).is_err());
        // 31 bytes
        let too_short = bs58::encode([1u8; 31]).into_string();
        assert!(SolanaAddress::parse(&too_short).is_err());
    }

    #[test]
    fn test_validate() {
        let ok = SolanaAddress::validate(VALID);
        assert!(ok.is_valid);
        assert_eq!(ok.normalized.as_deref(), Some(VALID));

        let bad = SolanaAddress::validate("not-an-address");
        assert!(!bad.is_valid);
        assert!(bad.error.is_some());
    }

    #[test]
    fn test_is_on_curve() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[9u8; 32]);
        let pubkey = Pubkey::new(key.verifying_key().to_bytes());
        assert!(SolanaAddress::is_on_curve(&pubkey));

        // Khoảng một nửa số y không có điểm tương ứng trên curve
        let off_curve = (0u8..=255).any(|b| !SolanaAddress::is_on_curve(&Pubkey::new([b; 32])));
        assert!(off_curve);
    }

    #[test]
    fn test_serde_as_base58_string() {
        let json = serde_json::to_string(&Pubkey::SYSTEM_PROGRAM).unwrap();
        assert_eq!(json, "\"11111111111111111111111111111111\"");
        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Pubkey::SYSTEM_PROGRAM);
    }
}
