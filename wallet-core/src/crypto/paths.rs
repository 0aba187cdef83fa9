// wallet-core/src/crypto/paths.rs
//
// Derivation Paths Module - SLIP-0010 ed25519 account paths
// BIP-44 (Purpose), SLIP-44 (Coin Types), tất cả levels đều hardened

use crate::error::{CryptoError, WalletResult};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SLIP-44 COIN TYPES
// =============================================================================
/// SLIP-44 Registered Coin Types (ed25519 chains)
/// Ref: https://github.com/satoshilabs/slips/blob/master/slip-0044.md
pub mod coin_type {
    pub const SOLANA: u32 = 501;
}

/// BIP-44 purpose
pub const PURPOSE: u32 = 44;

/// Bit đánh dấu hardened index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

// =============================================================================
// DERIVATION PATH
// =============================================================================
/// Account path `m/44'/501'/account'/0'`
///
/// Bốn level cố định, tất cả hardened. Chỉ `account` thay đổi, nên mọi
/// giá trị của type này đều là path hợp lệ sau khi khởi tạo.
///
/// Chuỗi hiển thị là compatibility contract với các ví khác
/// (Phantom, Solflare, solana-keygen): luôn dùng dấu `'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    account: u32,
}

impl DerivationPath {
    pub const DEPTH: usize = 4;
    pub const CHANGE: u32 = 0;

    /// Path cho account `index`
    ///
    /// Index phải < 2^31 (không chứa bit hardened).
    pub fn account(index: u32) -> WalletResult<Self> {
        if index >= HARDENED_OFFSET {
            return Err(CryptoError::InvalidPath(format!(
                "account index {} exceeds 2^31 - 1",
                index
            ))
            .into());
        }
        Ok(Self { account: index })
    }

    #[inline]
    pub fn account_index(&self) -> u32 {
        self.account
    }

    /// Các segment (chưa cộng hardened offset): [44, 501, account, 0]
    #[inline]
    pub fn segments(&self) -> [u32; 4] {
        [PURPOSE, coin_type::SOLANA, self.account, Self::CHANGE]
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}'",
            PURPOSE,
            coin_type::SOLANA,
            self.account,
            Self::CHANGE
        )
    }
}

impl FromStr for DerivationPath {
    type Err = crate::error::WalletError;

    /// Parse `m/44'/501'/<n>'/0'` (chấp nhận cả `h` làm hardened marker)
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments = parse_hardened_path(path)?;
        match segments.as_slice() {
            [PURPOSE, coin_type::SOLANA, account, Self::CHANGE] => Self::account(*account),
            _ => Err(CryptoError::InvalidPath(format!(
                "expected m/44'/501'/<account>'/0', got '{}'",
                path.trim()
            ))
            .into()),
        }
    }
}

/// Parse derivation path thành list of indices
///
/// Input: "m/44'/501'/0'/0'"
/// Output: [44, 501, 0, 0]
///
/// Tất cả levels phải có dấu ' (hardened): SLIP-0010 ed25519 không có
/// non-hardened derivation.
pub fn parse_hardened_path(path: &str) -> WalletResult<Vec<u32>> {
    let path = path.trim();

    let segments = path.strip_prefix("m/").ok_or_else(|| {
        CryptoError::InvalidPath(format!("Path must start with 'm/': {}", path))
    })?;
    if segments.is_empty() {
        return Err(CryptoError::InvalidPath("Empty derivation path".to_string()).into());
    }

    let mut indices = Vec::new();
    for segment in segments.split('/') {
        let num_str = segment
            .strip_suffix('\'')
            .or_else(|| segment.strip_suffix('h'))
            .ok_or_else(|| {
                CryptoError::InvalidPath(format!(
                    "Ed25519 SLIP-0010 requires ALL levels to be hardened. Invalid segment: '{}'",
                    segment
                ))
            })?;

        let index: u32 = num_str.parse().map_err(|e| {
            CryptoError::InvalidPath(format!("Invalid index '{}': {}", num_str, e))
        })?;
        if index >= HARDENED_OFFSET {
            return Err(CryptoError::InvalidPath(format!(
                "Index {} out of hardened range",
                index
            ))
            .into());
        }

        indices.push(index);
    }

    Ok(indices)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_paths() {
        assert_eq!(
            DerivationPath::account(0).unwrap().to_string(),
            "m/44'/501'/0'/0'"
        );
        assert_eq!(
            DerivationPath::account(2).unwrap().to_string(),
            "m/44'/501'/2'/0'"
        );
        assert_eq!(
            DerivationPath::account(0).unwrap().segments(),
            [44, 501, 0, 0]
        );
    }

    #[test]
    fn test_max_account_index() {
        let max = DerivationPath::account(HARDENED_OFFSET - 1).unwrap();
        assert_eq!(max.to_string(), "m/44'/501'/2147483647'/0'");
        assert!(DerivationPath::account(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_parse_round_trip() {
        let path: DerivationPath = "m/44'/501'/7'/0'".parse().unwrap();
        assert_eq!(path.account_index(), 7);
        assert_eq!(path.to_string(), "m/44'/501'/7'/0'");

        // 'h' marker được chấp nhận khi parse, hiển thị vẫn dùng '
        let path: DerivationPath = "m/44h/501h/3h/0h".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/501'/3'/0'");
    }

    #[test]
    fn test_parse_rejects_non_hardened() {
        let err = "m/44'/501'/0'/0"
            .parse::<DerivationPath>()
            .unwrap_err()
            .to_string();
        assert!(err.contains("hardened"));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!("44'/501'/0'/0'".parse::<DerivationPath>().is_err()); // Missing m/
        assert!("m/44'/60'/0'/0'".parse::<DerivationPath>().is_err()); // coin type
        assert!("m/44'/501'/0'".parse::<DerivationPath>().is_err()); // depth
        assert!("m/44'/501'/0'/1'".parse::<DerivationPath>().is_err()); // change
        assert!("m/44'/501'/0'/0'/0'".parse::<DerivationPath>().is_err());
        assert!("m/".parse::<DerivationPath>().is_err());
        assert!("m/44'/501'/abc'/0'".parse::<DerivationPath>().is_err());
    }

    #[test]
    fn test_parse_hardened_path() {
        assert_eq!(
            parse_hardened_path("m/44'/637'/0'/0'/0'").unwrap(),
            vec![44, 637, 0, 0, 0]
        );
        assert!(parse_hardened_path("m/2147483648'").is_err());
        assert!(parse_hardened_path("invalid").is_err());
    }
}
