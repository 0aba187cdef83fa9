// wallet-core/src/crypto/mnemonic.rs
//
// Mnemonic Module - BIP-39, 12 words
// Chuẩn: BIP-39 (Mnemonic), PBKDF2-HMAC-SHA512 (Seed Derivation)

use crate::error::{MnemonicError, WalletError, WalletResult};
use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Số words duy nhất được chấp nhận
pub const WORD_COUNT: usize = 12;

/// 128-bit entropy
const ENTROPY_BYTES: usize = 16;

/// Wallet Mnemonic - 12-word BIP-39 phrase
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: Phrase được tự động ghi đè bằng 0 khi struct bị drop
/// - **CSPRNG**: Sử dụng `OsRng` (OS-level cryptographically secure RNG)
/// - **No Debug Leak**: Custom Debug impl không hiển thị phrase
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletMnemonic {
    phrase: String,
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị mnemonic phrase
impl std::fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletMnemonic")
            .field("word_count", &WORD_COUNT)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl WalletMnemonic {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Tạo mnemonic mới với 12 words (128-bit entropy + 4-bit checksum)
    pub fn generate() -> WalletResult<Self> {
        let mut entropy = [0u8; ENTROPY_BYTES];
        OsRng.fill_bytes(&mut entropy);

        let result = Mnemonic::from_entropy_in(Language::English, &entropy);

        // Zeroize entropy ngay sau khi sử dụng
        entropy.zeroize();

        let mnemonic = result.map_err(|e| MnemonicError::Bip39Error(e.to_string()))?;
        Ok(Self {
            phrase: mnemonic.to_string(),
        })
    }

    /// Khôi phục mnemonic từ danh sách words (recovery flow)
    ///
    /// # Validation
    /// - Đúng 12 words
    /// - Từng word có trong BIP-39 English wordlist
    /// - Checksum hợp lệ
    pub fn parse<S: AsRef<str>>(words: &[S]) -> WalletResult<Self> {
        if words.len() != WORD_COUNT {
            return Err(MnemonicError::InvalidWordCount(words.len()).into());
        }

        let normalized: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .collect();

        if let Some((position, word)) = normalized
            .iter()
            .enumerate()
            .find(|(_, w)| !Self::is_valid_word(w))
        {
            return Err(MnemonicError::UnknownWord {
                word: word.clone(),
                position,
            }
            .into());
        }

        let phrase = Zeroizing::new(normalized.join(" "));
        Mnemonic::parse_in_normalized(Language::English, &phrase).map_err(|e| match e {
            bip39::Error::InvalidChecksum => WalletError::Mnemonic(MnemonicError::ChecksumMismatch),
            other => WalletError::Mnemonic(MnemonicError::Bip39Error(other.to_string())),
        })?;

        Ok(Self {
            phrase: phrase.to_string(),
        })
    }

    /// Khôi phục mnemonic từ phrase (tách theo whitespace bất kỳ)
    pub fn from_phrase(phrase: &str) -> WalletResult<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        Self::parse(&words)
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// Lấy mnemonic phrase (lower-case, cách nhau bởi một dấu cách)
    ///
    /// # Warning
    /// Cẩn thận khi hiển thị hoặc log giá trị này!
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Export phrase cho người dùng (copy / hiển thị)
    pub fn export_phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.phrase.clone())
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        WORD_COUNT
    }

    pub fn words(&self) -> Vec<&str> {
        self.phrase.split(' ').collect()
    }

    // =========================================================================
    // SEED DERIVATION
    // =========================================================================

    /// Tạo seed từ mnemonic (PBKDF2-HMAC-SHA512, 2048 rounds,
    /// salt = "mnemonic" || passphrase)
    ///
    /// Pure function: cùng phrase + passphrase luôn cho cùng seed.
    pub fn to_seed(&self, passphrase: &str) -> WalletResult<Seed> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &self.phrase)
            .map_err(|e| MnemonicError::Bip39Error(e.to_string()))?;
        Ok(Seed::from_bytes(mnemonic.to_seed(passphrase)))
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Kiểm tra phrase có hợp lệ không (word count, wordlist, checksum)
    #[inline]
    pub fn validate(phrase: &str) -> bool {
        Self::from_phrase(phrase).is_ok()
    }

    /// Kiểm tra một từ có trong BIP-39 English wordlist không
    pub fn is_valid_word(word: &str) -> bool {
        Language::English.find_word(word).is_some()
    }
}

// =============================================================================
// SEED
// =============================================================================

/// 64-byte BIP-39 seed, gốc của toàn bộ cây derivation
///
/// Zeroize khi drop, Debug không hiển thị bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Zeroizing<[u8; 64]>);

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

impl Seed {
    pub const LEN: usize = 64;

    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Seed dạng hex
    pub fn from_hex(hex_seed: &str) -> WalletResult<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_seed.trim())
                .map_err(|e| MnemonicError::Bip39Error(format!("invalid seed hex: {}", e)))?,
        );
        if bytes.len() != Self::LEN {
            return Err(MnemonicError::Bip39Error(format!(
                "invalid seed length: expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
            .into());
        }
        let mut buf = [0u8; 64];
        buf.copy_from_slice(&bytes);
        Ok(Self::from_bytes(buf))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
