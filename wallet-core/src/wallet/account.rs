// wallet-core/src/wallet/account.rs
//
// Account - keypair đã derive, bất biến sau khi tạo

use crate::chains::solana::address::Pubkey;
use crate::chains::solana::signer::{Signature, TransactionSigner};
use crate::crypto::paths::DerivationPath;
use crate::error::WalletResult;
use crate::network::models::AccountInfo;
use ed25519_dalek::{Signer, SigningKey};
use std::fmt;
use zeroize::Zeroizing;

/// Secret key 64 bytes (seed || pubkey), opaque
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: `SigningKey` tự ghi đè bộ nhớ khi Drop
/// - **No Debug Leak**: Debug không in key
/// - **No Serialize**: chỉ có `sign` và `export_hex` tường minh
pub struct SecretKey {
    signing_key: SigningKey,
}

impl SecretKey {
    pub(crate) fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message).into()
    }

    /// Lower-case hex của 64-byte secret key (seed || pubkey)
    pub fn export_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.signing_key.to_keypair_bytes());
        Zeroizing::new(hex::encode(bytes.as_slice()))
    }

    fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// Account trong registry
pub struct Account {
    index: u32,
    path: DerivationPath,
    pubkey: Pubkey,
    secret: SecretKey,
}

impl Account {
    pub fn new(index: u32, path: DerivationPath, signing_key: SigningKey) -> Self {
        let secret = SecretKey::new(signing_key);
        Self {
            index,
            path,
            pubkey: secret.pubkey(),
            secret,
        }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    #[inline]
    pub fn pubkey(&self) -> &Pubkey {
        &self.pubkey
    }

    #[inline]
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Thông tin công khai cho UI
    pub fn info(&self) -> AccountInfo {
        AccountInfo {
            address: self.pubkey.to_string(),
            derivation_path: self.path.to_string(),
            index: self.index,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("index", &self.index)
            .field("path", &self.path.to_string())
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for Account {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    fn sign_message(&self, message: &[u8]) -> WalletResult<Signature> {
        Ok(self.secret.sign(message))
    }
}
