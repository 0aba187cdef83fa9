// wallet-core/src/chains/solana/transaction.rs
//
// Transaction Builder & Signer - legacy Solana wire format
//
// Transaction = compact-u16(#sigs) || sig[64]... || Message
// Message     = header[3] || compact-u16(#keys) || key[32]... || blockhash[32]
//               || compact-u16(#ix) || CompiledInstruction...

use crate::chains::solana::address::{Pubkey, SolanaAddress};
use crate::chains::solana::amount::sol_to_lamports;
use crate::chains::solana::instruction::{
    encode_length, AccountMeta, CompiledInstruction, Instruction, SystemProgram,
};
use crate::chains::solana::signer::{Signature, TransactionSigner};
use crate::error::{TransactionError, WalletError, WalletResult};
use crate::network::models::RecentBlockhash;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// HASH
// =============================================================================

/// 32-byte hash (blockhash), base58
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash([u8; 32]);

impl Hash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Hash {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransactionError::Encoding(format!("invalid hash '{}'", s));
        let decoded = bs58::decode(s.trim()).into_vec().map_err(|_| invalid())?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TRANSFER INTENT
// =============================================================================

/// Ý định chuyển tiền đã validate: recipient hợp lệ, amount > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferIntent {
    pub from: Pubkey,
    pub to: Pubkey,
    pub lamports: u64,
}

impl TransferIntent {
    /// Validate recipient (base58, 32 bytes) và amount (SOL string -> lamports)
    pub fn new(from: Pubkey, to: &str, amount_sol: &str) -> WalletResult<Self> {
        let to = SolanaAddress::parse(to)?;
        let lamports = sol_to_lamports(amount_sol)?;
        Ok(Self { from, to, lamports })
    }

    pub fn from_lamports(from: Pubkey, to: &str, lamports: u64) -> WalletResult<Self> {
        if lamports == 0 {
            return Err(TransactionError::InvalidAmount("0".to_string()).into());
        }
        let to = SolanaAddress::parse(to)?;
        Ok(Self { from, to, lamports })
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// Legacy message: phần được ký
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions thành message với `payer` là fee payer
    ///
    /// Thứ tự keys: payer, signer-writable, signer-readonly,
    /// writable, readonly. Account trùng được gộp (OR các flag).
    pub fn compile(
        payer: &Pubkey,
        instructions: &[Instruction],
        recent_blockhash: Hash,
    ) -> WalletResult<Self> {
        let mut metas = vec![AccountMeta::writable(*payer, true)];
        for ix in instructions {
            for meta in &ix.accounts {
                upsert_meta(&mut metas, *meta);
            }
            upsert_meta(&mut metas, AccountMeta::readonly(ix.program_id, false));
        }

        // Stable sort: payer (signer + writable, chèn đầu tiên) luôn ở index 0
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        if metas.len() > usize::from(u8::MAX) + 1 {
            return Err(TransactionError::Encoding(format!(
                "too many accounts: {}",
                metas.len()
            ))
            .into());
        }

        let count = |pred: fn(&AccountMeta) -> bool| metas.iter().filter(|m| pred(m)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(|m| m.is_signer),
            num_readonly_signed_accounts: count(|m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(|m| !m.is_signer && !m.is_writable),
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> u8 {
            // Mọi key đều đã được upsert ở trên và len <= 256
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// Các pubkey bắt buộc phải ký (N key đầu tiên)
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Serialize message (bytes được ký)
    pub fn serialize(&self) -> WalletResult<Vec<u8>> {
        let mut out = Vec::with_capacity(
            3 + 1 + self.account_keys.len() * 32 + 32 + 1 + self.instructions.len() * 24,
        );
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_length(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_length(&mut out, self.instructions.len())?;
        for ix in &self.instructions {
            ix.serialize_into(&mut out)?;
        }
        Ok(out)
    }
}

fn upsert_meta(metas: &mut Vec<AccountMeta>, meta: AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta),
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Transaction đã build, chưa ký. Giữ anchor để biết hạn hiệu lực.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub message: Message,
    pub anchor: RecentBlockhash,
}

impl UnsignedTransaction {
    /// Ký bằng một signer duy nhất
    pub fn sign(self, signer: &dyn TransactionSigner) -> WalletResult<SignedTransaction> {
        self.sign_all(&[signer])
    }

    /// Ký bằng danh sách signers. Mỗi required signer phải có mặt đúng một lần,
    /// signer thừa bị bỏ qua.
    pub fn sign_all(self, signers: &[&dyn TransactionSigner]) -> WalletResult<SignedTransaction> {
        let message_bytes = self.message.serialize()?;

        let signatures = self
            .message
            .signer_keys()
            .iter()
            .map(|required| {
                let signer = signers
                    .iter()
                    .find(|s| s.pubkey() == *required)
                    .ok_or_else(|| TransactionError::MissingSigner(required.to_string()))?;
                signer.sign_message(&message_bytes)
            })
            .collect::<WalletResult<Vec<Signature>>>()?;

        Ok(SignedTransaction {
            signatures,
            message: self.message,
            anchor: self.anchor,
        })
    }
}

/// Transaction đã ký, sẵn sàng submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
    pub anchor: RecentBlockhash,
}

impl SignedTransaction {
    /// Transaction id = chữ ký đầu tiên (của fee payer)
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    pub fn recent_blockhash(&self) -> &Hash {
        &self.message.recent_blockhash
    }

    /// Wire format
    pub fn serialize(&self) -> WalletResult<Vec<u8>> {
        let message = self.message.serialize()?;
        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + message.len());
        encode_length(&mut out, self.signatures.len())?;
        for sig in &self.signatures {
            out.extend_from_slice(sig.as_bytes());
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    /// Encoding dùng cho `sendTransaction`
    pub fn to_base64(&self) -> WalletResult<String> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.serialize()?))
    }

    /// Verify mọi chữ ký với signer key tương ứng
    pub fn verify(&self) -> WalletResult<bool> {
        let message = self.message.serialize()?;
        let keys = self.message.signer_keys();
        Ok(keys.len() == self.signatures.len()
            && keys
                .iter()
                .zip(&self.signatures)
                .all(|(key, sig)| super::signer::verify_signature(key, &message, sig)))
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Transaction Builder - pure, không có side effect
pub struct TransactionBuilder;

impl TransactionBuilder {
    /// Build một System transfer, đóng dấu bằng `anchor`
    pub fn build_transfer(
        intent: &TransferIntent,
        anchor: &RecentBlockhash,
    ) -> WalletResult<UnsignedTransaction> {
        if intent.lamports == 0 {
            return Err(TransactionError::InvalidAmount("0".to_string()).into());
        }
        let ix = SystemProgram::transfer(&intent.from, &intent.to, intent.lamports);
        let message = Message::compile(&intent.from, &[ix], anchor.blockhash)?;
        Ok(UnsignedTransaction {
            message,
            anchor: *anchor,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
