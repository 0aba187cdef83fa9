// wallet-core/src/chains/solana/instruction.rs
//
// Instructions + compact-u16 ("shortvec") length encoding

use crate::chains::solana::address::Pubkey;
use crate::error::{TransactionError, WalletResult};

/// System Program instruction discriminant cho Transfer
const SYSTEM_TRANSFER: u32 = 2;

/// Account tham gia instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// Instruction chưa compile (còn dùng pubkey thay vì index)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Instruction đã compile: account được tham chiếu bằng index trong message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    pub fn serialize_into(&self, out: &mut Vec<u8>) -> WalletResult<()> {
        out.push(self.program_id_index);
        encode_length(out, self.accounts.len())?;
        out.extend_from_slice(&self.accounts);
        encode_length(out, self.data.len())?;
        out.extend_from_slice(&self.data);
        Ok(())
    }
}

/// System Program
pub struct SystemProgram;

impl SystemProgram {
    /// Transfer `lamports` từ `from` (signer, writable) sang `to` (writable)
    ///
    /// Data = u32 LE (2) || u64 LE (lamports)
    pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
        data.extend_from_slice(&lamports.to_le_bytes());

        Instruction {
            program_id: Pubkey::SYSTEM_PROGRAM,
            accounts: vec![AccountMeta::writable(*from, true), AccountMeta::writable(*to, false)],
            data,
        }
    }
}

// =============================================================================
// COMPACT-U16
// =============================================================================

/// Ghi độ dài theo compact-u16: 7 bit mỗi byte, bit cao = còn byte tiếp
pub fn encode_length(out: &mut Vec<u8>, len: usize) -> WalletResult<()> {
    let mut rem = u16::try_from(len).map_err(|_| {
        TransactionError::Encoding(format!("length {} exceeds compact-u16 range", len))
    })?;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(elem);
            return Ok(());
        }
        elem |= 0x80;
        out.push(elem);
    }
}

/// Đọc compact-u16, trả về (giá trị, số bytes đã đọc)
pub fn decode_length(bytes: &[u8]) -> WalletResult<(usize, usize)> {
    let mut value: usize = 0;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as usize) << (i * 7);
        if byte & 0x80 == 0 {
            if value > u16::MAX as usize {
                break;
            }
            return Ok((value, i + 1));
        }
    }
    Err(TransactionError::Encoding("malformed compact-u16".to_string()).into())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(len: usize) -> Vec<u8> {
        let mut out = Vec::new();
        encode_length(&mut out, len).unwrap();
        out
    }

    #[test]
    fn test_compact_u16_vectors() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(0x7f), vec![0x7f]);
        assert_eq!(encoded(0x80), vec![0x80, 0x01]);
        assert_eq!(encoded(0xff), vec![0xff, 0x01]);
        assert_eq!(encoded(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(encoded(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encoded(0xffff), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn test_compact_u16_decode() {
        for len in [0usize, 1, 0x7f, 0x80, 0x3fff, 0x4000, 0xffff] {
            let bytes = encoded(len);
            assert_eq!(decode_length(&bytes).unwrap(), (len, bytes.len()));
        }
        assert!(decode_length(&[0x80]).is_err());
        assert!(decode_length(&[0xff, 0xff, 0x7f]).is_err());
    }

    #[test]
    fn test_compact_u16_overflow() {
        let mut out = Vec::new();
        assert!(encode_length(&mut out, 0x1_0000).is_err());
    }

    #[test]
    fn test_transfer_instruction_layout() {
        let from = Pubkey::new([1u8; 32]);
        let to = Pubkey::new([2u8; 32]);
        let ix = SystemProgram::transfer(&from, &to, 1);

        assert_eq!(ix.program_id, Pubkey::SYSTEM_PROGRAM);
        assert_eq!(ix.data, vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    #[test]
    fn test_compiled_instruction_serialization() {
        let compiled = CompiledInstruction {
            program_id_index: 2,
            accounts: vec![0, 1],
            data: vec![9, 9, 9],
        };
        let mut out = Vec::new();
        compiled.serialize_into(&mut out).unwrap();
        assert_eq!(out, vec![2, 2, 0, 1, 3, 9, 9, 9]);
    }
}
