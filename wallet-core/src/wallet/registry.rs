// wallet-core/src/wallet/registry.rs
//
// Keypair Registry - danh sách account có thứ tự, chỉ append
//
// Invariants:
// - accounts[i].index() == i (liên tục từ 0)
// - next_index chỉ tăng, trừ khi clear() reset toàn bộ

use crate::chains::solana::address::Pubkey;
use crate::crypto::key_deriver::KeyDeriver;
use crate::crypto::mnemonic::Seed;
use crate::crypto::paths::HARDENED_OFFSET;
use crate::error::{StateError, WalletResult};
use std::sync::Arc;

use super::account::Account;

#[derive(Debug, Clone, Default)]
pub struct KeypairRegistry {
    accounts: Vec<Arc<Account>>,
}

impl KeypairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index sẽ được dùng cho account tiếp theo
    pub fn next_index(&self) -> u32 {
        self.accounts.len() as u32
    }

    /// Derive account tại `next_index` và append
    pub fn add_next(&mut self, seed: &Seed) -> WalletResult<Arc<Account>> {
        let index = self.next_index();
        if index >= HARDENED_OFFSET {
            return Err(StateError::IndexOutOfRange(index).into());
        }
        let account = Arc::new(KeyDeriver::derive_account(seed, index)?);
        tracing::info!(index, pubkey = %account.pubkey(), "account derived");
        self.accounts.push(Arc::clone(&account));
        Ok(account)
    }

    pub fn list(&self) -> &[Arc<Account>] {
        &self.accounts
    }

    pub fn get(&self, index: u32) -> Option<&Arc<Account>> {
        self.accounts.get(index as usize)
    }

    /// Như `get` nhưng trả lỗi `UnknownAccount`
    pub fn require(&self, index: u32) -> WalletResult<&Arc<Account>> {
        self.get(index)
            .ok_or_else(|| StateError::UnknownAccount(index).into())
    }

    pub fn find_by_pubkey(&self, pubkey: &Pubkey) -> Option<&Arc<Account>> {
        self.accounts.iter().find(|a| a.pubkey() == pubkey)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::info!(count = self.accounts.len(), "clearing accounts");
        self.accounts.clear();
    }
}
