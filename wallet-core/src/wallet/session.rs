// wallet-core/src/wallet/session.rs
//
// Session reducer: (snapshot, action) -> (snapshot mới, effects)
//
// Reducer là pure (không I/O, không randomness). Mọi thứ chạm tới
// network được trả về dạng `Effect` cho driver thực thi.

use crate::chains::solana::address::Pubkey;
use crate::crypto::mnemonic::{Seed, WalletMnemonic};
use crate::error::{StateError, WalletResult};
use crate::network::models::{AccountInfo, Balance};
use std::collections::BTreeMap;
use std::sync::Arc;
use zeroize::Zeroizing;

use super::account::Account;
use super::registry::KeypairRegistry;
use super::send::SendRequest;

/// Snapshot trạng thái wallet. Clone rẻ: seed và account đều là `Arc`.
#[derive(Debug, Clone, Default)]
pub struct WalletState {
    mnemonic: Option<Arc<WalletMnemonic>>,
    seed: Option<Arc<Seed>>,
    registry: KeypairRegistry,
    balances: BTreeMap<u32, Balance>,
}

impl WalletState {
    pub fn has_seed(&self) -> bool {
        self.seed.is_some()
    }

    pub fn seed(&self) -> WalletResult<&Arc<Seed>> {
        self.seed.as_ref().ok_or_else(|| StateError::NoSeedLoaded.into())
    }

    /// Phrase dạng space-joined lower-case, chỉ khi được gọi tường minh
    pub fn export_phrase(&self) -> WalletResult<Zeroizing<String>> {
        self.mnemonic
            .as_ref()
            .map(|m| m.export_phrase())
            .ok_or_else(|| StateError::NoSeedLoaded.into())
    }

    pub fn registry(&self) -> &KeypairRegistry {
        &self.registry
    }

    pub fn accounts(&self) -> Vec<AccountInfo> {
        self.registry.list().iter().map(|a| a.info()).collect()
    }

    pub fn balance(&self, index: u32) -> Option<&Balance> {
        self.balances.get(&index)
    }
}

/// User action
pub enum Action {
    /// Nạp mnemonic (generate hoặc restore ở ngoài). Reset registry.
    LoadMnemonic {
        mnemonic: WalletMnemonic,
        passphrase: Zeroizing<String>,
    },
    /// Derive account tiếp theo
    AddWallet,
    /// Xoá toàn bộ account, next index về 0
    ClearWallets,
    /// Query balance; `None` = mọi account
    CheckBalance { index: Option<u32> },
    /// Kết quả balance đã fetch (driver gửi lại), kèm pubkey đã query
    BalancesFetched(Vec<(u32, Pubkey, u64)>),
    /// Gửi `amount` SOL từ account `from`
    Send {
        from: u32,
        recipient: String,
        amount: String,
    },
    /// Airdrop `lamports` vào account `index`
    Airdrop { index: u32, lamports: u64 },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadMnemonic { .. } => "load_mnemonic",
            Action::AddWallet => "add_wallet",
            Action::ClearWallets => "clear_wallets",
            Action::CheckBalance { .. } => "check_balance",
            Action::BalancesFetched(_) => "balances_fetched",
            Action::Send { .. } => "send",
            Action::Airdrop { .. } => "airdrop",
        }
    }
}

/// Side effect cần driver thực thi
#[derive(Debug)]
pub enum Effect {
    FetchBalances(Vec<(u32, Pubkey)>),
    SubmitTransfer(SendRequest),
    RequestAirdrop {
        index: u32,
        pubkey: Pubkey,
        lamports: u64,
    },
}

#[derive(Debug)]
pub struct Transition {
    pub state: WalletState,
    pub effects: Vec<Effect>,
    /// Account vừa được tạo (AddWallet)
    pub added: Option<Arc<Account>>,
}

impl Transition {
    fn state(state: WalletState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            added: None,
        }
    }

    fn with_effect(state: WalletState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
            added: None,
        }
    }
}

/// Pure reducer
pub fn reduce(current: &WalletState, action: Action) -> WalletResult<Transition> {
    let mut next = current.clone();

    match action {
        Action::LoadMnemonic {
            mnemonic,
            passphrase,
        } => {
            let seed = mnemonic.to_seed(&passphrase)?;
            Ok(Transition::state(WalletState {
                mnemonic: Some(Arc::new(mnemonic)),
                seed: Some(Arc::new(seed)),
                ..WalletState::default()
            }))
        }

        Action::AddWallet => {
            let seed = Arc::clone(current.seed()?);
            let account = next.registry.add_next(&seed)?;
            Ok(Transition {
                state: next,
                effects: Vec::new(),
                added: Some(account),
            })
        }

        Action::ClearWallets => {
            next.registry.clear();
            next.balances.clear();
            Ok(Transition::state(next))
        }

        Action::CheckBalance { index } => {
            let targets = match index {
                Some(i) => vec![(i, *next.registry.require(i)?.pubkey())],
                None => next
                    .registry
                    .list()
                    .iter()
                    .map(|a| (a.index(), *a.pubkey()))
                    .collect(),
            };
            if targets.is_empty() {
                return Ok(Transition::state(next));
            }
            Ok(Transition::with_effect(next, Effect::FetchBalances(targets)))
        }

        Action::BalancesFetched(values) => {
            for (index, pubkey, lamports) in values {
                // Account có thể đã bị clear hoặc thay bằng seed khác trong lúc fetch
                if next.registry.get(index).map(|a| a.pubkey()) == Some(&pubkey) {
                    next.balances.insert(index, Balance::lamports(lamports));
                }
            }
            Ok(Transition::state(next))
        }

        Action::Send {
            from,
            recipient,
            amount,
        } => {
            let account = Arc::clone(next.registry.require(from)?);
            let request = SendRequest {
                from: account,
                recipient,
                amount,
            };
            Ok(Transition::with_effect(next, Effect::SubmitTransfer(request)))
        }

        Action::Airdrop { index, lamports } => {
            let pubkey = *next.registry.require(index)?.pubkey();
            Ok(Transition::with_effect(
                next,
                Effect::RequestAirdrop {
                    index,
                    pubkey,
                    lamports,
                },
            ))
        }
    }
}
