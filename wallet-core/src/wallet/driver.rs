// wallet-core/src/wallet/driver.rs
//
// Async driver: chạy reducer dưới write lock, thực thi effects sau khi
// nhả lock. Ledger client được inject từ ngoài.

use crate::chains::solana::address::Pubkey;
use crate::crypto::mnemonic::WalletMnemonic;
use crate::error::{StateError, WalletError, WalletResult};
use crate::network::models::{AccountBalance, Balance, NetworkStatus, TransactionReceipt};
use crate::network::traits::LedgerClient;
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use super::account::Account;
use super::send::{SendAttempt, SendReport};
use super::session::{reduce, Action, Effect, WalletState};

/// Airdrop mặc định: 1 SOL
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 1_000_000_000;

/// Kết quả thực thi một effect
#[derive(Debug, Clone)]
pub enum EffectOutcome {
    Balances(Vec<AccountBalance>),
    Sent(SendReport),
    Airdropped(TransactionReceipt),
    /// Cluster không có faucet: không phải lỗi
    FaucetUnavailable,
}

pub struct WalletDriver<C: LedgerClient> {
    client: Arc<C>,
    state: RwLock<WalletState>,
}

impl<C: LedgerClient> WalletDriver<C> {
    pub fn new(client: C) -> Self {
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client,
            state: RwLock::new(WalletState::default()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Bản sao snapshot hiện tại
    pub async fn snapshot(&self) -> WalletState {
        self.state.read().await.clone()
    }

    /// Reduce dưới write lock, rồi thực thi effects không giữ lock
    pub async fn dispatch(&self, action: Action) -> WalletResult<Vec<EffectOutcome>> {
        let name = action.name();
        let effects = {
            let mut state = self.state.write().await;
            let transition = reduce(&state, action).map_err(|e| {
                tracing::warn!(action = name, error = %e, "action rejected");
                e
            })?;
            *state = transition.state;
            transition.effects
        };
        tracing::debug!(action = name, effects = effects.len(), "action applied");

        let mut outcomes = Vec::with_capacity(effects.len());
        for effect in effects {
            outcomes.push(self.run_effect(effect).await?);
        }
        Ok(outcomes)
    }

    async fn run_effect(&self, effect: Effect) -> WalletResult<EffectOutcome> {
        match effect {
            Effect::FetchBalances(targets) => {
                let balances = self.fetch_balances(&targets).await?;
                let fetched = targets
                    .iter()
                    .zip(balances.iter())
                    .map(|(&(index, pubkey), &lamports)| (index, pubkey, lamports))
                    .collect();
                // Ghi lại qua reducer để giữ một đường mutate duy nhất
                {
                    let mut state = self.state.write().await;
                    *state = reduce(&state, Action::BalancesFetched(fetched))?.state;
                }
                Ok(EffectOutcome::Balances(
                    targets
                        .into_iter()
                        .zip(balances)
                        .map(|((index, address), lamports)| AccountBalance {
                            index,
                            address,
                            balance: Balance::lamports(lamports),
                        })
                        .collect(),
                ))
            }

            Effect::SubmitTransfer(request) => {
                let report = SendAttempt::new().run(self.client.as_ref(), request).await;
                Ok(EffectOutcome::Sent(report))
            }

            Effect::RequestAirdrop {
                index,
                pubkey,
                lamports,
            } => {
                let Some(faucet) = self.client.faucet() else {
                    tracing::info!(
                        cluster = %self.client.network_info().cluster,
                        "faucet unavailable"
                    );
                    return Ok(EffectOutcome::FaucetUnavailable);
                };
                let signature = faucet.request_airdrop(&pubkey, lamports).await?;
                tracing::info!(index, %signature, lamports, "airdrop requested");
                // Anchor mới chỉ để chặn thời gian chờ confirm
                let anchor = self.client.get_latest_blockhash().await?;
                let receipt = self.client.confirm_signature(&signature, &anchor).await?;
                Ok(EffectOutcome::Airdropped(receipt))
            }
        }
    }

    /// Các balance query độc lập, chạy song song
    async fn fetch_balances(&self, targets: &[(u32, Pubkey)]) -> WalletResult<Vec<u64>> {
        try_join_all(
            targets
                .iter()
                .map(|(_, pubkey)| self.client.get_balance(pubkey)),
        )
        .await
    }

    // =========================================================================
    // CONVENIENCE
    // =========================================================================

    /// Ping node: block height + latency
    pub async fn network_status(&self) -> WalletResult<NetworkStatus> {
        self.client.check_connection().await
    }

    pub async fn load_mnemonic(&self, mnemonic: WalletMnemonic, passphrase: &str) -> WalletResult<()> {
        self.dispatch(Action::LoadMnemonic {
            mnemonic,
            passphrase: Zeroizing::new(passphrase.to_string()),
        })
        .await?;
        Ok(())
    }

    /// Derive và trả về account tiếp theo
    pub async fn add_wallet(&self) -> WalletResult<Arc<Account>> {
        let mut state = self.state.write().await;
        let transition = reduce(&state, Action::AddWallet)?;
        *state = transition.state;
        transition
            .added
            .ok_or_else(|| StateError::NoSeedLoaded.into())
    }

    pub async fn clear_wallets(&self) -> WalletResult<()> {
        self.dispatch(Action::ClearWallets).await?;
        Ok(())
    }

    /// Balance của một account hoặc tất cả (`None`)
    pub async fn check_balance(&self, index: Option<u32>) -> WalletResult<Vec<AccountBalance>> {
        let outcomes = self.dispatch(Action::CheckBalance { index }).await?;
        Ok(outcomes
            .into_iter()
            .find_map(|o| match o {
                EffectOutcome::Balances(b) => Some(b),
                _ => None,
            })
            .unwrap_or_default())
    }

    pub async fn send(
        &self,
        from: u32,
        recipient: impl Into<String>,
        amount: impl Into<String>,
    ) -> WalletResult<SendReport> {
        let outcomes = self
            .dispatch(Action::Send {
                from,
                recipient: recipient.into(),
                amount: amount.into(),
            })
            .await?;
        outcomes
            .into_iter()
            .find_map(|o| match o {
                EffectOutcome::Sent(report) => Some(report),
                _ => None,
            })
            .ok_or_else(|| WalletError::Internal("send produced no report".into()))
    }

    /// `Ok(None)` khi cluster không có faucet
    pub async fn airdrop(&self, index: u32, lamports: u64) -> WalletResult<Option<TransactionReceipt>> {
        let outcomes = self.dispatch(Action::Airdrop { index, lamports }).await?;
        Ok(outcomes.into_iter().find_map(|o| match o {
            EffectOutcome::Airdropped(receipt) => Some(receipt),
            _ => None,
        }))
    }
}
