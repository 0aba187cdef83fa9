// wallet-core/src/network/traits.rs

// Ledger Client Traits - Interface giữa wallet và RPC node
//
// Wallet không giữ global connection: mọi client được tạo tường minh
// và inject vào driver. Test dùng stub implement cùng trait.

use crate::chains::solana::address::Pubkey;
use crate::chains::solana::signer::Signature;
use crate::chains::solana::transaction::SignedTransaction;
use crate::error::{NetworkError, TransactionError, WalletError, WalletResult};
use crate::network::models::{
    Commitment, NetworkInfo, NetworkStatus, RecentBlockhash, SignatureStatus, TransactionReceipt,
    TransactionStatus,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Poll interval mặc định khi chờ confirm
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// =============================================================================
// CORE LEDGER CLIENT
// =============================================================================

/// LedgerClient - request/response contract với RPC node
///
/// # Design Principles
/// - **Injected**: không có singleton, caller tự tạo và truyền vào
/// - **Async-First**: mọi network operation đều async
/// - **Typed failures**: non-2xx hoặc RPC error không bao giờ thành số 0
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Thông tin cluster đang kết nối
    fn network_info(&self) -> &NetworkInfo;

    /// Commitment mục tiêu khi đọc state và chờ confirm
    fn commitment(&self) -> Commitment {
        Commitment::Confirmed
    }

    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }

    /// Số dư (lamports)
    async fn get_balance(&self, pubkey: &Pubkey) -> WalletResult<u64>;

    /// Anchor mới: blockhash + last valid block height
    async fn get_latest_blockhash(&self) -> WalletResult<RecentBlockhash>;

    async fn get_block_height(&self) -> WalletResult<u64>;

    /// Submit transaction đã ký, trả về signature node báo lại
    async fn send_transaction(&self, transaction: &SignedTransaction) -> WalletResult<Signature>;

    /// `None` khi node chưa thấy signature
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> WalletResult<Option<SignatureStatus>>;

    /// Faucet, nếu cluster có. Không có faucet là trạng thái bình thường.
    fn faucet(&self) -> Option<&dyn FaucetProvider> {
        None
    }

    /// Kiểm tra kết nối
    async fn check_connection(&self) -> WalletResult<NetworkStatus> {
        let started = Instant::now();
        let block_height = self.get_block_height().await?;
        Ok(NetworkStatus {
            is_online: true,
            block_height,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Poll tới khi signature đạt commitment mục tiêu
    ///
    /// Dừng với `Expired` khi block height vượt `anchor.last_valid_block_height`
    /// mà signature vẫn chưa đạt commitment.
    async fn confirm_signature(
        &self,
        signature: &Signature,
        anchor: &RecentBlockhash,
    ) -> WalletResult<TransactionReceipt> {
        let target = self.commitment();
        loop {
            if let Some(status) = self.get_signature_status(signature).await? {
                match status.status(target) {
                    TransactionStatus::Failed => {
                        let reason = status.err.as_ref().map(|e| e.to_string()).unwrap_or_default();
                        return Err(NetworkError::TransactionFailed {
                            signature: signature.to_string(),
                            reason,
                        }
                        .into());
                    }
                    TransactionStatus::Confirmed => {
                        return Ok(TransactionReceipt {
                            signature: *signature,
                            status: TransactionStatus::Confirmed,
                            slot: Some(status.slot),
                            confirmation_status: Some(status.commitment()),
                            explorer_url: Some(self.network_info().cluster.explorer_tx_url(signature)),
                        });
                    }
                    TransactionStatus::Pending | TransactionStatus::Expired => {}
                }
            }

            let block_height = self.get_block_height().await?;
            if anchor.is_expired_at(block_height) {
                return Err(WalletError::Expired {
                    signature: signature.to_string(),
                    last_valid_block_height: anchor.last_valid_block_height,
                    block_height,
                });
            }

            tracing::trace!(%signature, block_height, "waiting for confirmation");
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// Submit rồi chờ confirm theo anchor của chính transaction
    async fn submit_and_confirm(
        &self,
        transaction: &SignedTransaction,
    ) -> WalletResult<TransactionReceipt> {
        let expected = transaction
            .signature()
            .copied()
            .ok_or_else(|| TransactionError::Encoding("transaction has no signatures".into()))?;
        let signature = self.send_transaction(transaction).await?;
        if signature != expected {
            tracing::warn!(%expected, returned = %signature, "node returned a different signature");
        }
        self.confirm_signature(&expected, &transaction.anchor).await
    }
}

// =============================================================================
// FAUCET
// =============================================================================

/// FaucetProvider - airdrop trên test clusters
#[async_trait]
pub trait FaucetProvider: Send + Sync {
    /// Yêu cầu airdrop `lamports` vào `pubkey`, trả về signature của airdrop
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> WalletResult<Signature>;
}
