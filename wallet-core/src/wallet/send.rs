// wallet-core/src/wallet/send.rs
//
// Send state machine
//
//   Idle -> Validating -> Building -> Signing -> Submitting -> Confirming -> Succeeded
//     \________\____________\___________\___________\_____________\------> Failed
//
// Một attempt chỉ chạy một lần (consume self). Retry = attempt mới,
// anchor mới.

use crate::chains::solana::signer::Signature;
use crate::chains::solana::transaction::{TransactionBuilder, TransferIntent};
use crate::error::{StateError, WalletError, WalletResult};
use crate::network::models::{TransactionReceipt, TransactionStatus};
use crate::network::traits::LedgerClient;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::account::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SendStage {
    Idle,
    Validating,
    Building,
    Signing,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

impl SendStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    fn successor(&self) -> Option<SendStage> {
        match self {
            Self::Idle => Some(Self::Validating),
            Self::Validating => Some(Self::Building),
            Self::Building => Some(Self::Signing),
            Self::Signing => Some(Self::Submitting),
            Self::Submitting => Some(Self::Confirming),
            Self::Confirming => Some(Self::Succeeded),
            Self::Succeeded | Self::Failed => None,
        }
    }

    /// `Failed` từ mọi stage chưa terminal, còn lại chỉ đi tới stage kế tiếp
    pub fn can_advance_to(&self, next: SendStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Failed || self.successor() == Some(next)
    }
}

impl fmt::Display for SendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Input thô của một lần gửi, chưa validate. Chỉ dùng một lần.
#[derive(Debug)]
pub struct SendRequest {
    pub from: Arc<Account>,
    pub recipient: String,
    /// Số SOL dạng decimal string
    pub amount: String,
}

/// Lỗi terminal, giữ stage nơi attempt thất bại
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("send failed while {stage}: {error}")]
pub struct SendFailure {
    pub stage: SendStage,
    #[source]
    pub error: WalletError,
}

/// Kết quả của một attempt
#[derive(Debug, Clone)]
pub struct SendReport {
    /// Các stage đã đi qua, bắt đầu từ `Idle`
    pub history: Vec<SendStage>,
    /// Signature, nếu attempt đã tới bước ký
    pub signature: Option<Signature>,
    pub outcome: Result<TransactionReceipt, SendFailure>,
}

impl SendReport {
    pub fn final_stage(&self) -> SendStage {
        self.history.last().copied().unwrap_or(SendStage::Idle)
    }

    /// Trạng thái cuối của giao dịch, phân biệt hết hạn với thất bại
    pub fn status(&self) -> TransactionStatus {
        match &self.outcome {
            Ok(receipt) => receipt.status,
            Err(SendFailure {
                error: WalletError::Expired { .. },
                ..
            }) => TransactionStatus::Expired,
            Err(_) => TransactionStatus::Failed,
        }
    }
}

/// Một lần gửi
#[derive(Debug)]
pub struct SendAttempt {
    stage: SendStage,
    history: Vec<SendStage>,
    signature: Option<Signature>,
}

impl Default for SendAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl SendAttempt {
    pub fn new() -> Self {
        Self {
            stage: SendStage::Idle,
            history: vec![SendStage::Idle],
            signature: None,
        }
    }

    pub fn stage(&self) -> SendStage {
        self.stage
    }

    fn advance(&mut self, next: SendStage) -> WalletResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(StateError::InvalidTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        tracing::debug!(from = %self.stage, to = %next, "send stage");
        self.stage = next;
        self.history.push(next);
        Ok(())
    }

    /// Nhảy thẳng tới `Failed`, luôn hợp lệ từ stage chưa terminal
    fn fail(&mut self) {
        if !self.stage.is_terminal() {
            self.stage = SendStage::Failed;
            self.history.push(SendStage::Failed);
        }
    }

    /// Chạy toàn bộ pipeline: validate -> fetch anchor + build -> sign -> submit -> confirm
    ///
    /// Request bị consume: account (và secret) được drop ngay sau khi ký.
    pub async fn run<C>(mut self, client: &C, request: SendRequest) -> SendReport
    where
        C: LedgerClient + ?Sized,
    {
        let outcome = match self.drive(client, request).await {
            Ok(receipt) => Ok(receipt),
            Err(error) => {
                let stage = self.stage;
                self.fail();
                tracing::warn!(%stage, %error, "send attempt failed");
                Err(SendFailure { stage, error })
            }
        };
        SendReport {
            history: self.history,
            signature: self.signature,
            outcome,
        }
    }

    async fn drive<C>(&mut self, client: &C, request: SendRequest) -> WalletResult<TransactionReceipt>
    where
        C: LedgerClient + ?Sized,
    {
        let SendRequest {
            from,
            recipient,
            amount,
        } = request;

        self.advance(SendStage::Validating)?;
        let intent = TransferIntent::new(*from.pubkey(), &recipient, &amount)?;

        self.advance(SendStage::Building)?;
        let anchor = client.get_latest_blockhash().await?;
        let unsigned = TransactionBuilder::build_transfer(&intent, &anchor)?;

        self.advance(SendStage::Signing)?;
        let signed = unsigned.sign(from.as_ref())?;
        drop(from);
        let local = signed
            .signature()
            .copied()
            .ok_or_else(|| WalletError::Internal("signed transaction has no signature".into()))?;
        self.signature = Some(local);

        self.advance(SendStage::Submitting)?;
        let echoed = client.send_transaction(&signed).await?;
        if echoed != local {
            tracing::warn!(%local, %echoed, "node echoed a different signature");
        }
        tracing::info!(signature = %local, lamports = intent.lamports, to = %intent.to, "transfer submitted");

        self.advance(SendStage::Confirming)?;
        let receipt = client.confirm_signature(&local, &signed.anchor).await?;

        self.advance(SendStage::Succeeded)?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use SendStage::*;
        assert!(Idle.can_advance_to(Validating));
        assert!(!Idle.can_advance_to(Building));
        assert!(Building.can_advance_to(Failed));
        assert!(Confirming.can_advance_to(Succeeded));
        assert!(!Submitting.can_advance_to(Succeeded));
        assert!(!Succeeded.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Idle));
        assert!(!Failed.can_advance_to(Failed));
    }

    #[test]
    fn test_no_reentry() {
        let mut attempt = SendAttempt::new();
        attempt.advance(SendStage::Validating).unwrap();
        attempt.fail();
        attempt.fail();
        assert!(matches!(
            attempt.advance(SendStage::Validating),
            Err(WalletError::State(StateError::InvalidTransition { .. }))
        ));
        assert_eq!(
            attempt.history,
            vec![SendStage::Idle, SendStage::Validating, SendStage::Failed]
        );
    }
}
