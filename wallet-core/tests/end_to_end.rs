// End-to-end flows through the driver with an in-memory ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use wallet_core::chains::solana::{
    Hash, Pubkey, Signature, SignedTransaction, TransactionBuilder, TransferIntent,
};
use wallet_core::chains::SolanaCluster;
use wallet_core::crypto::WalletMnemonic;
use wallet_core::error::{MnemonicError, StateError, TransactionError};
use wallet_core::network::{
    Commitment, FaucetProvider, LedgerClient, NetworkInfo, RecentBlockhash, SignatureStatus,
    TransactionStatus,
};
use wallet_core::wallet::{SendStage, WalletDriver};
use wallet_core::{ErrorKind, WalletError, WalletResult};

const RECIPIENT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

const ANCHOR: RecentBlockhash = RecentBlockhash {
    blockhash: Hash::new([7u8; 32]),
    last_valid_block_height: 105,
};

/// Chặn một call của stub tới khi test cho phép chạy tiếp
#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(slot: &Mutex<Option<Arc<Gate>>>) {
        let gate = slot.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

struct StubLedger {
    network: NetworkInfo,
    balance_gate: Mutex<Option<Arc<Gate>>>,
    status_gate: Mutex<Option<Arc<Gate>>>,
    confirms: bool,
    block_height: AtomicU64,
    anchor_fetches: AtomicUsize,
    balances: Mutex<HashMap<Pubkey, u64>>,
    submitted: Mutex<Vec<SignedTransaction>>,
    airdrops: Mutex<Vec<(Pubkey, u64)>>,
}

impl StubLedger {
    fn new(cluster: SolanaCluster, confirms: bool) -> Self {
        Self {
            network: cluster.network_info("http://stub"),
            balance_gate: Mutex::new(None),
            status_gate: Mutex::new(None),
            confirms,
            block_height: AtomicU64::new(100),
            anchor_fetches: AtomicUsize::new(0),
            balances: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            airdrops: Mutex::new(Vec::new()),
        }
    }

    fn fund(&self, pubkey: Pubkey, lamports: u64) {
        self.balances.lock().unwrap().insert(pubkey, lamports);
    }

    fn gate_balance(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.balance_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn gate_status(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.status_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl LedgerClient for StubLedger {
    fn network_info(&self) -> &NetworkInfo {
        &self.network
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(1)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> WalletResult<u64> {
        Gate::pass(&self.balance_gate).await;
        Ok(self.balances.lock().unwrap().get(pubkey).copied().unwrap_or(0))
    }

    async fn get_latest_blockhash(&self) -> WalletResult<RecentBlockhash> {
        self.anchor_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(ANCHOR)
    }

    async fn get_block_height(&self) -> WalletResult<u64> {
        Ok(self.block_height.fetch_add(1, Ordering::SeqCst))
    }

    async fn send_transaction(&self, transaction: &SignedTransaction) -> WalletResult<Signature> {
        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(*transaction.signature().unwrap())
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> WalletResult<Option<SignatureStatus>> {
        Gate::pass(&self.status_gate).await;
        if !self.confirms {
            return Ok(None);
        }
        Ok(Some(SignatureStatus {
            slot: 42,
            confirmations: Some(1),
            err: None,
            confirmation_status: Some(Commitment::Confirmed),
        }))
    }

    fn faucet(&self) -> Option<&dyn FaucetProvider> {
        if self.network.has_faucet {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl FaucetProvider for StubLedger {
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> WalletResult<Signature> {
        self.airdrops.lock().unwrap().push((*pubkey, lamports));
        Ok(Signature::new([1u8; 64]))
    }
}

async fn driver_with_accounts(
    ledger: StubLedger,
    count: usize,
) -> WalletDriver<StubLedger> {
    let driver = WalletDriver::new(ledger);
    driver
        .load_mnemonic(WalletMnemonic::generate().unwrap(), "")
        .await
        .unwrap();
    for _ in 0..count {
        driver.add_wallet().await.unwrap();
    }
    driver
}

#[tokio::test]
async fn generate_derive_and_query_unfunded_balance() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 2).await;

    let state = driver.snapshot().await;
    let accounts = state.accounts();
    assert_eq!(accounts.len(), 2);
    assert_ne!(accounts[0].address, accounts[1].address);
    assert_eq!(accounts[1].derivation_path, "m/44'/501'/1'/0'");
    for info in &accounts {
        assert!(info.address.parse::<Pubkey>().is_ok());
    }

    let balances = driver.check_balance(Some(1)).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].balance.raw, "0");
    assert_eq!(driver.snapshot().await.balance(1).unwrap().formatted, "0");
}

#[tokio::test]
async fn balances_for_all_accounts() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 3).await;
    let funded = *driver.snapshot().await.registry().list()[2].pubkey();
    driver.client().fund(funded, 1_500_000_000);

    let balances = driver.check_balance(None).await.unwrap();
    let formatted: Vec<_> = balances.iter().map(|b| b.balance.formatted.as_str()).collect();
    assert_eq!(formatted, vec!["0", "0", "1.5"]);
}

#[tokio::test]
async fn send_builds_signs_and_confirms_against_fixed_anchor() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await;

    let report = driver.send(0, RECIPIENT, "0.01").await.unwrap();
    assert_eq!(report.status(), TransactionStatus::Confirmed);
    let receipt = report.outcome.as_ref().expect("send succeeds");
    assert_eq!(receipt.status, TransactionStatus::Confirmed);
    assert_eq!(receipt.slot, Some(42));
    assert!(receipt
        .explorer_url
        .as_deref()
        .unwrap()
        .ends_with("?cluster=devnet"));
    assert_eq!(
        report.history,
        vec![
            SendStage::Idle,
            SendStage::Validating,
            SendStage::Building,
            SendStage::Signing,
            SendStage::Submitting,
            SendStage::Confirming,
            SendStage::Succeeded,
        ]
    );

    let submitted = driver.client().submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0];
    assert_eq!(tx.signatures.len(), 1);
    assert_eq!(tx.recent_blockhash(), &ANCHOR.blockhash);
    assert_eq!(tx.anchor, ANCHOR);
    assert!(tx.verify().unwrap());
    assert_eq!(tx.serialize().unwrap().len(), 215);
    assert_eq!(report.signature.as_ref(), tx.signature());
    assert_eq!(receipt.signature, *tx.signature().unwrap());
}

#[tokio::test]
async fn invalid_amount_fails_before_network() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await;

    for amount in ["0", "-1", "abc"] {
        let report = driver.send(0, RECIPIENT, amount).await.unwrap();
        let failure = report.outcome.unwrap_err();
        assert_eq!(failure.stage, SendStage::Validating);
        assert!(matches!(
            failure.error,
            WalletError::Transaction(TransactionError::InvalidAmount(_))
        ));
        assert_eq!(failure.error.kind(), ErrorKind::InputValidation);
    }

    let report = driver.send(0, "not-an-address", "1").await.unwrap();
    assert!(matches!(
        report.outcome.unwrap_err().error,
        WalletError::Transaction(TransactionError::InvalidRecipient(_))
    ));

    assert_eq!(driver.client().anchor_fetches.load(Ordering::SeqCst), 0);
    assert!(driver.client().submitted.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_send_expires_after_last_valid_height() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, false), 1).await;

    let report = driver.send(0, RECIPIENT, "1.5").await.unwrap();
    assert_eq!(report.final_stage(), SendStage::Failed);
    assert_eq!(report.status(), TransactionStatus::Expired);
    assert!(report.signature.is_some());
    let failure = report.outcome.unwrap_err();
    assert_eq!(failure.stage, SendStage::Confirming);
    match failure.error {
        WalletError::Expired {
            last_valid_block_height,
            block_height,
            ..
        } => {
            assert_eq!(last_valid_block_height, ANCHOR.last_valid_block_height);
            assert!(block_height > last_valid_block_height);
        }
        other => panic!("expected expiry, got {:?}", other),
    }

    // Retry = attempt mới với anchor mới
    let _ = driver.send(0, RECIPIENT, "1.5").await.unwrap();
    assert_eq!(driver.client().anchor_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn airdrop_uses_faucet_when_available() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await;
    let receipt = driver.airdrop(0, 1_000_000_000).await.unwrap();
    assert!(receipt.is_some());
    assert_eq!(driver.client().airdrops.lock().unwrap().len(), 1);

    let mainnet = driver_with_accounts(StubLedger::new(SolanaCluster::MainnetBeta, true), 1).await;
    assert!(mainnet.airdrop(0, 1_000_000_000).await.unwrap().is_none());
}

#[tokio::test]
async fn clear_then_add_restarts_at_zero() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 3).await;
    let first = *driver.snapshot().await.registry().list()[0].pubkey();

    driver.clear_wallets().await.unwrap();
    assert!(driver.snapshot().await.accounts().is_empty());

    let again = driver.add_wallet().await.unwrap();
    assert_eq!(again.index(), 0);
    assert_eq!(*again.pubkey(), first);
}

#[tokio::test]
async fn actions_without_seed_are_state_errors() {
    let driver = WalletDriver::new(StubLedger::new(SolanaCluster::Devnet, true));
    assert_eq!(
        driver.add_wallet().await.unwrap_err(),
        WalletError::State(StateError::NoSeedLoaded)
    );
    assert_eq!(
        driver.send(0, RECIPIENT, "1").await.unwrap_err(),
        WalletError::State(StateError::UnknownAccount(0))
    );
}

#[tokio::test]
async fn restored_phrase_derives_same_accounts() {
    let mnemonic = WalletMnemonic::generate().unwrap();
    let words: Vec<String> = mnemonic.words().iter().map(|w| w.to_uppercase()).collect();

    let a = WalletDriver::new(StubLedger::new(SolanaCluster::Devnet, true));
    a.load_mnemonic(mnemonic.clone(), "").await.unwrap();
    let b = WalletDriver::new(StubLedger::new(SolanaCluster::Devnet, true));
    b.load_mnemonic(WalletMnemonic::parse(&words).unwrap(), "").await.unwrap();

    for _ in 0..3 {
        let x = a.add_wallet().await.unwrap();
        let y = b.add_wallet().await.unwrap();
        assert_eq!(x.pubkey(), y.pubkey());
        assert_eq!(*x.secret().export_hex(), *y.secret().export_hex());
    }

    let short: Vec<&str> = words.iter().take(11).map(String::as_str).collect();
    assert_eq!(
        WalletMnemonic::parse(&short).unwrap_err(),
        WalletError::Mnemonic(MnemonicError::InvalidWordCount(11))
    );
}

#[tokio::test]
async fn balance_fetched_for_replaced_seed_is_discarded() {
    let driver = Arc::new(
        driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await,
    );
    let old = *driver.snapshot().await.registry().list()[0].pubkey();
    driver.client().fund(old, 777);
    let gate = driver.client().gate_balance();

    let pending = tokio::spawn({
        let driver = Arc::clone(&driver);
        async move { driver.check_balance(Some(0)).await }
    });
    gate.entered.notified().await;

    driver
        .load_mnemonic(WalletMnemonic::generate().unwrap(), "")
        .await
        .unwrap();
    let fresh = driver.add_wallet().await.unwrap();
    assert_ne!(*fresh.pubkey(), old);
    gate.release.notify_one();

    let fetched = pending.await.unwrap().unwrap();
    assert_eq!(fetched[0].address, old);
    assert_eq!(fetched[0].balance.raw, "777");
    assert!(driver.snapshot().await.balance(0).is_none());
}

#[tokio::test]
async fn signing_account_is_released_before_confirmation() {
    let driver = Arc::new(
        driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await,
    );
    let weak = Arc::downgrade(&driver.snapshot().await.registry().list()[0]);
    let gate = driver.client().gate_status();

    let pending = tokio::spawn({
        let driver = Arc::clone(&driver);
        async move { driver.send(0, RECIPIENT, "0.01").await }
    });
    gate.entered.notified().await;

    // Đang chờ confirm: chỉ registry còn giữ account
    assert!(weak.upgrade().is_some());
    driver.clear_wallets().await.unwrap();
    assert!(weak.upgrade().is_none());

    gate.release.notify_one();
    let report = pending.await.unwrap().unwrap();
    assert_eq!(report.final_stage(), SendStage::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_get_contiguous_indices() {
    let driver = Arc::new(WalletDriver::new(StubLedger::new(SolanaCluster::Devnet, true)));
    driver
        .load_mnemonic(WalletMnemonic::generate().unwrap(), "")
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let driver = Arc::clone(&driver);
            tokio::spawn(async move { driver.add_wallet().await })
        })
        .collect();

    let mut indices = Vec::new();
    let mut pubkeys = std::collections::HashSet::new();
    for handle in handles {
        let account = handle.await.unwrap().unwrap();
        indices.push(account.index());
        pubkeys.insert(*account.pubkey());
    }
    indices.sort_unstable();
    assert_eq!(indices, (0..16).collect::<Vec<u32>>());
    assert_eq!(pubkeys.len(), 16);
    assert_eq!(driver.snapshot().await.registry().next_index(), 16);
}

#[tokio::test]
async fn submit_and_confirm_uses_transaction_anchor() {
    let driver = driver_with_accounts(StubLedger::new(SolanaCluster::Devnet, true), 1).await;
    let account = driver.add_wallet().await.unwrap();

    let intent = TransferIntent::from_lamports(*account.pubkey(), RECIPIENT, 5_000).unwrap();
    let signed = TransactionBuilder::build_transfer(&intent, &ANCHOR)
        .unwrap()
        .sign(account.as_ref())
        .unwrap();

    let receipt = driver.client().submit_and_confirm(&signed).await.unwrap();
    assert_eq!(receipt.status, TransactionStatus::Confirmed);
    assert_eq!(receipt.signature, *signed.signature().unwrap());
    assert_eq!(driver.client().submitted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn network_status_reports_block_height() {
    let driver = WalletDriver::new(StubLedger::new(SolanaCluster::Devnet, true));
    let status = driver.network_status().await.unwrap();
    assert!(status.is_online);
    assert_eq!(status.block_height, 100);
}
