// wallet-core/src/wallet/mod.rs
//
// Wallet Module
//
// - account: Account + opaque SecretKey
// - registry: KeypairRegistry (append-only, contiguous indices)
// - session: pure reducer (snapshot, action) -> (snapshot, effects)
// - send: send state machine cho một attempt
// - driver: thực thi effects với LedgerClient được inject

pub mod account;
pub mod driver;
pub mod registry;
pub mod send;
pub mod session;

pub use account::{Account, SecretKey};
pub use driver::{EffectOutcome, WalletDriver, DEFAULT_AIRDROP_LAMPORTS};
pub use registry::KeypairRegistry;
pub use send::{SendAttempt, SendFailure, SendReport, SendRequest, SendStage};
pub use session::{reduce, Action, Effect, Transition, WalletState};
