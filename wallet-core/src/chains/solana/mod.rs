// wallet-core/src/chains/solana/mod.rs
//
// Solana Chain Module
//
// - address: base58 Pubkey + validation
// - amount: SOL <-> lamports
// - instruction: System Program transfer + compact-u16
// - transaction: message compile, build, sign, serialize
// - signer: Signature + TransactionSigner trait

pub mod address;
pub mod amount;
pub mod instruction;
pub mod signer;
pub mod transaction;

pub use address::{Pubkey, SolanaAddress};
pub use amount::{lamports_to_sol, sol_to_lamports, LAMPORTS_PER_SOL};
pub use signer::{Signature, TransactionSigner};
pub use transaction::{
    Hash, Message, SignedTransaction, TransactionBuilder, TransferIntent, UnsignedTransaction,
};
