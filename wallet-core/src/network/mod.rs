// wallet-core/src/network/mod.rs
//
// Network Module - Ledger client architecture
//
// Cung cấp:
// - Traits định nghĩa contract với RPC node (LedgerClient, FaucetProvider)
// - Models cho balance, anchor, signature status, receipt
// - RpcClient: JSON-RPC 2.0 over HTTPS

pub mod models;
pub mod rpc;
pub mod traits;

// Re-export cho convenience
pub use models::*;
pub use rpc::RpcClient;
pub use traits::*;
