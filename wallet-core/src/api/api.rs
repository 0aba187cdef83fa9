use crate::chains::solana::address::SolanaAddress;
use crate::chains::SolanaCluster;
use crate::config::WalletConfig;
use crate::crypto::{KeyDeriver, WalletMnemonic};
use crate::error::WalletResult;
use crate::logging;
use crate::network::models::{AccountInfo, AddressValidation, NetworkInfo};
use crate::network::rpc::RpcClient;
use crate::wallet::WalletDriver;

// Core Initialization
pub fn init_core() -> WalletResult<()> {
    logging::init_logging();
    Ok(())
}

// --- Key Management ---

pub fn create_mnemonic() -> WalletResult<WalletMnemonic> {
    WalletMnemonic::generate()
}

pub fn restore_wallet(phrase: &str) -> WalletResult<WalletMnemonic> {
    WalletMnemonic::from_phrase(phrase)
}

/// Thông tin công khai của account `index`, không giữ lại secret
pub fn derive_account_info(phrase: &str, passphrase: &str, index: u32) -> WalletResult<AccountInfo> {
    let seed = WalletMnemonic::from_phrase(phrase)?.to_seed(passphrase)?;
    Ok(KeyDeriver::derive_account(&seed, index)?.info())
}

pub fn validate_address(address: &str) -> AddressValidation {
    SolanaAddress::validate(address)
}

// --- Connection ---

/// Driver nối với endpoint đã cấu hình
pub fn connect(config: &WalletConfig) -> WalletResult<WalletDriver<RpcClient>> {
    let client = RpcClient::new(config)?;
    tracing::info!(cluster = %config.cluster, endpoint = %config.redacted_endpoint(), "connected");
    Ok(WalletDriver::new(client))
}

pub fn connect_from_env() -> WalletResult<WalletDriver<RpcClient>> {
    connect(&WalletConfig::from_env()?)
}

// --- Config Helpers ---

/// Danh mục cluster với public RPC URL (chỉ để hiển thị)
pub fn get_default_clusters() -> Vec<NetworkInfo> {
    SolanaCluster::ALL
        .iter()
        .map(|cluster| cluster.network_info(cluster.public_rpc_url()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clusters() {
        let clusters = get_default_clusters();
        assert_eq!(clusters.len(), 4);
        assert!(clusters.iter().any(|c| c.cluster == SolanaCluster::Devnet && c.has_faucet));
        assert!(clusters
            .iter()
            .any(|c| c.cluster == SolanaCluster::MainnetBeta && !c.has_faucet));
    }

    #[test]
    fn test_restore_and_derive() {
        let mnemonic = create_mnemonic().unwrap();
        let restored = restore_wallet(mnemonic.phrase()).unwrap();
        assert_eq!(restored.phrase(), mnemonic.phrase());

        let a = derive_account_info(mnemonic.phrase(), "", 0).unwrap();
        let b = derive_account_info(mnemonic.phrase(), "", 1).unwrap();
        assert_ne!(a.address, b.address);
        assert!(validate_address(&a.address).is_valid);
    }
}
