//! The fixed set of node methods exposed as typed operations.
//!
//! Each operation pins the method name and parameter shape, validates the
//! caller's arguments before anything is sent, and hands back an
//! [`RpcOutcome`] labelled for display.

use std::fmt;

use serde_json::json;

use crate::error::{CoreError, RpcError};

use super::{RpcClient, RpcOutcome, RpcTransport};

/// Confirmation targets accepted by `estimaterawfee`.
pub const MIN_CONF_TARGET: u32 = 1;
pub const MAX_CONF_TARGET: u32 = 1008;

// ==============================================================================
// NodeMethod
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeMethod {
    GetBlockchainInfo,
    GetBalance,
    CreateWallet,
    GetWalletInfo,
    DumpWallet,
    EstimateRawFee,
    ListDescriptors,
}

impl NodeMethod {
    pub const ALL: [NodeMethod; 7] = [
        NodeMethod::GetBlockchainInfo,
        NodeMethod::GetBalance,
        NodeMethod::CreateWallet,
        NodeMethod::GetWalletInfo,
        NodeMethod::DumpWallet,
        NodeMethod::EstimateRawFee,
        NodeMethod::ListDescriptors,
    ];

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetBlockchainInfo => "getblockchaininfo",
            Self::GetBalance => "getbalance",
            Self::CreateWallet => "createwallet",
            Self::GetWalletInfo => "getwalletinfo",
            Self::DumpWallet => "dumpwallet",
            Self::EstimateRawFee => "estimaterawfee",
            Self::ListDescriptors => "listdescriptors",
        }
    }

    /// Human-readable prefix printed before the result.
    pub fn label(self) -> &'static str {
        match self {
            Self::GetBlockchainInfo => "Blockchain Info:",
            Self::GetBalance => "Wallet Balance:",
            Self::CreateWallet => "Wallet Created:",
            Self::GetWalletInfo => "Wallet Info:",
            Self::DumpWallet => "Wallet Dumped To:",
            Self::EstimateRawFee => "Estimate Raw Fee:",
            Self::ListDescriptors => "List of Descriptors:",
        }
    }
}

impl fmt::Display for NodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==============================================================================
// Operations
// ==============================================================================

impl<T: RpcTransport> RpcClient<T> {
    async fn invoke(
        &self,
        method: NodeMethod,
        params: Vec<serde_json::Value>,
    ) -> Result<RpcOutcome, CoreError> {
        let result = self.call(method.name(), &params).await?;
        Ok(RpcOutcome::new(method.name(), method.label(), result))
    }

    /// Call an arbitrary method and label the outcome with its name.
    pub async fn call_labeled(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<RpcOutcome, CoreError> {
        let result = self.call(method, &params).await?;
        Ok(RpcOutcome::new(method, format!("{method}:"), result))
    }

    /// `getblockchaininfo`: chain, height, sync progress.
    pub async fn get_blockchain_info(&self) -> Result<RpcOutcome, CoreError> {
        self.invoke(NodeMethod::GetBlockchainInfo, Vec::new()).await
    }

    /// `getbalance` of the node's default wallet.
    pub async fn get_balance(&self) -> Result<RpcOutcome, CoreError> {
        self.invoke(NodeMethod::GetBalance, Vec::new()).await
    }

    pub async fn create_wallet(&self, wallet_name: &str) -> Result<RpcOutcome, CoreError> {
        let wallet_name =
            require_non_empty(NodeMethod::CreateWallet, "wallet name", wallet_name)?;
        self.invoke(NodeMethod::CreateWallet, vec![json!(wallet_name)])
            .await
    }

    pub async fn get_wallet_info(&self) -> Result<RpcOutcome, CoreError> {
        self.invoke(NodeMethod::GetWalletInfo, Vec::new()).await
    }

    /// Ask the node to write the wallet's keys to `file_path` on the node's
    /// own filesystem. Only the path string leaves this process.
    pub async fn dump_wallet(&self, file_path: &str) -> Result<RpcOutcome, CoreError> {
        let file_path = require_non_empty(NodeMethod::DumpWallet, "dump file path", file_path)?;
        self.invoke(NodeMethod::DumpWallet, vec![json!(file_path)])
            .await
    }

    /// Fee estimate for confirmation within `conf_target` blocks.
    pub async fn estimate_raw_fee(&self, conf_target: u32) -> Result<RpcOutcome, CoreError> {
        if !(MIN_CONF_TARGET..=MAX_CONF_TARGET).contains(&conf_target) {
            return Err(CoreError::rpc(
                NodeMethod::EstimateRawFee.name(),
                RpcError::RequestConstruction(format!(
                    "conf_target must be between {MIN_CONF_TARGET} and {MAX_CONF_TARGET}, got {conf_target}"
                )),
            ));
        }
        self.invoke(NodeMethod::EstimateRawFee, vec![json!(conf_target)])
            .await
    }

    /// Active output descriptors. With `include_private` the node includes
    /// private key material, which requires an unlocked wallet.
    pub async fn list_descriptors(&self, include_private: bool) -> Result<RpcOutcome, CoreError> {
        self.invoke(NodeMethod::ListDescriptors, vec![json!(include_private)])
            .await
    }
}

fn require_non_empty<'a>(
    method: NodeMethod,
    what: &str,
    value: &'a str,
) -> Result<&'a str, CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::rpc(
            method.name(),
            RpcError::RequestConstruction(format!("{what} must not be empty")),
        ));
    }
    Ok(value)
}
