use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// btcrpc — talk to a Bitcoin Core node over JSON-RPC and print the results.
///
/// Without a subcommand, prints blockchain info followed by the wallet balance.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC host.
    #[arg(long, default_value = "127.0.0.1", env = "BTCRPC_HOST")]
    pub host: String,

    /// Node RPC port.
    #[arg(long, default_value = "8332", env = "BTCRPC_PORT")]
    pub port: u16,

    /// RPC username.
    #[arg(long, default_value = "user", env = "BTCRPC_USER")]
    pub rpc_user: String,

    /// RPC password.
    #[arg(
        long,
        default_value = "password",
        env = "BTCRPC_PASSWORD",
        hide_env_values = true
    )]
    pub rpc_pass: String,

    /// Read credentials from a bitcoind cookie file instead of user/password.
    #[arg(
        long,
        env = "BTCRPC_COOKIE_FILE",
        conflicts_with_all = ["rpc_user", "rpc_pass"]
    )]
    pub rpc_cookie_file: Option<PathBuf>,

    /// Use HTTPS instead of plain HTTP.
    #[arg(long, env = "BTCRPC_HTTPS")]
    pub https: bool,

    /// Timeout for each RPC round trip, in seconds.
    #[arg(
        long,
        default_value = "30",
        env = "BTCRPC_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show chain, block height and sync state (getblockchaininfo).
    BlockchainInfo,

    /// Show the wallet balance (getbalance).
    Balance,

    /// Create a named wallet (createwallet).
    CreateWallet {
        name: String,
    },

    /// Show wallet metadata (getwalletinfo).
    WalletInfo,

    /// Have the node dump wallet keys to a file on the node's filesystem (dumpwallet).
    DumpWallet {
        /// Destination path, interpreted by the node.
        path: String,
    },

    /// Estimate the fee rate for confirmation within a number of blocks (estimaterawfee).
    EstimateFee {
        /// Confirmation target in blocks (1-1008).
        conf_target: u32,
    },

    /// List the wallet's output descriptors (listdescriptors).
    ListDescriptors {
        /// Include private keys; the wallet must be unlocked.
        #[arg(long)]
        private: bool,
    },

    /// Call any RPC method. Each parameter is parsed as JSON, or sent as a
    /// string if it is not valid JSON.
    Call {
        method: String,
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },
}

/// Parse one command-line parameter the way `bitcoin-cli` does: JSON when it
/// parses, otherwise a plain string.
pub fn parse_param(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()))
}
