mod cli;

use std::time::Duration;

use btcrpc_core::{
    ConnectionConfig, CoreError, Credentials, HttpTransport, RpcClient, RpcOutcome, Scheme,
};
use clap::Parser;
use eyre::{eyre, WrapErr};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = connection_config(&args)?;
    let rpc = RpcClient::connect(&config).context("build RPC client")?;
    tracing::debug!(url = %rpc.transport().url(), "using node RPC endpoint");

    let commands = match args.command {
        Some(command) => vec![command],
        None => vec![Command::BlockchainInfo, Command::Balance],
    };

    // Stop at the first failure; nothing after it is reported.
    for command in &commands {
        let outcome = run(&rpc, command).await.map_err(describe_failure)?;
        println!("{outcome}");
    }

    Ok(())
}

fn connection_config(args: &Cli) -> eyre::Result<ConnectionConfig> {
    let credentials = match &args.rpc_cookie_file {
        Some(path) => Credentials::from_cookie_file(path).context("load RPC credentials")?,
        None => Credentials::new(&args.rpc_user, &args.rpc_pass),
    };

    let config = ConnectionConfig::new(
        &args.host,
        args.port,
        credentials,
        Scheme::from_https_flag(args.https),
    )
    .with_timeout(Duration::from_secs(args.timeout_secs));
    Ok(config)
}

async fn run(rpc: &RpcClient<HttpTransport>, command: &Command) -> Result<RpcOutcome, CoreError> {
    match command {
        Command::BlockchainInfo => rpc.get_blockchain_info().await,
        Command::Balance => rpc.get_balance().await,
        Command::CreateWallet { name } => rpc.create_wallet(name).await,
        Command::WalletInfo => rpc.get_wallet_info().await,
        Command::DumpWallet { path } => rpc.dump_wallet(path).await,
        Command::EstimateFee { conf_target } => rpc.estimate_raw_fee(*conf_target).await,
        Command::ListDescriptors { private } => rpc.list_descriptors(*private).await,
        Command::Call { method, params } => {
            let params = params.iter().map(|p| cli::parse_param(p)).collect();
            rpc.call_labeled(method, params).await
        }
    }
}

/// Turn a failed call into a report naming the method, the failure kind and
/// every upstream cause, plus a hint for the common connection problems.
fn describe_failure(err: CoreError) -> eyre::Report {
    let mut lines = vec![err.to_string()];

    if let Some(rpc_error) = err.rpc_error() {
        lines.push(format!("error kind: {}", rpc_error.kind()));

        let mut chain = rpc_error.to_string();
        let mut source = std::error::Error::source(rpc_error);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            // Transport errors repeat their source in their own message.
            if !chain.contains(&cause_text) {
                lines.push(format!("caused by: {cause_text}"));
                chain.push('\n');
                chain.push_str(&cause_text);
            }
            source = cause.source();
        }

        if let Some(hint) = failure_hint(&chain) {
            lines.push(format!("hint: {hint}"));
        }
    }

    eyre!(lines.join("\n"))
}

/// Pick a hint from the full error chain. Specific causes are checked before
/// the generic send failure that wraps all of them.
fn failure_hint(chain: &str) -> Option<&'static str> {
    let chain = chain.to_lowercase();
    if chain.contains("http 401") || chain.contains("http 403") {
        Some("authentication failed; verify --rpc-user/--rpc-pass or --rpc-cookie-file")
    } else if chain.contains("timed out") || chain.contains("timeout") {
        Some("node did not answer in time; check its load or raise --timeout-secs")
    } else if chain.contains("tls") || chain.contains("certificate") || chain.contains("ssl") {
        Some("TLS handshake failed; verify the endpoint really serves HTTPS")
    } else if chain.contains("connection refused") {
        Some("node is unreachable; verify --host/--port and that bitcoind runs with -server")
    } else if chain.contains("error sending request") {
        Some("request could not be sent; verify --host/--port and --https")
    } else if chain.contains("code -18") || chain.contains("error -18:") {
        Some("no wallet is loaded; create or load one first")
    } else {
        None
    }
}
