//! ethrpc CLI — query an Ethereum node from the terminal.
//!
//! Usage:
//! ```bash
//! # Balance of an address (wei)
//! ethrpc balance --address 0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b
//!
//! # Nonce at a specific block
//! ethrpc nonce --address 0xa94f… --tag pending
//!
//! # Gas limit of the latest block
//! ethrpc gas-limit --url http://localhost:8545/
//!
//! # Receipt of a mined transaction
//! ethrpc receipt --hash 0x88df…
//! ```

use std::env;
use std::process;

use ethrpc_client::{Address, BlockTag, EthClient, Hash};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "balance" => cmd_balance(&args[2..]).await,
        "nonce" => cmd_nonce(&args[2..]).await,
        "gas-limit" => cmd_gas_limit(&args[2..]).await,
        "receipt" => cmd_receipt(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("ethrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("ethrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Query an Ethereum node over JSON-RPC\n");
    println!("USAGE:");
    println!("    ethrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    balance    Balance of an address in wei");
    println!("    nonce      Transaction count of an address");
    println!("    gas-limit  Gas limit of the latest block");
    println!("    receipt    Receipt of a mined transaction");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --url <URL>          RPC endpoint  [default: http://localhost:8545/]");
    println!("    --address <ADDRESS>  Account address (balance, nonce)");
    println!("    --hash <HASH>        Transaction hash (receipt)");
    println!("    --tag <TAG>          latest | earliest | pending | 0x…  [default: latest]");
}

fn client_for(args: &[String]) -> anyhow::Result<EthClient> {
    let url = parse_flag(args, "--url")
        .unwrap_or_else(|| "http://localhost:8545/".to_string());
    Ok(EthClient::connect(url)?)
}

fn address_arg(args: &[String]) -> anyhow::Result<Address> {
    let raw = parse_flag(args, "--address")
        .ok_or_else(|| anyhow::anyhow!("--address is required"))?;
    Ok(raw.parse::<Address>()?)
}

fn tag_arg(args: &[String]) -> anyhow::Result<BlockTag> {
    match parse_flag(args, "--tag") {
        Some(raw) => Ok(raw.parse::<BlockTag>()?),
        None => Ok(BlockTag::Latest),
    }
}

async fn cmd_balance(args: &[String]) -> anyhow::Result<()> {
    let client = client_for(args)?;
    let address = address_arg(args)?;
    let balance = client.balance_at(&address, tag_arg(args)?).await?;
    println!("{balance}");
    Ok(())
}

async fn cmd_nonce(args: &[String]) -> anyhow::Result<()> {
    let client = client_for(args)?;
    let address = address_arg(args)?;
    let nonce = client.nonce_at(&address, tag_arg(args)?).await?;
    println!("{nonce}");
    Ok(())
}

async fn cmd_gas_limit(args: &[String]) -> anyhow::Result<()> {
    let client = client_for(args)?;
    match client.latest_block_gas_limit().await? {
        Some(limit) => println!("{limit}"),
        None => println!("no latest block"),
    }
    Ok(())
}

async fn cmd_receipt(args: &[String]) -> anyhow::Result<()> {
    let client = client_for(args)?;
    let raw = parse_flag(args, "--hash")
        .ok_or_else(|| anyhow::anyhow!("--hash is required"))?;
    let hash = raw.parse::<Hash>()?;
    match client.transaction_receipt(&hash).await? {
        Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
        None => println!("not mined yet"),
    }
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
