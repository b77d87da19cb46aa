//! Command-line front end for the staking and dice roll programs.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dice_roll_client::{
    constants::NO_REFERRER, events::bet_results, subscribe_logs, ClientConfig, DiceRollClient,
    RpcLedger,
};
use futures::StreamExt;
use solana_sdk::{
    pubkey::Pubkey,
    signer::{keypair::read_keypair_file, keypair::Keypair, Signer},
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the staking and dice roll programs")]
struct Args {
    /// JSON config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Signer keypair file
    #[arg(long, default_value = "~/.config/solana/id.json")]
    keypair: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every derived program address
    Addresses,
    /// Show the staking settings record
    Settings,
    /// Show a user's staking state
    UserState { owner: Pubkey },
    /// Deposit lamports as a new position
    Deposit {
        lamports: u64,
        #[arg(long)]
        referrer: Option<Pubkey>,
    },
    /// Close out a position
    Unstake { invest_data: Pubkey },
    /// Reinvest a position's rewards
    Compound { invest_data: Pubkey },
    /// Bet lamports that the roll lands under `target`
    PlaceSolBet { lamports: u64, target: u8 },
    /// Stream bet results as they are confirmed
    Listen,
}

fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded = match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").context("HOME not set")?;
            PathBuf::from(home).join(rest)
        }
        None => PathBuf::from(path),
    };
    read_keypair_file(&expanded)
        .map_err(|e| anyhow!("failed to read keypair {}: {e}", expanded.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    let ledger = Arc::new(RpcLedger::new(&config));
    let client = DiceRollClient::new(ledger, config.clone())?;

    match args.command {
        Command::Addresses => {
            let addresses = client.addresses();
            println!("staking program  {}", addresses.staking_program());
            println!("settings         {}", addresses.settings());
            println!("pool             {}", addresses.pool());
            println!("blacklist        {}", addresses.blacklist());
            println!("dice program     {}", addresses.dice_program());
            println!("dice state       {}", addresses.dice_state());
            println!("sol vault        {}", addresses.vault());
        }
        Command::Settings => {
            let settings = client.settings().await?;
            println!("{settings:#?}");
        }
        Command::UserState { owner } => match client.user_state(&owner).await? {
            Some(state) => println!("{state:#?}"),
            None => println!("no user state for {owner}"),
        },
        Command::Deposit { lamports, referrer } => {
            let user = load_keypair(&args.keypair)?;
            let receipt = client
                .deposit(&user, lamports, referrer.unwrap_or(NO_REFERRER))
                .await?;
            info!(
                signature = %receipt.signature,
                invest_data = %receipt.invest_data,
                referrer = %receipt.referrer,
                "deposit confirmed"
            );
            println!("{}", receipt.invest_data);
        }
        Command::Unstake { invest_data } => {
            let user = load_keypair(&args.keypair)?;
            let signature = client.unstake(&user, invest_data).await?;
            println!("{signature}");
        }
        Command::Compound { invest_data } => {
            let user = load_keypair(&args.keypair)?;
            let signature = client.compound(&user, invest_data).await?;
            println!("{signature}");
        }
        Command::PlaceSolBet { lamports, target } => {
            let user = load_keypair(&args.keypair)?;
            info!(user = %user.pubkey(), lamports, target, "placing bet");
            let signature = client.place_sol_bet(&user, lamports, target).await?;
            println!("{signature}");
        }
        Command::Listen => {
            let dice_program = client.addresses().dice_program();
            let logs =
                subscribe_logs(&config.ws_url, dice_program, config.commitment.into()).await?;
            info!(%dice_program, "listening for bet results");
            let mut results = Box::pin(bet_results(dice_program, logs));
            while let Some(notice) = results.next().await {
                let bet = notice.event;
                info!(
                    signature = %notice.signature,
                    user = %bet.user,
                    amount = bet.amount,
                    target = bet.target,
                    roll = bet.roll,
                    won = bet.won,
                    payout = bet.payout,
                    "bet result"
                );
            }
        }
    }
    Ok(())
}
