//! tplink - command line control for TP-Link routers
//!
//! Builds one router client from configuration and runs a single command
//! against it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tplink_router::config::Config;
use tplink_router::Router;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tplink")]
#[command(about = "TP-Link Router Control Client", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Router address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Router web login username (overrides config)
    #[arg(long)]
    admin_username: Option<String>,

    /// Router web login password (overrides config)
    #[arg(long)]
    admin_password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect the PPPoE link
    Connect {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Disconnect the PPPoE link
    Disconnect {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Disconnect, wait, then connect again
    Reconnect {
        /// Seconds to wait between disconnect and connect
        #[arg(short, long)]
        interval: Option<u64>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Reconnect with a different PPPoE account
    ChangeUser {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Clone a MAC address onto the WAN port
    ChangeMac {
        /// MAC address (default: router.mac_address from config)
        #[arg(short, long)]
        mac: Option<String>,
    },
    /// Print the current WAN configuration
    Config {
        /// Print every scraped field instead of the named ones
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut cfg = Config::load(args.config.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    if let Some(host) = args.host {
        cfg.router.host = Some(host);
    }
    if let Some(username) = args.admin_username {
        cfg.router.admin_username = Some(username);
    }
    if let Some(password) = args.admin_password {
        cfg.router.admin_password = Some(password);
    }

    let mut router = cfg.build_router()?;
    let default_interval = cfg.reconnect.interval;

    run(&mut router, args.command, default_interval).await
}

async fn run(router: &mut Router, command: Command, default_interval: u64) -> Result<()> {
    match command {
        Command::Connect { username, password } => {
            router
                .connect(username.as_deref(), password.as_deref())
                .await
                .context("Connect failed")?;
            tracing::info!("Connect request sent");
        }
        Command::Disconnect { username, password } => {
            router
                .disconnect(username.as_deref(), password.as_deref())
                .await
                .context("Disconnect failed")?;
            tracing::info!("Disconnect request sent");
        }
        Command::Reconnect {
            interval,
            username,
            password,
        } => {
            router
                .reconnect(
                    Some(interval.unwrap_or(default_interval)),
                    username.as_deref(),
                    password.as_deref(),
                )
                .await
                .context("Reconnect failed")?;
            tracing::info!("Reconnected");
        }
        Command::ChangeUser {
            username,
            password,
            interval,
        } => {
            router
                .change_user_and_reconnect(
                    Some(&username),
                    Some(&password),
                    Some(interval.unwrap_or(default_interval)),
                )
                .await
                .context("Changing PPPoE account failed")?;
            tracing::info!("Reconnected as '{}'", username);
        }
        Command::ChangeMac { mac } => {
            router
                .change_mac_address(mac.as_deref())
                .await
                .context("MAC clone failed")?;
            tracing::info!(
                "MAC address set to {}",
                router.mac_address().unwrap_or_default()
            );
        }
        Command::Config { raw } => {
            if raw {
                let fields = router.get_config().await.context("Reading WAN config failed")?;
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                let wan = router
                    .get_config_assoc()
                    .await
                    .context("Reading WAN config failed")?;
                println!("{}", serde_json::to_string_pretty(&wan)?);
                match (wan.mode(), wan.link_status()) {
                    (Ok(mode), Ok(status)) => {
                        tracing::info!("Link {:?}, mode {:?}", status, mode);
                    }
                    _ => tracing::warn!("Unrecognised mode/status values in WAN config"),
                }
            }
        }
    }

    Ok(())
}
