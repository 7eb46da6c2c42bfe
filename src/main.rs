//! Copy-Trading Desk
//!
//! Resolves copy-trading relationships between accounts into a
//! master/copier/standalone hierarchy and adapts live trade/order snapshots
//! into the records a charting host expects for one instrument at a time.

mod api;
mod broker;
mod config;
mod desk;
mod hierarchy;
mod models;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{AccountsClient, AccountsResponse};
use crate::broker::{BrokerAdapterFacade, FixedSymbolHost, LiveTradeStore, SymbolScopedView};
use crate::config::DeskConfig;
use crate::desk::Desk;
use crate::hierarchy::{
    AccountHierarchyBuilder, AccountRole, AccountRoleClassifier, CopyRelationshipIndex,
    HierarchyNode,
};
use crate::models::{Account, AccountId, LiveTradeSnapshot, RelationshipPayload};

/// Copy-trading desk CLI.
#[derive(Parser)]
#[command(name = "copydesk")]
#[command(about = "Copy-trading account hierarchy and live position adapter", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Accounts API base URL
    #[arg(long, env = "COPYDESK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the master/copier hierarchy
    Hierarchy {
        /// Accounts JSON file (fetched from the API when omitted)
        #[arg(short, long)]
        accounts: Option<PathBuf>,

        /// Relationship payload JSON file
        #[arg(short, long)]
        relationships: Option<PathBuf>,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Classify account ids as MASTER, COPIER, or STANDALONE
    Classify {
        /// Relationship payload JSON file
        #[arg(short, long)]
        relationships: PathBuf,

        /// Account ids to classify
        #[arg(required = true)]
        ids: Vec<AccountId>,
    },

    /// Show host positions for one symbol from a snapshot file
    Positions {
        /// Trade/order push payload JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Instrument symbol
        #[arg(long)]
        symbol: String,
    },

    /// Show host orders for one symbol from a snapshot file
    Orders {
        /// Trade/order push payload JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Instrument symbol
        #[arg(long)]
        symbol: String,
    },

    /// Answer every host operation for one account from a snapshot file
    Adapter {
        /// Trade/order push payload JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Instrument symbol reported as the chart's current symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Account id the snapshot belongs to
        #[arg(long, default_value = "0")]
        account: AccountId,

        /// Account display name
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Refresh the hierarchy and poll one account's live snapshot
    Watch {
        /// Account to follow
        #[arg(short, long)]
        account: AccountId,

        /// Instrument symbol reported as the chart's current symbol
        #[arg(long, env = "COPYDESK_SYMBOL")]
        symbol: Option<String>,

        /// Polling interval in seconds
        #[arg(short, long, env = "COPYDESK_REFRESH_SECS")]
        interval: Option<u64>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = DeskConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    match cli.command {
        Commands::Hierarchy {
            accounts,
            relationships,
            json,
        } => {
            let (accounts, payload) = match accounts {
                Some(path) => {
                    let accounts = read_json::<AccountsResponse>(&path)?.into_accounts();
                    let payload = relationships
                        .as_deref()
                        .map(read_json::<RelationshipPayload>)
                        .transpose()?;
                    (accounts, payload)
                }
                None => {
                    let client = AccountsClient::new(&config)?;
                    let accounts = client.get_accounts().await?;
                    let payload = match relationships.as_deref() {
                        Some(path) => Some(read_json::<RelationshipPayload>(path)?),
                        None => match client.get_relationships().await {
                            Ok(payload) => Some(payload),
                            Err(e) => {
                                warn!(error = %e, "Relationship fetch failed; treating all accounts as standalone");
                                None
                            }
                        },
                    };
                    (accounts, payload)
                }
            };

            let index = CopyRelationshipIndex::from_payload(payload.as_ref());
            let builder = AccountHierarchyBuilder::new(&accounts, &index);
            let nodes = builder.build();
            let excluded = builder.excluded_accounts(&nodes);

            info!(nodes = nodes.len(), excluded = excluded.len(), "Hierarchy built");

            if json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                print_hierarchy(&nodes);
                if !excluded.is_empty() {
                    let ids: Vec<String> = excluded.iter().map(|id| id.to_string()).collect();
                    println!("\nExcluded (master not visible): {}", ids.join(", "));
                }
            }
        }

        Commands::Classify { relationships, ids } => {
            let payload = read_json::<RelationshipPayload>(&relationships)?;
            let index = CopyRelationshipIndex::from_payload(Some(&payload));
            let classifier = AccountRoleClassifier::new(&index);

            println!("\n{:<12} {:<12} {:>8}", "ACCOUNT", "ROLE", "COPIERS");
            println!("{}", "-".repeat(34));

            for id in ids {
                let role = classifier.classify(id);
                let copiers = match role {
                    AccountRole::Master => index.slaves_of(id).len().to_string(),
                    AccountRole::Copier | AccountRole::Standalone => "-".to_string(),
                };
                println!("{:<12} {:<12} {:>8}", id, role, copiers);
            }
        }

        Commands::Positions { snapshot, symbol } => {
            let snapshot = read_json::<LiveTradeSnapshot>(&snapshot)?;
            let positions = SymbolScopedView::new(&snapshot, &symbol).positions();
            println!("{}", serde_json::to_string_pretty(&positions)?);
        }

        Commands::Orders { snapshot, symbol } => {
            let snapshot = read_json::<LiveTradeSnapshot>(&snapshot)?;
            let orders = SymbolScopedView::new(&snapshot, &symbol).orders();
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }

        Commands::Adapter {
            snapshot,
            symbol,
            account,
            name,
        } => {
            let snapshot = read_json::<LiveTradeSnapshot>(&snapshot)?;
            let host = match symbol {
                Some(symbol) => FixedSymbolHost::new(symbol),
                None => FixedSymbolHost::none(),
            };

            let facade = BrokerAdapterFacade::new(host, LiveTradeStore::new());
            facade.switch_account(Account::new(account, name)).await;
            facade.store().update_positions(account, snapshot).await;

            let response = serde_json::json!({
                "positions": facade.positions().await,
                "orders": facade.orders().await,
                "isTradable": facade.is_tradable().await,
                "accountManagerInfo": facade.account_manager_info().await,
                "chartContextMenuActions": facade.chart_context_menu_actions().await,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Watch {
            account,
            symbol,
            interval,
        } => {
            if let Some(secs) = interval {
                config.refresh_interval_secs = secs;
            }

            let host = match symbol.or_else(|| config.default_symbol.clone()) {
                Some(symbol) => FixedSymbolHost::new(symbol),
                None => FixedSymbolHost::none(),
            };
            let facade = BrokerAdapterFacade::new(host, LiveTradeStore::new());
            let desk = Desk::new(config.clone(), facade)?;

            desk.refresh_hierarchy().await?;
            desk.select_account(account).await?;

            let info = desk.facade().account_manager_info().await;

            println!("\n=== Copy-Trading Desk ===");
            println!("API:      {}", config.api_url);
            println!("Account:  {} ({})", info.account_title, account);
            println!("Interval: {}s", config.refresh_interval_secs);
            println!("\nPress Ctrl+C to stop.\n");

            desk.run().await?;

            print_hierarchy(&desk.hierarchy().await);

            let stats = desk.get_stats().await;
            println!("\n{}", stats);
        }

        Commands::Config => {
            println!("\n=== Desk Configuration ===\n");
            println!("  API URL:           {}", config.api_url);
            println!("  Request Timeout:   {}s", config.request_timeout_secs);
            println!("  Refresh Interval:  {}s", config.refresh_interval_secs);
            println!(
                "  Default Symbol:    {}",
                config.default_symbol.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_hierarchy(nodes: &[HierarchyNode]) {
    println!("\n{:<10} {:<24} {:>14} {:<6}", "ID", "NAME", "BALANCE", "CCY");
    println!("{}", "-".repeat(58));

    for node in nodes {
        let master = &node.master;
        println!(
            "{:<10} {:<24} {:>14.2} {:<6}",
            master.id,
            truncate(&master.display_name(), 22),
            master.balance,
            master.currency
        );

        for slave in &node.slaves {
            println!(
                "  └─ {:<6} {:<24} {:>14.2} {:<6}",
                slave.id,
                truncate(&slave.display_name(), 22),
                slave.balance,
                slave.currency
            );
        }
    }
}

/// Truncate a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
