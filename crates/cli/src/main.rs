//! Shown CLI - Operator tools for the Shown connector.
//!
//! # Usage
//!
//! ```bash
//! # Create the option table
//! shown migrate
//!
//! # Store the credentials the Shown login redirect delivered
//! shown connect --access-token <token> --business-id <id>
//!
//! # Turn on customer sync and run the first import
//! shown settings customers --sync-on-create --sync-all
//! shown sync
//!
//! # Print the storefront head markup
//! shown render-head
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `connect` / `disconnect` / `status` - Manage the Shown connection
//! - `settings` - Sync and verification settings
//! - `snippet` - Install or remove the tracking snippet
//! - `sync` - Run pending bulk imports
//! - `event` - Replay a store event through the connector hooks
//! - `render-head` - Print the storefront head markup

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shown_connector::ConnectorState;
use tracing_subscriber::EnvFilter;

mod commands;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "shown_connector=info,shown_cli=info";

#[derive(Parser)]
#[command(name = "shown")]
#[command(author, version, about = "Shown connector CLI tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    #[command(flatten)]
    Connector(ConnectorCommand),
}

/// Commands that need the option store and configuration.
#[derive(Subcommand)]
enum ConnectorCommand {
    /// Store the credentials returned by the Shown login flow
    Connect {
        /// Bearer token issued by Shown
        #[arg(long)]
        access_token: Option<String>,

        /// Business the token acts for
        #[arg(long)]
        business_id: Option<String>,
    },
    /// Forget the connection and all sync state
    Disconnect,
    /// Show connection, settings and sync progress
    Status,
    /// Change sync and verification settings
    Settings {
        #[command(subcommand)]
        target: SettingsTarget,
    },
    /// Manage the storefront tracking snippet
    Snippet {
        #[command(subcommand)]
        action: SnippetAction,
    },
    /// Run the bulk imports that are enabled and not yet done
    Sync,
    /// Replay a store event through the connector hooks
    Event {
        #[command(subcommand)]
        event: EventKind,
    },
    /// Print the storefront head markup
    RenderHead,
}

#[derive(Subcommand)]
enum SettingsTarget {
    /// Customer sync settings
    Customers {
        /// Push the customer of every new order
        #[arg(long)]
        sync_on_create: bool,

        /// Import every existing customer once
        #[arg(long)]
        sync_all: bool,
    },
    /// Product sync settings
    Products {
        /// Push every newly published product
        #[arg(long)]
        sync_on_create: bool,

        /// Import every published product once
        #[arg(long)]
        sync_all: bool,
    },
    /// Site-ownership verification
    Verification {
        /// Render the verification meta tags
        #[arg(long, action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum SnippetAction {
    /// Install the snippet of a business and make it the active one
    Install {
        /// Shown business ID
        business_id: String,
    },
    /// Stop rendering the snippet
    Remove,
}

#[derive(Subcommand)]
enum EventKind {
    /// A new order was placed
    OrderCreated {
        /// WooCommerce order ID
        order_id: u64,
    },
    /// A product changed status
    ProductStatus {
        /// WooCommerce product ID
        product_id: u64,

        /// Status before the change
        #[arg(long, default_value = "draft")]
        from: String,

        /// Status after the change
        #[arg(long, default_value = "publish")]
        to: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Connector(command) => {
            let state = commands::load_state().await?;
            dispatch(&state, command).await?;
        }
    }
    Ok(())
}

async fn dispatch(
    state: &ConnectorState,
    command: ConnectorCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ConnectorCommand::Connect {
            access_token,
            business_id,
        } => {
            commands::connection::connect(state, access_token.as_deref(), business_id.as_deref())
                .await?;
        }
        ConnectorCommand::Disconnect => commands::connection::disconnect(state).await?,
        ConnectorCommand::Status => commands::connection::status(state).await?,
        ConnectorCommand::Settings { target } => match target {
            SettingsTarget::Customers {
                sync_on_create,
                sync_all,
            } => commands::settings::customers(state, sync_on_create, sync_all).await?,
            SettingsTarget::Products {
                sync_on_create,
                sync_all,
            } => commands::settings::products(state, sync_on_create, sync_all).await?,
            SettingsTarget::Verification { enabled } => {
                commands::settings::verification(state, enabled).await?;
            }
        },
        ConnectorCommand::Snippet { action } => match action {
            SnippetAction::Install { business_id } => {
                commands::snippet::install(state, business_id).await?;
            }
            SnippetAction::Remove => commands::snippet::remove(state).await?,
        },
        ConnectorCommand::Sync => commands::sync::run(state).await?,
        ConnectorCommand::Event { event } => match event {
            EventKind::OrderCreated { order_id } => {
                commands::sync::order_created(state, order_id).await;
            }
            EventKind::ProductStatus {
                product_id,
                from,
                to,
            } => commands::sync::product_status(state, product_id, &from, &to).await,
        },
        ConnectorCommand::RenderHead => commands::storefront::render_head(state).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_migrate_parses_apart_from_connector_commands() {
        let cli = Cli::try_parse_from(["shown", "migrate"]).unwrap();
        assert!(matches!(cli.command, Commands::Migrate));

        let cli = Cli::try_parse_from(["shown", "--json", "status"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Connector(ConnectorCommand::Status)
        ));

        let cli = Cli::try_parse_from(["shown", "event", "product-status", "7"]).unwrap();
        let Commands::Connector(ConnectorCommand::Event {
            event: EventKind::ProductStatus { product_id, from, to },
        }) = cli.command
        else {
            panic!("expected product-status event");
        };
        assert_eq!((product_id, from.as_str(), to.as_str()), (7, "draft", "publish"));
    }
}
