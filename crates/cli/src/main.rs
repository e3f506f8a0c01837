//! Wine Store CLI - drive the cart widget against a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (prints the toast markup; --wait plays out the toast lifecycle)
//! ws-cli add --id 1 --name "Vinho Tinto" --price 12 --tag Reserva
//!
//! # Add a loosely-typed product object, as a catalog page would
//! ws-cli add-json '{"id": "2", "name": "Vinho Verde", "price": "7.5"}'
//!
//! # Change quantities
//! ws-cli qty 1 -1
//! ws-cli remove 2
//!
//! # Inspect and render
//! ws-cli show
//! ws-cli render --page cart --out cart.html
//! ```
//!
//! # Commands
//!
//! - `add`, `add-json` - Add one unit of a product
//! - `remove` - Remove a product
//! - `qty` - Change a product's quantity by a signed delta
//! - `clear` - Empty the cart
//! - `show` - Print the cart contents and totals
//! - `render` - Render the cart or catalog page to HTML

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use wine_store_storefront::WidgetConfig;
use wine_store_storefront::config::LogFormat;

mod commands;

#[derive(Parser)]
#[command(name = "ws-cli")]
#[command(author, version, about = "Wine store cart CLI")]
struct Cli {
    /// Storage directory (overrides `WINE_STORE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: i64,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Unit price in EUR
        #[arg(long)]
        price: Option<Decimal>,

        /// Image path or URL
        #[arg(long)]
        image: Option<String>,

        /// Descriptive line (region, volume, ...)
        #[arg(long)]
        meta: Option<String>,

        /// Category tag (e.g. Premium, Reserva)
        #[arg(long)]
        tag: Option<String>,

        /// Stay until the toast has been dismissed
        #[arg(long)]
        wait: bool,
    },
    /// Add a product given as a JSON object
    AddJson {
        /// Product object, e.g. '{"id": 1, "name": "Vinho Tinto"}'
        json: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: i64,
    },
    /// Change a product's quantity
    Qty {
        /// Product id
        id: i64,

        /// Signed quantity change
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
    /// Render a page to HTML
    Render {
        /// Which page to render
        #[arg(long, value_enum, default_value = "cart")]
        page: PageKind,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Page layouts `render` can produce.
#[derive(Clone, Copy, ValueEnum)]
pub enum PageKind {
    Cart,
    Catalog,
}

/// Install the tracing subscriber. Logs go to stderr so page output stays clean.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = WidgetConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map_or_else(|_| LogFormat::default(), |c| c.log_format),
    );

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(mut config) => {
            if let Some(dir) = cli.data_dir {
                config.data_dir = dir;
            }
            run(cli.command, &config).await
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Add {
            id,
            name,
            price,
            image,
            meta,
            tag,
            wait,
        } => {
            let input = commands::cart::ProductArgs {
                id,
                name,
                price,
                image,
                meta,
                tag,
            };
            commands::cart::add(config, input.into(), wait).await?;
        }
        Commands::AddJson { json } => commands::cart::add_json(config, &json)?,
        Commands::Remove { id } => commands::cart::remove(config, id)?,
        Commands::Qty { id, delta } => commands::cart::change_qty(config, id, delta)?,
        Commands::Clear => commands::cart::clear(config)?,
        Commands::Show => commands::cart::show(config)?,
        Commands::Render { page, out } => commands::render::page(config, page, out.as_deref())?,
    }
    Ok(())
}
