//! Aevra storefront CLI
//!
//! Terminal front end for the storefront: browse the catalog, manage the cart
//! and send orders as messaging deep links.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use aevra::{
    cart::{Cart, CartError},
    catalog::CatalogError,
    checkout::CheckoutError,
    config::{LoggingConfig, StoreConfig},
    deeplink::{DeepLink, LaunchError, MessageLauncher},
    money::MoneyFormat,
    observability::{ObservabilityError, init_logging},
    order::Buyer,
    render,
    storage::FileStorage,
    store::CartStore,
    storefront::{Storefront, StorefrontError},
};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "aevra", about = "Aevra storefront", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the catalog
    Products,

    /// Show the cart page
    Cart,

    /// Show the cart badge
    Badge,

    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,

        /// Chosen size
        #[arg(short, long)]
        size: Option<String>,
    },

    /// Set the quantity of a cart line; zero or below removes it
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a cart line
    Remove {
        /// Product id
        id: String,
    },

    /// Order a single product directly, without touching the cart
    Buy {
        /// Product id
        id: String,

        /// Chosen size
        #[arg(short, long)]
        size: Option<String>,
    },

    /// Send the cart as an order and clear it
    Checkout {
        /// Buyer name
        #[arg(long, default_value = "")]
        name: String,

        /// Delivery address
        #[arg(long, default_value = "")]
        address: String,

        /// Payment method
        #[arg(long, default_value = "")]
        payment: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] ObservabilityError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Prints deep links instead of opening a browser.
#[derive(Debug)]
struct PrintLauncher;

impl MessageLauncher for PrintLauncher {
    fn launch(&mut self, link: &DeepLink) -> Result<(), LaunchError> {
        writeln!(io::stdout().lock(), "{link}").map_err(|err| LaunchError(err.to_string()))
    }
}

#[expect(clippy::print_stderr, reason = "CLI error reporting")]
fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(&cli.logging)?;

    let catalog = cli.store.load_catalog()?;
    let mut store = CartStore::new(cli.store.storage());

    store.subscribe(|cart: &Cart| debug!(badge = cart.total_item_count(), "cart updated"));

    let mut shop: Storefront<FileStorage, PrintLauncher> =
        Storefront::new(catalog, store, PrintLauncher).with_links(cli.store.links());

    let money = MoneyFormat::default();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Products => {
            writeln!(out, "{}", render::product_grid(shop.catalog(), &money))?;
        }
        Commands::Cart => {
            writeln!(out, "{}", render::cart_page(&shop.cart_summary(), &money))?;
        }
        Commands::Badge => {
            writeln!(out, "{}", render::badge(shop.badge_count()))?;
        }
        Commands::Add { id, size } => {
            shop.add_to_cart(&id, size.as_deref())?;
            writeln!(out, "Added {id} to the cart. {}", render::badge(shop.badge_count()))?;
        }
        Commands::Set { id, quantity } => {
            shop.change_quantity(&id, quantity);
            writeln!(out, "{}", render::cart_page(&shop.cart_summary(), &money))?;
        }
        Commands::Remove { id } => {
            shop.remove_item(&id);
            writeln!(out, "{}", render::cart_page(&shop.cart_summary(), &money))?;
        }
        Commands::Buy { id, size } => {
            shop.buy_now(&id, size.as_deref())?;
        }
        Commands::Checkout {
            name,
            address,
            payment,
        } => {
            shop.start_checkout()?;
            shop.submit_checkout(&Buyer::new(name, address, payment))?;

            writeln!(out, "Order sent. The cart has been cleared.")?;
        }
    }

    Ok(())
}
