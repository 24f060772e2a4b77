//! DishDash CLI - drive the food-delivery client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! dishdash restaurants
//! dishdash menu burger-barn
//! dishdash search sushi
//!
//! # Fill the cart and place an order
//! dishdash cart add burger-barn bb-1 --quantity 2
//! dishdash checkout --phone "+1 555 010 2030" --payment card --address "1 Main St"
//!
//! # Manage order history
//! dishdash orders list
//! dishdash orders cancel 1718031234567
//!
//! # Resolve and save the current location
//! dishdash locate --lat 24.7136 --lon 46.6753
//! ```
//!
//! Data is stored under `DISHDASH_DATA_DIR` (or `--data-dir`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dishdash_client::config::{ClientConfig, ConfigError, LogFormat};
use dishdash_client::state::AppState;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "dishdash")]
#[command(author, version, about = "DishDash food-delivery client")]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants
    Restaurants,
    /// Show a restaurant's menu
    Menu {
        /// Restaurant ID (e.g. `burger-barn`)
        restaurant: String,
    },
    /// Search dishes by name, tag, or restaurant
    Search {
        query: String,
    },
    /// List dish tags, or the dishes carrying one tag
    Tags {
        tag: Option<String>,
    },
    /// Show the highest-rated dishes
    Popular {
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart contents
    Checkout {
        /// Contact phone (defaults to the default address's phone)
        #[arg(short, long)]
        phone: Option<String>,

        /// Payment method (`cash`, `card`, `wallet`)
        #[arg(long, default_value = "cash")]
        payment: String,

        /// Delivery address (defaults to the default saved address)
        #[arg(short, long)]
        address: Option<String>,
    },
    /// View and manage past orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage favorite dishes
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Manage saved delivery addresses
    Addresses {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Reverse-geocode coordinates and save them as the current location
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// View and change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a dish
    Add {
        restaurant: String,
        item: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a cart line by its cart ID
    Remove { cart_id: String },
    /// Set a line's quantity (0 removes it)
    Qty { cart_id: String, quantity: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, newest first
    List {
        /// Only orders with this status (`pending`, `delivered`, `cancelled`)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one order
    Show { id: String },
    /// Cancel a pending order
    Cancel { id: String },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// List favorites
    List,
    /// Bookmark a dish by item ID
    Add { item: String },
    /// Remove a favorite by item ID
    Remove { item: String },
    /// Remove all favorites
    Clear,
}

#[derive(Subcommand)]
enum AddressAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add {
        /// Label (e.g. "Home")
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
        #[arg(short, long)]
        phone: String,
        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
    /// Change an address's label, street, or phone
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Delete an address
    Remove { id: String },
    /// Make an address the default
    Default { id: String },
}

#[derive(Subcommand)]
enum PrefAction {
    /// Show all preferences
    Show,
    /// Set the app language (two-letter code)
    Language { code: String },
    /// Mark onboarding as seen (or not)
    Onboarded {
        #[arg(action = clap::ArgAction::Set, default_value_t = true)]
        seen: bool,
    },
    /// Remove all preferences
    Reset,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dishdash_client=info,dishdash_cli=info".into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Tracing is not set up yet when configuration fails, so report on stderr.
#[allow(clippy::print_stderr)]
fn config_error(e: &ConfigError) -> ! {
    eprintln!("Invalid configuration: {e}");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => config_error(&e),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    if let Err(e) = run(cli, config).await {
        match &e {
            CommandError::App(app) if !app.is_user_error() => app.report(),
            _ => tracing::error!("Command failed: {e}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CommandError> {
    let state = AppState::open(config)?;
    state.load().await;

    match cli.command {
        Commands::Restaurants => commands::catalog::restaurants(&state),
        Commands::Menu { restaurant } => commands::catalog::menu(&state, &restaurant)?,
        Commands::Search { query } => commands::catalog::search(&state, &query),
        Commands::Tags { tag } => commands::catalog::tags(&state, tag.as_deref()),
        Commands::Popular { limit } => commands::catalog::popular(&state, limit),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await,
            CartAction::Add {
                restaurant,
                item,
                quantity,
            } => commands::cart::add(&state, &restaurant, &item, quantity).await?,
            CartAction::Remove { cart_id } => commands::cart::remove(&state, &cart_id).await?,
            CartAction::Qty { cart_id, quantity } => {
                commands::cart::set_quantity(&state, &cart_id, quantity).await?;
            }
            CartAction::Clear => commands::cart::clear(&state).await?,
        },
        Commands::Checkout {
            phone,
            payment,
            address,
        } => commands::orders::checkout(&state, phone, &payment, address).await?,
        Commands::Orders { action } => match action {
            OrderAction::List { status } => {
                commands::orders::list(&state, status.as_deref()).await?;
            }
            OrderAction::Show { id } => commands::orders::show(&state, &id).await?,
            OrderAction::Cancel { id } => commands::orders::cancel(&state, &id).await?,
        },
        Commands::Favorites { action } => match action {
            FavoriteAction::List => commands::favorites::list(&state).await,
            FavoriteAction::Add { item } => commands::favorites::add(&state, &item).await?,
            FavoriteAction::Remove { item } => commands::favorites::remove(&state, &item).await?,
            FavoriteAction::Clear => commands::favorites::clear(&state).await?,
        },
        Commands::Addresses { action } => match action {
            AddressAction::List => commands::addresses::list(&state).await,
            AddressAction::Add {
                name,
                address,
                phone,
                default,
            } => commands::addresses::add(&state, name, address, &phone, default).await?,
            AddressAction::Edit {
                id,
                name,
                address,
                phone,
            } => commands::addresses::edit(&state, &id, name, address, phone.as_deref()).await?,
            AddressAction::Remove { id } => commands::addresses::remove(&state, &id).await?,
            AddressAction::Default { id } => commands::addresses::set_default(&state, &id).await?,
        },
        Commands::Locate { lat, lon } => commands::location::locate(&state, lat, lon).await?,
        Commands::Prefs { action } => match action {
            PrefAction::Show => commands::prefs::show(&state).await?,
            PrefAction::Language { code } => commands::prefs::language(&state, &code).await?,
            PrefAction::Onboarded { seen } => commands::prefs::onboarded(&state, seen).await?,
            PrefAction::Reset => commands::prefs::reset(&state).await?,
        },
    }
    Ok(())
}
