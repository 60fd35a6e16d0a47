//! Vitrine - a terminal client for the Baby Fashion storefront and back office.
//!
//! Commands log in and out, show the current user, list products, and open
//! any storefront or back-office page. Back-office pages are behind the
//! session's route guard.

mod app;
mod routes;
mod views;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vitrine_core::config::Config;
use vitrine_core::models::{ProductOrder, ProductQuery};

use app::App;

// ============================================================================
// Constants
// ============================================================================

/// Log level used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "warn";

/// Log file prefix inside the cache directory
const LOG_FILE_NAME: &str = "vitrine.log";

/// Environment variable holding the login secret
const ENV_PASSWORD: &str = "VITRINE_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about = "Storefront and back-office client")]
struct Cli {
    /// Override the API base URL for this run
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        /// Account email (defaults to the last one used)
        #[arg(long, env = "VITRINE_EMAIL")]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List products from the storefront
    Products {
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        featured: bool,
        /// recentes, preco_asc, preco_desc or nome
        #[arg(long, default_value = "recentes", value_parser = parse_order)]
        order: ProductOrder,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Open a page by path, e.g. `/admin` or `/produtos`
    Open { path: String },
}

fn parse_order(s: &str) -> Result<ProductOrder, String> {
    ProductOrder::from_param(s).ok_or_else(|| format!("unknown order '{}'", s))
}

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (file_layer, guard) = match config.log_to_file.then(|| config.cache_dir()) {
        Some(Ok(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let _log_guard = init_tracing(&config);
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    info!(api = %config.api_base_url, "Vitrine starting");

    let mut app = App::new(config)?;
    app.start();

    let result = run(&mut app, cli.command).await;
    app.finish_startup().await;

    info!("Vitrine shutting down");
    result
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Login { email } => {
            let identifier = match email.or_else(|| app.config.last_identifier.clone()) {
                Some(email) => email,
                None => prompt_identifier()?,
            };
            let secret = match std::env::var(ENV_PASSWORD) {
                Ok(secret) => secret,
                Err(_) => rpassword::prompt_password("Senha: ")?,
            };
            let identity = app.login(&identifier, &secret).await?;
            println!("Logged in as {}", views::identity(&identity));
        }
        Command::Logout => {
            app.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match app.current_user().await {
            Some(identity) => println!("{}", views::identity(&identity)),
            None => println!("Not logged in"),
        },
        Command::Products {
            search,
            featured,
            order,
            page,
        } => {
            let query = ProductQuery {
                search,
                featured,
                order,
                page,
                ..ProductQuery::default()
            };
            println!("{}", app.products(&query).await?);
        }
        Command::Open { path } => {
            println!("{}", app.open(&path, &mut io::stdout()).await?);
        }
    }
    Ok(())
}

fn prompt_identifier() -> Result<String> {
    use std::io::Write;

    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}
