//! Currency converter CLI
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize logging
//! - Build the provider clients
//! - Run a conversion session or a one-off provider query

mod config;
mod repl;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use converter_client::{FixerClient, RestCountriesClient};
use converter_session::{SessionConfig, SessionDriver, SessionHandle};
use converter_types::{
    Amount, CatalogProvider, ConversionInput, CurrencyCode, RateProvider,
};

use config::Config;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency converter backed by live exchange rates", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, env = "FX_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(long, default_value_t = 1.0)]
        amount: f64,
        /// Source currency (defaults to FX_DEFAULT_FROM)
        #[arg(long)]
        from: Option<String>,
        /// Target currency (defaults to FX_DEFAULT_TO)
        #[arg(long)]
        to: Option<String>,
    },
    /// Print the rate table for a base currency
    Rates {
        /// Base currency (defaults to FX_DEFAULT_FROM)
        #[arg(long)]
        base: Option<String>,
    },
    /// Print the currency catalog
    Catalog,
    /// Start an interactive conversion session
    Interactive,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_code(value: Option<String>, default: &CurrencyCode) -> Result<CurrencyCode> {
    match value {
        Some(code) => Ok(code.parse::<CurrencyCode>()?),
        None => Ok(default.clone()),
    }
}

fn build_providers(config: &Config) -> Result<(Arc<FixerClient>, Arc<RestCountriesClient>)> {
    let http = config.http_client()?;
    let rates = FixerClient::new(&config.fixer_url, &config.fixer_api_key)?
        .with_http_client(http.clone());
    let catalog = RestCountriesClient::new(&config.countries_url).with_http_client(http);
    Ok((Arc::new(rates), Arc::new(catalog)))
}

fn spawn_session(config: &Config, input: ConversionInput) -> Result<SessionHandle> {
    let (rates, catalog) = build_providers(config)?;
    let session = SessionConfig {
        initial: input,
        pivot: config.pivot.clone(),
    };
    Ok(SessionDriver::spawn(rates, catalog, session))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // Fails fast on a missing credential, before any network call.
    let config = Config::from_env()?;
    tracing::debug!(pivot = %config.pivot, "Loaded configuration");

    match cli.command {
        Commands::Convert { amount, from, to } => {
            let input = ConversionInput::new(
                Amount::new(amount)?,
                parse_code(from, &config.default_from)?,
                parse_code(to, &config.default_to)?,
            );
            let handle = spawn_session(&config, input)?;
            let mut events = handle.subscribe();

            handle.start().await?;
            let snapshot = handle.settled().await?;

            for notice in repl::notices(&mut events) {
                eprintln!("{}", notice);
            }
            println!("{}", repl::render(&snapshot));
            if snapshot.state.error().is_some() {
                std::process::exit(1);
            }
        }

        Commands::Rates { base } => {
            let base = parse_code(base, &config.default_from)?;
            let (rates, _) = build_providers(&config)?;
            let table = rates.fetch_rates(&base).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }

        Commands::Catalog => {
            let (_, catalog) = build_providers(&config)?;
            let catalog = catalog.fetch_catalog().await?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }

        Commands::Interactive => {
            let input = ConversionInput::new(
                Amount::default(),
                config.default_from.clone(),
                config.default_to.clone(),
            );
            let handle = spawn_session(&config, input)?;
            repl::run(handle).await?;
        }
    }

    Ok(())
}
