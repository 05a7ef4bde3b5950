//! FX CLI
//!
//! Command-line interface for the currency-rate gateway.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use fx_client::FxClient;
use fx_types::CurrencyCode;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency gateway CLI client", long_about = None)]
struct Cli {
    /// Base URL of the gateway API
    #[arg(long, env = "FX_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest rates for a base currency
    Rates {
        /// Base currency code
        #[arg(long, default_value = "EUR")]
        currency: CurrencyCode,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: Decimal,
        #[arg(long)]
        from: CurrencyCode,
        #[arg(long)]
        to: CurrencyCode,
    },
    /// Paged historical rates for a date range
    History {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "EUR")]
        currency: CurrencyCode,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = FxClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Commands::Rates { currency } => {
            let snapshot = client.latest_rates(&currency).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Convert { amount, from, to } => {
            let snapshot = client.convert(amount, &from, &to).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::History {
            start,
            end,
            currency,
            page,
            page_size,
        } => {
            let result = client
                .historical_rates(start, end, &currency, page, page_size)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_history_defaults() {
        let cli = Cli::try_parse_from([
            "fx", "history", "--start", "2024-01-01", "--end", "2024-01-31",
        ])
        .unwrap();
        match cli.command {
            Commands::History {
                currency,
                page,
                page_size,
                ..
            } => {
                assert_eq!(currency.as_str(), "EUR");
                assert_eq!(page, 1);
                assert_eq!(page_size, 10);
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_convert_normalizes_codes() {
        let cli =
            Cli::try_parse_from(["fx", "convert", "12.5", "--from", "usd", "--to", "gbp"]).unwrap();
        match cli.command {
            Commands::Convert { amount, from, to } => {
                assert_eq!(amount, Decimal::new(125, 1));
                assert_eq!(from.as_str(), "USD");
                assert_eq!(to.as_str(), "GBP");
            }
            _ => panic!("expected convert"),
        }
    }
}
