use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*};
use dca_core::{simulate, validate_amount};
use dca_feed::{build_provider, fetch_series, FeedConfig};
use dotenv::dotenv;
use tracing::{debug, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod report;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    preprocess(cli.trace.into())?;
    trace!("Command line input recorded: {cli:#?}");

    let mut config = FeedConfig::from_env()?;
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // "> dca <COMMAND>"
    match &cli.command {
        // "> dca simulate <SYMBOL> [--amount] [--start] [--interval] [--json]"
        Simulate {
            symbol,
            amount,
            start,
            interval,
            json,
        } => {
            // reject the amount before spending a vendor round-trip on it
            validate_amount(*amount)?;

            let provider = build_provider(&config)?;
            let time = chrono::Local::now();
            let series = fetch_series(provider.as_ref(), symbol, *start, *interval).await?;
            debug!(
                "[{symbol}] {} prices fetched. Elapsed time: {} ms",
                series.len(),
                chrono::Local::now()
                    .signed_duration_since(time)
                    .num_milliseconds()
            );

            let result = simulate(&series, *amount)?;
            info!(
                "[{}] {} purchases, gain {}",
                result.symbol, result.period_count, result.total_gain
            );

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::simulation(&result)?);
            }
        }

        // "> dca search <QUERY>"
        Search { query } => {
            let query = query.trim();
            anyhow::ensure!(!query.is_empty(), "search query must not be empty");

            let provider = build_provider(&config)?;
            let matches = provider.search(query).await?;
            print!("{}", report::matches(&matches)?);
        }
    }

    Ok(())
}
