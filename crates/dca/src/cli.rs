use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use dca_feed::{Interval, ProviderKind};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, global = true, default_value = "warn")]
    pub trace: TraceLevel,

    /// Price provider, overriding DCA_PROVIDER
    #[arg(long, global = true)]
    pub provider: Option<Provider>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate investing a fixed amount in a symbol every period.
    Simulate {
        /// Ticker symbol, e.g. AAPL or VWCE.DE
        symbol: String,

        /// Amount invested every period
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        amount: f64,

        /// First date considered (YYYY-MM-DD); defaults to the earliest available
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// How often to buy: daily, weekly or monthly
        #[arg(short, long, default_value = "monthly")]
        interval: Interval,

        /// Print the raw JSON result instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Look up symbols matching free text.
    Search {
        query: String,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    Yahoo,
    TwelveData,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Yahoo => ProviderKind::Yahoo,
            Provider::TwelveData => ProviderKind::TwelveData,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for Level {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Trace => Level::TRACE,
            TraceLevel::Debug => Level::DEBUG,
            TraceLevel::Info => Level::INFO,
            TraceLevel::Warn => Level::WARN,
            TraceLevel::Error => Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults() {
        let cli = Cli::try_parse_from(["dca", "simulate", "AAPL"]).unwrap();

        assert_eq!(cli.trace, TraceLevel::Warn);
        assert_eq!(cli.provider, None);
        match cli.command {
            Commands::Simulate {
                symbol,
                amount,
                start,
                interval,
                json,
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(amount, 100.0);
                assert_eq!(start, None);
                assert_eq!(interval, Interval::Monthly);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn simulate_with_every_flag() {
        let cli = Cli::try_parse_from([
            "dca",
            "--trace",
            "debug",
            "simulate",
            "VWCE.DE",
            "--amount",
            "250.5",
            "--start",
            "2019-06-01",
            "--interval",
            "weekly",
            "--json",
            "--provider",
            "twelve-data",
        ])
        .unwrap();

        assert_eq!(cli.trace, TraceLevel::Debug);
        assert_eq!(cli.provider, Some(Provider::TwelveData));
        match cli.command {
            Commands::Simulate {
                amount,
                start,
                interval,
                json,
                ..
            } => {
                assert_eq!(amount, 250.5);
                assert_eq!(start, NaiveDate::from_ymd_opt(2019, 6, 1));
                assert_eq!(interval, Interval::Weekly);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_dates_and_intervals_are_rejected() {
        assert!(Cli::try_parse_from(["dca", "simulate", "AAPL", "--start", "June"]).is_err());
        assert!(Cli::try_parse_from(["dca", "simulate", "AAPL", "-i", "hourly"]).is_err());
    }

    #[test]
    fn negative_amounts_reach_the_engine() {
        let cli = Cli::try_parse_from(["dca", "simulate", "AAPL", "-a", "-50"]).unwrap();
        assert!(matches!(cli.command, Commands::Simulate { amount, .. } if amount == -50.0));
    }
}
