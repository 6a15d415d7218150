//! Dollar-cost-averaging over a chronological price series.
//!
//! ```
//! use chrono::NaiveDate;
//! use dca_core::{simulate, PricePoint, PriceSeries};
//!
//! let day = |m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap();
//! let series = PriceSeries::new(
//!     "spy",
//!     vec![PricePoint::new(day(1), 100.0), PricePoint::new(day(2), 200.0)],
//! );
//!
//! let result = simulate(&series, 100.0).unwrap();
//! assert_eq!(result.symbol, "SPY");
//! assert_eq!(result.period_count, 2);
//! assert_eq!(result.total_invested, 200.0);
//! assert_eq!(result.current_value, 300.0);
//! ```

pub mod engine;
pub mod error;
pub mod series;

pub use engine::{simulate, simulate_with, steps, validate_amount, Accumulator, Precision, Steps};
pub use error::DcaError;
pub use series::{PricePoint, PriceSeries, SimulationResult, SimulationStep};
