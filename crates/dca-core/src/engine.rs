use crate::error::DcaError;
use crate::series::{PricePoint, PriceSeries, SimulationResult, SimulationStep};
use tracing::trace;

/// Decimal places used for the reported figures. Accumulation always runs at
/// full `f64` precision; only the returned fields are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub money: i32,
    pub percent: i32,
    pub shares: i32,
    pub price: i32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            money: 2,
            percent: 2,
            shares: 6,
            price: 4,
        }
    }
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Reject an amount that is zero, negative or not finite.
pub fn validate_amount(periodic_amount: f64) -> Result<(), DcaError> {
    if periodic_amount.is_finite() && periodic_amount > 0.0 {
        Ok(())
    } else {
        Err(DcaError::InvalidInput(format!(
            "periodic amount must be a finite number greater than zero, got {periodic_amount}"
        )))
    }
}

// -------------------------------------------------------------------------------------------------

/// Running state of the fold: one fixed purchase per admitted price.
#[derive(Debug, Clone)]
pub struct Accumulator {
    amount: f64,
    precision: Precision,
    shares: f64,
    count: usize,
}

impl Accumulator {
    pub fn new(periodic_amount: f64) -> Result<Self, DcaError> {
        Self::with_precision(periodic_amount, Precision::default())
    }

    pub fn with_precision(periodic_amount: f64, precision: Precision) -> Result<Self, DcaError> {
        validate_amount(periodic_amount)?;
        Ok(Self {
            amount: periodic_amount,
            precision,
            shares: 0.0,
            count: 0,
        })
    }

    /// Buy at `point`, returning the resulting step, or `None` when the price
    /// is unusable and the point was skipped.
    pub fn push(&mut self, point: &PricePoint) -> Option<SimulationStep> {
        if !point.is_usable() {
            trace!("skipping unusable price {} on {}", point.price, point.date);
            return None;
        }

        self.shares += self.amount / point.price;
        self.count += 1;

        let invested = self.invested();
        let value = self.shares * point.price;
        let gain = value - invested;
        let gain_pct = if invested > 0.0 {
            gain / invested * 100.0
        } else {
            0.0
        };

        let p = &self.precision;
        Some(SimulationStep {
            date: point.date,
            price: round(point.price, p.price),
            cumulative_shares: round(self.shares, p.shares),
            cumulative_invested: round(invested, p.money),
            portfolio_value: round(value, p.money),
            cumulative_gain: round(gain, p.money),
            cumulative_gain_pct: round(gain_pct, p.percent),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Number of admitted points so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    // amount * count rather than a running sum, so the total never drifts
    pub fn invested(&self) -> f64 {
        self.amount * self.count as f64
    }
}

/// Lazy timeline over any iterator of prices; see [`steps`].
pub struct Steps<I> {
    points: I,
    acc: Accumulator,
}

impl<I> Steps<I> {
    /// The running totals after every step yielded so far.
    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }
}

impl<I> Iterator for Steps<I>
where
    I: Iterator<Item = PricePoint>,
{
    type Item = SimulationStep;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let point = self.points.next()?;
            if let Some(step) = self.acc.push(&point) {
                return Some(step);
            }
        }
    }
}

/// Stream the DCA timeline without materialising the series first.
pub fn steps<I>(points: I, periodic_amount: f64) -> Result<Steps<I::IntoIter>, DcaError>
where
    I: IntoIterator<Item = PricePoint>,
{
    Ok(Steps {
        points: points.into_iter(),
        acc: Accumulator::new(periodic_amount)?,
    })
}

// -------------------------------------------------------------------------------------------------

/// Buy `periodic_amount` worth of the symbol at every usable price of `series`.
pub fn simulate(series: &PriceSeries, periodic_amount: f64) -> Result<SimulationResult, DcaError> {
    simulate_with(series, periodic_amount, Precision::default())
}

pub fn simulate_with(
    series: &PriceSeries,
    periodic_amount: f64,
    precision: Precision,
) -> Result<SimulationResult, DcaError> {
    let mut acc = Accumulator::with_precision(periodic_amount, precision)?;
    let steps: Vec<SimulationStep> = series
        .points
        .iter()
        .filter_map(|point| acc.push(point))
        .collect();

    let (first, last) = match (steps.first(), steps.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(DcaError::EmptySeries {
                symbol: series.symbol.clone(),
            })
        }
    };

    trace!(
        "[{}] simulated {} of {} points",
        series.symbol,
        acc.count(),
        series.len()
    );

    Ok(SimulationResult {
        symbol: series.symbol.clone(),
        periodic_amount,
        start_date: first.date,
        end_date: last.date,
        period_count: acc.count(),
        total_invested: round(acc.invested(), precision.money),
        total_shares: round(acc.shares(), precision.shares),
        average_cost: round(acc.invested() / acc.shares(), precision.price),
        current_value: last.portfolio_value,
        total_gain: last.cumulative_gain,
        total_gain_pct: last.cumulative_gain_pct,
        steps,
    })
}
