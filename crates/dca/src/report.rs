use colored::Colorize;
use dca_core::SimulationResult;
use dca_feed::SymbolMatch;
use std::fmt::{self, Write};

/// Render a simulation as a step table followed by a summary block.
pub fn simulation(result: &SimulationResult) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(
        out,
        "{:<10} {:>12} {:>14} {:>14} {:>14} {:>12} {:>9}",
        "date", "price", "shares", "invested", "value", "gain", "gain %"
    )?;
    for step in &result.steps {
        writeln!(
            out,
            "{:<10} {:>12.4} {:>14.6} {:>14.2} {:>14.2} {:>12.2} {:>9.2}",
            step.date,
            step.price,
            step.cumulative_shares,
            step.cumulative_invested,
            step.portfolio_value,
            step.cumulative_gain,
            step.cumulative_gain_pct,
        )?;
    }

    let gain = format!("{:.2} ({:.2}%)", result.total_gain, result.total_gain_pct);
    let gain = if result.total_gain >= 0.0 {
        gain.green()
    } else {
        gain.red()
    };

    writeln!(out)?;
    writeln!(out, "{}", result.symbol.bold())?;
    writeln!(
        out,
        "  {} to {}, {} purchases of {:.2}",
        result.start_date, result.end_date, result.period_count, result.periodic_amount
    )?;
    writeln!(out, "  invested      {:.2}", result.total_invested)?;
    writeln!(out, "  shares        {:.6}", result.total_shares)?;
    writeln!(out, "  average cost  {:.4}", result.average_cost)?;
    writeln!(out, "  value         {:.2}", result.current_value)?;
    writeln!(out, "  gain          {gain}")?;
    Ok(out)
}

pub fn matches(matches: &[SymbolMatch]) -> Result<String, fmt::Error> {
    if matches.is_empty() {
        return Ok("No matching symbols\n".to_string());
    }

    let mut out = String::new();
    for m in matches {
        writeln!(
            out,
            "{:<12} {:<40} {:<10} {}",
            m.symbol,
            m.name,
            m.exchange.as_deref().unwrap_or("-"),
            m.kind.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(out)
}
