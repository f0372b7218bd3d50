//! Single-rate baseline investment used to benchmark a diversified portfolio
//!
//! The baseline compounds the whole balance at the portfolio's blended
//! expected return, with no per-asset breakdown and no rebalancing. Interest
//! is earned on the opening balance and the annual contribution lands at year
//! end, which is a plain compound-interest annuity.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::portfolio::{validate_contributions, AssetClass};

/// One year of the baseline investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonYearResult {
    /// Projection year (1-indexed)
    pub year: u32,

    /// Interest earned this year
    pub interest: f64,

    /// Balance after interest and this year's contribution
    pub value_end_of_year: f64,

    pub annual_investment: f64,

    /// Cumulative interest to date
    pub total_interest: f64,

    /// Cumulative principal to date
    pub total_amount_invested: f64,
}

/// Allocation-weighted expected return in percent
pub fn blended_return(assets: &[AssetClass]) -> f64 {
    assets
        .iter()
        .map(|asset| asset.allocation / 100.0 * asset.expected_return)
        .sum()
}

/// Compound `principal` at `blended_rate` percent for `duration_years`,
/// adding `annual_contribution` after each year's interest
pub fn compute_comparison(
    principal: f64,
    annual_contribution: f64,
    duration_years: u32,
    blended_rate: f64,
) -> Result<Vec<ComparisonYearResult>> {
    validate_contributions(principal, annual_contribution, duration_years)?;
    if !blended_rate.is_finite() {
        return Err(ProjectionError::invalid(
            "blended_rate",
            format!("must be a finite percentage, got {}", blended_rate),
        ));
    }

    let mut results = Vec::with_capacity(duration_years as usize);
    let mut value = principal;

    for year in 1..=duration_years {
        let interest = value * (blended_rate / 100.0);
        value += interest + annual_contribution;
        let total_amount_invested = principal + annual_contribution * year as f64;

        results.push(ComparisonYearResult {
            year,
            interest,
            value_end_of_year: value,
            annual_investment: annual_contribution,
            total_interest: value - total_amount_invested,
            total_amount_invested,
        });
    }

    Ok(results)
}
