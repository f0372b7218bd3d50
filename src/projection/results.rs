//! Yearly output structures for projections

use serde::{Deserialize, Serialize};

use super::comparison::ComparisonYearResult;
use super::state::AssetState;

/// One asset class at the end of a projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetYearValue {
    pub asset_id: String,
    pub asset_name: String,

    /// Value at year end (after rebalancing, if any)
    pub value: f64,

    /// Interest earned by this asset during the year
    pub interest: f64,

    /// Share of the portfolio in percent at year end
    pub allocation: f64,
}

impl From<&AssetState> for AssetYearValue {
    fn from(state: &AssetState) -> Self {
        Self {
            asset_id: state.asset_id.clone(),
            asset_name: state.asset_name.clone(),
            value: state.value,
            interest: state.interest,
            allocation: state.allocation,
        }
    }
}

/// Portfolio snapshot for one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResult {
    /// Projection year (1-indexed)
    pub year: u32,

    pub asset_values: Vec<AssetYearValue>,

    /// Portfolio value at year end
    pub total_value: f64,

    /// Interest earned across all assets this year
    pub total_interest: f64,

    /// Cumulative principal: initial investment plus contributions to date
    pub total_amount_invested: f64,

    /// Cumulative growth: total value less principal
    pub total_gain: f64,

    /// Whether the portfolio was rebalanced at the end of this year
    pub rebalanced: bool,
}

/// Complete projection output for one portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Allocation-weighted risk score (1-10)
    pub risk_score: f64,

    /// Allocation-weighted expected return in percent
    pub blended_return: f64,

    /// Rebalancing frequency the projection ran with (0 = never)
    pub rebalancing_frequency: u32,

    /// One entry per projection year
    pub years: Vec<PortfolioResult>,

    /// Single-rate baseline, empty when comparison is disabled
    pub comparison: Vec<ComparisonYearResult>,
}

impl ProjectionReport {
    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let final_year = self.years.last();
        let final_value = final_year.map(|r| r.total_value).unwrap_or(0.0);
        let total_invested = final_year.map(|r| r.total_amount_invested).unwrap_or(0.0);
        let total_interest: f64 = self.years.iter().map(|r| r.total_interest).sum();
        let rebalance_count = self.years.iter().filter(|r| r.rebalanced).count() as u32;
        let comparison_final_value = self.comparison.last().map(|r| r.value_end_of_year);

        ProjectionSummary {
            total_years: self.years.len() as u32,
            final_value,
            total_invested,
            total_gain: final_value - total_invested,
            total_interest,
            rebalance_count,
            risk_score: self.risk_score,
            comparison_final_value,
            difference_vs_comparison: comparison_final_value.map(|baseline| final_value - baseline),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub final_value: f64,
    pub total_invested: f64,
    pub total_gain: f64,
    pub total_interest: f64,
    pub rebalance_count: u32,
    pub risk_score: f64,
    pub comparison_final_value: Option<f64>,
    pub difference_vs_comparison: Option<f64>,
}
