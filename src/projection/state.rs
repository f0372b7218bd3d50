//! Running per-asset state during a portfolio projection

use serde::{Deserialize, Serialize};

use crate::portfolio::{AssetClass, PortfolioAllocation};

/// Value and allocation of one asset class at a point in the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetState {
    pub asset_id: String,
    pub asset_name: String,

    /// Current market value
    pub value: f64,

    /// Interest earned in the current year
    pub interest: f64,

    /// Current share of the portfolio in percent
    pub allocation: f64,
}

impl AssetState {
    /// Opening position: the asset's target share of the initial investment
    pub fn opening(asset: &AssetClass, initial_investment: f64) -> Self {
        Self {
            asset_id: asset.id.clone(),
            asset_name: asset.name.clone(),
            value: asset.allocation / 100.0 * initial_investment,
            interest: 0.0,
            allocation: asset.allocation,
        }
    }
}

/// State of the whole portfolio while the engine steps through the years
#[derive(Debug, Clone)]
pub struct PortfolioState {
    /// Current projection year (1-indexed, 0 before the first year)
    pub year: u32,

    /// One entry per asset class, in input order
    pub assets: Vec<AssetState>,

    /// Portfolio value after this year's growth
    pub total_value: f64,

    /// Interest earned across all assets this year
    pub total_interest: f64,
}

impl PortfolioState {
    /// Initialize state from the allocation at projection start
    pub fn from_allocation(allocation: &PortfolioAllocation) -> Self {
        let assets: Vec<AssetState> = allocation
            .assets
            .iter()
            .map(|asset| AssetState::opening(asset, allocation.initial_investment))
            .collect();
        let total_value = assets.iter().map(|a| a.value).sum();

        Self {
            year: 0,
            assets,
            total_value,
            total_interest: 0.0,
        }
    }

    /// Advance to the next year and clear the yearly accumulators
    pub fn advance_year(&mut self) {
        self.year += 1;
        self.total_interest = 0.0;
        for asset in &mut self.assets {
            asset.interest = 0.0;
        }
    }
}
