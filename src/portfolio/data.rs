//! Asset class and portfolio input structures

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ProjectionError, Result};

/// Tolerance on the allocation total before a portfolio is rejected
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

/// Longest projection horizon accepted, in years
pub const MAX_DURATION: u32 = 1000;

/// Lowest and highest risk score an asset class may carry
pub const MIN_RISK: f64 = 1.0;
pub const MAX_RISK: f64 = 10.0;

fn default_initial_investment() -> f64 {
    1000.0
}

fn default_annual_investment() -> f64 {
    100.0
}

fn default_duration() -> u32 {
    10
}

fn default_rebalancing_frequency() -> u32 {
    3
}

/// A single weighted asset class (stocks, bonds, real estate, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    /// Unique key
    pub id: String,

    /// Display label
    pub name: String,

    /// Expected annual return in percent (8.0 = 8%)
    pub expected_return: f64,

    /// Target share of the portfolio in percent (0-100)
    pub allocation: f64,

    /// Risk score, 1 (lowest) to 10 (highest)
    pub risk: f64,
}

impl AssetClass {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        expected_return: f64,
        allocation: f64,
        risk: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expected_return,
            allocation,
            risk,
        }
    }

    /// The stock three-class template: 60% stocks, 30% bonds, 10% real estate
    pub fn defaults() -> Vec<AssetClass> {
        vec![
            AssetClass::new("stocks", "Stocks", 8.0, 60.0, 7.0),
            AssetClass::new("bonds", "Bonds", 3.0, 30.0, 3.0),
            AssetClass::new("real_estate", "Real Estate", 5.0, 10.0, 5.0),
        ]
    }

    fn validate(&self) -> Result<()> {
        let field = |name: &str| format!("assets[{}].{}", self.id, name);

        if self.id.trim().is_empty() {
            return Err(ProjectionError::invalid("assets.id", "asset id must not be empty"));
        }
        if !self.expected_return.is_finite() {
            return Err(ProjectionError::invalid(field("expected_return"), "must be a finite number"));
        }
        if !self.allocation.is_finite() || !(0.0..=100.0).contains(&self.allocation) {
            return Err(ProjectionError::invalid(
                field("allocation"),
                format!("must be between 0 and 100, got {}", self.allocation),
            ));
        }
        if !self.risk.is_finite() || !(MIN_RISK..=MAX_RISK).contains(&self.risk) {
            return Err(ProjectionError::invalid(
                field("risk"),
                format!("must be between {} and {}, got {}", MIN_RISK, MAX_RISK, self.risk),
            ));
        }
        Ok(())
    }
}

/// Sum of the allocation percentages of a set of asset classes
pub fn total_allocation(assets: &[AssetClass]) -> f64 {
    assets.iter().map(|a| a.allocation).sum()
}

/// Engine input: contributions, horizon, asset mix and rebalancing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    /// Lump sum invested at the start
    #[serde(default = "default_initial_investment")]
    pub initial_investment: f64,

    /// Contribution added at the start of every year
    #[serde(default = "default_annual_investment")]
    pub annual_investment: f64,

    /// Number of simulated years
    #[serde(default = "default_duration")]
    pub duration: u32,

    /// Asset mix; allocations must sum to 100
    #[serde(default = "AssetClass::defaults")]
    pub assets: Vec<AssetClass>,

    /// 0 = never rebalance, N = rebalance every N years
    #[serde(default = "default_rebalancing_frequency")]
    pub rebalancing_frequency: u32,
}

impl Default for PortfolioAllocation {
    fn default() -> Self {
        Self {
            initial_investment: default_initial_investment(),
            annual_investment: default_annual_investment(),
            duration: default_duration(),
            assets: AssetClass::defaults(),
            rebalancing_frequency: default_rebalancing_frequency(),
        }
    }
}

impl PortfolioAllocation {
    pub fn new(
        initial_investment: f64,
        annual_investment: f64,
        duration: u32,
        assets: Vec<AssetClass>,
        rebalancing_frequency: u32,
    ) -> Self {
        Self {
            initial_investment,
            annual_investment,
            duration,
            assets,
            rebalancing_frequency,
        }
    }

    /// Same portfolio with a different rebalancing frequency
    pub fn with_rebalancing_frequency(&self, rebalancing_frequency: u32) -> Self {
        Self {
            rebalancing_frequency,
            ..self.clone()
        }
    }

    pub fn total_allocation(&self) -> f64 {
        total_allocation(&self.assets)
    }

    /// Check money amounts, horizon and every asset class, then the allocation total
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ProjectionError::invalid(
                "allocation_tolerance",
                format!("must be a finite non-negative percentage, got {}", tolerance),
            ));
        }
        validate_contributions(self.initial_investment, self.annual_investment, self.duration)?;

        if self.assets.is_empty() {
            return Err(ProjectionError::invalid("assets", "at least one asset class is required"));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            asset.validate()?;
            if !seen.insert(asset.id.as_str()) {
                return Err(ProjectionError::invalid(
                    "assets.id",
                    format!("duplicate asset id '{}'", asset.id),
                ));
            }
        }

        let actual = self.total_allocation();
        if (actual - 100.0).abs() > tolerance {
            return Err(ProjectionError::AllocationSum { actual });
        }

        Ok(())
    }
}

/// Money amounts must be finite and non-negative, the horizon at least one year
pub(crate) fn validate_contributions(initial: f64, annual: f64, duration: u32) -> Result<()> {
    if !initial.is_finite() || initial < 0.0 {
        return Err(ProjectionError::invalid(
            "initial_investment",
            format!("must be a non-negative amount, got {}", initial),
        ));
    }
    if !annual.is_finite() || annual < 0.0 {
        return Err(ProjectionError::invalid(
            "annual_investment",
            format!("must be a non-negative amount, got {}", annual),
        ));
    }
    if duration == 0 {
        return Err(ProjectionError::invalid("duration", "must be at least one year"));
    }
    if duration > MAX_DURATION {
        return Err(ProjectionError::invalid(
            "duration",
            format!("must be at most {} years, got {}", MAX_DURATION, duration),
        ));
    }
    Ok(())
}
