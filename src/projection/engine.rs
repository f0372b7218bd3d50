//! Core projection engine for yearly portfolio projections

use log::{debug, info, warn};

use super::comparison::{blended_return, compute_comparison, ComparisonYearResult};
use super::results::{AssetYearValue, PortfolioResult, ProjectionReport};
use super::state::{AssetState, PortfolioState};
use crate::error::Result;
use crate::portfolio::{AssetClass, PortfolioAllocation, ALLOCATION_TOLERANCE};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Largest accepted distance of the allocation total from 100
    pub allocation_tolerance: f64,

    /// Whether reports carry the single-rate baseline series
    pub include_comparison: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            allocation_tolerance: ALLOCATION_TOLERANCE,
            include_comparison: true,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full projection, risk score and baseline for one portfolio
    pub fn run(&self, allocation: &PortfolioAllocation) -> Result<ProjectionReport> {
        let years = self.compute_projection(allocation)?;
        let comparison = if self.config.include_comparison {
            self.comparison(allocation)?
        } else {
            Vec::new()
        };

        Ok(ProjectionReport {
            risk_score: compute_risk(&allocation.assets),
            blended_return: blended_return(&allocation.assets),
            rebalancing_frequency: allocation.rebalancing_frequency,
            years,
            comparison,
        })
    }

    /// Project the portfolio year by year
    ///
    /// Fails without producing any output when the inputs are out of range or
    /// the allocations do not sum to 100 within the configured tolerance.
    pub fn compute_projection(&self, allocation: &PortfolioAllocation) -> Result<Vec<PortfolioResult>> {
        if let Err(e) = allocation.validate(self.config.allocation_tolerance) {
            warn!("Rejected portfolio allocation: {}", e);
            return Err(e);
        }

        info!(
            "Projecting {} asset classes over {} years (rebalancing every {} years)",
            allocation.assets.len(),
            allocation.duration,
            allocation.rebalancing_frequency
        );

        let mut state = PortfolioState::from_allocation(allocation);
        let mut results = Vec::with_capacity(allocation.duration as usize);

        for _year in 1..=allocation.duration {
            state.advance_year();
            results.push(self.calculate_year(allocation, &mut state));
        }

        Ok(results)
    }

    /// Baseline: the same money compounded at the portfolio's blended return
    pub fn comparison(&self, allocation: &PortfolioAllocation) -> Result<Vec<ComparisonYearResult>> {
        compute_comparison(
            allocation.initial_investment,
            allocation.annual_investment,
            allocation.duration,
            blended_return(&allocation.assets),
        )
    }

    /// Contribute, grow, measure drift and optionally rebalance for one year
    fn calculate_year(&self, allocation: &PortfolioAllocation, state: &mut PortfolioState) -> PortfolioResult {
        let year = state.year;

        // Contributions follow the target mix, not the drifted one
        for (asset_state, asset) in state.assets.iter_mut().zip(&allocation.assets) {
            asset_state.value += asset.allocation / 100.0 * allocation.annual_investment;
        }

        // Every asset earns its own expected return
        state.total_value = 0.0;
        for (asset_state, asset) in state.assets.iter_mut().zip(&allocation.assets) {
            let interest = asset_state.value * (asset.expected_return / 100.0);
            asset_state.value += interest;
            asset_state.interest = interest;
            state.total_value += asset_state.value;
            state.total_interest += interest;
        }
        let total_value = state.total_value;

        // Live allocation after growth (drift)
        for (asset_state, asset) in state.assets.iter_mut().zip(&allocation.assets) {
            asset_state.allocation = if total_value > 0.0 {
                asset_state.value / total_value * 100.0
            } else {
                asset.allocation
            };
        }

        let rebalanced = is_rebalancing_year(year, allocation.rebalancing_frequency);
        if rebalanced {
            debug!("Year {}: rebalancing {:.2} to target allocation", year, total_value);
            state.assets = rebalance(&state.assets, &allocation.assets, total_value);
        }

        let total_amount_invested =
            allocation.initial_investment + allocation.annual_investment * year as f64;

        PortfolioResult {
            year,
            asset_values: state.assets.iter().map(AssetYearValue::from).collect(),
            total_value: state.total_value,
            total_interest: state.total_interest,
            total_amount_invested,
            total_gain: state.total_value - total_amount_invested,
            rebalanced,
        }
    }
}

/// Whether `year` closes a rebalancing period; frequency 0 never rebalances
pub fn is_rebalancing_year(year: u32, frequency: u32) -> bool {
    frequency > 0 && year % frequency == 0
}

/// Allocation-weighted risk score: `sum(allocation / 100 * risk)`
///
/// Defined for any allocation values; an empty list scores 0.
pub fn compute_risk(assets: &[AssetClass]) -> f64 {
    assets
        .iter()
        .map(|asset| asset.allocation / 100.0 * asset.risk)
        .sum()
}

/// Project a portfolio with the default configuration
pub fn compute_projection(allocation: &PortfolioAllocation) -> Result<Vec<PortfolioResult>> {
    ProjectionEngine::default().compute_projection(allocation)
}

/// Reset every asset to its target share of `total_value`
///
/// Shares are taken relative to the targets' own total, so the new values sum
/// to `total_value` even when the targets sit inside the tolerance band rather
/// than at exactly 100. Each asset's allocation becomes its target. Interest
/// earned this year is carried over unchanged.
pub fn rebalance(current: &[AssetState], targets: &[AssetClass], total_value: f64) -> Vec<AssetState> {
    let target_total: f64 = targets.iter().map(|t| t.allocation).sum();

    current
        .iter()
        .zip(targets)
        .map(|(asset_state, target)| {
            let share = if target_total > 0.0 {
                target.allocation / target_total
            } else {
                0.0
            };
            AssetState {
                value: share * total_value,
                allocation: target.allocation,
                ..asset_state.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn two_asset_portfolio() -> Vec<AssetClass> {
        vec![
            AssetClass::new("stocks", "Stocks", 8.0, 60.0, 7.0),
            AssetClass::new("bonds", "Bonds", 3.0, 40.0, 3.0),
        ]
    }

    fn asset_sum(result: &PortfolioResult) -> f64 {
        result.asset_values.iter().map(|a| a.value).sum()
    }

    #[test]
    fn test_risk_is_weighted_sum() {
        assert_relative_eq!(compute_risk(&two_asset_portfolio()), 5.4, epsilon = 1e-12);
        assert_eq!(compute_risk(&[]), 0.0);

        let mut zeroed = two_asset_portfolio();
        zeroed.iter_mut().for_each(|a| a.allocation = 0.0);
        assert_eq!(compute_risk(&zeroed), 0.0);
    }

    #[test]
    fn test_projection_end_to_end() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 5, AssetClass::defaults(), 0);
        let results = compute_projection(&allocation).unwrap();

        assert_eq!(results.len(), 5);
        let years: Vec<u32> = results.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5]);

        let final_year = results.last().unwrap();
        assert!(final_year.total_value > 0.0);
        assert!(final_year.total_interest > 0.0);
        assert_eq!(final_year.total_amount_invested, 1500.0);
        assert!(results.iter().all(|r| !r.rebalanced));
    }

    #[test]
    fn test_first_year_values() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 1, AssetClass::defaults(), 0);
        let year = &compute_projection(&allocation).unwrap()[0];

        // (600 + 60) * 1.08, (300 + 30) * 1.03, (100 + 10) * 1.05
        assert_relative_eq!(year.asset_values[0].value, 712.8, epsilon = 1e-9);
        assert_relative_eq!(year.asset_values[1].value, 339.9, epsilon = 1e-9);
        assert_relative_eq!(year.asset_values[2].value, 115.5, epsilon = 1e-9);
        assert_relative_eq!(year.asset_values[0].interest, 52.8, epsilon = 1e-9);
        assert_relative_eq!(year.total_value, 1168.2, epsilon = 1e-9);
        assert_relative_eq!(year.total_interest, 68.2, epsilon = 1e-9);
        assert_relative_eq!(year.total_gain, 68.2, epsilon = 1e-9);
        assert_relative_eq!(year.asset_values[0].allocation, 712.8 / 1168.2 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rebalancing_years() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 5, two_asset_portfolio(), 2);
        let results = compute_projection(&allocation).unwrap();

        let flags: Vec<bool> = results.iter().map(|r| r.rebalanced).collect();
        assert_eq!(flags, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_rebalance_restores_targets() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 6, two_asset_portfolio(), 3);
        let results = compute_projection(&allocation).unwrap();

        // Drift before the rebalance: stocks outgrow bonds
        assert!(results[1].asset_values[0].allocation > 60.0);

        for result in results.iter().filter(|r| r.rebalanced) {
            assert_abs_diff_eq!(result.asset_values[0].allocation, 60.0, epsilon = 1e-12);
            assert_abs_diff_eq!(result.asset_values[1].allocation, 40.0, epsilon = 1e-12);
            assert_relative_eq!(result.asset_values[0].value, 0.6 * result.total_value, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_rebalance_is_uniform_across_allocation_values() {
        // 33/67 once took a different arithmetic path; every split must behave alike
        for (a, b) in [(33.0, 67.0), (67.0, 33.0), (50.0, 50.0), (1.0, 99.0)] {
            let targets = vec![
                AssetClass::new("a", "A", 6.0, a, 5.0),
                AssetClass::new("b", "B", 4.0, b, 4.0),
            ];
            let current: Vec<AssetState> = targets
                .iter()
                .map(|t| AssetState {
                    asset_id: t.id.clone(),
                    asset_name: t.name.clone(),
                    value: 1234.5,
                    interest: 1.0,
                    allocation: 50.0,
                })
                .collect();

            let rebalanced = rebalance(&current, &targets, 2469.0);
            let sum: f64 = rebalanced.iter().map(|s| s.value).sum();
            assert_relative_eq!(sum, 2469.0, max_relative = 1e-12);
            assert_relative_eq!(rebalanced[0].value, a / 100.0 * 2469.0, max_relative = 1e-12);
            assert_eq!(rebalanced[0].allocation, a);
            assert_eq!(rebalanced[1].allocation, b);
            assert_eq!(rebalanced[0].interest, 1.0);
        }
    }

    #[test]
    fn test_asset_values_sum_to_total_every_year() {
        let assets = vec![
            AssetClass::new("stocks", "Stocks", 8.0, 33.0, 7.0),
            AssetClass::new("bonds", "Bonds", 3.0, 33.0, 3.0),
            AssetClass::new("real_estate", "Real Estate", 5.0, 34.0, 5.0),
        ];
        for frequency in [0, 1, 2, 3] {
            let allocation = PortfolioAllocation::new(2500.0, 300.0, 12, assets.clone(), frequency);
            for result in compute_projection(&allocation).unwrap() {
                assert_relative_eq!(asset_sum(&result), result.total_value, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_last_asset_earns_full_return_in_rebalancing_years() {
        let assets = AssetClass::defaults();
        let never = PortfolioAllocation::new(1000.0, 0.0, 1, assets.clone(), 0);
        let every_year = PortfolioAllocation::new(1000.0, 0.0, 1, assets, 1);

        let plain = &compute_projection(&never).unwrap()[0];
        let rebalanced = &compute_projection(&every_year).unwrap()[0];

        assert_eq!(plain.asset_values[2].interest, rebalanced.asset_values[2].interest);
        assert_eq!(plain.total_value, rebalanced.total_value);
        assert_relative_eq!(rebalanced.asset_values[2].interest, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_allocation_sum() {
        for bonds in [39.0, 41.0] {
            let mut assets = two_asset_portfolio();
            assets[1].allocation = bonds;
            let allocation = PortfolioAllocation::new(1000.0, 100.0, 5, assets, 0);

            assert!(matches!(
                compute_projection(&allocation),
                Err(ProjectionError::AllocationSum { .. })
            ));
        }
    }

    #[test]
    fn test_zero_money_stays_at_target_allocation() {
        let allocation = PortfolioAllocation::new(0.0, 0.0, 3, AssetClass::defaults(), 0);
        let results = compute_projection(&allocation).unwrap();

        for result in &results {
            assert_eq!(result.total_value, 0.0);
            assert_eq!(result.asset_values[0].allocation, 60.0);
            assert!(result.asset_values.iter().all(|a| a.allocation.is_finite()));
        }
    }

    #[test]
    fn test_state_carries_year_totals() {
        let engine = ProjectionEngine::default();
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 2, AssetClass::defaults(), 0);
        let mut state = PortfolioState::from_allocation(&allocation);

        for _ in 0..2 {
            state.advance_year();
            let result = engine.calculate_year(&allocation, &mut state);
            assert_eq!(result.total_value, state.total_value);
            assert_eq!(result.total_interest, state.total_interest);
            let asset_total: f64 = state.assets.iter().map(|a| a.value).sum();
            assert_relative_eq!(asset_total, state.total_value, max_relative = 1e-12);
        }
        // 0.08 * 772.8 + 0.03 * 369.9 + 0.05 * 125.5
        assert_relative_eq!(state.total_interest, 79.196, epsilon = 1e-9);
    }

    #[test]
    fn test_unusable_tolerance_is_rejected() {
        let mut assets = two_asset_portfolio();
        assets[1].allocation = 0.0;
        let half_allocated = PortfolioAllocation::new(1000.0, 100.0, 5, assets, 0);

        for tolerance in [f64::NAN, f64::INFINITY] {
            let engine = ProjectionEngine::new(ProjectionConfig {
                allocation_tolerance: tolerance,
                ..Default::default()
            });
            assert!(matches!(
                engine.compute_projection(&half_allocated),
                Err(ProjectionError::InvalidInput { ref field, .. }) if field == "allocation_tolerance"
            ));
        }
    }

    #[test]
    fn test_rejects_duration_beyond_horizon() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, u32::MAX, AssetClass::defaults(), 0);
        assert!(matches!(
            compute_projection(&allocation),
            Err(ProjectionError::InvalidInput { ref field, .. }) if field == "duration"
        ));
    }

    #[test]
    fn test_run_is_deterministic() {
        let engine = ProjectionEngine::default();
        let allocation = PortfolioAllocation::default();

        let first = engine.run(&allocation).unwrap();
        let second = engine.run(&allocation).unwrap();
        assert_eq!(first.years, second.years);
        assert_eq!(first.comparison, second.comparison);
        assert_eq!(first.comparison.len(), 10);
        assert_relative_eq!(first.risk_score, 5.6, epsilon = 1e-12);
    }

    #[test]
    fn test_run_without_comparison() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            include_comparison: false,
            ..Default::default()
        });
        let report = engine.run(&PortfolioAllocation::default()).unwrap();

        assert!(report.comparison.is_empty());
        let summary = report.summary();
        assert_eq!(summary.total_years, 10);
        assert_eq!(summary.rebalance_count, 3);
        assert_eq!(summary.comparison_final_value, None);
        assert_eq!(summary.total_invested, 2000.0);
    }

    #[test]
    fn test_summary_against_baseline() {
        let report = ProjectionEngine::default()
            .run(&PortfolioAllocation::new(1000.0, 100.0, 5, AssetClass::defaults(), 0))
            .unwrap();
        let summary = report.summary();

        let baseline = report.comparison.last().unwrap().value_end_of_year;
        assert_eq!(summary.comparison_final_value, Some(baseline));
        assert_relative_eq!(
            summary.difference_vs_comparison.unwrap(),
            summary.final_value - baseline,
            epsilon = 1e-9
        );
        assert_relative_eq!(summary.total_gain, summary.final_value - 1500.0, epsilon = 1e-9);
    }
}
