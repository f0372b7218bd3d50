//! Scenario runner for batch projections
//!
//! Holds one configured engine and fans independent portfolios (or one
//! portfolio under several rebalancing policies) out across threads.

use rayon::prelude::*;

use crate::error::Result;
use crate::portfolio::PortfolioAllocation;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionReport};

/// Outcome of one rebalancing policy applied to a portfolio
#[derive(Debug, Clone)]
pub struct RebalancingScenario {
    pub rebalancing_frequency: u32,
    pub report: ProjectionReport,
}

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for scenario in runner.run_rebalancing_scenarios(&allocation, &[0, 1, 3, 5])? {
///     println!("{} -> {:.2}", scenario.rebalancing_frequency, scenario.report.summary().final_value);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Run a single portfolio
    pub fn run(&self, allocation: &PortfolioAllocation) -> Result<ProjectionReport> {
        self.engine.run(allocation)
    }

    /// Run many portfolios in parallel; results keep the input order
    pub fn run_batch(&self, allocations: &[PortfolioAllocation]) -> Vec<Result<ProjectionReport>> {
        allocations
            .par_iter()
            .map(|allocation| self.engine.run(allocation))
            .collect()
    }

    /// Run one portfolio under each rebalancing frequency
    ///
    /// Every frequency sees the same inputs, so a rejected allocation fails
    /// the whole call.
    pub fn run_rebalancing_scenarios(
        &self,
        allocation: &PortfolioAllocation,
        frequencies: &[u32],
    ) -> Result<Vec<RebalancingScenario>> {
        frequencies
            .par_iter()
            .map(|&frequency| {
                let report = self.engine.run(&allocation.with_rebalancing_frequency(frequency))?;
                Ok(RebalancingScenario {
                    rebalancing_frequency: frequency,
                    report,
                })
            })
            .collect()
    }
}
