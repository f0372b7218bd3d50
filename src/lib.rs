//! Portfolio Projection - year-by-year projection engine for diversified portfolios
//!
//! This library provides:
//! - Yearly projections of weighted asset classes with annual contributions
//! - Periodic rebalancing back to target allocations
//! - Allocation-weighted risk scoring
//! - A single blended-rate baseline for comparison
//! - Allocation editing with locks and proportional redistribution
//! - Parallel batch and rebalancing-scenario runs

pub mod error;
pub mod portfolio;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use portfolio::{AllocationEditor, AssetClass, PortfolioAllocation};
pub use projection::{
    compute_comparison, compute_projection, compute_risk, ComparisonYearResult, PortfolioResult,
    ProjectionConfig, ProjectionEngine, ProjectionReport,
};
pub use scenario::ScenarioRunner;
