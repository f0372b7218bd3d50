//! Projection engine: yearly compounding, rebalancing, risk and baseline comparison

mod state;
mod engine;
mod results;
mod comparison;
pub mod export;

pub use state::{AssetState, PortfolioState};
pub use engine::{
    compute_projection, compute_risk, is_rebalancing_year, rebalance, ProjectionConfig,
    ProjectionEngine,
};
pub use results::{AssetYearValue, PortfolioResult, ProjectionReport, ProjectionSummary};
pub use comparison::{blended_return, compute_comparison, ComparisonYearResult};
pub use export::{write_comparison_csv, write_projection_csv};
