//! AWS Lambda handler for portfolio projections
//!
//! Accepts a projection request as JSON and returns the yearly results, the
//! single-rate baseline and a summary. Invalid portfolios come back as a
//! response with `error` set rather than as an invocation failure.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use portfolio_projection::projection::ProjectionSummary;
use portfolio_projection::{
    ComparisonYearResult, PortfolioAllocation, PortfolioResult, ProjectionConfig, ScenarioRunner,
};

/// Input configuration for the projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Portfolio inputs; omitted fields fall back to the default portfolio
    #[serde(flatten)]
    pub allocation: PortfolioAllocation,

    /// Whether to include the single-rate baseline (default: true)
    #[serde(default = "default_true")]
    pub include_comparison: bool,
}

fn default_true() -> bool { true }

/// Output from the projection
#[derive(Debug, Serialize, Default)]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blended_return: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProjectionSummary>,
    pub results: Vec<PortfolioResult>,
    pub comparison: Vec<ComparisonYearResult>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = Instant::now();
    let request = event.payload;

    let runner = ScenarioRunner::with_config(ProjectionConfig {
        include_comparison: request.include_comparison,
        ..Default::default()
    });

    let response = match runner.run(&request.allocation) {
        Ok(report) => {
            info!(
                "Projected {} years for {} asset classes",
                report.years.len(),
                request.allocation.assets.len()
            );
            ProjectionResponse {
                risk_score: Some(report.risk_score),
                blended_return: Some(report.blended_return),
                summary: Some(report.summary()),
                results: report.years,
                comparison: report.comparison,
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: None,
            }
        }
        Err(e) => {
            warn!("Projection request rejected: {}", e);
            ProjectionResponse {
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
