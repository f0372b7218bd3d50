//! CSV export of projection results

use serde::Serialize;
use std::io::Write;

use super::comparison::ComparisonYearResult;
use super::results::PortfolioResult;
use crate::error::Result;

/// One asset in one year, flattened with the portfolio totals for that year
#[derive(Debug, Serialize)]
struct YearAssetRow<'a> {
    year: u32,
    asset_id: &'a str,
    asset_name: &'a str,
    value: f64,
    interest: f64,
    allocation: f64,
    total_value: f64,
    total_interest: f64,
    total_amount_invested: f64,
    rebalanced: bool,
}

/// Write one row per year per asset class
pub fn write_projection_csv<W: Write>(results: &[PortfolioResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for result in results {
        for asset in &result.asset_values {
            csv_writer.serialize(YearAssetRow {
                year: result.year,
                asset_id: &asset.asset_id,
                asset_name: &asset.asset_name,
                value: asset.value,
                interest: asset.interest,
                allocation: asset.allocation,
                total_value: result.total_value,
                total_interest: result.total_interest,
                total_amount_invested: result.total_amount_invested,
                rebalanced: result.rebalanced,
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the baseline series, one row per year
pub fn write_comparison_csv<W: Write>(results: &[ComparisonYearResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in results {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{AssetClass, PortfolioAllocation};
    use crate::projection::{compute_comparison, compute_projection};

    #[test]
    fn test_projection_csv_layout() {
        let allocation = PortfolioAllocation::new(1000.0, 100.0, 2, AssetClass::defaults(), 2);
        let results = compute_projection(&allocation).unwrap();

        let mut buffer = Vec::new();
        write_projection_csv(&results, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "year,asset_id,asset_name,value,interest,allocation,total_value,total_interest,total_amount_invested,rebalanced"
        );
        // header + 2 years * 3 assets
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("1,stocks,Stocks,"));
        assert!(lines[6].starts_with("2,real_estate,Real Estate,"));
        assert!(lines[6].ends_with(",true"));
    }

    #[test]
    fn test_comparison_csv_layout() {
        let rows = compute_comparison(1000.0, 100.0, 3, 5.0).unwrap();

        let mut buffer = Vec::new();
        write_comparison_csv(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with(
            "year,interest,value_end_of_year,annual_investment,total_interest,total_amount_invested\n"
        ));
        assert_eq!(text.lines().count(), 4);
    }
}
