//! Load asset classes from CSV and projection requests from JSON

use csv::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::data::{AssetClass, PortfolioAllocation};
use crate::error::{ProjectionError, Result};

/// Raw CSV row: `id,name,expected_return,allocation,risk`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    expected_return: f64,
    allocation: f64,
    risk: f64,
}

impl CsvRow {
    fn into_asset(self) -> Result<AssetClass> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ProjectionError::invalid("id", "asset id must not be empty"));
        }
        let name = match self.name.trim() {
            "" => id.clone(),
            name => name.to_string(),
        };

        Ok(AssetClass::new(id, name, self.expected_return, self.allocation, self.risk))
    }
}

/// Load asset classes from a CSV file
pub fn load_assets<P: AsRef<Path>>(path: P) -> Result<Vec<AssetClass>> {
    let file = File::open(path)?;
    load_assets_from_reader(file)
}

/// Load asset classes from any reader (string buffer, stdin, ...)
pub fn load_assets_from_reader<R: Read>(reader: R) -> Result<Vec<AssetClass>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut assets = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        assets.push(row.into_asset()?);
    }

    Ok(assets)
}

/// Load a projection request from a JSON file; omitted fields take their defaults
pub fn load_allocation<P: AsRef<Path>>(path: P) -> Result<PortfolioAllocation> {
    let file = File::open(path)?;
    load_allocation_from_reader(BufReader::new(file))
}

pub fn load_allocation_from_reader<R: Read>(reader: R) -> Result<PortfolioAllocation> {
    Ok(serde_json::from_reader(reader)?)
}
