//! Interactive allocation editing with locks and proportional redistribution
//!
//! Keeps an editable asset list whose allocations stay at 100% as the user
//! moves one slider: the difference is spread over the other unlocked asset
//! classes in proportion to what they already hold.

use std::collections::BTreeSet;

use log::debug;

use super::data::{total_allocation, AssetClass};
use crate::error::{ProjectionError, Result};
use crate::projection::compute_risk;

/// A portfolio can't shrink below this many asset classes
pub const MIN_ASSET_CLASSES: usize = 2;

const NEW_ASSET_RETURN: f64 = 4.0;
const NEW_ASSET_RISK: f64 = 4.0;
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct AllocationEditor {
    assets: Vec<AssetClass>,
    locked: BTreeSet<String>,
}

impl AllocationEditor {
    pub fn new(assets: Vec<AssetClass>) -> Self {
        Self {
            assets,
            locked: BTreeSet::new(),
        }
    }

    pub fn assets(&self) -> &[AssetClass] {
        &self.assets
    }

    pub fn into_assets(self) -> Vec<AssetClass> {
        self.assets
    }

    pub fn total_allocation(&self) -> f64 {
        total_allocation(&self.assets)
    }

    /// Weighted risk score rounded to one decimal place
    pub fn risk_score(&self) -> f64 {
        (compute_risk(&self.assets) * 10.0).round() / 10.0
    }

    pub fn is_locked(&self, asset_id: &str) -> bool {
        self.locked.contains(asset_id)
    }

    /// Lock or unlock an asset class; returns the new lock state
    pub fn toggle_lock(&mut self, asset_id: &str) -> Result<bool> {
        self.position(asset_id)?;
        if self.locked.remove(asset_id) {
            Ok(false)
        } else {
            self.locked.insert(asset_id.to_string());
            Ok(true)
        }
    }

    /// Set one asset's allocation and rebalance the other unlocked assets
    ///
    /// The requested value is clamped so that locked assets keep their share.
    /// Returns the allocation actually applied.
    pub fn update_allocation(&mut self, asset_id: &str, new_allocation: f64) -> Result<f64> {
        if !new_allocation.is_finite() {
            return Err(ProjectionError::invalid(
                "allocation",
                format!("must be a finite percentage, got {}", new_allocation),
            ));
        }

        let index = self.position(asset_id)?;
        if self.is_locked(asset_id) {
            return Err(ProjectionError::AllocationLocked(asset_id.to_string()));
        }

        let adjustable: Vec<usize> = (0..self.assets.len())
            .filter(|&i| i != index && !self.is_locked(&self.assets[i].id))
            .collect();
        let locked_others: f64 = self
            .assets
            .iter()
            .enumerate()
            .filter(|(i, a)| *i != index && self.is_locked(&a.id))
            .map(|(_, a)| a.allocation)
            .sum();

        let old_allocation = self.assets[index].allocation;

        if adjustable.is_empty() {
            if (new_allocation - old_allocation).abs() > EPSILON {
                return Err(ProjectionError::AllocationLocked(asset_id.to_string()));
            }
            return Ok(old_allocation);
        }

        let ceiling = (100.0 - locked_others).max(0.0);
        let applied = new_allocation.clamp(0.0, ceiling);
        let difference = old_allocation - applied;
        self.assets[index].allocation = applied;

        let adjustable_total: f64 = adjustable.iter().map(|&i| self.assets[i].allocation).sum();
        for &i in &adjustable {
            let share = if adjustable_total > EPSILON {
                self.assets[i].allocation / adjustable_total
            } else {
                1.0 / adjustable.len() as f64
            };
            let asset = &mut self.assets[i];
            asset.allocation = (asset.allocation + difference * share).max(0.0);
        }

        debug!(
            "Allocation of {} moved {:.4} -> {:.4}, {:.4} spread over {} assets",
            asset_id,
            old_allocation,
            applied,
            difference,
            adjustable.len()
        );

        Ok(applied)
    }

    /// Append a new asset class with a zero allocation; returns its id
    pub fn add_asset_class(&mut self) -> String {
        let ordinal = self.assets.len() + 1;
        let mut suffix = ordinal;
        let mut id = format!("asset_{}", suffix);
        while self.assets.iter().any(|a| a.id == id) {
            suffix += 1;
            id = format!("asset_{}", suffix);
        }

        self.assets.push(AssetClass::new(
            id.clone(),
            format!("Asset {}", ordinal),
            NEW_ASSET_RETURN,
            0.0,
            NEW_ASSET_RISK,
        ));
        id
    }

    /// Drop an asset class and hand its allocation to the rest proportionally
    pub fn remove_asset_class(&mut self, asset_id: &str) -> Result<AssetClass> {
        let index = self.position(asset_id)?;
        if self.assets.len() <= MIN_ASSET_CLASSES {
            return Err(ProjectionError::MinimumAssets { min: MIN_ASSET_CLASSES });
        }

        let removed = self.assets.remove(index);
        self.locked.remove(asset_id);

        let remaining_total = total_allocation(&self.assets);
        let count = self.assets.len() as f64;
        for asset in &mut self.assets {
            let share = if remaining_total > EPSILON {
                asset.allocation / remaining_total
            } else {
                1.0 / count
            };
            asset.allocation += removed.allocation * share;
        }

        Ok(removed)
    }

    /// Back to the default three-class template with nothing locked
    pub fn reset_to_default(&mut self) {
        self.assets = AssetClass::defaults();
        self.locked.clear();
    }

    fn position(&self, asset_id: &str) -> Result<usize> {
        self.assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| ProjectionError::AssetNotFound(asset_id.to_string()))
    }
}

impl Default for AllocationEditor {
    fn default() -> Self {
        Self::new(AssetClass::defaults())
    }
}
