//! Portfolio inputs: asset classes, allocations and their editing

mod data;
mod editor;
pub mod loader;

pub use data::{
    total_allocation, AssetClass, PortfolioAllocation, ALLOCATION_TOLERANCE, MAX_DURATION, MAX_RISK, MIN_RISK,
};
pub(crate) use data::validate_contributions;
pub use editor::{AllocationEditor, MIN_ASSET_CLASSES};
pub use loader::{load_allocation, load_assets};
