//! HTTP clients for sibling services.

pub mod inventory;

pub use inventory::InventoryClient;
