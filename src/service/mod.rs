//! Business logic: orchestration layers between the HTTP handlers and the
//! stores/clients.

pub mod booking;
pub mod expiry;
pub mod inventory;
pub mod waitlist;

pub use booking::BookingService;
pub use expiry::ExpiryWorker;
pub use inventory::InventoryService;
pub use waitlist::WaitlistService;
