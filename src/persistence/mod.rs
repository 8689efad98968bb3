//! PostgreSQL stores.
//!
//! Each service talks to its own database: the inventory service owns the
//! `events` table, the booking orchestrator owns `bookings`, `payments`,
//! and `waitlist_entries`. No store touches the other service's tables.
//!
//! All queries use the runtime `sqlx` API; every state transition is a
//! conditional `UPDATE` predicated on the prior state so concurrent
//! writers cannot double-apply it.

pub mod bookings;
pub mod inventory;
pub mod waitlist;

pub use bookings::{BookingStore, NewBooking};
pub use inventory::InventoryStore;
pub use waitlist::WaitlistStore;
