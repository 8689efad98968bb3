//! # stagepass
//!
//! Seat-reservation engine for scheduled events with fixed per-event seat
//! inventory. Two cooperating services share this library:
//!
//! - **inventory-service** owns the authoritative per-event seat count and
//!   exposes atomic, version-guarded decrement/increment.
//! - **booking-service** runs the reservation state machine: idempotent
//!   reserve → confirm, rate limiting, bounded-lifetime holds in Redis, an
//!   expiry sweeper, and the waitlist scheduler.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingService / WaitlistService (service/)
//!     ├── ExpiryWorker (service/)
//!     │
//!     ├── InventoryClient ──HTTP──▶ inventory-service
//!     │
//!     ├── Redis (cache.rs): holds, rate limits, availability cache
//!     └── PostgreSQL (persistence/): bookings, payments, waitlist
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod payment;
pub mod persistence;
pub mod service;
