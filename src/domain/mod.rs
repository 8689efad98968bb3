//! Domain types shared by both services.
//!
//! Plain data structures and the small pieces of pure business logic that
//! belong with them: status enums, the refund policy, and reference
//! generation. Anything that talks to a store lives in `persistence/` or
//! `service/`.

pub mod booking;
pub mod event;
pub mod reference;
pub mod waitlist;

pub use booking::{Booking, BookingStatus, Payment, PaymentStatus, RefundStatus, ReservationHold};
pub use event::{EventForBooking, EventStatus, InventorySnapshot};
pub use waitlist::{WaitlistEntry, WaitlistStatus};
