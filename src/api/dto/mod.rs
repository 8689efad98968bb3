//! Request and response DTOs for the REST surface.

pub mod booking_dto;
pub mod common_dto;
pub mod inventory_dto;
pub mod waitlist_dto;

pub use booking_dto::{
    BookingDetailResponse, BookingListResponse, BookingSummaryDto, CancellationResponse,
    CheckAvailabilityParams, CheckAvailabilityResponse, ConfirmRequest, ConfirmationResponse,
    MessageResponse, PaymentInfoDto, ReservationResponse, ReserveRequest,
};
pub use common_dto::PaginationParams;
pub use inventory_dto::UpdateAvailabilityRequest;
pub use waitlist_dto::{
    JoinWaitlistRequest, JoinWaitlistResponse, LeaveWaitlistRequest, WaitlistPositionParams,
    WaitlistPositionResponse,
};
