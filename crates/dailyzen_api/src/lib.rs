//! Envelope-returning API over `dailyzen_core` for web and CLI front ends.

pub mod api;

pub use api::{
    ping, parse_request, AddItemRequest, AddScheduleRequest, Api, ApiResponse, ApiStatus,
    ChatMessageRequest, DashboardView, PingView, UpdateProfileRequest,
};
