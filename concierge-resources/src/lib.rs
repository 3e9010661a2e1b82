//! The hotel resource catalog the dashboard synchronizes: guests, rooms and
//! rate plans, each a [`concierge_core::Resource`] with its own id type,
//! scope, inputs and collection policies.

pub mod guest;
pub mod id;
pub mod rate_plan;
pub mod room;

pub use guest::{Guest, GuestPatch, NewGuest};
pub use id::{GuestId, HotelId, RatePlanId, RoomId};
pub use rate_plan::{NewRatePlan, RatePlan, RatePlanPatch};
pub use room::{NewRoom, Room, RoomCategory, RoomPatch};
