use crate::Materialize;
use concierge_resources::{
    Guest, GuestId, GuestPatch, HotelId, NewGuest, NewRatePlan, NewRoom, RatePlan, RatePlanId,
    RatePlanPatch, Room, RoomId, RoomPatch,
};

impl Materialize for Guest {
    fn materialize(new: NewGuest) -> Guest {
        Guest::create(GuestId::generate(), new)
    }

    fn patch(&mut self, patch: GuestPatch) {
        self.apply(patch);
    }

    fn scope(&self) {}
}

impl Materialize for Room {
    fn materialize(new: NewRoom) -> Room {
        Room::create(RoomId::generate(), new)
    }

    fn patch(&mut self, patch: RoomPatch) {
        self.apply(patch);
    }

    fn scope(&self) -> HotelId {
        self.hotel_id
    }
}

impl Materialize for RatePlan {
    fn materialize(new: NewRatePlan) -> RatePlan {
        RatePlan::create(RatePlanId::generate(), new)
    }

    fn patch(&mut self, patch: RatePlanPatch) {
        self.apply(patch);
    }

    fn scope(&self) -> HotelId {
        self.hotel_id
    }
}
