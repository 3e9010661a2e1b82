use crate::id::{HotelId, RoomId};
use chrono::{DateTime, Utc};
use concierge_core::{InsertPosition, RefreshPolicy, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    Single,
    Double,
    Suite,
    Family,
}

impl RoomCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomCategory::Single => "single",
            RoomCategory::Double => "double",
            RoomCategory::Suite => "suite",
            RoomCategory::Family => "family",
        }
    }
}

/// One physical room, scoped to its hotel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub hotel_id: HotelId,
    pub number: String,
    pub category: RoomCategory,
    pub nightly_rate_cents: i64,
    pub capacity: u32,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Room {
    pub fn create(id: RoomId, new: NewRoom) -> Self {
        Self {
            id,
            hotel_id: new.hotel_id,
            number: new.number,
            category: new.category,
            nightly_rate_cents: new.nightly_rate_cents,
            capacity: new.capacity,
            created: Utc::now(),
            updated: None,
        }
    }

    pub fn apply(&mut self, patch: RoomPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(rate) = patch.nightly_rate_cents {
            self.nightly_rate_cents = rate;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        self.updated = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub hotel_id: HotelId,
    pub number: String,
    pub category: RoomCategory,
    pub nightly_rate_cents: i64,
    pub capacity: u32,
}

pub struct RoomPatch {
    pub number: Option<String>,
    pub category: Option<RoomCategory>,
    pub nightly_rate_cents: Option<i64>,
    pub capacity: Option<u32>,
}

impl Resource for Room {
    type Id = RoomId;
    type Scope = HotelId;
    type New = NewRoom;
    type Patch = RoomPatch;

    const NAME: &'static str = "room";
    const SEARCH_FIELDS: &'static [&'static str] = &["number", "category"];
    // room lists read in floor order, so new rooms go to the end
    const CREATED_ENTITY: InsertPosition = InsertPosition::Append;
    const REFRESH: RefreshPolicy = RefreshPolicy::InsertIfAbsent;

    fn id(&self) -> &RoomId {
        &self.id
    }

    fn search_field(&self, field: &str) -> Option<&str> {
        match field {
            "number" => Some(&self.number),
            "category" => Some(self.category.as_str()),
            _ => None,
        }
    }
}
