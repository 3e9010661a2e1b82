use crate::id::{HotelId, RatePlanId};
use chrono::{DateTime, Utc};
use concierge_core::Resource;
use optional_field::Field;
use serde::{Deserialize, Serialize};

/// A bookable pricing offer for one hotel (e.g. "flexible", "early bird").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RatePlan {
    pub id: RatePlanId,
    pub hotel_id: HotelId,
    pub name: String,
    pub description: Option<String>,
    pub nightly_rate_cents: i64,
    pub refundable: bool,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl RatePlan {
    pub fn create(id: RatePlanId, new: NewRatePlan) -> Self {
        Self {
            id,
            hotel_id: new.hotel_id,
            name: new.name,
            description: new.description,
            nightly_rate_cents: new.nightly_rate_cents,
            refundable: new.refundable,
            created: Utc::now(),
            updated: None,
        }
    }

    pub fn apply(&mut self, patch: RatePlanPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        match patch.description {
            Field::Missing => {}
            Field::Present(description) => self.description = description,
        }
        if let Some(rate) = patch.nightly_rate_cents {
            self.nightly_rate_cents = rate;
        }
        if let Some(refundable) = patch.refundable {
            self.refundable = refundable;
        }
        self.updated = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRatePlan {
    pub hotel_id: HotelId,
    pub name: String,
    pub description: Option<String>,
    pub nightly_rate_cents: i64,
    pub refundable: bool,
}

pub struct RatePlanPatch {
    pub name: Option<String>,
    pub description: Field<String>,
    pub nightly_rate_cents: Option<i64>,
    pub refundable: Option<bool>,
}

impl Resource for RatePlan {
    type Id = RatePlanId;
    type Scope = HotelId;
    type New = NewRatePlan;
    type Patch = RatePlanPatch;

    const NAME: &'static str = "rate plan";
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> &RatePlanId {
        &self.id
    }

    fn search_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}
