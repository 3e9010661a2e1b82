use crate::id::GuestId;
use chrono::{DateTime, Utc};
use concierge_core::Resource;
use optional_field::Field;
use serde::{Deserialize, Serialize};

/// A registered hotel guest. Unscoped: one directory across the property.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Guest {
    pub fn create(id: GuestId, new: NewGuest) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            created: Utc::now(),
            updated: None,
        }
    }

    pub fn apply(&mut self, patch: GuestPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        match patch.phone {
            Field::Missing => {}
            Field::Present(phone) => self.phone = phone,
        }
        self.updated = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// `phone` is tri-state: missing leaves it alone, an explicit null clears it.
pub struct GuestPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Field<String>,
}

impl Resource for Guest {
    type Id = GuestId;
    type Scope = ();
    type New = NewGuest;
    type Patch = GuestPatch;

    const NAME: &'static str = "guest";
    const SEARCH_FIELDS: &'static [&'static str] = &["first_name", "last_name", "email"];

    fn id(&self) -> &GuestId {
        &self.id
    }

    fn search_field(&self, field: &str) -> Option<&str> {
        match field {
            "first_name" => Some(&self.first_name),
            "last_name" => Some(&self.last_name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}
