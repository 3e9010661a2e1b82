use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(transparent)]
#[serde(transparent)]
pub struct HotelId {
    inner: Uuid,
}

impl HotelId {
    pub fn generate() -> Self {
        Self {
            inner: Uuid::now_v7(),
        }
    }
}

impl Deref for HotelId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for HotelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(transparent)]
#[serde(transparent)]
pub struct GuestId {
    inner: Uuid,
}

impl GuestId {
    pub fn generate() -> Self {
        Self {
            inner: Uuid::now_v7(),
        }
    }
}

impl Deref for GuestId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for GuestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RoomId {
    inner: Uuid,
}

impl RoomId {
    pub fn generate() -> Self {
        Self {
            inner: Uuid::now_v7(),
        }
    }
}

impl Deref for RoomId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for RoomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RatePlanId {
    inner: Uuid,
}

impl RatePlanId {
    pub fn generate() -> Self {
        Self {
            inner: Uuid::now_v7(),
        }
    }
}

impl Deref for RatePlanId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for RatePlanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
