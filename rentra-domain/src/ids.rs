use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{RentalError, RentalResult};

/// Opaque identifier for a vehicle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(Uuid);

/// Opaque identifier for a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

/// Opaque identifier for a booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

/// Opaque identifier for a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl VehicleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier arriving as raw text from the presentation
    /// layer.
    pub fn parse(raw: &str) -> RentalResult<Self> {
        parse_uuid(raw, "vehicle id").map(Self)
    }
}

impl CustomerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> RentalResult<Self> {
        parse_uuid(raw, "customer id").map(Self)
    }
}

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> RentalResult<Self> {
        parse_uuid(raw, "booking id").map(Self)
    }
}

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> RentalResult<Self> {
        parse_uuid(raw, "payment id").map(Self)
    }
}

fn parse_uuid(raw: &str, what: &str) -> RentalResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| RentalError::Validation(format!("{} is not a valid identifier: {}", what, raw)))
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
