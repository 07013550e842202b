use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, CustomerId, VehicleId};
use crate::period::RentalPeriod;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

/// A reservation of one vehicle for one customer over a rental
/// period. Bookings are cancelled, never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub vehicle_id: VehicleId,
    pub customer_id: CustomerId,
    pub period: RentalPeriod,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(vehicle_id: VehicleId, customer_id: CustomerId, period: RentalPeriod) -> Self {
        Self {
            id: BookingId::new(),
            vehicle_id,
            customer_id,
            period,
            status: BookingStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// Mark the booking cancelled (never delete).
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }

    pub fn set_period(&mut self, period: RentalPeriod) {
        self.period = period;
    }
}
