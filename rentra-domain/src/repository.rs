use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::booking::Booking;
use crate::customer::Customer;
use crate::payment::Payment;
use crate::vehicle::Vehicle;

/// A point-in-time export of every record the core owns. The
/// surrounding persistence collaborator serializes this however it
/// likes; the core only promises that a restored snapshot behaves
/// identically to the state it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RentalSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub customers: Vec<Customer>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
}

/// Storage seam for the excluded persistence collaborator. Reads must
/// reflect the latest committed write.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn save(
        &self,
        snapshot: &RentalSnapshot,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn load(&self) -> Result<Option<RentalSnapshot>, Box<dyn Error + Send + Sync>>;
}
