use std::collections::HashMap;

use rentra_domain::booking::Booking;
use rentra_domain::ids::{BookingId, CustomerId, VehicleId};
use rentra_domain::period::RentalPeriod;
use rentra_domain::{RentalError, RentalResult};

/// The booking ledger: owns every booking record and answers the
/// overlap question. Invariant: for a given vehicle no two Active
/// bookings have intersecting half-open periods.
///
/// `insert` does not re-check overlap; the reservation service
/// performs the check-and-insert sequence under a per-vehicle gate so
/// the atomicity boundary is explicit at that layer.
pub struct BookingLedger {
    bookings: HashMap<BookingId, Booking>,
    by_vehicle: HashMap<VehicleId, Vec<BookingId>>,
    by_customer: HashMap<CustomerId, Vec<BookingId>>,
    order: Vec<BookingId>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self {
            bookings: HashMap::new(),
            by_vehicle: HashMap::new(),
            by_customer: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// True iff an Active booking for `vehicle_id` intersects
    /// `period`. `exclude` lets an update ignore the booking being
    /// modified so it cannot conflict with itself.
    pub fn has_overlap(
        &self,
        vehicle_id: VehicleId,
        period: &RentalPeriod,
        exclude: Option<BookingId>,
    ) -> bool {
        self.active_for_vehicle(vehicle_id)
            .filter(|booking| Some(booking.id) != exclude)
            .any(|booking| booking.period.overlaps(period))
    }

    /// Record a new Active booking. The period is valid by
    /// construction and the caller has already confirmed no overlap.
    pub fn insert(
        &mut self,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        period: RentalPeriod,
    ) -> BookingId {
        let booking = Booking::new(vehicle_id, customer_id, period);
        let id = booking.id;
        self.by_vehicle.entry(vehicle_id).or_default().push(id);
        self.by_customer.entry(customer_id).or_default().push(id);
        self.order.push(id);
        self.bookings.insert(id, booking);
        id
    }

    /// Move an Active booking to new dates. A cancelled booking is no
    /// longer addressable for updates.
    pub fn set_dates(&mut self, id: BookingId, period: RentalPeriod) -> RentalResult<()> {
        let booking = self.get_mut(id)?;
        if !booking.is_active() {
            return Err(RentalError::NotFound(format!(
                "booking {} is cancelled",
                id
            )));
        }
        booking.set_period(period);
        Ok(())
    }

    /// Cancel a booking. Cancelling an already-cancelled booking is a
    /// no-op success.
    pub fn cancel(&mut self, id: BookingId) -> RentalResult<()> {
        let booking = self.get_mut(id)?;
        if booking.is_active() {
            booking.cancel();
        }
        Ok(())
    }

    pub fn get(&self, id: BookingId) -> RentalResult<&Booking> {
        self.bookings
            .get(&id)
            .ok_or_else(|| RentalError::NotFound(format!("booking {}", id)))
    }

    pub fn list_by_vehicle(&self, vehicle_id: VehicleId) -> Vec<&Booking> {
        self.by_vehicle
            .get(&vehicle_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bookings.get(id))
            .collect()
    }

    pub fn list_by_customer(&self, customer_id: CustomerId) -> Vec<&Booking> {
        self.by_customer
            .get(&customer_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bookings.get(id))
            .collect()
    }

    /// Whether any Active booking still references the vehicle.
    pub fn has_active_for_vehicle(&self, vehicle_id: VehicleId) -> bool {
        self.active_for_vehicle(vehicle_id).next().is_some()
    }

    /// Whether any Active booking still references the customer.
    pub fn has_active_for_customer(&self, customer_id: CustomerId) -> bool {
        self.by_customer
            .get(&customer_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bookings.get(id))
            .any(Booking::is_active)
    }

    /// All bookings in insertion order.
    pub fn list(&self) -> Vec<&Booking> {
        self.order
            .iter()
            .filter_map(|id| self.bookings.get(id))
            .collect()
    }

    pub fn records(&self) -> Vec<Booking> {
        self.list().into_iter().cloned().collect()
    }

    /// Rebuild the ledger, including its indexes, from exported
    /// records.
    pub fn from_records(records: Vec<Booking>) -> Self {
        let mut ledger = Self::new();
        for booking in records {
            let id = booking.id;
            ledger.by_vehicle.entry(booking.vehicle_id).or_default().push(id);
            ledger
                .by_customer
                .entry(booking.customer_id)
                .or_default()
                .push(id);
            ledger.order.push(id);
            ledger.bookings.insert(id, booking);
        }
        ledger
    }

    fn active_for_vehicle(&self, vehicle_id: VehicleId) -> impl Iterator<Item = &Booking> {
        self.by_vehicle
            .get(&vehicle_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bookings.get(id))
            .filter(|booking| booking.is_active())
    }

    fn get_mut(&mut self, id: BookingId) -> RentalResult<&mut Booking> {
        self.bookings
            .get_mut(&id)
            .ok_or_else(|| RentalError::NotFound(format!("booking {}", id)))
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new()
    }
}
