use std::error::Error;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use chrono::NaiveDate;

use rentra_domain::booking::Booking;
use rentra_domain::customer::Customer;
use rentra_domain::ids::{BookingId, CustomerId, PaymentId, VehicleId};
use rentra_domain::payment::{Payment, PaymentExtra, PaymentMethod};
use rentra_domain::period::RentalPeriod;
use rentra_domain::repository::{RentalSnapshot, SnapshotRepository};
use rentra_domain::vehicle::{Vehicle, VehicleCategory};
use rentra_domain::{RentalError, RentalResult};
use rentra_fleet::{CustomerDirectory, FleetStore};
use rentra_ledger::{BookingLedger, PaymentBook};

use crate::gate::{self, VehicleGates};

/// The orchestration layer and the only externally callable surface
/// for state changes. Owns no records itself: it coordinates the
/// fleet store, customer directory, booking ledger and payment book,
/// and is the sole component allowed to reason about vehicle
/// availability from booking state.
///
/// Reads take shared locks and run concurrently. Booking mutations
/// additionally serialize per vehicle through `VehicleGates`, making
/// the overlap-check → insert sequence atomic with respect to other
/// mutations on the same vehicle.
pub struct ReservationService {
    fleet: RwLock<FleetStore>,
    customers: RwLock<CustomerDirectory>,
    ledger: RwLock<BookingLedger>,
    payments: RwLock<PaymentBook>,
    gates: VehicleGates,
}

impl ReservationService {
    pub fn new() -> Self {
        Self {
            fleet: RwLock::new(FleetStore::new()),
            customers: RwLock::new(CustomerDirectory::new()),
            ledger: RwLock::new(BookingLedger::new()),
            payments: RwLock::new(PaymentBook::new()),
            gates: VehicleGates::new(),
        }
    }

    // ---- fleet administration ----

    pub fn add_vehicle(
        &self,
        label: impl Into<String>,
        category: VehicleCategory,
        price_per_day_cents: i64,
    ) -> RentalResult<VehicleId> {
        let vehicle = Vehicle::new(label, category, price_per_day_cents)?;
        let id = self.fleet_mut().add(vehicle);
        tracing::debug!(vehicle_id = %id, "vehicle added to fleet");
        Ok(id)
    }

    pub fn update_vehicle(
        &self,
        id: VehicleId,
        label: impl Into<String>,
        category: VehicleCategory,
        price_per_day_cents: i64,
    ) -> RentalResult<()> {
        self.fleet_mut().update(id, label, category, price_per_day_cents)
    }

    /// Remove a vehicle from the fleet. Refused while any Active
    /// booking still references it.
    pub fn remove_vehicle(&self, id: VehicleId) -> RentalResult<()> {
        let vehicle_gate = self.gates.gate(id);
        let _serial = gate::acquire(&vehicle_gate);

        if !self.fleet().contains(id) {
            return Err(RentalError::NotFound(format!("vehicle {}", id)));
        }
        if self.ledger().has_active_for_vehicle(id) {
            return Err(RentalError::Conflict(format!(
                "vehicle {} has active bookings",
                id
            )));
        }
        self.fleet_mut().remove(id)?;
        self.gates.discard(id);
        tracing::debug!(vehicle_id = %id, "vehicle removed from fleet");
        Ok(())
    }

    pub fn get_vehicle(&self, id: VehicleId) -> RentalResult<Vehicle> {
        self.fleet().get(id).cloned()
    }

    pub fn list_vehicles(&self) -> Vec<Vehicle> {
        self.fleet().records()
    }

    // ---- customer administration ----

    pub fn register_customer(
        &self,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        license_number: impl Into<String>,
    ) -> RentalResult<CustomerId> {
        let customer = Customer::new(name, contact_info, license_number)?;
        let id = self.customers_mut().add(customer)?;
        tracing::debug!(customer_id = %id, "customer registered");
        Ok(id)
    }

    pub fn update_customer(
        &self,
        id: CustomerId,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        license_number: impl Into<String>,
    ) -> RentalResult<()> {
        self.customers_mut().update(id, name, contact_info, license_number)
    }

    /// Remove a customer. Refused while any Active booking still
    /// references them; cancel those bookings first.
    pub fn remove_customer(&self, id: CustomerId) -> RentalResult<()> {
        // The write guard spans the check and the removal: `book`
        // holds the read side from its existence check through the
        // ledger insert, so neither window can interleave the other.
        let mut customers = self.customers_mut();
        if !customers.contains(id) {
            return Err(RentalError::NotFound(format!("customer {}", id)));
        }
        if self.ledger().has_active_for_customer(id) {
            return Err(RentalError::Conflict(format!(
                "customer {} has active bookings",
                id
            )));
        }
        customers.remove(id)?;
        drop(customers);
        tracing::debug!(customer_id = %id, "customer removed");
        Ok(())
    }

    pub fn get_customer(&self, id: CustomerId) -> RentalResult<Customer> {
        self.customers().get(id).cloned()
    }

    pub fn find_customer_by_license(&self, license_number: &str) -> Option<Customer> {
        self.customers().find_by_license(license_number).cloned()
    }

    pub fn list_customers(&self) -> Vec<Customer> {
        self.customers().records()
    }

    // ---- booking lifecycle ----

    /// Reserve a vehicle for a customer over `period`. Fails
    /// `NotFound` for an unknown vehicle or customer and `Conflict`
    /// when an Active booking overlaps. Availability is not mutated:
    /// it is a point-in-time projection, and a future-dated booking
    /// does not make a vehicle unavailable today.
    pub fn book(
        &self,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        period: RentalPeriod,
    ) -> RentalResult<BookingId> {
        self.book_impl(vehicle_id, customer_id, period, None)
    }

    /// `book` with a caller-supplied deadline: fails `Timeout` with no
    /// state change if the vehicle's gate cannot be acquired in time.
    pub fn book_within(
        &self,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        period: RentalPeriod,
        deadline: Instant,
    ) -> RentalResult<BookingId> {
        self.book_impl(vehicle_id, customer_id, period, Some(deadline))
    }

    fn book_impl(
        &self,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        period: RentalPeriod,
        deadline: Option<Instant>,
    ) -> RentalResult<BookingId> {
        let vehicle_gate = self.gates.gate(vehicle_id);
        let _serial = gate::acquire_by(&vehicle_gate, deadline)?;

        if !self.fleet().contains(vehicle_id) {
            return Err(RentalError::NotFound(format!("vehicle {}", vehicle_id)));
        }
        // Held through the insert: a concurrent `remove_customer`
        // cannot slip between this check and the booking landing.
        let customers = self.customers();
        if !customers.contains(customer_id) {
            return Err(RentalError::NotFound(format!("customer {}", customer_id)));
        }
        if self.ledger().has_overlap(vehicle_id, &period, None) {
            return Err(RentalError::Conflict(format!(
                "vehicle {} already booked between {} and {}",
                vehicle_id,
                period.start(),
                period.end()
            )));
        }

        let booking_id = self.ledger_mut().insert(vehicle_id, customer_id, period);
        drop(customers);
        tracing::debug!(
            booking_id = %booking_id,
            vehicle_id = %vehicle_id,
            customer_id = %customer_id,
            "booking created"
        );
        Ok(booking_id)
    }

    /// Move a booking to new dates, re-checked for conflicts with the
    /// booking's own prior interval excluded. Fails `NotFound` if the
    /// booking is unknown or already Cancelled.
    pub fn update_booking(&self, booking_id: BookingId, period: RentalPeriod) -> RentalResult<()> {
        self.update_booking_impl(booking_id, period, None)
    }

    /// `update_booking` with a caller-supplied deadline.
    pub fn update_booking_within(
        &self,
        booking_id: BookingId,
        period: RentalPeriod,
        deadline: Instant,
    ) -> RentalResult<()> {
        self.update_booking_impl(booking_id, period, Some(deadline))
    }

    fn update_booking_impl(
        &self,
        booking_id: BookingId,
        period: RentalPeriod,
        deadline: Option<Instant>,
    ) -> RentalResult<()> {
        let vehicle_id = self.ledger().get(booking_id)?.vehicle_id;
        let vehicle_gate = self.gates.gate(vehicle_id);
        let _serial = gate::acquire_by(&vehicle_gate, deadline)?;

        let mut ledger = self.ledger_mut();
        if !ledger.get(booking_id)?.is_active() {
            return Err(RentalError::NotFound(format!(
                "booking {} is cancelled",
                booking_id
            )));
        }
        if ledger.has_overlap(vehicle_id, &period, Some(booking_id)) {
            return Err(RentalError::Conflict(format!(
                "vehicle {} already booked between {} and {}",
                vehicle_id,
                period.start(),
                period.end()
            )));
        }
        ledger.set_dates(booking_id, period)?;
        drop(ledger);
        tracing::debug!(booking_id = %booking_id, "booking dates updated");
        Ok(())
    }

    /// Cancel a booking. Idempotent: cancelling an already-cancelled
    /// booking is a no-op success. Only an id that never existed is
    /// `NotFound`.
    pub fn cancel_booking(&self, booking_id: BookingId) -> RentalResult<()> {
        let vehicle_id = self.ledger().get(booking_id)?.vehicle_id;
        let vehicle_gate = self.gates.gate(vehicle_id);
        let _serial = gate::acquire(&vehicle_gate);

        self.ledger_mut().cancel(booking_id)?;
        tracing::debug!(booking_id = %booking_id, "booking cancelled");
        Ok(())
    }

    pub fn get_booking(&self, booking_id: BookingId) -> RentalResult<Booking> {
        self.ledger().get(booking_id).cloned()
    }

    pub fn bookings_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<Booking> {
        self.ledger()
            .list_by_vehicle(vehicle_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn bookings_for_customer(&self, customer_id: CustomerId) -> Vec<Booking> {
        self.ledger()
            .list_by_customer(customer_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn list_bookings(&self) -> Vec<Booking> {
        self.ledger().records()
    }

    /// Derived availability: true iff no Active booking covers
    /// `as_of`. Replaces the stored boolean flag of older designs,
    /// which could drift from actual bookings.
    pub fn current_availability(&self, vehicle_id: VehicleId, as_of: NaiveDate) -> RentalResult<bool> {
        self.fleet().get(vehicle_id)?;
        let ledger = self.ledger();
        let covered = ledger
            .list_by_vehicle(vehicle_id)
            .iter()
            .any(|booking| booking.is_active() && booking.period.contains(as_of));
        Ok(!covered)
    }

    // ---- payments ----

    /// Record a payment against a booking. Append-only; no reversal.
    pub fn record_payment(
        &self,
        booking_id: BookingId,
        base_amount_cents: i64,
        method: PaymentMethod,
        extras: Vec<PaymentExtra>,
    ) -> RentalResult<PaymentId> {
        self.ledger().get(booking_id)?;
        let payment = Payment::new(booking_id, base_amount_cents, method, extras)?;
        let id = self.payments_mut().record(payment);
        tracing::debug!(payment_id = %id, booking_id = %booking_id, "payment recorded");
        Ok(id)
    }

    pub fn payments_for_booking(&self, booking_id: BookingId) -> Vec<Payment> {
        self.payments()
            .list_by_booking(booking_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn total_paid(&self, booking_id: BookingId) -> i64 {
        self.payments().total_for_booking(booking_id)
    }

    // ---- persistence seam ----

    /// Export every record the core owns.
    pub fn snapshot(&self) -> RentalSnapshot {
        RentalSnapshot {
            vehicles: self.fleet().records(),
            customers: self.customers().records(),
            bookings: self.ledger().records(),
            payments: self.payments().records(),
        }
    }

    /// Rebuild a service from exported records. Indexes are rebuilt;
    /// the restored service behaves identically to the one the
    /// snapshot was taken from.
    pub fn from_snapshot(snapshot: RentalSnapshot) -> RentalResult<Self> {
        Ok(Self {
            fleet: RwLock::new(FleetStore::from_records(snapshot.vehicles)),
            customers: RwLock::new(CustomerDirectory::from_records(snapshot.customers)?),
            ledger: RwLock::new(BookingLedger::from_records(snapshot.bookings)),
            payments: RwLock::new(PaymentBook::from_records(snapshot.payments)),
            gates: VehicleGates::new(),
        })
    }

    pub async fn save_to(
        &self,
        repository: &dyn SnapshotRepository,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        repository.save(&self.snapshot()).await
    }

    pub async fn load_from(
        repository: &dyn SnapshotRepository,
    ) -> Result<Option<Self>, Box<dyn Error + Send + Sync>> {
        match repository.load().await? {
            Some(snapshot) => Ok(Some(Self::from_snapshot(snapshot)?)),
            None => Ok(None),
        }
    }

    // ---- lock plumbing ----
    // Poisoning is recovered rather than propagated: every guarded
    // structure keeps its invariants on the error paths above, so a
    // panicked writer cannot leave half-applied booking state behind.

    fn fleet(&self) -> RwLockReadGuard<'_, FleetStore> {
        self.fleet.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn fleet_mut(&self) -> RwLockWriteGuard<'_, FleetStore> {
        self.fleet.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn customers(&self) -> RwLockReadGuard<'_, CustomerDirectory> {
        self.customers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn customers_mut(&self) -> RwLockWriteGuard<'_, CustomerDirectory> {
        self.customers.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ledger(&self) -> RwLockReadGuard<'_, BookingLedger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn ledger_mut(&self) -> RwLockWriteGuard<'_, BookingLedger> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn payments(&self) -> RwLockReadGuard<'_, PaymentBook> {
        self.payments.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn payments_mut(&self) -> RwLockWriteGuard<'_, PaymentBook> {
        self.payments.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ReservationService {
    fn default() -> Self {
        Self::new()
    }
}
