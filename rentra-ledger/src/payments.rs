use std::collections::HashMap;

use rentra_domain::ids::{BookingId, PaymentId};
use rentra_domain::payment::Payment;
use rentra_domain::{RentalError, RentalResult};

/// Append-only book of payment records. There is no removal or
/// reversal API; corrections are recorded as new payments.
pub struct PaymentBook {
    payments: HashMap<PaymentId, Payment>,
    by_booking: HashMap<BookingId, Vec<PaymentId>>,
    order: Vec<PaymentId>,
}

impl PaymentBook {
    pub fn new() -> Self {
        Self {
            payments: HashMap::new(),
            by_booking: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn record(&mut self, payment: Payment) -> PaymentId {
        let id = payment.id;
        self.by_booking.entry(payment.booking_id).or_default().push(id);
        self.order.push(id);
        self.payments.insert(id, payment);
        id
    }

    pub fn get(&self, id: PaymentId) -> RentalResult<&Payment> {
        self.payments
            .get(&id)
            .ok_or_else(|| RentalError::NotFound(format!("payment {}", id)))
    }

    pub fn list_by_booking(&self, booking_id: BookingId) -> Vec<&Payment> {
        self.by_booking
            .get(&booking_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.payments.get(id))
            .collect()
    }

    /// Sum of totals (base plus extras) recorded against a booking.
    pub fn total_for_booking(&self, booking_id: BookingId) -> i64 {
        self.list_by_booking(booking_id)
            .iter()
            .map(|p| p.total_cents())
            .sum()
    }

    pub fn records(&self) -> Vec<Payment> {
        self.order
            .iter()
            .filter_map(|id| self.payments.get(id))
            .cloned()
            .collect()
    }

    pub fn from_records(records: Vec<Payment>) -> Self {
        let mut book = Self::new();
        for payment in records {
            book.record(payment);
        }
        book
    }
}

impl Default for PaymentBook {
    fn default() -> Self {
        Self::new()
    }
}
