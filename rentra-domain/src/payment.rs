use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, PaymentId};
use crate::{RentalError, RentalResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Online,
}

/// Fixed-fee add-ons billable alongside a rental payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentExtra {
    GpsRental,
    ChildSeat,
    LateFee,
}

impl PaymentExtra {
    pub fn fee_cents(&self) -> i64 {
        match self {
            PaymentExtra::GpsRental => 5_000,
            PaymentExtra::ChildSeat => 3_000,
            PaymentExtra::LateFee => 10_000,
        }
    }
}

/// An append-only payment record against a booking. No reversal
/// operation exists; corrections are new records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub base_amount_cents: i64,
    pub extras: Vec<PaymentExtra>,
    pub method: PaymentMethod,
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        booking_id: BookingId,
        base_amount_cents: i64,
        method: PaymentMethod,
        extras: Vec<PaymentExtra>,
    ) -> RentalResult<Self> {
        if base_amount_cents < 0 {
            return Err(RentalError::Validation(format!(
                "payment amount must not be negative: {}",
                base_amount_cents
            )));
        }
        Ok(Self {
            id: PaymentId::new(),
            booking_id,
            base_amount_cents,
            extras,
            method,
            recorded_at: Utc::now(),
        })
    }

    /// Base amount plus all add-on fees.
    pub fn total_cents(&self) -> i64 {
        self.base_amount_cents + self.extras.iter().map(PaymentExtra::fee_cents).sum::<i64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_includes_extras() {
        let p = Payment::new(
            BookingId::new(),
            30_000,
            PaymentMethod::CreditCard,
            vec![PaymentExtra::GpsRental, PaymentExtra::ChildSeat],
        )
        .unwrap();
        assert_eq!(p.total_cents(), 38_000);
    }

    #[test]
    fn test_no_extras() {
        let p = Payment::new(BookingId::new(), 12_500, PaymentMethod::Cash, vec![]).unwrap();
        assert_eq!(p.total_cents(), 12_500);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let result = Payment::new(BookingId::new(), -100, PaymentMethod::Online, vec![]);
        assert!(matches!(result, Err(RentalError::Validation(_))));
    }
}
