use serde::{Deserialize, Serialize};

use crate::ids::VehicleId;
use crate::{RentalError, RentalResult};

/// Recognized vehicle categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Car,
    Bike,
    Van,
    Truck,
}

impl VehicleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BIKE",
            VehicleCategory::Van => "VAN",
            VehicleCategory::Truck => "TRUCK",
        }
    }

    /// Parse a category arriving as raw text from the presentation
    /// layer. Case-insensitive.
    pub fn parse(raw: &str) -> RentalResult<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CAR" => Ok(VehicleCategory::Car),
            "BIKE" => Ok(VehicleCategory::Bike),
            "VAN" => Ok(VehicleCategory::Van),
            "TRUCK" => Ok(VehicleCategory::Truck),
            other => Err(RentalError::Validation(format!(
                "unrecognized vehicle category: {}",
                other
            ))),
        }
    }
}

/// A vehicle in the fleet. Availability is not stored here: it is a
/// projection derived from the booking ledger at the time of asking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Brand and model, free text ("Toyota Corolla").
    pub label: String,
    pub category: VehicleCategory,
    /// Rental price per day in minor currency units.
    pub price_per_day_cents: i64,
}

impl Vehicle {
    pub fn new(
        label: impl Into<String>,
        category: VehicleCategory,
        price_per_day_cents: i64,
    ) -> RentalResult<Self> {
        let label = label.into();
        validate_fields(&label, price_per_day_cents)?;
        Ok(Self {
            id: VehicleId::new(),
            label,
            category,
            price_per_day_cents,
        })
    }

    /// Re-validate and apply an update; identity is untouched.
    pub fn apply_update(
        &mut self,
        label: impl Into<String>,
        category: VehicleCategory,
        price_per_day_cents: i64,
    ) -> RentalResult<()> {
        let label = label.into();
        validate_fields(&label, price_per_day_cents)?;
        self.label = label;
        self.category = category;
        self.price_per_day_cents = price_per_day_cents;
        Ok(())
    }
}

fn validate_fields(label: &str, price_per_day_cents: i64) -> RentalResult<()> {
    if label.trim().is_empty() {
        return Err(RentalError::Validation(
            "vehicle label must not be empty".to_string(),
        ));
    }
    if price_per_day_cents < 0 {
        return Err(RentalError::Validation(format!(
            "rental price per day must not be negative: {}",
            price_per_day_cents
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vehicle() {
        let v = Vehicle::new("Toyota Corolla", VehicleCategory::Car, 10_000).unwrap();
        assert_eq!(v.label, "Toyota Corolla");
        assert_eq!(v.category, VehicleCategory::Car);
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = Vehicle::new("Honda CB500", VehicleCategory::Bike, -1);
        assert!(matches!(result, Err(RentalError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_label() {
        let result = Vehicle::new("   ", VehicleCategory::Van, 5_000);
        assert!(result.is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(VehicleCategory::parse("truck").unwrap(), VehicleCategory::Truck);
        assert_eq!(VehicleCategory::parse(" Car ").unwrap(), VehicleCategory::Car);
        assert!(VehicleCategory::parse("boat").is_err());
    }

    #[test]
    fn test_update_keeps_identity() {
        let mut v = Vehicle::new("Ford Transit", VehicleCategory::Van, 8_000).unwrap();
        let id = v.id;
        v.apply_update("Ford Transit LWB", VehicleCategory::Van, 9_000).unwrap();
        assert_eq!(v.id, id);
        assert_eq!(v.price_per_day_cents, 9_000);
    }
}
