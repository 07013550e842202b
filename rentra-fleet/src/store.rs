use std::collections::HashMap;

use rentra_domain::ids::VehicleId;
use rentra_domain::vehicle::{Vehicle, VehicleCategory};
use rentra_domain::{RentalError, RentalResult};

/// In-memory store of vehicle records. Listing preserves insertion
/// order. The store knows nothing about bookings; referential checks
/// against the ledger happen in the reservation service.
pub struct FleetStore {
    vehicles: HashMap<VehicleId, Vehicle>,
    order: Vec<VehicleId>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self {
            vehicles: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add an already-validated vehicle record.
    pub fn add(&mut self, vehicle: Vehicle) -> VehicleId {
        let id = vehicle.id;
        self.vehicles.insert(id, vehicle);
        self.order.push(id);
        id
    }

    pub fn update(
        &mut self,
        id: VehicleId,
        label: impl Into<String>,
        category: VehicleCategory,
        price_per_day_cents: i64,
    ) -> RentalResult<()> {
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .ok_or_else(|| RentalError::NotFound(format!("vehicle {}", id)))?;
        vehicle.apply_update(label, category, price_per_day_cents)
    }

    /// Raw removal. Callers must have established that no active
    /// booking still references the vehicle.
    pub fn remove(&mut self, id: VehicleId) -> RentalResult<Vehicle> {
        let vehicle = self
            .vehicles
            .remove(&id)
            .ok_or_else(|| RentalError::NotFound(format!("vehicle {}", id)))?;
        self.order.retain(|v| *v != id);
        Ok(vehicle)
    }

    pub fn get(&self, id: VehicleId) -> RentalResult<&Vehicle> {
        self.vehicles
            .get(&id)
            .ok_or_else(|| RentalError::NotFound(format!("vehicle {}", id)))
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.contains_key(&id)
    }

    /// Read-only snapshot of the fleet in insertion order.
    pub fn list(&self) -> Vec<&Vehicle> {
        self.order
            .iter()
            .filter_map(|id| self.vehicles.get(id))
            .collect()
    }

    pub fn records(&self) -> Vec<Vehicle> {
        self.list().into_iter().cloned().collect()
    }

    pub fn from_records(records: Vec<Vehicle>) -> Self {
        let mut store = Self::new();
        for vehicle in records {
            store.add(vehicle);
        }
        store
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(label: &str, price: i64) -> Vehicle {
        Vehicle::new(label, VehicleCategory::Car, price).unwrap()
    }

    #[test]
    fn test_fleet_lifecycle() {
        let mut store = FleetStore::new();
        let id = store.add(car("Toyota Corolla", 10_000));

        assert_eq!(store.get(id).unwrap().label, "Toyota Corolla");

        store
            .update(id, "Toyota Corolla 2019", VehicleCategory::Car, 11_000)
            .unwrap();
        assert_eq!(store.get(id).unwrap().price_per_day_cents, 11_000);

        store.remove(id).unwrap();
        assert!(matches!(store.get(id), Err(RentalError::NotFound(_))));
    }

    #[test]
    fn test_update_unknown_vehicle() {
        let mut store = FleetStore::new();
        let result = store.update(VehicleId::new(), "Ghost", VehicleCategory::Van, 100);
        assert!(matches!(result, Err(RentalError::NotFound(_))));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = FleetStore::new();
        let a = store.add(car("First", 100));
        let b = store.add(car("Second", 200));
        let c = store.add(car("Third", 300));
        store.remove(b).unwrap();

        let ids: Vec<VehicleId> = store.list().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_records_roundtrip() {
        let mut store = FleetStore::new();
        store.add(car("One", 100));
        store.add(car("Two", 200));

        let restored = FleetStore::from_records(store.records());
        assert_eq!(restored.records(), store.records());
    }
}
