use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Instant;

use rentra_domain::ids::VehicleId;
use rentra_domain::{RentalError, RentalResult};

/// Per-vehicle mutual-exclusion scopes. Every booking mutation runs
/// under the gate of the vehicle it touches, so the overlap-check →
/// insert window cannot interleave with another mutation on the same
/// vehicle. Mutations on different vehicles proceed independently;
/// reads never take a gate.
pub struct VehicleGates {
    gates: Mutex<HashMap<VehicleId, Arc<Mutex<()>>>>,
}

impl VehicleGates {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch (creating on first use) the gate for a vehicle.
    pub fn gate(&self, vehicle_id: VehicleId) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        gates.entry(vehicle_id).or_default().clone()
    }

    /// Drop the gate entry for a vehicle that left the fleet, so the
    /// table does not accumulate gates for removed vehicles. Holders
    /// of a previously fetched `Arc` are unaffected.
    pub fn discard(&self, vehicle_id: VehicleId) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        gates.remove(&vehicle_id);
    }
}

impl Default for VehicleGates {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until the gate is held. Gate sections are short and local,
/// so this never waits unboundedly in practice.
pub fn acquire(gate: &Mutex<()>) -> MutexGuard<'_, ()> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire the gate before `deadline` elapses, or fail with `Timeout`
/// having touched no state.
pub fn acquire_until(gate: &Mutex<()>, deadline: Instant) -> RentalResult<MutexGuard<'_, ()>> {
    loop {
        match gate.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => {
                if Instant::now() >= deadline {
                    return Err(RentalError::Timeout(
                        "vehicle gate not acquired before deadline".to_string(),
                    ));
                }
                std::thread::yield_now();
            }
        }
    }
}

pub fn acquire_by(gate: &Mutex<()>, deadline: Option<Instant>) -> RentalResult<MutexGuard<'_, ()>> {
    match deadline {
        Some(deadline) => acquire_until(gate, deadline),
        None => Ok(acquire(gate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_same_vehicle_shares_a_gate() {
        let gates = VehicleGates::new();
        let id = VehicleId::new();
        assert!(Arc::ptr_eq(&gates.gate(id), &gates.gate(id)));
        assert!(!Arc::ptr_eq(&gates.gate(id), &gates.gate(VehicleId::new())));
    }

    #[test]
    fn test_discard_resets_the_gate_entry() {
        let gates = VehicleGates::new();
        let id = VehicleId::new();
        let before = gates.gate(id);
        gates.discard(id);
        assert!(!Arc::ptr_eq(&before, &gates.gate(id)));
    }

    #[test]
    fn test_acquire_until_times_out_while_held() {
        let gates = VehicleGates::new();
        let gate = gates.gate(VehicleId::new());

        let _held = acquire(&gate);
        let result = acquire_until(&gate, Instant::now() + Duration::from_millis(10));
        assert!(matches!(result, Err(RentalError::Timeout(_))));
    }

    #[test]
    fn test_acquire_until_succeeds_when_free() {
        let gates = VehicleGates::new();
        let gate = gates.gate(VehicleId::new());
        let guard = acquire_until(&gate, Instant::now() + Duration::from_millis(10));
        assert!(guard.is_ok());
    }
}
