use std::collections::HashMap;

use rentra_domain::customer::Customer;
use rentra_domain::ids::CustomerId;
use rentra_domain::{RentalError, RentalResult};

/// In-memory registry of customers, indexed by id and by license
/// number (the business key, kept unique here).
pub struct CustomerDirectory {
    customers: HashMap<CustomerId, Customer>,
    by_license: HashMap<String, CustomerId>,
    order: Vec<CustomerId>,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: HashMap::new(),
            by_license: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn add(&mut self, customer: Customer) -> RentalResult<CustomerId> {
        if self.by_license.contains_key(&customer.license_number) {
            return Err(RentalError::Conflict(format!(
                "license number {} is already registered",
                customer.license_number
            )));
        }
        let id = customer.id;
        self.by_license.insert(customer.license_number.clone(), id);
        self.customers.insert(id, customer);
        self.order.push(id);
        Ok(id)
    }

    pub fn update(
        &mut self,
        id: CustomerId,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        license_number: impl Into<String>,
    ) -> RentalResult<()> {
        let license_number = license_number.into();
        match self.by_license.get(&license_number) {
            Some(holder) if *holder != id => {
                return Err(RentalError::Conflict(format!(
                    "license number {} is already registered",
                    license_number
                )));
            }
            _ => {}
        }
        let customer = self
            .customers
            .get_mut(&id)
            .ok_or_else(|| RentalError::NotFound(format!("customer {}", id)))?;
        let old_license = customer.license_number.clone();
        customer.apply_update(name, contact_info, license_number.clone())?;
        if old_license != license_number {
            self.by_license.remove(&old_license);
            self.by_license.insert(license_number, id);
        }
        Ok(())
    }

    /// Raw removal. Callers must have established that no active
    /// booking still references the customer.
    pub fn remove(&mut self, id: CustomerId) -> RentalResult<Customer> {
        let customer = self
            .customers
            .remove(&id)
            .ok_or_else(|| RentalError::NotFound(format!("customer {}", id)))?;
        self.by_license.remove(&customer.license_number);
        self.order.retain(|c| *c != id);
        Ok(customer)
    }

    pub fn get(&self, id: CustomerId) -> RentalResult<&Customer> {
        self.customers
            .get(&id)
            .ok_or_else(|| RentalError::NotFound(format!("customer {}", id)))
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.customers.contains_key(&id)
    }

    pub fn find_by_license(&self, license_number: &str) -> Option<&Customer> {
        self.by_license
            .get(license_number)
            .and_then(|id| self.customers.get(id))
    }

    pub fn list(&self) -> Vec<&Customer> {
        self.order
            .iter()
            .filter_map(|id| self.customers.get(id))
            .collect()
    }

    pub fn records(&self) -> Vec<Customer> {
        self.list().into_iter().cloned().collect()
    }

    pub fn from_records(records: Vec<Customer>) -> RentalResult<Self> {
        let mut directory = Self::new();
        for customer in records {
            directory.add(customer)?;
        }
        Ok(directory)
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
