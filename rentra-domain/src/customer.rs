use serde::{Deserialize, Serialize};

use crate::ids::CustomerId;
use crate::{RentalError, RentalResult};

/// A registered customer. The license number is the business key and
/// must be unique across the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub contact_info: String,
    pub license_number: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        contact_info: impl Into<String>,
        license_number: impl Into<String>,
    ) -> RentalResult<Self> {
        let name = name.into();
        let contact_info = contact_info.into();
        let license_number = license_number.into();
        validate_fields(&name, &contact_info, &license_number)?;
        Ok(Self {
            id: CustomerId::new(),
            name,
            contact_info,
            license_number,
        })
    }

    pub fn apply_update(
        &mut self,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        license_number: impl Into<String>,
    ) -> RentalResult<()> {
        let name = name.into();
        let contact_info = contact_info.into();
        let license_number = license_number.into();
        validate_fields(&name, &contact_info, &license_number)?;
        self.name = name;
        self.contact_info = contact_info;
        self.license_number = license_number;
        Ok(())
    }
}

fn validate_fields(name: &str, contact_info: &str, license_number: &str) -> RentalResult<()> {
    if name.trim().is_empty() {
        return Err(RentalError::Validation(
            "customer name must not be empty".to_string(),
        ));
    }
    if contact_info.trim().is_empty() {
        return Err(RentalError::Validation(
            "contact info must not be empty".to_string(),
        ));
    }
    if license_number.trim().is_empty() {
        return Err(RentalError::Validation(
            "license number must not be empty".to_string(),
        ));
    }
    Ok(())
}
