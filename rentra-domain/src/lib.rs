pub mod booking;
pub mod customer;
pub mod ids;
pub mod payment;
pub mod period;
pub mod repository;
pub mod vehicle;

/// Failure kinds every core operation resolves to. A failed call
/// leaves no partial state behind; the caller translates these into
/// user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Deadline exceeded: {0}")]
    Timeout(String),
}

pub type RentalResult<T> = Result<T, RentalError>;
