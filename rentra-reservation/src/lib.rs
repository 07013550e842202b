pub mod gate;
pub mod reports;
pub mod service;
pub mod store;

pub use service::ReservationService;
pub use store::InMemorySnapshotRepository;
