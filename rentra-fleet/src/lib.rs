pub mod customers;
pub mod store;

pub use customers::CustomerDirectory;
pub use store::FleetStore;
