pub mod ledger;
pub mod payments;

pub use ledger::BookingLedger;
pub use payments::PaymentBook;
