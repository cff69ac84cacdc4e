//! Loan offer data structures and offer loading

mod data;
pub mod loader;

pub use data::{Assumptions, LoanOffer, MONTHS_PER_YEAR, PMI_DOWN_PAYMENT_THRESHOLD, PMI_REMOVAL_LTV};
pub use loader::{load_offers, load_offers_from_reader};
