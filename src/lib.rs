//! Mortgage Compare - amortization and opportunity-cost comparison of loan offers
//!
//! This library provides:
//! - Month-by-month amortization of fixed-rate loans with PMI
//! - PMI removal at 80% LTV, either by waiting it out or by a recast after year one
//! - Opportunity cost of cash paid, compounded monthly
//! - Batch comparison of offers and report presentation

pub mod error;
pub mod offer;
pub mod simulation;
pub mod comparison;
pub mod report;

// Re-export commonly used types
pub use error::LoanError;
pub use offer::{Assumptions, LoanOffer};
pub use simulation::{Simulator, SimulationConfig, SimulationReport, LoanEvent, ScheduleRow};
pub use comparison::{ComparisonRunner, OfferOutcome, cheapest};
