//! Amortization simulator for a single loan offer

mod state;
mod engine;
mod schedule;
pub mod payment;

pub use state::SimulationState;
pub use engine::{Simulator, SimulationConfig};
pub use schedule::{LoanEvent, ReportSummary, ScheduleRow, SimulationReport};
pub use payment::level_payment;
