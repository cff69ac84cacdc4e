//! Comparison runner for batches of loan offers
//!
//! Simulates every offer against the same assumptions. Offers are independent,
//! so they run in parallel; outcomes come back in input order.

use rayon::prelude::*;

use crate::error::LoanError;
use crate::offer::{Assumptions, LoanOffer};
use crate::simulation::{SimulationConfig, SimulationReport, Simulator};

/// Result of simulating one offer
#[derive(Debug)]
pub struct OfferOutcome {
    pub offer_name: String,
    pub result: Result<SimulationReport, LoanError>,
}

impl OfferOutcome {
    pub fn report(&self) -> Option<&SimulationReport> {
        self.result.as_ref().ok()
    }
}

/// Runs many offers against one set of assumptions
///
/// # Example
/// ```ignore
/// let runner = ComparisonRunner::new(Assumptions::default_scenario());
/// let outcomes = runner.run(&LoanOffer::default_offers());
/// if let Some(best) = cheapest(&outcomes) {
///     println!("cheapest: {}", best.offer_name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ComparisonRunner {
    simulator: Simulator,
}

impl ComparisonRunner {
    /// Create runner with the default config (schedules recorded)
    pub fn new(assumptions: Assumptions) -> Self {
        Self::with_config(assumptions, SimulationConfig::default())
    }

    pub fn with_config(assumptions: Assumptions, config: SimulationConfig) -> Self {
        Self {
            simulator: Simulator::new(assumptions, config),
        }
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.simulator.assumptions()
    }

    /// Simulate a single offer
    pub fn run_one(&self, offer: &LoanOffer) -> OfferOutcome {
        let result = self.simulator.simulate_offer(offer);
        if let Err(e) = &result {
            log::error!("offer '{}' skipped: {}", offer.name, e);
        }
        OfferOutcome {
            offer_name: offer.name.clone(),
            result,
        }
    }

    /// Simulate all offers; a failing offer does not affect the others
    pub fn run(&self, offers: &[LoanOffer]) -> Vec<OfferOutcome> {
        log::info!(
            "comparing {} offers at purchase price {:.2}",
            offers.len(),
            self.assumptions().purchase_price
        );
        offers.par_iter().map(|offer| self.run_one(offer)).collect()
    }
}

/// The successful report with the lowest total cost including opportunity cost
pub fn cheapest(outcomes: &[OfferOutcome]) -> Option<&SimulationReport> {
    outcomes
        .iter()
        .filter_map(OfferOutcome::report)
        .min_by(|a, b| a.total_with_opportunity_cost.total_cmp(&b.total_with_opportunity_cost))
}
