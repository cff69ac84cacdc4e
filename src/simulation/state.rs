//! Simulation state tracking for a single loan offer

use crate::offer::{Assumptions, LoanOffer};
use super::payment::level_payment;

/// State of a loan at a point in time during simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Completed payments so far
    pub projection_month: u32,

    /// Outstanding loan balance
    pub principal: f64,

    /// Effective monthly interest rate
    pub monthly_rate: f64,

    /// Amortized payment excluding PMI; drives the principal reduction
    pub base_payment: f64,

    /// Cash paid each month (base payment plus any PMI)
    pub monthly_payment: f64,

    /// Zero once PMI has been removed or recast away
    pub monthly_pmi: f64,

    /// Cash paid so far, including cash to close
    pub total_cash_paid: f64,

    /// Cash paid so far, grown at the opportunity-cost rate
    pub opportunity_cost_value: f64,

    /// Interest and PMI paid so far
    pub total_interest_and_pmi_paid: f64,
}

impl SimulationState {
    /// Initialize state from an offer at closing
    pub fn from_offer(offer: &LoanOffer, assumptions: &Assumptions) -> Self {
        let principal = offer.initial_principal(assumptions.purchase_price);
        let cash_to_close = offer.cash_to_close(assumptions.purchase_price);
        let monthly_rate = offer.monthly_rate();

        let yearly_pmi = if offer.has_pmi() {
            assumptions.pmi_rate * principal
        } else {
            0.0
        };
        let monthly_pmi = yearly_pmi / 12.0;

        let base_payment = level_payment(monthly_rate, principal, offer.total_months());

        Self {
            projection_month: 0,
            principal,
            monthly_rate,
            base_payment,
            monthly_payment: base_payment + monthly_pmi,
            monthly_pmi,
            total_cash_paid: cash_to_close,
            opportunity_cost_value: cash_to_close,
            total_interest_and_pmi_paid: 0.0,
        }
    }

    pub fn has_pmi(&self) -> bool {
        self.monthly_pmi > 0.0
    }

    /// Stop charging PMI; subsequent payments are the base payment only
    pub fn remove_pmi(&mut self) {
        self.monthly_payment = self.base_payment;
        self.monthly_pmi = 0.0;
    }

    /// Record an out-of-schedule cash outlay (recast lump sum and fee)
    pub fn pay_lump_sum(&mut self, amount: f64) {
        self.total_cash_paid += amount;
        self.opportunity_cost_value += amount;
    }

    /// Replace the amortization schedule with a new level payment
    pub fn reamortize(&mut self, remaining_payments: u32) {
        self.base_payment = level_payment(self.monthly_rate, self.principal, remaining_payments);
        self.monthly_payment = self.base_payment;
        self.monthly_pmi = 0.0;
    }
}
