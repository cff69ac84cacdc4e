//! Schedule rows and report structures for simulations

use serde::{Deserialize, Serialize};

/// A single month of the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    // Timing
    /// 1-indexed month since closing
    pub projection_month: u32,
    /// 0-indexed loan year
    pub year: u32,
    /// 0-indexed month within the loan year
    pub month: u32,

    // Payment split
    pub payment: f64,
    pub interest: f64,
    pub pmi: f64,
    pub principal_reduction: f64,
    pub eop_principal: f64,

    // Running totals
    pub total_cash_paid: f64,
    pub total_interest_and_pmi_paid: f64,
    pub opportunity_cost_value: f64,
}

/// A notable change to the loan during the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LoanEvent {
    /// Scheduled amortization brought the balance under 80% LTV
    PmiRemoved { year: u32, month: u32 },
    /// Lump sum paid at the end of `year` to reach 80% LTV, then re-amortized
    Recast { year: u32, lump_sum: f64, fee: f64 },
}

/// Complete simulation result for one offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub offer_name: String,

    // At closing
    pub down_payment: f64,
    pub cash_to_close: f64,
    pub base_monthly_payment: f64,
    /// `None` when the down payment avoids PMI
    pub monthly_pmi: Option<f64>,
    pub initial_monthly_payment: f64,

    /// Events in chronological order
    pub events: Vec<LoanEvent>,

    // At end of term
    pub final_monthly_payment: f64,
    pub final_principal: f64,
    pub total_cash_paid: f64,
    pub total_interest_and_pmi_paid: f64,
    pub total_with_opportunity_cost: f64,

    /// Monthly rows (empty unless the schedule was recorded)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleRow>,
}

impl SimulationReport {
    /// Add a schedule row
    pub fn add_row(&mut self, row: ScheduleRow) {
        self.schedule.push(row);
    }

    pub fn add_event(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn pmi_removed_at(&self) -> Option<(u32, u32)> {
        self.events.iter().find_map(|e| match e {
            LoanEvent::PmiRemoved { year, month } => Some((*year, *month)),
            _ => None,
        })
    }

    pub fn recast_lump_sum(&self) -> Option<f64> {
        self.events.iter().find_map(|e| match e {
            LoanEvent::Recast { lump_sum, .. } => Some(*lump_sum),
            _ => None,
        })
    }

    /// Get summary statistics
    pub fn summary(&self) -> ReportSummary {
        let total_pmi: f64 = self.schedule.iter().map(|r| r.pmi).sum();
        let total_interest: f64 = self.schedule.iter().map(|r| r.interest).sum();

        ReportSummary {
            total_months: self.schedule.len() as u32,
            total_interest,
            total_pmi,
            total_cash_paid: self.total_cash_paid,
            total_with_opportunity_cost: self.total_with_opportunity_cost,
            opportunity_cost: self.total_with_opportunity_cost - self.total_cash_paid,
        }
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_months: u32,
    pub total_interest: f64,
    pub total_pmi: f64,
    pub total_cash_paid: f64,
    pub total_with_opportunity_cost: f64,
    pub opportunity_cost: f64,
}
