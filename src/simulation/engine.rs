//! Core simulation engine for month-by-month amortization with PMI and recast

use crate::error::{LoanError, Result};
use crate::offer::{Assumptions, LoanOffer, MONTHS_PER_YEAR};
use super::schedule::{LoanEvent, ScheduleRow, SimulationReport};
use super::state::SimulationState;

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Whether to keep one schedule row per simulated month
    pub record_schedule: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            record_schedule: true,
        }
    }
}

/// Main simulation engine
#[derive(Debug, Clone)]
pub struct Simulator {
    assumptions: Assumptions,
    config: SimulationConfig,
}

impl Simulator {
    /// Create a new simulator with given assumptions and config
    pub fn new(assumptions: Assumptions, config: SimulationConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run the full-term simulation for a single offer
    pub fn simulate_offer(&self, offer: &LoanOffer) -> Result<SimulationReport> {
        self.assumptions.validate()?;
        offer.validate()?;

        let mut state = SimulationState::from_offer(offer, &self.assumptions);
        let mut report = self.opening_report(offer, &state);
        let recast = self.recast_enabled(offer);

        for year in 0..offer.term_years {
            for month in 0..MONTHS_PER_YEAR {
                let row = self.simulate_month(offer, &mut state, year, month)?;

                if !offer.pay_off_pmi_after_year_1
                    && state.has_pmi()
                    && state.principal < self.assumptions.pmi_removal_principal()
                {
                    log::debug!(
                        "{}: PMI removed at year {}, month {} (principal {:.2})",
                        offer.name, year, month, state.principal
                    );
                    state.remove_pmi();
                    report.add_event(LoanEvent::PmiRemoved { year, month });
                }

                if self.config.record_schedule {
                    report.add_row(row);
                }
            }

            if year == 0 && recast {
                let event = self.recast(offer, &mut state, year);
                report.add_event(event);
            }
        }

        report.final_monthly_payment = state.monthly_payment;
        report.final_principal = state.principal;
        report.total_cash_paid = state.total_cash_paid;
        report.total_interest_and_pmi_paid = state.total_interest_and_pmi_paid;
        report.total_with_opportunity_cost = state.opportunity_cost_value;

        Ok(report)
    }

    /// Report fields known at closing; totals are filled in after the last month
    fn opening_report(&self, offer: &LoanOffer, state: &SimulationState) -> SimulationReport {
        let price = self.assumptions.purchase_price;
        SimulationReport {
            offer_name: offer.name.clone(),
            down_payment: offer.down_payment(price),
            cash_to_close: offer.cash_to_close(price),
            base_monthly_payment: state.base_payment,
            monthly_pmi: state.has_pmi().then_some(state.monthly_pmi),
            initial_monthly_payment: state.monthly_payment,
            events: Vec::new(),
            final_monthly_payment: state.monthly_payment,
            final_principal: state.principal,
            total_cash_paid: state.total_cash_paid,
            total_interest_and_pmi_paid: 0.0,
            total_with_opportunity_cost: state.opportunity_cost_value,
            schedule: Vec::with_capacity(if self.config.record_schedule {
                offer.total_months() as usize
            } else {
                0
            }),
        }
    }

    /// The recast only applies when PMI exists and there is a term left to re-amortize over
    fn recast_enabled(&self, offer: &LoanOffer) -> bool {
        if !offer.pay_off_pmi_after_year_1 {
            return false;
        }
        if !offer.has_pmi() {
            log::warn!(
                "{}: recast requested but {:.0}% down carries no PMI; ignoring",
                offer.name,
                offer.fraction_down * 100.0
            );
            return false;
        }
        if offer.term_years < 2 {
            log::warn!("{}: recast requested on a {}-year term; ignoring", offer.name, offer.term_years);
            return false;
        }
        true
    }

    /// Apply one monthly payment
    fn simulate_month(
        &self,
        offer: &LoanOffer,
        state: &mut SimulationState,
        year: u32,
        month: u32,
    ) -> Result<ScheduleRow> {
        state.projection_month += 1;

        let payment = state.monthly_payment;
        let pmi = state.monthly_pmi;

        state.total_cash_paid += payment;
        // Grows the whole accumulated balance, not just this payment
        state.opportunity_cost_value =
            (state.opportunity_cost_value + payment) * self.assumptions.monthly_opportunity_growth();

        let interest = state.principal * state.monthly_rate;
        state.total_interest_and_pmi_paid += interest + pmi;

        let principal_reduction = state.base_payment - interest;
        if principal_reduction <= 0.0 || principal_reduction.is_nan() {
            return Err(LoanError::InvalidLoanConfiguration {
                offer: offer.name.clone(),
                year,
                month,
                principal_reduction,
            });
        }
        state.principal -= principal_reduction;

        Ok(ScheduleRow {
            projection_month: state.projection_month,
            year,
            month,
            payment,
            interest,
            pmi,
            principal_reduction,
            eop_principal: state.principal,
            total_cash_paid: state.total_cash_paid,
            total_interest_and_pmi_paid: state.total_interest_and_pmi_paid,
            opportunity_cost_value: state.opportunity_cost_value,
        })
    }

    /// Pay the balance down to 80% LTV and re-amortize over the remaining term.
    ///
    /// A balance already at or under 80% LTV needs no lump sum and pays no fee;
    /// PMI is still dropped and the loan re-amortized.
    fn recast(&self, offer: &LoanOffer, state: &mut SimulationState, year: u32) -> LoanEvent {
        state.monthly_rate = offer.monthly_rate();

        let target = self.assumptions.pmi_removal_principal();
        let (lump_sum, fee) = if state.principal > target {
            let lump_sum = state.principal - target;
            state.principal = target;
            state.pay_lump_sum(lump_sum + offer.recast_fee);
            (lump_sum, offer.recast_fee)
        } else {
            log::debug!(
                "{}: principal {:.2} already at or below 80% LTV after year {}; no lump sum",
                offer.name, state.principal, year
            );
            (0.0, 0.0)
        };

        let remaining_payments = (offer.term_years - year - 1) * MONTHS_PER_YEAR;
        state.reamortize(remaining_payments);

        log::debug!(
            "{}: recast after year {} with lump sum {:.2}, new payment {:.2}",
            offer.name, year, lump_sum, state.monthly_payment
        );

        LoanEvent::Recast { year, lump_sum, fee }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ten_down(recast: bool) -> LoanOffer {
        LoanOffer::new("10% down", 0.1, 0.04375, 0.0, recast, 0.0, 30)
    }

    fn simulator() -> Simulator {
        Simulator::new(Assumptions::default_scenario(), SimulationConfig::default())
    }

    #[test]
    fn test_simulation_runs() {
        let report = simulator().simulate_offer(&ten_down(false)).unwrap();

        assert_eq!(report.schedule.len(), 360);
        assert_eq!(report.schedule[0].projection_month, 1);
        assert_eq!(report.schedule[359].year, 29);
        assert_eq!(report.schedule[359].month, 11);
    }

    #[test]
    fn test_wait_out_pmi_scenario() {
        let report = simulator().simulate_offer(&ten_down(false)).unwrap();

        assert_abs_diff_eq!(report.down_payment, 27_300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.monthly_pmi.unwrap(), 102.375, epsilon = 1e-9);
        assert_abs_diff_eq!(report.base_monthly_payment, 1226.7439, epsilon = 1e-4);
        assert_abs_diff_eq!(report.initial_monthly_payment, 1329.1189, epsilon = 1e-4);

        assert_eq!(report.events.len(), 1);
        let (year, month) = report.pmi_removed_at().unwrap();
        assert_eq!((year, month), (6, 0));

        // First month under 80% LTV
        let idx = (year * 12 + month) as usize;
        assert!(report.schedule[idx].eop_principal < 218_400.0);
        assert!(report.schedule[idx - 1].eop_principal >= 218_400.0);
        assert!(report.schedule[idx].pmi > 0.0);
        assert_eq!(report.schedule[idx + 1].pmi, 0.0);

        assert_abs_diff_eq!(report.final_monthly_payment, report.base_monthly_payment, epsilon = 1e-12);
        assert_abs_diff_eq!(report.total_cash_paid, 476_401.17, epsilon = 0.01);
        assert_abs_diff_eq!(report.total_interest_and_pmi_paid, 203_401.17, epsilon = 0.01);
        assert_abs_diff_eq!(report.total_with_opportunity_cost, 692_190.24, epsilon = 0.01);
    }

    #[test]
    fn test_recast_scenario() {
        let report = simulator().simulate_offer(&ten_down(true)).unwrap();

        assert_eq!(report.events.len(), 1);
        assert!(report.pmi_removed_at().is_none());
        match report.events[0] {
            LoanEvent::Recast { year, lump_sum, fee } => {
                assert_eq!(year, 0);
                assert_eq!(fee, 0.0);
                let principal_after_year_0 = report.schedule[11].eop_principal;
                assert_abs_diff_eq!(lump_sum, principal_after_year_0 - 218_400.0, epsilon = 1e-6);
                assert_abs_diff_eq!(lump_sum, 23_247.83, epsilon = 0.01);
            }
            other => panic!("unexpected event {:?}", other),
        }

        // Re-amortized over 348 months at the original rate
        assert_abs_diff_eq!(report.final_monthly_payment, 1108.7245, epsilon = 1e-4);
        assert_eq!(report.schedule[12].pmi, 0.0);
        assert_abs_diff_eq!(report.schedule[12].payment, 1108.7245, epsilon = 1e-4);
        assert!(report.schedule[11].pmi > 0.0);

        assert_abs_diff_eq!(report.final_principal, 0.0, epsilon = 0.01);
        assert_abs_diff_eq!(report.total_cash_paid, 452_333.37, epsilon = 0.01);
        assert_abs_diff_eq!(report.total_interest_and_pmi_paid, 179_333.37, epsilon = 0.01);
        assert_abs_diff_eq!(report.total_with_opportunity_cost, 667_478.16, epsilon = 0.01);
    }

    #[test]
    fn test_recast_fees_count_as_cash() {
        let sim = simulator();
        let plain = sim.simulate_offer(&ten_down(true)).unwrap();
        let with_fees = sim
            .simulate_offer(&LoanOffer::new("US Bank", 0.1, 0.04375, 500.0, true, 250.0, 30))
            .unwrap();

        assert_abs_diff_eq!(with_fees.total_cash_paid - plain.total_cash_paid, 750.0, epsilon = 1e-6);
        assert_abs_diff_eq!(with_fees.total_with_opportunity_cost, 668_917.87, epsilon = 0.01);
        assert_abs_diff_eq!(
            with_fees.total_interest_and_pmi_paid,
            plain.total_interest_and_pmi_paid,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_cash_paid_covers_price_fees_and_interest() {
        let assumptions = Assumptions::default_scenario();
        let sim = simulator();

        for offer in LoanOffer::default_offers() {
            let report = sim.simulate_offer(&offer).unwrap();
            let fees = offer.origination_fees
                + if report.recast_lump_sum().is_some() { offer.recast_fee } else { 0.0 };
            assert_abs_diff_eq!(
                report.total_cash_paid - report.total_interest_and_pmi_paid - fees,
                assumptions.purchase_price,
                epsilon = 0.01
            );
        }
    }

    #[test]
    fn test_principal_strictly_decreases_and_converges() {
        let sim = simulator();

        for offer in LoanOffer::default_offers() {
            let report = sim.simulate_offer(&offer).unwrap();
            let mut prior = offer.initial_principal(sim.assumptions().purchase_price);
            for (i, row) in report.schedule.iter().enumerate() {
                assert!(row.principal_reduction > 0.0);
                if i == 12 && report.recast_lump_sum().is_some() {
                    prior = sim.assumptions().pmi_removal_principal();
                }
                assert!(row.eop_principal < prior, "{} month {}", offer.name, row.projection_month);
                prior = row.eop_principal;
            }
            assert_abs_diff_eq!(report.final_principal, 0.0, epsilon = 0.01);
        }
    }

    #[test]
    fn test_cash_paid_strictly_increases() {
        let sim = simulator();

        for offer in LoanOffer::default_offers() {
            let report = sim.simulate_offer(&offer).unwrap();
            let mut prior = report.cash_to_close;
            for row in &report.schedule {
                assert!(row.total_cash_paid > prior);
                prior = row.total_cash_paid;
            }
        }
    }

    #[test]
    fn test_recast_below_target_pays_no_lump_sum() {
        // 19.9% down amortizes under 80% LTV within the first year
        let offer = LoanOffer::new("19.9% down", 0.199, 0.04375, 0.0, true, 250.0, 30);
        let report = simulator().simulate_offer(&offer).unwrap();

        assert!(report.schedule[11].eop_principal < 218_400.0);
        assert_eq!(
            report.events,
            vec![LoanEvent::Recast { year: 0, lump_sum: 0.0, fee: 0.0 }]
        );

        // No jump back up to 80% LTV, and no cash refunded
        assert!(report.schedule[12].eop_principal < report.schedule[11].eop_principal);
        assert!(report.schedule[12].total_cash_paid > report.schedule[11].total_cash_paid);
        assert!(report.schedule[11].pmi > 0.0);
        assert_eq!(report.schedule[12].pmi, 0.0);

        // Re-amortizing the unchanged balance keeps the same level payment
        assert_abs_diff_eq!(report.final_monthly_payment, report.base_monthly_payment, epsilon = 1e-6);
        assert_abs_diff_eq!(report.final_principal, 0.0, epsilon = 0.01);

        let mut prior = report.cash_to_close;
        for row in &report.schedule {
            assert!(row.total_cash_paid > prior);
            prior = row.total_cash_paid;
        }
    }

    #[test]
    fn test_twenty_percent_down_never_charges_pmi() {
        let sim = simulator();

        for recast in [false, true] {
            let offer = LoanOffer::new("20% down", 0.2, 0.045, 0.0, recast, 0.0, 30);
            let report = sim.simulate_offer(&offer).unwrap();

            assert!(report.monthly_pmi.is_none());
            assert!(report.events.is_empty());
            assert!(report.schedule.iter().all(|r| r.pmi == 0.0));
            assert_abs_diff_eq!(report.final_monthly_payment, 1106.6007, epsilon = 1e-4);
            assert_abs_diff_eq!(report.total_cash_paid, 452_976.26, epsilon = 0.01);
        }
    }

    #[test]
    fn test_non_amortizing_offer_fails() {
        // Payment equal to the interest due leaves nothing for principal
        let assumptions = Assumptions::default_scenario();
        let sim = Simulator::new(assumptions, SimulationConfig::default());
        let loan = ten_down(false);

        let mut state = SimulationState::from_offer(&loan, &assumptions);
        state.base_payment = state.principal * state.monthly_rate;

        let err = sim.simulate_month(&loan, &mut state, 0, 0).unwrap_err();
        match err {
            LoanError::InvalidLoanConfiguration { offer, year, month, principal_reduction } => {
                assert_eq!(offer, "10% down");
                assert_eq!((year, month), (0, 0));
                assert!(principal_reduction <= 0.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_offer_is_rejected_before_simulating() {
        let offer = LoanOffer::new("all cash", 1.0, 0.04, 0.0, false, 0.0, 30);
        let err = simulator().simulate_offer(&offer).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_rate_loan() {
        let offer = LoanOffer::new("family loan", 0.25, 0.0, 0.0, false, 0.0, 10);
        let report = simulator().simulate_offer(&offer).unwrap();

        assert_abs_diff_eq!(report.base_monthly_payment, 204_750.0 / 120.0, epsilon = 1e-9);
        assert_eq!(report.total_interest_and_pmi_paid, 0.0);
        assert_abs_diff_eq!(report.final_principal, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_one_year_term_ignores_recast() {
        let offer = LoanOffer::new("short", 0.1, 0.04, 0.0, true, 0.0, 1);
        let report = simulator().simulate_offer(&offer).unwrap();

        assert!(report.recast_lump_sum().is_none());
        assert_eq!(report.schedule.len(), 12);
        assert!(report.final_monthly_payment.is_finite());
    }

    #[test]
    fn test_deterministic() {
        let sim = simulator();
        let a = sim.simulate_offer(&ten_down(true)).unwrap();
        let b = sim.simulate_offer(&ten_down(true)).unwrap();

        assert_eq!(a.total_cash_paid.to_bits(), b.total_cash_paid.to_bits());
        assert_eq!(a.total_with_opportunity_cost.to_bits(), b.total_with_opportunity_cost.to_bits());
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn test_schedule_can_be_skipped() {
        let sim = Simulator::new(
            Assumptions::default_scenario(),
            SimulationConfig { record_schedule: false },
        );
        let detailed = simulator().simulate_offer(&ten_down(false)).unwrap();
        let lean = sim.simulate_offer(&ten_down(false)).unwrap();

        assert!(lean.schedule.is_empty());
        assert_eq!(lean.events, detailed.events);
        assert_eq!(lean.total_cash_paid, detailed.total_cash_paid);
    }
}
