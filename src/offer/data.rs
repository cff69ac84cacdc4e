//! Global assumptions and loan offer records

use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};

/// PMI is charged when the down payment is strictly below this fraction of the price
pub const PMI_DOWN_PAYMENT_THRESHOLD: f64 = 0.2;

/// Loan-to-value ratio at which PMI is removed (and the recast target)
pub const PMI_REMOVAL_LTV: f64 = 0.8;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Process-wide assumptions shared by every offer in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Price of the property
    pub purchase_price: f64,

    /// Annual return forgone by spending cash instead of investing it
    /// (e.g. 0.022 for a savings account, ~0.06 for an index fund)
    pub opportunity_cost_rate: f64,

    /// Annual PMI rate applied to the financed principal
    pub pmi_rate: f64,
}

impl Assumptions {
    pub fn new(purchase_price: f64, opportunity_cost_rate: f64, pmi_rate: f64) -> Self {
        Self {
            purchase_price,
            opportunity_cost_rate,
            pmi_rate,
        }
    }

    /// Reference scenario: $273,000 home, 2.2% savings yield, 0.5% PMI
    pub fn default_scenario() -> Self {
        Self::new(273_000.0, 0.022, 0.005)
    }

    /// Principal below which PMI is no longer required
    pub fn pmi_removal_principal(&self) -> f64 {
        self.purchase_price * PMI_REMOVAL_LTV
    }

    /// Monthly multiplier applied to the opportunity-cost balance
    pub fn monthly_opportunity_growth(&self) -> f64 {
        1.0 + self.opportunity_cost_rate / MONTHS_PER_YEAR as f64
    }

    pub fn validate(&self) -> Result<()> {
        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(LoanError::invalid_input(
                "purchase_price",
                format!("must be positive, got {}", self.purchase_price),
            ));
        }
        check_non_negative("opportunity_cost_rate", self.opportunity_cost_rate)?;
        check_non_negative("pmi_rate", self.pmi_rate)?;
        Ok(())
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_scenario()
    }
}

/// A single fixed-rate loan offer under comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    /// Display label
    pub name: String,

    /// Fraction of the purchase price paid upfront, in [0, 1)
    pub fraction_down: f64,

    /// Annual nominal interest rate
    pub interest_rate: f64,

    /// One-time closing cost, independent of the financed principal
    pub origination_fees: f64,

    /// Pay a lump sum after year 1 to bring LTV to 80% and drop PMI,
    /// instead of waiting for amortization to get there
    pub pay_off_pmi_after_year_1: bool,

    /// Fee charged by the lender if the recast happens
    pub recast_fee: f64,

    /// Loan term in years
    pub term_years: u32,
}

impl LoanOffer {
    pub fn new(
        name: impl Into<String>,
        fraction_down: f64,
        interest_rate: f64,
        origination_fees: f64,
        pay_off_pmi_after_year_1: bool,
        recast_fee: f64,
        term_years: u32,
    ) -> Self {
        Self {
            name: name.into(),
            fraction_down,
            interest_rate,
            origination_fees,
            pay_off_pmi_after_year_1,
            recast_fee,
            term_years,
        }
    }

    /// The reference offers compared by the CLI when no CSV is given
    pub fn default_offers() -> Vec<LoanOffer> {
        vec![
            LoanOffer::new("Better, 10% down, no pts, no recast", 0.1, 0.04375, 0.0, false, 0.0, 30),
            LoanOffer::new("Better, 10% down, no pts", 0.1, 0.04375, 0.0, true, 0.0, 30),
            LoanOffer::new("US Bank, 10% down, no pts", 0.1, 0.04375, 500.0, true, 250.0, 30),
            LoanOffer::new("Better, 20% down, no pts", 0.2, 0.045, 0.0, false, 0.0, 30),
        ]
    }

    pub fn down_payment(&self, purchase_price: f64) -> f64 {
        purchase_price * self.fraction_down
    }

    pub fn initial_principal(&self, purchase_price: f64) -> f64 {
        purchase_price - self.down_payment(purchase_price)
    }

    pub fn cash_to_close(&self, purchase_price: f64) -> f64 {
        self.down_payment(purchase_price) + self.origination_fees
    }

    /// Whether PMI is charged at origination
    pub fn has_pmi(&self) -> bool {
        self.fraction_down < PMI_DOWN_PAYMENT_THRESHOLD
    }

    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / MONTHS_PER_YEAR as f64
    }

    pub fn total_months(&self) -> u32 {
        self.term_years * MONTHS_PER_YEAR
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fraction_down.is_finite() || !(0.0..1.0).contains(&self.fraction_down) {
            return Err(LoanError::invalid_input(
                format!("{}: fraction_down", self.name),
                format!("must be in [0, 1), got {}", self.fraction_down),
            ));
        }
        check_non_negative(&format!("{}: interest_rate", self.name), self.interest_rate)?;
        check_non_negative(&format!("{}: origination_fees", self.name), self.origination_fees)?;
        check_non_negative(&format!("{}: recast_fee", self.name), self.recast_fee)?;
        if self.term_years == 0 {
            return Err(LoanError::invalid_input(
                format!("{}: term_years", self.name),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LoanError::invalid_input(
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}
