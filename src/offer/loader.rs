//! Load loan offers from CSV

use super::LoanOffer;
use crate::error::{LoanError, Result};
use csv::{Reader, ReaderBuilder, Trim};
use std::path::Path;

/// Raw CSV row matching the offers file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    fraction_down: f64,
    interest_rate: f64,
    #[serde(default)]
    origination_fees: Option<f64>,
    #[serde(default)]
    pay_off_pmi_after_year_1: String,
    #[serde(default)]
    recast_fee: Option<f64>,
    term_years: u32,
}

impl CsvRow {
    fn to_offer(self) -> Result<LoanOffer> {
        let pay_off_pmi_after_year_1 = match self.pay_off_pmi_after_year_1.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => true,
            "false" | "no" | "n" | "0" | "" => false,
            other => {
                return Err(LoanError::invalid_input(
                    format!("{}: pay_off_pmi_after_year_1", self.name),
                    format!("unknown flag '{}'", other),
                ))
            }
        };

        let offer = LoanOffer {
            name: self.name,
            fraction_down: self.fraction_down,
            interest_rate: self.interest_rate,
            origination_fees: self.origination_fees.unwrap_or(0.0),
            pay_off_pmi_after_year_1,
            recast_fee: self.recast_fee.unwrap_or(0.0),
            term_years: self.term_years,
        };
        offer.validate()?;
        Ok(offer)
    }
}

/// Shared reader settings; hand-edited files often pad cells with spaces
fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All);
    builder
}

/// Load all offers from a CSV file, in file order
pub fn load_offers<P: AsRef<Path>>(path: P) -> Result<Vec<LoanOffer>> {
    let reader = reader_builder().from_path(path)?;
    read_offers(reader)
}

/// Load offers from any reader (e.g., string buffer, stdin)
pub fn load_offers_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanOffer>> {
    read_offers(reader_builder().from_reader(reader))
}

fn read_offers<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<LoanOffer>> {
    let mut offers = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        offers.push(row.to_offer()?);
    }

    log::debug!("loaded {} loan offers", offers.len());
    Ok(offers)
}
