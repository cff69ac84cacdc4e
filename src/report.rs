//! Presentation of simulation reports: currency, text, CSV and JSON output

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::comparison::OfferOutcome;
use crate::error::Result;
use crate::simulation::{LoanEvent, SimulationReport};

/// Format an amount as US dollars with thousands separators, e.g. `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Render the per-offer text block
pub fn render_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "loan '{}':", report.offer_name);

    if let Some(pmi) = report.monthly_pmi {
        let _ = writeln!(out, "  monthly PMI: {}", format_currency(pmi));
        let _ = writeln!(out, "  monthly payment with PMI: {}", format_currency(report.initial_monthly_payment));
    }

    for event in &report.events {
        match event {
            LoanEvent::PmiRemoved { year, month } => {
                let _ = writeln!(out, "  paid off PMI at year {}, month {} (0-indexed)", year, month);
            }
            LoanEvent::Recast { lump_sum, .. } => {
                let _ = writeln!(out, "  lump sum payment for recast: {}", format_currency(*lump_sum));
            }
        }
    }

    let _ = writeln!(out, "  monthly payment: {}", format_currency(report.final_monthly_payment));
    let _ = writeln!(out, "  total $ paid: {}", format_currency(report.total_cash_paid));
    let _ = writeln!(out, "  total interest + fees paid: {}", format_currency(report.total_interest_and_pmi_paid));
    let _ = writeln!(out, "  total paid + op cost: {}", format_currency(report.total_with_opportunity_cost));
    out
}

/// Write the monthly schedule of one report as CSV
pub fn write_schedule_csv<P: AsRef<Path>>(path: P, report: &SimulationReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &report.schedule {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize any report collection as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One JSON entry per offer: the report, or the offer name and why it failed
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OutcomeEntry<'a> {
    Report(&'a SimulationReport),
    Failed { offer_name: &'a str, error: String },
}

/// Serialize every outcome as pretty JSON, in input order
pub fn outcomes_to_json(outcomes: &[OfferOutcome]) -> Result<String> {
    let entries: Vec<OutcomeEntry<'_>> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(report) => OutcomeEntry::Report(report),
            Err(e) => OutcomeEntry::Failed {
                offer_name: &outcome.offer_name,
                error: e.to_string(),
            },
        })
        .collect();
    to_json(&entries)
}

/// File-system friendly name for an offer's schedule file; the 0-based input
/// `index` keeps offers with similar names apart
pub fn schedule_file_name(index: usize, offer_name: &str) -> String {
    let slug: String = offer_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    format!("{:02}_{}_schedule.csv", index + 1, slug)
}
