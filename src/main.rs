//! Mortgage Compare CLI
//!
//! Simulates each loan offer over its full term and prints a comparison

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use mortgage_compare::{
    cheapest,
    offer::load_offers,
    report::{format_currency, outcomes_to_json, render_report, schedule_file_name, write_schedule_csv},
    Assumptions, ComparisonRunner, LoanOffer, SimulationConfig,
};

/// Compare fixed-rate mortgage offers including PMI, recast and opportunity cost
#[derive(Parser, Debug)]
#[command(name = "mortgage_compare", version, about)]
struct Cli {
    /// CSV file of loan offers (defaults to the built-in reference offers)
    #[arg(long)]
    offers: Option<PathBuf>,

    /// Purchase price of the property
    #[arg(long, default_value_t = Assumptions::default_scenario().purchase_price)]
    purchase_price: f64,

    /// Annual return forgone on cash spent (e.g. 0.022 savings, ~0.06 index fund)
    #[arg(long, default_value_t = Assumptions::default_scenario().opportunity_cost_rate)]
    opportunity_cost_rate: f64,

    /// Annual PMI rate applied to the financed principal
    #[arg(long, default_value_t = Assumptions::default_scenario().pmi_rate)]
    pmi_rate: f64,

    /// Write one monthly schedule CSV per offer into this directory
    #[arg(long)]
    schedule_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = Assumptions::new(cli.purchase_price, cli.opportunity_cost_rate, cli.pmi_rate);
    assumptions.validate().context("invalid assumptions")?;

    let offers = match &cli.offers {
        Some(path) => load_offers(path)
            .with_context(|| format!("failed to load offers from {}", path.display()))?,
        None => LoanOffer::default_offers(),
    };

    let config = SimulationConfig {
        record_schedule: cli.schedule_dir.is_some(),
    };
    let runner = ComparisonRunner::with_config(assumptions, config);
    let outcomes = runner.run(&offers);

    if let Some(dir) = &cli.schedule_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for (index, outcome) in outcomes.iter().enumerate() {
            let Some(report) = outcome.report() else {
                continue;
            };
            let path = dir.join(schedule_file_name(index, &report.offer_name));
            write_schedule_csv(&path, report)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    match cli.format {
        OutputFormat::Json => {
            println!("{}", outcomes_to_json(&outcomes)?);
        }
        OutputFormat::Text => {
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(report) => println!("{}", render_report(report)),
                    Err(e) => println!("loan '{}':\n  skipped: {}\n", outcome.offer_name, e),
                }
            }
            if let Some(best) = cheapest(&outcomes) {
                println!(
                    "lowest total paid + op cost: '{}' at {}",
                    best.offer_name,
                    format_currency(best.total_with_opportunity_cost)
                );
            }
        }
    }

    Ok(())
}
