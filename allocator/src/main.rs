//! Main entry point for the allocator demo binary
//!
//! Seeds an allocator from the environment (and `.env`), applies the
//! mutations given on the command line and prints the resulting snapshot
//! as JSON.

use clap::Parser;
use serde_json::json;

use allocator::{
    classify_row, AllocatorError, AllocatorResult, Availability, BandSummary, BudgetAllocator, LoggingObserver,
    SnapshotRecorder,
};
use shared::{logging, session_info, AllocationMode, CampaignConfig, EngineConfig, SharedError};

/// Retail media budget allocator
#[derive(Parser)]
#[command(name = "allocator")]
#[command(about = "Splits a campaign budget across advertising engines and projects its return")]
pub struct Args {
    /// Total campaign budget (overrides ALLOCATOR_TOTAL_BUDGET); negative values clamp to 0
    #[arg(long, allow_hyphen_values = true)]
    pub budget: Option<f64>,

    /// Allocation mode: auto, even or manual (overrides ALLOCATOR_MODE)
    #[arg(long)]
    pub mode: Option<AllocationMode>,

    /// Engines as "id:name:roas[:enabled][:budget],..." (overrides ALLOCATOR_ENGINES)
    #[arg(long)]
    pub engines: Option<String>,

    /// Disable an engine (repeatable)
    #[arg(long = "disable")]
    pub disable: Vec<String>,

    /// Set an engine budget as id=amount (repeatable, switches to manual mode)
    #[arg(long = "manual")]
    pub manual: Vec<String>,

    /// Availability row to classify, e.g. "12,MC,-3,40"
    #[arg(long, allow_hyphen_values = true)]
    pub availability: Option<String>,

    /// Print every intermediate snapshot, not just the final one
    #[arg(long)]
    pub history: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn main() -> AllocatorResult<()> {
    let args = Args::parse();

    dotenv::dotenv().ok();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = build_config(&args)?;
    let mut allocator = BudgetAllocator::from_config(&config)?;
    let session_id = allocator.session_id();
    logging::log_startup(&session_id, "budget allocator");

    let recorder = SnapshotRecorder::new();
    allocator.subscribe(Box::new(LoggingObserver::new()));
    allocator.subscribe(Box::new(recorder.clone()));

    if let Err(e) = apply_mutations(&mut allocator, &args) {
        logging::log_error(&session_id, "Applying mutations", &e);
        return Err(e);
    }

    let availability = match &args.availability {
        Some(row) => {
            let cells = Availability::parse_row(row)?;
            Some(json!({
                "cells": cells,
                "bands": classify_row(&cells),
                "summary": BandSummary::from_cells(&cells),
            }))
        }
        None => None,
    };

    let mut output = json!({
        "snapshot": allocator.snapshot(),
        "summary": allocator.summary(),
    });
    if let Some(availability) = availability {
        output["availability"] = availability;
    }
    if args.history {
        output["history"] = serde_json::to_value(recorder.history())?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);

    session_info!(session_id, "Applied {} mutations", recorder.len());
    logging::log_success(&session_id, "Allocation complete");
    Ok(())
}

/// Environment first, then command-line overrides
fn build_config(args: &Args) -> AllocatorResult<CampaignConfig> {
    let mut config = CampaignConfig::from_env()?;

    if let Some(engines) = &args.engines {
        config.engines = EngineConfig::parse_list(engines)?;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(budget) = args.budget {
        config.total_budget = shared::clamp_amount(budget);
    }

    Ok(config)
}

fn apply_mutations(allocator: &mut BudgetAllocator, args: &Args) -> AllocatorResult<()> {
    for engine_id in &args.disable {
        allocator.set_engine_enabled(engine_id, false)?;
    }

    if args.manual.is_empty() {
        return Ok(());
    }

    if allocator.mode() != AllocationMode::Manual {
        allocator.set_mode(AllocationMode::Manual);
    }

    for entry in &args.manual {
        let (engine_id, amount) = parse_manual_entry(entry)?;
        allocator.set_engine_budget(engine_id, amount)?;
    }

    Ok(())
}

fn parse_manual_entry(entry: &str) -> AllocatorResult<(&str, f64)> {
    let invalid = || {
        AllocatorError::from(SharedError::InvalidConfig {
            field: "--manual".to_string(),
            value: entry.to_string(),
        })
    };

    let (engine_id, amount) = entry.split_once('=').ok_or_else(invalid)?;
    let amount: f64 = amount.trim().parse().map_err(|_| invalid())?;
    Ok((engine_id.trim(), amount))
}
