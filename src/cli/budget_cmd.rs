use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::api::ApiClient;
use crate::core::formatter::format_currency;

/// A budget must be a positive, finite amount.
pub fn validate_budget_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        anyhow::bail!("Budget must be greater than zero, got {}", amount);
    }
    Ok(amount)
}

pub async fn show(client: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let summary = match client.fetch_budget().await {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "failed to load budget");
            None
        }
    };

    match opts.format {
        OutputFormat::Text => match &summary {
            Some(s) => println!("{}", renderer::render_budget(s, opts.use_color)),
            None => {
                colored::control::set_override(opts.use_color);
                println!(" {}\n  {}", "Budget planning".bold(), "Budget data unavailable".dimmed());
            }
        },
        OutputFormat::Json => print_json(&summary, opts)?,
    }
    Ok(())
}

pub async fn set(client: &ApiClient, amount: f64, opts: &OutputOptions) -> Result<()> {
    let amount = validate_budget_amount(amount)?;
    let budget = client
        .set_budget(amount)
        .await
        .context("Could not update the budget")?;
    info!(amount = budget.amount, "budget updated");

    if matches!(opts.format, OutputFormat::Text) {
        println!("Monthly budget set to {}\n", format_currency(budget.amount));
    }
    show(client, opts).await
}
