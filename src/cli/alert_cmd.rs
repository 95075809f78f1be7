use anyhow::{Context, Result};
use tracing::info;

use crate::cli::dashboard_cmd::{self, ViewState};
use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::analytics::aggregate::total_cost;
use crate::core::analytics::threshold::AlertState;
use crate::core::api::ApiClient;
use crate::core::formatter::format_currency;

/// Reject amounts the threshold can never meaningfully hold.
pub fn validate_threshold_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        anyhow::bail!("Alert threshold must be a non-negative amount, got {}", amount);
    }
    Ok(amount)
}

pub async fn show(client: &ApiClient, view: &ViewState, opts: &OutputOptions) -> Result<()> {
    let (costs, threshold) = dashboard_cmd::load(client, view).await;
    let state = AlertState::evaluate(total_cost(&costs), threshold);

    match opts.format {
        OutputFormat::Text => println!("{}", renderer::render_alert(&state, opts.use_color)),
        OutputFormat::Json => print_json(&state, opts)?,
    }
    Ok(())
}

pub async fn set(client: &ApiClient, amount: f64, opts: &OutputOptions) -> Result<()> {
    let amount = validate_threshold_amount(amount)?;
    let updated = client
        .set_alert_threshold(amount)
        .await
        .context("Could not update the alert threshold")?;
    info!(amount = updated.amount, "alert threshold updated");

    match opts.format {
        OutputFormat::Text => {
            println!("Alert threshold set to {}", format_currency(updated.amount))
        }
        OutputFormat::Json => print_json(&updated, opts)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_positive() {
        assert_eq!(validate_threshold_amount(0.0).unwrap(), 0.0);
        assert_eq!(validate_threshold_amount(250.5).unwrap(), 250.5);
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(validate_threshold_amount(-1.0).is_err());
        assert!(validate_threshold_amount(f64::NAN).is_err());
        assert!(validate_threshold_amount(f64::INFINITY).is_err());
    }
}
