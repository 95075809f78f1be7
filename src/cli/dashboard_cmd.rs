use std::io::IsTerminal;

use anyhow::Result;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::analytics::aggregate::{
    aggregate, daily_totals, total_cost, totals_by, Dimension, Granularity, NamedTotal, Rollup,
};
use crate::core::analytics::forecast::{forecast, ForecastPoint};
use crate::core::analytics::threshold::AlertState;
use crate::core::api::client::DEFAULT_SKIP;
use crate::core::api::{ApiClient, ApiError};
use crate::core::models::alert::AlertThreshold;
use crate::core::models::cost::CostEntry;

/// Per-invocation dashboard state, built from CLI flags and config.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    pub timeframe: Granularity,
    pub group_by: Dimension,
    /// Page through every cost entry instead of reading one page
    pub fetch_all: bool,
    pub page_size: u32,
    pub top_services: usize,
}

/// Everything the dashboard shows; also its JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub timeframe: Granularity,
    pub group_by: Dimension,
    pub entry_count: usize,
    pub total_cost: f64,
    pub alert: AlertState,
    pub rollups: Vec<Rollup>,
    pub top_services: Vec<NamedTotal>,
    pub by_provider: Vec<NamedTotal>,
    pub by_environment: Vec<NamedTotal>,
    pub forecast: Vec<ForecastPoint>,
}

pub fn build_report<R: Rng>(
    costs: &[CostEntry],
    threshold: Option<AlertThreshold>,
    view: &ViewState,
    rng: &mut R,
) -> DashboardReport {
    let total = total_cost(costs);
    let mut top_services = totals_by(costs, Dimension::Service);
    top_services.truncate(view.top_services);

    DashboardReport {
        timeframe: view.timeframe,
        group_by: view.group_by,
        entry_count: costs.len(),
        total_cost: total,
        alert: AlertState::evaluate(total, threshold),
        rollups: aggregate(costs, view.timeframe, view.group_by)
            .iter()
            .map(Rollup::rounded)
            .collect(),
        top_services,
        by_provider: totals_by(costs, Dimension::Provider),
        by_environment: totals_by(costs, Dimension::Environment),
        forecast: forecast(&daily_totals(costs), rng),
    }
}

async fn load_costs(client: &ApiClient, view: &ViewState) -> Result<Vec<CostEntry>, ApiError> {
    if view.fetch_all {
        client.fetch_all_costs(view.page_size).await
    } else {
        client.fetch_costs(DEFAULT_SKIP, view.page_size).await
    }
}

/// Fetch costs and the alert threshold concurrently. Failures are logged and
/// replaced by empty state so the dashboard still renders.
pub async fn load(
    client: &ApiClient,
    view: &ViewState,
) -> (Vec<CostEntry>, Option<AlertThreshold>) {
    let (costs, threshold) = tokio::join!(load_costs(client, view), client.fetch_alert_threshold());

    let costs = match costs {
        Ok(costs) => costs,
        Err(e) => {
            warn!(error = %e, "failed to load costs");
            Vec::new()
        }
    };
    let threshold = match threshold {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(error = %e, "failed to load alert threshold");
            None
        }
    };
    debug!(
        entries = costs.len(),
        has_threshold = threshold.is_some(),
        timeframe = view.timeframe.id(),
        group_by = view.group_by.id(),
        "dashboard data loaded"
    );
    (costs, threshold)
}

pub async fn run(client: &ApiClient, view: ViewState, opts: &OutputOptions) -> Result<()> {
    // Show spinner on stderr (text mode only, and not over verbose logs)
    let show_spinner = matches!(opts.format, OutputFormat::Text)
        && !opts.verbose
        && std::io::stderr().is_terminal();
    let spinner = if show_spinner {
        Some(tokio::spawn(async move {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0usize;
            loop {
                eprint!("\r {} Loading dashboard...", frames[i % frames.len()]);
                i = i.wrapping_add(1);
                tokio::time::sleep(std::time::Duration::from_millis(80)).await;
            }
        }))
    } else {
        None
    };

    let (costs, threshold) = load(client, &view).await;

    // Stop spinner and clear the line
    if let Some(s) = spinner {
        s.abort();
        eprint!("\r\x1b[2K");
    }

    let report = build_report(&costs, threshold, &view, &mut rand::thread_rng());

    match opts.format {
        OutputFormat::Text => println!("{}", renderer::render_dashboard(&report, opts.use_color)),
        OutputFormat::Json => print_json(&report, opts)?,
    }
    Ok(())
}
