use colored::{control, ColoredString, Colorize};

use crate::cli::dashboard_cmd::DashboardReport;
use crate::core::analytics::aggregate::{series, NamedTotal, Rollup};
use crate::core::analytics::forecast::ForecastPoint;
use crate::core::analytics::threshold::{AlertState, BudgetUsage};
use crate::core::formatter::{
    format_bar, format_currency, format_day_short, format_percent, format_timestamp,
    format_usage_bar,
};
use crate::core::models::budget::BudgetSummary;
use crate::core::models::cost::CostEntry;
use crate::core::models::optimization::{Optimization, OptimizationStatus, OptimizationSummary};
use crate::core::models::status::SpendStatus;

const BAR_WIDTH: usize = 20;
const GAUGE_WIDTH: usize = 24;
/// Historical days shown before the projected ones in text mode.
const RECENT_DAYS: usize = 7;

/// Render the main dashboard.
///
/// Layout:
/// ```text
///  Cloud Cost Insight (3 entries)
///   Total     $35.00
///   Alert     $30.00 (exceeded)
///
///  Daily cost by Provider
///   Date         AWS         Azure       Total
///   2024-01-01   $10.00      $20.00      $30.00
///   2024-01-02   $5.00       $0.00       $5.00
///
///  Top services
///   VMs    $20.00  ████████████████████
///   ...
/// ```
pub fn render_dashboard(report: &DashboardReport, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    lines.push(
        format!(" Cloud Cost Insight ({} entries)", report.entry_count)
            .bold()
            .to_string(),
    );
    lines.push(format!(
        "  {}     {}",
        "Total".cyan(),
        format_currency(report.total_cost)
    ));
    lines.push(render_alert_line(&report.alert));

    if report.alert.exceeded {
        if let Some(threshold) = &report.alert.threshold {
            lines.push(String::new());
            lines.push(
                format!(
                    "  ! Total spend ({}) has exceeded your alert threshold of {}",
                    format_currency(report.total_cost),
                    format_currency(threshold.amount)
                )
                .red()
                .bold()
                .to_string(),
            );
        }
    }

    if report.rollups.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", "No cost data available".dimmed()));
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(
        format!(
            " {} cost by {}",
            report.timeframe.display_name(),
            report.group_by.display_name()
        )
        .bold()
        .to_string(),
    );
    render_rollup_table(&mut lines, &report.rollups);

    render_totals_section(&mut lines, "Top services", &report.top_services);
    render_totals_section(&mut lines, "Cost by provider", &report.by_provider);
    render_totals_section(&mut lines, "Cost by environment", &report.by_environment);

    if !report.forecast.is_empty() {
        lines.push(String::new());
        lines.push(" Spending forecast (next 7 days)".bold().to_string());
        render_forecast(&mut lines, &report.forecast);
    }

    lines.join("\n")
}

fn render_alert_line(alert: &AlertState) -> String {
    let Some(t) = &alert.threshold else {
        return format!("  {}     {}", "Alert".cyan(), "not set".dimmed());
    };
    // A missing threshold reads as 0 and still trips on any spend.
    let amount = if t.is_unset() {
        format!("{} {}", format_currency(t.amount), "(not set)".dimmed())
    } else {
        format_currency(t.amount)
    };
    let state = if alert.exceeded {
        "(exceeded)".red().bold()
    } else {
        "(ok)".green()
    };
    format!("  {}     {} {}", "Alert".cyan(), amount, state)
}

fn render_rollup_table(lines: &mut Vec<String>, rollups: &[Rollup]) {
    let names = series(rollups);
    let key_width = rollups
        .iter()
        .map(|r| r.date.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let col_width = names
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0)
        .max(10)
        + 2;

    let mut header = format!("  {:<width$}  ", "Date", width = key_width);
    for name in &names {
        header.push_str(&format!("{:<width$}", name, width = col_width));
    }
    header.push_str("Total");
    lines.push(header.cyan().to_string());

    for rollup in rollups {
        let rounded = rollup.rounded();
        let mut row = format!("  {:<width$}  ", rounded.date, width = key_width);
        for name in &names {
            let value = rounded.values.get(name).copied().unwrap_or(0.0);
            row.push_str(&format!(
                "{:<width$}",
                format_currency(value),
                width = col_width
            ));
        }
        row.push_str(&format_currency(rollup.total()));
        lines.push(row);
    }
}

fn render_totals_section(lines: &mut Vec<String>, title: &str, totals: &[NamedTotal]) {
    if totals.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!(" {}", title).bold().to_string());

    let name_width = totals.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let max = totals.iter().map(|t| t.value).fold(0.0_f64, f64::max);
    let sum: f64 = totals.iter().map(|t| t.value).sum();

    for total in totals {
        let share = if sum > 0.0 { total.value / sum * 100.0 } else { 0.0 };
        lines.push(format!(
            "  {:<name_width$}  {:>12}  {:>6}  {}",
            total.name,
            format_currency(total.value),
            format_percent(share),
            format_bar(total.value, max, BAR_WIDTH).magenta(),
            name_width = name_width
        ));
    }
}

fn render_forecast(lines: &mut Vec<String>, points: &[ForecastPoint]) {
    let history = points.iter().filter(|p| !p.is_forecast).count();
    let skip = history.saturating_sub(RECENT_DAYS);

    for point in points.iter().skip(skip) {
        let day = format_day_short(&point.date);
        if point.is_forecast {
            lines.push(format!(
                "  {}  {}",
                day.dimmed(),
                format!("~{} (forecast)", format_currency(point.total)).dimmed()
            ));
        } else {
            lines.push(format!("  {}  {}", day, format_currency(point.total)));
        }
    }
}

/// Render a raw cost entry table.
pub fn render_cost_entries(entries: &[CostEntry], use_color: bool) -> String {
    control::set_override(use_color);

    if entries.is_empty() {
        return format!(" {}", "No cost entries".dimmed());
    }

    let service_width = entries.iter().map(|e| e.service.len()).max().unwrap_or(0).max(7);
    let project_width = entries.iter().map(|e| e.project.len()).max().unwrap_or(0).max(7);
    let env_width = entries
        .iter()
        .map(|e| e.environment.len())
        .max()
        .unwrap_or(0)
        .max(11);

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        format!(
            "  {:>6}  {:<10}  {:<8}  {:<sw$}  {:<pw$}  {:<ew$}  {:>12}",
            "ID",
            "Date",
            "Provider",
            "Service",
            "Project",
            "Environment",
            "Cost",
            sw = service_width,
            pw = project_width,
            ew = env_width
        )
        .cyan()
        .to_string(),
    );
    for e in entries {
        lines.push(format!(
            "  {:>6}  {:<10}  {:<8}  {:<sw$}  {:<pw$}  {:<ew$}  {:>12}",
            e.id,
            e.date,
            e.provider,
            e.service,
            e.project,
            e.environment,
            format_currency(e.cost),
            sw = service_width,
            pw = project_width,
            ew = env_width
        ));
    }
    let total: f64 = entries.iter().map(|e| e.cost).sum();
    lines.push(format!(
        "  {} {} entries, {}",
        "Total".cyan(),
        entries.len(),
        format_currency(total)
    ));
    lines.join("\n")
}

/// Render the alert threshold view.
pub fn render_alert(alert: &AlertState, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Spend alert".bold().to_string());
    lines.push(format!(
        "  {}     {}",
        "Total".cyan(),
        format_currency(alert.total)
    ));
    lines.push(render_alert_line(alert));
    if let Some(t) = &alert.threshold {
        if !t.is_unset() {
            lines.push(format!(
                "  {}   {}",
                "Updated".cyan(),
                format_timestamp(&t.updated_at)
            ));
        }
    }
    lines.join("\n")
}

/// Render the budget planning view.
pub fn render_budget(summary: &BudgetSummary, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Budget planning".bold().to_string());

    let amount = summary.budget_amount();
    if amount <= 0.0 {
        lines.push(format!(
            "  {}    {}",
            "Budget".cyan(),
            "not set (use `ccost budget set <AMOUNT>`)".dimmed()
        ));
    } else {
        lines.push(format!("  {}    {}", "Budget".cyan(), format_currency(amount)));
    }
    lines.push(format!(
        "  {}     {}",
        "Spent".cyan(),
        format_currency(summary.current_spend)
    ));
    let remaining = format_currency(summary.remaining);
    lines.push(format!(
        "  {} {}",
        "Remaining".cyan(),
        if summary.remaining < 0.0 {
            remaining.red().to_string()
        } else {
            remaining
        }
    ));
    lines.push(format!(
        "  {}  {}",
        "Forecast".cyan(),
        format_currency(summary.forecasted_spend)
    ));

    if amount > 0.0 {
        let usage = BudgetUsage::from_summary(summary);
        let text = format!(
            "{} {}",
            format_percent(usage.percentage_used),
            format_usage_bar(usage.gauge_percent(), GAUGE_WIDTH)
        );
        lines.push(format!(
            "  {}      {}",
            "Used".cyan(),
            color_by_status(usage.status, &text)
        ));
        if summary.forecasted_spend > amount {
            lines.push(
                format!(
                    "  ! Forecasted spend exceeds budget by {}",
                    format_currency(summary.forecasted_spend - amount)
                )
                .yellow()
                .to_string(),
            );
        }
    }

    if !summary.services.is_empty() {
        lines.push(String::new());
        lines.push(" Service projections".bold().to_string());
        let width = summary
            .services
            .iter()
            .map(|s| s.service.len())
            .max()
            .unwrap_or(0)
            .max(7);
        lines.push(
            format!(
                "  {:<width$}  {:>10}  {:>12}  {}",
                "Service",
                "Daily",
                "Month-end",
                "Status",
                width = width
            )
            .cyan()
            .to_string(),
        );
        for s in &summary.services {
            lines.push(format!(
                "  {:<width$}  {:>10}  {:>12}  {}",
                s.service,
                format_currency(s.daily_spend),
                format_currency(s.monthly_projection),
                color_by_status(s.status, &s.status.to_string()),
                width = width
            ));
        }
    }

    lines.join("\n")
}

/// Render the optimization recommendations view.
pub fn render_optimizations(summary: &OptimizationSummary, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Cost optimization".bold().to_string());

    if summary.has_significant_savings() {
        lines.push(
            format!(
                "  Significant savings ahead: {} of monthly spend",
                format_percent(summary.savings_percentage)
            )
            .green()
            .bold()
            .to_string(),
        );
    }

    lines.push(format!(
        "  {}  {} ({} of monthly spend)",
        "Potential".cyan(),
        format_currency(summary.total_estimated_savings),
        format_percent(summary.savings_percentage)
    ));
    lines.push(format!(
        "  {}    {}",
        "Applied".cyan(),
        format_currency(summary.total_applied_savings)
    ));
    lines.push(format!(
        "  {}     {} pending, {} applied, {} ignored",
        "Status".cyan(),
        summary.pending_count,
        summary.applied_count,
        summary.ignored_count
    ));

    if summary.optimizations.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {}",
            "No recommendations (try `ccost optimize generate`)".dimmed()
        ));
        return lines.join("\n");
    }

    lines.push(String::new());
    for o in &summary.optimizations {
        render_optimization_lines(&mut lines, o);
    }
    lines.join("\n")
}

/// Render one recommendation, used after apply/ignore.
pub fn render_optimization(o: &Optimization, use_color: bool) -> String {
    control::set_override(use_color);
    let mut lines = Vec::new();
    render_optimization_lines(&mut lines, o);
    lines.join("\n")
}

fn render_optimization_lines(lines: &mut Vec<String>, o: &Optimization) {
    let status = format!("[{}]", o.status);
    let colored_status: ColoredString = match o.status {
        OptimizationStatus::Pending => status.yellow(),
        OptimizationStatus::Applied => status.green(),
        OptimizationStatus::Ignored => status.red(),
    };
    lines.push(format!(
        "  #{:<4} {:<10} {}  {}",
        o.id,
        colored_status,
        o.title.bold(),
        format!("save {}", format_currency(o.estimated_savings)).green()
    ));
    lines.push(format!(
        "        {}",
        format!("{} / {}", o.provider, o.service).cyan()
    ));
    if !o.description.is_empty() {
        lines.push(format!("        {}", o.description.dimmed()));
    }
}

/// Color text green/yellow/red by spend status.
fn color_by_status(status: SpendStatus, text: &str) -> ColoredString {
    match status {
        SpendStatus::Green => text.green(),
        SpendStatus::Yellow => text.yellow(),
        SpendStatus::Red => text.red(),
    }
}
