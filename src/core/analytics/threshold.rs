use serde::Serialize;

use crate::core::models::alert::AlertThreshold;
use crate::core::models::budget::BudgetSummary;
use crate::core::models::status::SpendStatus;

/// Strictly greater: spending exactly the threshold does not trigger.
pub fn alert_exceeded(total: f64, threshold: &AlertThreshold) -> bool {
    total > threshold.amount
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertState {
    pub threshold: Option<AlertThreshold>,
    pub total: f64,
    pub exceeded: bool,
}

impl AlertState {
    pub fn evaluate(total: f64, threshold: Option<AlertThreshold>) -> Self {
        let exceeded = threshold
            .as_ref()
            .map(|t| alert_exceeded(total, t))
            .unwrap_or(false);
        Self {
            threshold,
            total,
            exceeded,
        }
    }
}

/// Spend measured against a budget ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub total: f64,
    pub budget: f64,
    pub percentage_used: f64,
    pub exceeded: bool,
    pub status: SpendStatus,
}

impl BudgetUsage {
    /// A zero or negative budget counts as "no budget": 0% used, never exceeded.
    pub fn evaluate(total: f64, budget: f64) -> Self {
        let (percentage_used, exceeded) = if budget > 0.0 {
            (total / budget * 100.0, total > budget)
        } else {
            (0.0, false)
        };
        Self {
            total,
            budget,
            percentage_used,
            exceeded,
            status: SpendStatus::from_percentage(percentage_used),
        }
    }

    /// Usage as reported by `GET /budget/`. The server's `percentage_used`
    /// drives the status rather than a local recomputation.
    pub fn from_summary(summary: &BudgetSummary) -> Self {
        Self {
            percentage_used: summary.percentage_used,
            status: SpendStatus::from_percentage(summary.percentage_used),
            ..Self::evaluate(summary.current_spend, summary.budget_amount())
        }
    }

    /// Percentage clamped to 0..=100 for gauges and bars.
    pub fn gauge_percent(&self) -> f64 {
        self.percentage_used.clamp(0.0, 100.0)
    }
}
