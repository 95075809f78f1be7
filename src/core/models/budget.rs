use serde::{Deserialize, Serialize};

use crate::core::models::status::SpendStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Per-service month-end projection computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProjection {
    pub service: String,
    pub daily_spend: f64,
    pub monthly_projection: f64,
    pub status: SpendStatus,
}

/// Response of `GET /budget/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// None until a budget has been set
    pub budget: Option<Budget>,
    pub current_spend: f64,
    pub remaining: f64,
    pub forecasted_spend: f64,
    pub percentage_used: f64,
    #[serde(default)]
    pub services: Vec<ServiceProjection>,
}

impl BudgetSummary {
    pub fn budget_amount(&self) -> f64 {
        self.budget.as_ref().map(|b| b.amount).unwrap_or(0.0)
    }
}
