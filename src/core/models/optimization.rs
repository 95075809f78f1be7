use serde::{Deserialize, Serialize};

/// Savings share of monthly spend from which the summary is highlighted.
pub const SIGNIFICANT_SAVINGS_PERCENT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Pending,
    Applied,
    Ignored,
}

impl std::fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Applied => write!(f, "Applied"),
            Self::Ignored => write!(f, "Ignored"),
        }
    }
}

/// A server-suggested cost-saving action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub estimated_savings: f64,
    pub status: OptimizationStatus,
    pub service: String,
    pub provider: String,
    #[serde(default)]
    pub created_at: String,
}

/// Response of `GET /optimization/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub optimizations: Vec<Optimization>,
    pub total_estimated_savings: f64,
    pub total_applied_savings: f64,
    pub pending_count: u32,
    pub applied_count: u32,
    pub ignored_count: u32,
    pub savings_percentage: f64,
}

impl OptimizationSummary {
    pub fn has_significant_savings(&self) -> bool {
        self.savings_percentage >= SIGNIFICANT_SAVINGS_PERCENT
    }

    pub fn pending(&self) -> impl Iterator<Item = &Optimization> {
        self.optimizations
            .iter()
            .filter(|o| o.status == OptimizationStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(savings_percentage: f64) -> OptimizationSummary {
        OptimizationSummary {
            optimizations: vec![
                Optimization {
                    id: 1,
                    title: "Rightsize EC2".into(),
                    description: String::new(),
                    estimated_savings: 120.0,
                    status: OptimizationStatus::Pending,
                    service: "EC2".into(),
                    provider: "AWS".into(),
                    created_at: String::new(),
                },
                Optimization {
                    id: 2,
                    title: "Delete idle disks".into(),
                    description: String::new(),
                    estimated_savings: 30.0,
                    status: OptimizationStatus::Applied,
                    service: "Managed Disks".into(),
                    provider: "Azure".into(),
                    created_at: String::new(),
                },
            ],
            total_estimated_savings: 150.0,
            total_applied_savings: 30.0,
            pending_count: 1,
            applied_count: 1,
            ignored_count: 0,
            savings_percentage,
        }
    }

    #[test]
    fn significant_savings_threshold_is_inclusive() {
        assert!(!summary(14.99).has_significant_savings());
        assert!(summary(15.0).has_significant_savings());
    }

    #[test]
    fn pending_filters_by_status() {
        let s = summary(0.0);
        let ids: Vec<i64> = s.pending().map(|o| o.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn deserialize_optimization() {
        let json = r#"{
            "id": 9,
            "title": "Use committed use discounts",
            "description": "Commit to 1 year",
            "estimated_savings": 88.8,
            "status": "ignored",
            "service": "Compute Engine",
            "provider": "GCP",
            "created_at": "2024-01-01T00:00:00"
        }"#;
        let o: Optimization = serde_json::from_str(json).unwrap();
        assert_eq!(o.status, OptimizationStatus::Ignored);
        assert_eq!(o.provider, "GCP");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"{
            "id": 9, "title": "x", "estimated_savings": 1.0,
            "status": "archived", "service": "s", "provider": "p"
        }"#;
        assert!(serde_json::from_str::<Optimization>(json).is_err());
    }
}
