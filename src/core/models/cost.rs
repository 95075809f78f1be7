use serde::{Deserialize, Serialize};

fn default_project() -> String {
    "Main Project".to_string()
}

fn default_environment() -> String {
    "Production".to_string()
}

/// One line-item of cloud spend as returned by `GET /costs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: i64,
    pub service: String,
    /// "AWS", "Azure" or "GCP" by convention; not enforced.
    pub provider: String,
    pub cost: f64,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_cost_entry() {
        let json = r#"{
            "id": 7,
            "service": "EC2",
            "provider": "AWS",
            "cost": 12.5,
            "date": "2024-01-01",
            "project": "Checkout",
            "environment": "Staging",
            "created_at": "2024-01-02T03:04:05.123456"
        }"#;
        let entry: CostEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.provider, "AWS");
        assert!((entry.cost - 12.5).abs() < 1e-10);
        assert_eq!(entry.project, "Checkout");
        assert_eq!(entry.environment, "Staging");
    }

    #[test]
    fn deserialize_cost_entry_defaults() {
        let json = r#"{
            "id": 1,
            "service": "Blob Storage",
            "provider": "Azure",
            "cost": 3.0,
            "date": "2024-02-10"
        }"#;
        let entry: CostEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.project, "Main Project");
        assert_eq!(entry.environment, "Production");
        assert!(entry.created_at.is_empty());
    }
}
