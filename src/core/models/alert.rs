use serde::{Deserialize, Serialize};

/// Singleton spend alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub updated_at: String,
}

impl AlertThreshold {
    /// Value substituted when the API reports that no threshold is configured.
    pub fn unset() -> Self {
        Self {
            id: 0,
            amount: 0.0,
            updated_at: String::new(),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.id == 0 && self.updated_at.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountRequest {
    pub amount: f64,
}
