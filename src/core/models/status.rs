use serde::{Deserialize, Serialize};

/// Three-tier spend severity used for budgets and service projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendStatus {
    Green,
    Yellow,
    Red,
}

impl SpendStatus {
    /// green below 50%, yellow from 50% up to (not including) 80%, red from 80%.
    pub fn from_percentage(percentage_used: f64) -> Self {
        if percentage_used < 50.0 {
            Self::Green
        } else if percentage_used < 80.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

impl std::fmt::Display for SpendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "On track"),
            Self::Yellow => write!(f, "Watch"),
            Self::Red => write!(f, "At risk"),
        }
    }
}
