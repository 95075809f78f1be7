use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::models::cost::CostEntry;

/// Time bucket used as the rollup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Self::Daily),
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// Secondary grouping dimension of a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Provider,
    Service,
    Environment,
    Project,
}

impl Dimension {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "provider" | "providers" => Some(Self::Provider),
            "service" | "services" => Some(Self::Service),
            "environment" | "env" => Some(Self::Environment),
            "project" | "projects" => Some(Self::Project),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Service => "service",
            Self::Environment => "environment",
            Self::Project => "project",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Provider => "Provider",
            Self::Service => "Service",
            Self::Environment => "Environment",
            Self::Project => "Project",
        }
    }

    pub fn value<'a>(&self, entry: &'a CostEntry) -> &'a str {
        match self {
            Self::Provider => &entry.provider,
            Self::Service => &entry.service,
            Self::Environment => &entry.environment,
            Self::Project => &entry.project,
        }
    }
}

/// JSON key used for a dimension value that is literally named `date`.
pub const ESCAPED_DATE_KEY: &str = "_date";

/// One bucket of a rollup. Serializes flat, e.g. `{"date":"2024-01-01","AWS":10.0}`.
///
/// A dimension value named `date` is written as [`ESCAPED_DATE_KEY`] so the
/// bucket key stays unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

impl Serialize for Rollup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("date", &self.date)?;
        for (name, value) in &self.values {
            let key = if name == "date" { ESCAPED_DATE_KEY } else { name.as_str() };
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Rollup {
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Copy with every value rounded to cents, for presentation.
    pub fn rounded(&self) -> Self {
        Self {
            date: self.date.clone(),
            values: self
                .values
                .iter()
                .map(|(k, v)| (k.clone(), round2(*v)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a `YYYY-MM-DD` day, also accepting a timestamp that starts with one.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Rollup key of a date string.
///
/// Weekly keys use the ISO week-based year so that `YYYY-Wnn` keys sort in
/// calendar order. Unparseable dates are used as their own key.
pub fn bucket_key(date: &str, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.to_string(),
        Granularity::Weekly => match parse_date(date) {
            Some(d) => {
                let week = d.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            None => date.to_string(),
        },
        Granularity::Monthly => match parse_date(date) {
            Some(d) => format!("{:04}-{:02}", d.year(), d.month()),
            None => date.to_string(),
        },
    }
}

/// Sum costs per time bucket and per dimension value, sorted by bucket key.
///
/// Every dimension value seen in `entries` is present in every record.
pub fn aggregate(
    entries: &[CostEntry],
    granularity: Granularity,
    dimension: Dimension,
) -> Vec<Rollup> {
    let series: BTreeSet<&str> = entries.iter().map(|e| dimension.value(e)).collect();

    let mut buckets: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for entry in entries {
        let key = bucket_key(&entry.date, granularity);
        *buckets
            .entry(key)
            .or_default()
            .entry(dimension.value(entry).to_string())
            .or_insert(0.0) += entry.cost;
    }

    buckets
        .into_iter()
        .map(|(date, mut values)| {
            for name in &series {
                values.entry((*name).to_string()).or_insert(0.0);
            }
            Rollup { date, values }
        })
        .collect()
}

/// Dimension values present in a rollup, in key order.
pub fn series(rollups: &[Rollup]) -> Vec<String> {
    rollups
        .first()
        .map(|r| r.values.keys().cloned().collect())
        .unwrap_or_default()
}

/// Total cost per dimension value, largest first.
pub fn totals_by(entries: &[CostEntry], dimension: Dimension) -> Vec<NamedTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries {
        *sums.entry(dimension.value(entry)).or_insert(0.0) += entry.cost;
    }
    let mut totals: Vec<NamedTotal> = sums
        .into_iter()
        .map(|(name, value)| NamedTotal {
            name: name.to_string(),
            value,
        })
        .collect();
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals
}

/// Total cost per calendar day, oldest first. Entries without a valid date
/// are left out.
pub fn daily_totals(entries: &[CostEntry]) -> Vec<DailyTotal> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        match parse_date(&entry.date) {
            Some(date) => *sums.entry(date).or_insert(0.0) += entry.cost,
            None => tracing::debug!(id = entry.id, date = %entry.date, "skipping undated cost entry"),
        }
    }
    sums.into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

pub fn total_cost(entries: &[CostEntry]) -> f64 {
    entries.iter().map(|e| e.cost).sum()
}
