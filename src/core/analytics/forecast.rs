use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::core::analytics::aggregate::DailyTotal;

pub const FORECAST_HORIZON_DAYS: i64 = 7;
/// Maximum relative deviation of a projected day from the historical mean.
pub const FORECAST_JITTER: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub total: f64,
    #[serde(rename = "isForecast")]
    pub is_forecast: bool,
}

pub fn mean_daily(history: &[DailyTotal]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    let sum: f64 = history.iter().map(|d| d.total).sum();
    Some(sum / history.len() as f64)
}

/// Extend a date-ascending daily series by [`FORECAST_HORIZON_DAYS`] flat-mean
/// points, each perturbed by a uniform factor in ±[`FORECAST_JITTER`].
///
/// Ignores trend and seasonality. Returns the history followed by the
/// projected points; an empty history yields an empty series.
pub fn forecast<R: Rng>(history: &[DailyTotal], rng: &mut R) -> Vec<ForecastPoint> {
    let (Some(mean), Some(last)) = (mean_daily(history), history.last()) else {
        return Vec::new();
    };

    let mut points: Vec<ForecastPoint> = history
        .iter()
        .map(|d| ForecastPoint {
            date: d.date,
            total: d.total,
            is_forecast: false,
        })
        .collect();

    for day in 1..=FORECAST_HORIZON_DAYS {
        let jitter: f64 = rng.gen_range(-FORECAST_JITTER..=FORECAST_JITTER);
        points.push(ForecastPoint {
            date: last.date + Duration::days(day),
            total: mean * (1.0 + jitter),
            is_forecast: true,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(y: i32, m: u32, d: u32, total: f64) -> DailyTotal {
        DailyTotal {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            total,
        }
    }

    fn history() -> Vec<DailyTotal> {
        vec![
            day(2024, 2, 26, 100.0),
            day(2024, 2, 27, 120.0),
            day(2024, 2, 28, 80.0),
            day(2024, 2, 29, 100.0),
        ]
    }

    #[test]
    fn empty_history_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(forecast(&[], &mut rng).is_empty());
        assert_eq!(mean_daily(&[]), None);
    }

    #[test]
    fn appends_seven_synthetic_points() {
        let mut rng = StdRng::seed_from_u64(42);
        let points = forecast(&history(), &mut rng);
        assert_eq!(points.len(), 4 + 7);
        assert!(points[..4].iter().all(|p| !p.is_forecast));
        assert_eq!(points.iter().filter(|p| p.is_forecast).count(), 7);
    }

    #[test]
    fn synthetic_points_follow_last_date() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = forecast(&history(), &mut rng);
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for (i, p) in points.iter().filter(|p| p.is_forecast).enumerate() {
            assert_eq!(p.date, last + Duration::days(i as i64 + 1));
        }
        assert_eq!(
            points.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
        );
    }

    #[test]
    fn synthetic_points_stay_within_jitter_bounds() {
        let mean = mean_daily(&history()).unwrap();
        assert!((mean - 100.0).abs() < 1e-9);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for p in forecast(&history(), &mut rng).iter().filter(|p| p.is_forecast) {
                assert!(p.total >= mean * 0.95 - 1e-9, "seed {seed}: {}", p.total);
                assert!(p.total <= mean * 1.05 + 1e-9, "seed {seed}: {}", p.total);
            }
        }
    }

    #[test]
    fn same_seed_same_forecast() {
        let a = forecast(&history(), &mut StdRng::seed_from_u64(99));
        let b = forecast(&history(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_forecast_flag_in_camel_case() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = forecast(&[day(2024, 1, 1, 10.0)], &mut rng);
        let json = serde_json::to_value(points[0]).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["isForecast"], false);
    }
}
