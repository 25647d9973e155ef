// Temporal resampling of daily series into coarser buckets
use crate::domain::metric::{AggregationPolicy, MetricPoint, Resolution};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Bucket key for a calendar day. Keys of one resolution sort lexicographically
/// in date order.
pub fn bucket_key(date: NaiveDate, resolution: Resolution) -> String {
    match resolution {
        Resolution::D => date.format(DATE_FORMAT).to_string(),
        Resolution::W => {
            let offset = date.weekday().num_days_from_sunday() as i64;
            (date - Duration::days(offset)).format(DATE_FORMAT).to_string()
        }
        Resolution::M => format!("{:04}-{:02}", date.year(), date.month()),
        Resolution::Q => format!("{:04}-Q{}", date.year(), date.month0() / 3 + 1),
        Resolution::Y => format!("{:04}", date.year()),
    }
}

pub fn resample(
    points: &[MetricPoint],
    resolution: Resolution,
    policy: AggregationPolicy,
) -> Vec<MetricPoint> {
    if resolution == Resolution::D {
        return points.to_vec();
    }

    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for point in points {
        let date = match NaiveDate::parse_from_str(&point.date, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Skipping point with unparseable date {:?}: {}", point.date, e);
                continue;
            }
        };

        let key = bucket_key(date, resolution);
        buckets
            .entry(key)
            .and_modify(|acc| match policy {
                AggregationPolicy::Sum => *acc += point.value,
                AggregationPolicy::Max => *acc = acc.max(point.value),
            })
            .or_insert(point.value);
    }

    buckets
        .into_iter()
        .map(|(date, value)| MetricPoint { date, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(start: &str, values: &[f64]) -> Vec<MetricPoint> {
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                MetricPoint::new(
                    (start + Duration::days(i as i64)).format(DATE_FORMAT).to_string(),
                    *v,
                )
            })
            .collect()
    }

    #[test]
    fn test_weekly_sum_of_full_week() {
        // 2024-01-07 is a Sunday
        let series = daily("2024-01-07", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let out = resample(&series, Resolution::W, AggregationPolicy::infer("txCount"));
        assert_eq!(out, vec![MetricPoint::new("2024-01-07", 28.0)]);
    }

    #[test]
    fn test_weekly_max_for_cumulative_metric() {
        let series = daily("2024-01-07", &[100.0, 100.0, 150.0, 150.0, 200.0]);
        let out = resample(
            &series,
            Resolution::W,
            AggregationPolicy::infer("cumulativeAddresses"),
        );
        assert_eq!(out, vec![MetricPoint::new("2024-01-07", 200.0)]);
    }

    #[test]
    fn test_daily_is_identity() {
        let series = vec![
            MetricPoint::new("2024-03-02", 5.0),
            MetricPoint::new("2024-03-01", 1.0),
            MetricPoint::new("not-a-date", 2.0),
        ];
        assert_eq!(resample(&series, Resolution::D, AggregationPolicy::Sum), series);
    }

    #[test]
    fn test_week_starts_on_sunday() {
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert_eq!(bucket_key(saturday, Resolution::W), "2024-01-07");
        assert_eq!(bucket_key(sunday, Resolution::W), "2024-01-14");
        // week crossing a year boundary keys on the December Sunday
        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(bucket_key(new_year, Resolution::W), "2024-12-29");
    }

    #[test]
    fn test_bucket_keys_for_coarse_resolutions() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(bucket_key(date, Resolution::M), "2024-08");
        assert_eq!(bucket_key(date, Resolution::Q), "2024-Q3");
        assert_eq!(bucket_key(date, Resolution::Y), "2024");
        let march = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(bucket_key(march, Resolution::Q), "2024-Q1");
        let october = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(bucket_key(october, Resolution::Q), "2024-Q4");
    }

    #[test]
    fn test_output_ascending_for_every_resolution() {
        let series = daily("2023-11-20", &[1.0; 200]);
        for resolution in [
            Resolution::D,
            Resolution::W,
            Resolution::M,
            Resolution::Q,
            Resolution::Y,
        ] {
            let out = resample(&series, resolution, AggregationPolicy::Sum);
            assert!(
                out.windows(2).all(|pair| pair[0].date <= pair[1].date),
                "{resolution:?} output not ascending"
            );
            let total: f64 = out.iter().map(|p| p.value).sum();
            assert_eq!(total, 200.0);
        }
    }

    #[test]
    fn test_monthly_and_yearly_grouping() {
        let series = vec![
            MetricPoint::new("2023-12-31", 4.0),
            MetricPoint::new("2024-01-01", 10.0),
            MetricPoint::new("2024-01-31", 20.0),
            MetricPoint::new("2024-02-01", 5.0),
        ];
        let monthly = resample(&series, Resolution::M, AggregationPolicy::Sum);
        assert_eq!(
            monthly,
            vec![
                MetricPoint::new("2023-12", 4.0),
                MetricPoint::new("2024-01", 30.0),
                MetricPoint::new("2024-02", 5.0),
            ]
        );
        let yearly = resample(&series, Resolution::Y, AggregationPolicy::Max);
        assert_eq!(
            yearly,
            vec![MetricPoint::new("2023", 4.0), MetricPoint::new("2024", 20.0)]
        );
    }

    #[test]
    fn test_single_point_passes_through() {
        let series = vec![MetricPoint::new("2024-05-05", 42.0)];
        let out = resample(&series, Resolution::Q, AggregationPolicy::Sum);
        assert_eq!(out, vec![MetricPoint::new("2024-Q2", 42.0)]);
    }

    #[test]
    fn test_empty_and_unparseable_input() {
        assert!(resample(&[], Resolution::W, AggregationPolicy::Sum).is_empty());
        let series = vec![
            MetricPoint::new("garbage", 1.0),
            MetricPoint::new("2024-05-05", 2.0),
        ];
        let out = resample(&series, Resolution::Y, AggregationPolicy::Sum);
        assert_eq!(out, vec![MetricPoint::new("2024", 2.0)]);
    }
}
