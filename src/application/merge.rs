// Outer join of independently fetched series on their bucket keys
use crate::domain::chart::{ResampledTable, TableRow};
use crate::domain::metric::MetricPoint;
use std::collections::BTreeMap;

/// One row per key present in any series, ascending. Gaps are left absent,
/// never zero-filled.
pub fn merge(series: &BTreeMap<String, Vec<MetricPoint>>) -> ResampledTable {
    let mut rows: BTreeMap<&str, TableRow> = BTreeMap::new();

    for (series_id, points) in series {
        for point in points {
            rows.entry(point.date.as_str())
                .or_insert_with(|| TableRow::new(point.date.clone()))
                .values
                .insert(series_id.clone(), point.value);
        }
    }

    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(dates: &[(&str, f64)]) -> Vec<MetricPoint> {
        dates.iter().map(|(d, v)| MetricPoint::new(*d, *v)).collect()
    }

    #[test]
    fn test_outer_join_on_dates() {
        let mut input = BTreeMap::new();
        input.insert(
            "A".to_string(),
            points(&[("2024-01-01", 1.0), ("2024-01-02", 2.0), ("2024-01-03", 3.0)]),
        );
        input.insert(
            "B".to_string(),
            points(&[("2024-01-02", 20.0), ("2024-01-03", 30.0), ("2024-01-04", 40.0)]),
        );

        let table = merge(&input);
        assert_eq!(table.len(), 4);
        assert_eq!(table[0].date, "2024-01-01");
        assert_eq!(table[0].get("A"), Some(1.0));
        assert!(!table[0].values.contains_key("B"));
        assert_eq!(table[1].get("A"), Some(2.0));
        assert_eq!(table[1].get("B"), Some(20.0));
        assert_eq!(table[3].date, "2024-01-04");
        assert_eq!(table[3].get("B"), Some(40.0));
        assert!(!table[3].values.contains_key("A"));
    }

    #[test]
    fn test_rows_sorted_even_if_inputs_interleave() {
        let mut input = BTreeMap::new();
        input.insert("A".to_string(), points(&[("2024-03", 1.0)]));
        input.insert("B".to_string(), points(&[("2024-01", 1.0), ("2024-05", 1.0)]));
        let dates: Vec<String> = merge(&input).into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec!["2024-01", "2024-03", "2024-05"]);
    }

    #[test]
    fn test_empty_series_contribute_no_rows() {
        let mut input = BTreeMap::new();
        input.insert("A".to_string(), Vec::new());
        assert!(merge(&input).is_empty());
        assert!(merge(&BTreeMap::new()).is_empty());
    }
}
