//! Statistics Calculator Module
//! Typed group-by with count/sum/mean reducers and Top-N ranking.

use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Rows grouped under their key, keys ascending.
pub type Groups<'a, K, T> = BTreeMap<K, Vec<&'a T>>;

/// Pure aggregation helpers over grouped rows.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Group rows by `key`. Groups iterate in ascending key order.
    pub fn group_by<'a, T, K, F>(rows: &'a [T], key: F) -> Groups<'a, K, T>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut groups: Groups<'a, K, T> = BTreeMap::new();
        for row in rows {
            groups.entry(key(row)).or_default().push(row);
        }
        groups
    }

    /// Row count per group.
    pub fn count<K: Clone, T>(groups: &Groups<'_, K, T>) -> Vec<(K, usize)> {
        groups
            .iter()
            .map(|(k, rows)| (k.clone(), rows.len()))
            .collect()
    }

    /// Sum of `value` per group.
    pub fn sum<K, T, F>(groups: &Groups<'_, K, T>, value: F) -> Vec<(K, i64)>
    where
        K: Clone,
        F: Fn(&T) -> i64,
    {
        groups
            .iter()
            .map(|(k, rows)| (k.clone(), rows.iter().map(|r| value(r)).sum()))
            .collect()
    }

    /// Mean of `value` per group, skipping non-finite values.
    /// A group with nothing finite averages to NaN.
    pub fn mean<K, T, F>(groups: &Groups<'_, K, T>, value: F) -> Vec<(K, f64)>
    where
        K: Clone,
        F: Fn(&T) -> f64,
    {
        groups
            .iter()
            .map(|(k, rows)| {
                let finite: Vec<f64> = rows
                    .iter()
                    .map(|r| value(r))
                    .filter(|v| v.is_finite())
                    .collect();
                (k.clone(), finite.mean())
            })
            .collect()
    }

    /// Sort by count descending (ties by key ascending) and keep the first `n`.
    pub fn top_n<K: Ord>(mut counts: Vec<(K, usize)>, n: usize) -> Vec<(K, usize)> {
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        key: &'static str,
        n: i64,
        rate: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { key: "b", n: 2, rate: 10.0 },
            Row { key: "a", n: 1, rate: 20.0 },
            Row { key: "b", n: 3, rate: f64::NAN },
            Row { key: "c", n: 4, rate: f64::INFINITY },
            Row { key: "b", n: 5, rate: 30.0 },
        ]
    }

    #[test]
    fn groups_are_key_ordered() {
        let rows = rows();
        let groups = StatsCalculator::group_by(&rows, |r| r.key);
        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn count_and_sum() {
        let rows = rows();
        let groups = StatsCalculator::group_by(&rows, |r| r.key);
        assert_eq!(
            StatsCalculator::count(&groups),
            vec![("a", 1), ("b", 3), ("c", 1)]
        );
        assert_eq!(
            StatsCalculator::sum(&groups, |r| r.n),
            vec![("a", 1), ("b", 10), ("c", 4)]
        );
    }

    #[test]
    fn mean_ignores_non_finite() {
        let rows = rows();
        let groups = StatsCalculator::group_by(&rows, |r| r.key);
        let means = StatsCalculator::mean(&groups, |r| r.rate);

        assert_eq!(means[0], ("a", 20.0));
        assert_eq!(means[1], ("b", 20.0));
        assert_eq!(means[2].0, "c");
        assert!(means[2].1.is_nan());
    }

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let counts = vec![("x", 1), ("y", 5), ("z", 3), ("w", 5)];
        let top = StatsCalculator::top_n(counts, 3);
        assert_eq!(top, vec![("w", 5), ("y", 5), ("z", 3)]);
    }

    #[test]
    fn top_n_with_fewer_keys_than_n() {
        let top = StatsCalculator::top_n(vec![("only", 2)], 10);
        assert_eq!(top.len(), 1);
        assert!(StatsCalculator::top_n(Vec::<(&str, usize)>::new(), 10).is_empty());
    }
}
