// Table reshaping: group-and-sum, weighted averages, pivoting
use std::collections::BTreeMap;

/// Occurrence-weighted mean: `sum(m*w) / sum(w)`. `None` when the weights
/// sum to zero (nothing to average).
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (mut weighted_sum, mut weight_total) = (0.0, 0.0);
    for (metric, weight) in pairs {
        weighted_sum += metric * weight;
        weight_total += weight;
    }
    if weight_total > 0.0 {
        Some(weighted_sum / weight_total)
    } else {
        None
    }
}

/// Group rows by a categorical key and sum a value per group. Keys iterate
/// in their natural order.
pub fn sum_by<T, K>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> f64,
) -> BTreeMap<K, f64>
where
    K: Ord,
{
    let mut totals = BTreeMap::new();
    for item in items {
        *totals.entry(key(&item)).or_insert(0.0) += value(&item);
    }
    totals
}

/// Grouped weighted average over one or more categorical keys (use a tuple
/// key for more than one). Rows with a missing metric are dropped; groups
/// whose weights sum to zero are absent from the result.
pub fn weighted_mean_by<T, K>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    metric: impl Fn(&T) -> Option<f64>,
    weight: impl Fn(&T) -> f64,
) -> BTreeMap<K, f64>
where
    K: Ord,
{
    let mut pairs: BTreeMap<K, Vec<(f64, f64)>> = BTreeMap::new();
    for item in items {
        let Some(m) = metric(&item) else { continue };
        pairs.entry(key(&item)).or_default().push((m, weight(&item)));
    }
    pairs
        .into_iter()
        .filter_map(|(k, group)| weighted_mean(group).map(|mean| (k, mean)))
        .collect()
}

/// A long-form table pivoted into a dense row-by-column matrix, averaging
/// observations that land in the same cell. Rows and columns come out in
/// lexical order; cells with no observation are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (String, String, f64)>,
    {
        let mut sums: BTreeMap<(String, String), (f64, u64)> = BTreeMap::new();
        for (row, column, value) in observations {
            let entry = sums.entry((row, column)).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let rows: Vec<String> = sums
            .keys()
            .map(|(r, _)| r.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<String> = sums
            .keys()
            .map(|(_, c)| c.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| {
                        sums.get(&(r.clone(), c.clone()))
                            .map(|(sum, count)| sum / *count as f64)
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Back to long form: one (row, column, mean) triple per occupied cell.
    pub fn unpivot(&self) -> Vec<(String, String, f64)> {
        let mut out = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            for (j, column) in self.columns.iter().enumerate() {
                if let Some(value) = self.cells[i][j] {
                    out.push((row.clone(), column.clone(), value));
                }
            }
        }
        out
    }

    /// Render every occupied cell with `format`; empty cells become empty
    /// strings.
    pub fn cell_text(&self, format: impl Fn(f64) -> String) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(&format).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean_basic() {
        let result = weighted_mean([(10.0, 1.0), (20.0, 3.0)]).unwrap();
        assert!((result - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_zero_weight_is_none() {
        assert_eq!(weighted_mean([]), None);
        assert_eq!(weighted_mean([(10.0, 0.0)]), None);
    }

    #[test]
    fn test_weighted_mean_permutation_invariant() {
        let forward = weighted_mean([(5.0, 2.0), (9.0, 1.0), (1.0, 4.0)]).unwrap();
        let backward = weighted_mean([(1.0, 4.0), (9.0, 1.0), (5.0, 2.0)]).unwrap();
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_bounded_by_metric_range() {
        let pairs = [(3.0, 1.5), (8.0, 0.5), (5.0, 7.0)];
        let result = weighted_mean(pairs).unwrap();
        assert!(result >= 3.0 && result <= 8.0);
    }

    #[test]
    fn test_sum_by() {
        let rows = [("a", 1.0), ("b", 2.0), ("a", 3.0)];
        let totals = sum_by(rows.iter(), |r| r.0.to_string(), |r| r.1);
        assert_eq!(totals["a"], 4.0);
        assert_eq!(totals["b"], 2.0);
    }

    #[test]
    fn test_weighted_mean_by_compound_key() {
        // (agent, group, metric, weight)
        let rows = [
            ("ada", "support", Some(100.0), 1.0),
            ("ada", "support", Some(200.0), 3.0),
            ("ada", "sales", Some(50.0), 2.0),
            ("ada", "sales", None, 10.0),
        ];
        let means = weighted_mean_by(
            rows.iter(),
            |r| (r.0.to_string(), r.1.to_string()),
            |r| r.2,
            |r| r.3,
        );
        assert!((means[&("ada".into(), "support".into())] - 175.0).abs() < 1e-9);
        // The None row contributes nothing, not even its weight.
        assert!((means[&("ada".into(), "sales".into())] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_means_and_missing_cells() {
        let pivot = Pivot::from_observations([
            ("ada".to_string(), "support".to_string(), 10.0),
            ("ada".to_string(), "support".to_string(), 20.0),
            ("grace".to_string(), "sales".to_string(), 7.0),
        ]);
        assert_eq!(pivot.rows, ["ada", "grace"]);
        assert_eq!(pivot.columns, ["sales", "support"]);
        assert_eq!(pivot.cells[0], [None, Some(15.0)]);
        assert_eq!(pivot.cells[1], [Some(7.0), None]);
    }

    #[test]
    fn test_unpivot_recovers_grouped_means() {
        let observations = [
            ("ada".to_string(), "support".to_string(), 10.0),
            ("ada".to_string(), "support".to_string(), 20.0),
            ("ada".to_string(), "sales".to_string(), 4.0),
            ("grace".to_string(), "sales".to_string(), 7.0),
        ];
        let pivot = Pivot::from_observations(observations.clone());
        let recovered = pivot.unpivot();
        assert_eq!(
            recovered,
            vec![
                ("ada".to_string(), "sales".to_string(), 4.0),
                ("ada".to_string(), "support".to_string(), 15.0),
                ("grace".to_string(), "sales".to_string(), 7.0),
            ]
        );
        // Pivoting the recovered aggregates is a fixed point.
        assert_eq!(Pivot::from_observations(recovered), pivot);
    }

    #[test]
    fn test_cell_text_formats_occupied_cells_only() {
        let pivot = Pivot::from_observations([("a".to_string(), "x".to_string(), 2.0)]);
        let text = pivot.cell_text(|v| format!("{v:.1}"));
        assert_eq!(text, vec![vec!["2.0".to_string()]]);
    }
}
