use serde::{Deserialize, Serialize};

use super::deltas::{grow_proportionally, shrink_capacity, shrink_proportionally};

/// Whether a column resize may change the table's width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeBehaviour {
    /// The table keeps its width; the other columns give or take the delta
    #[default]
    PreserveTable,
    /// The pivot column takes the delta and the table grows or shrinks with it
    ResizeTable,
}

impl ResizeBehaviour {
    pub fn resizes_table(self) -> bool {
        self == ResizeBehaviour::ResizeTable
    }

    /// Per-column deltas for moving `pivot` by `delta` (all in one unit).
    ///
    /// No column ends up below `min`: the delta is clamped to what the
    /// columns involved can give. An out-of-range pivot yields all zeros.
    pub fn column_deltas(self, widths: &[f64], pivot: usize, delta: f64, min: f64) -> Vec<f64> {
        let mut deltas = vec![0.0; widths.len()];
        let Some(&pivot_width) = widths.get(pivot) else {
            return deltas;
        };

        match self {
            ResizeBehaviour::ResizeTable => {
                // A column already under the floor may not shrink further
                let applied = delta.max((min - pivot_width).min(0.0));
                if let Some(d) = deltas.get_mut(pivot) {
                    *d = applied;
                }
            }
            ResizeBehaviour::PreserveTable => {
                if widths.len() < 2 {
                    return deltas;
                }
                let others: Vec<f64> = widths
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != pivot)
                    .map(|(_, &w)| w)
                    .collect();

                let (applied, spread) = if delta > 0.0 {
                    let applied = delta.min(shrink_capacity(&others, min));
                    (applied, shrink_proportionally(&others, applied, min))
                } else {
                    let applied = delta.max(-(pivot_width - min).max(0.0));
                    (applied, grow_proportionally(&others, -applied))
                };

                let mut spread = spread.into_iter();
                for (i, d) in deltas.iter_mut().enumerate() {
                    *d = if i == pivot {
                        applied
                    } else {
                        spread.next().unwrap_or(0.0)
                    };
                }
            }
        }
        deltas
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test_case(ResizeBehaviour::ResizeTable, 1, 50.0, &[0.0, 50.0, 0.0]; "resize grows pivot")]
    #[test_case(ResizeBehaviour::ResizeTable, 0, -200.0, &[-90.0, 0.0, 0.0]; "resize clamps at floor")]
    #[test_case(ResizeBehaviour::PreserveTable, 2, 30.0, &[-15.0, -15.0, 30.0]; "preserve shrinks others")]
    #[test_case(ResizeBehaviour::PreserveTable, 1, -30.0, &[10.0, -30.0, 20.0]; "preserve grows others")]
    #[test_case(ResizeBehaviour::PreserveTable, 1, -500.0, &[30.0, -90.0, 60.0]; "preserve clamps pivot")]
    #[test_case(ResizeBehaviour::PreserveTable, 0, 1000.0, &[280.0, -90.0, -190.0]; "preserve clamps to capacity")]
    #[test_case(ResizeBehaviour::PreserveTable, 7, 10.0, &[0.0, 0.0, 0.0]; "pivot out of range")]
    fn test_column_deltas(behaviour: ResizeBehaviour, pivot: usize, delta: f64, expected: &[f64]) {
        let widths = [100.0, 100.0, 200.0];
        let deltas = behaviour.column_deltas(&widths, pivot, delta, 10.0);
        assert!(close(&deltas, expected), "{deltas:?} != {expected:?}");
    }

    #[test]
    fn test_preserve_single_column_is_noop() {
        let deltas = ResizeBehaviour::PreserveTable.column_deltas(&[300.0], 0, 50.0, 10.0);
        assert_eq!(deltas, vec![0.0]);
    }

    #[test]
    fn test_preserve_keeps_sum() {
        let widths = [37.5, 12.0, 80.25, 61.0];
        for pivot in 0..widths.len() {
            for delta in [-100.0, -13.0, 7.5, 44.0, 300.0] {
                let deltas =
                    ResizeBehaviour::PreserveTable.column_deltas(&widths, pivot, delta, 10.0);
                assert!(deltas.iter().sum::<f64>().abs() < 1e-6);
                assert!(widths
                    .iter()
                    .zip(&deltas)
                    .all(|(w, d)| w + d >= 10.0 - 1e-6 || *d == 0.0));
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let parsed: ResizeBehaviour = serde_json::from_str("\"resizetable\"").unwrap();
        assert_eq!(parsed, ResizeBehaviour::ResizeTable);
        assert_eq!(ResizeBehaviour::default(), ResizeBehaviour::PreserveTable);
    }
}
