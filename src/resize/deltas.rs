//! Proportional redistribution with a minimum floor.

/// Remaining amounts below this are treated as fully distributed
const EPSILON: f64 = 1e-9;

/// How much each width shrinks when `amount` is taken from all of them
/// proportionally to their size, never taking a width below `min`.
///
/// Widths that reach the floor drop out and what they could not give is
/// spread again over the rest. Returns non-positive deltas; their sum is
/// `-amount` unless the widths cannot give that much.
pub(crate) fn shrink_proportionally(widths: &[f64], amount: f64, min: f64) -> Vec<f64> {
    let mut deltas = vec![0.0; widths.len()];
    let mut remaining = amount.max(0.0);
    let mut active: Vec<usize> = widths
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > min)
        .map(|(i, _)| i)
        .collect();

    while remaining > EPSILON && !active.is_empty() {
        let current: Vec<f64> = widths.iter().zip(&deltas).map(|(w, d)| w + d).collect();
        let total: f64 = active.iter().filter_map(|&i| current.get(i)).sum();
        if total <= 0.0 {
            break;
        }

        let mut taken = 0.0;
        let mut still_active = Vec::with_capacity(active.len());
        for &i in &active {
            let width = current.get(i).copied().unwrap_or(0.0);
            let share = remaining * width / total;
            let room = width - min;
            let take = if share >= room { room } else { share };
            if share < room {
                still_active.push(i);
            }
            if let Some(d) = deltas.get_mut(i) {
                *d -= take;
            }
            taken += take;
        }

        remaining -= taken;
        if still_active.len() == active.len() {
            break;
        }
        active = still_active;
    }
    deltas
}

/// How much each width grows when `amount` is spread over all of them
/// proportionally to their size (equally if they are all zero)
pub(crate) fn grow_proportionally(widths: &[f64], amount: f64) -> Vec<f64> {
    let total: f64 = widths.iter().sum();
    if widths.is_empty() {
        return Vec::new();
    }
    if total <= 0.0 {
        let each = amount / widths.len() as f64;
        return vec![each; widths.len()];
    }
    widths.iter().map(|w| amount * w / total).collect()
}

/// What a set of widths can give up before each hits `min`
pub(crate) fn shrink_capacity(widths: &[f64], min: f64) -> f64 {
    widths.iter().map(|w| (w - min).max(0.0)).sum()
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

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_shrink_proportional() {
        let deltas = shrink_proportionally(&[100.0, 300.0], 40.0, 10.0);
        assert!(close(deltas[0], -10.0));
        assert!(close(deltas[1], -30.0));
    }

    #[test]
    fn test_shrink_respects_floor_and_respreads() {
        // 20 can only give 10; the rest comes from the wide column
        let deltas = shrink_proportionally(&[20.0, 200.0], 110.0, 10.0);
        assert!(close(deltas[0], -10.0));
        assert!(close(deltas[1], -100.0));
        assert!(close(deltas.iter().sum::<f64>(), -110.0));
    }

    #[test]
    fn test_shrink_beyond_capacity_stops_at_floor() {
        let deltas = shrink_proportionally(&[20.0, 30.0], 100.0, 10.0);
        assert!(close(deltas[0], -10.0));
        assert!(close(deltas[1], -20.0));
    }

    #[test]
    fn test_columns_at_floor_untouched() {
        let deltas = shrink_proportionally(&[10.0, 50.0], 20.0, 10.0);
        assert_eq!(deltas[0], 0.0);
        assert!(close(deltas[1], -20.0));
    }

    #[test]
    fn test_grow() {
        let deltas = grow_proportionally(&[100.0, 300.0], 40.0);
        assert!(close(deltas[0], 10.0));
        assert!(close(deltas[1], 30.0));
        assert_eq!(grow_proportionally(&[0.0, 0.0], 10.0), vec![5.0, 5.0]);
        assert!(grow_proportionally(&[], 10.0).is_empty());
    }

    #[test]
    fn test_capacity() {
        assert_eq!(shrink_capacity(&[20.0, 5.0, 110.0], 10.0), 110.0);
    }
}
