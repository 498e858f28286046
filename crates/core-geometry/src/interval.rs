//! 1-D segment helpers shared by zone derivation and the stirrup planner.
//!
//! Merge and complement operate on plain `(start, end)` pairs so both
//! forbidden zones and lap windows can use them without conversions.
//! Inverted pairs are normalized, empty pairs dropped.

/// Merge raw `(start, end)` pairs into disjoint maximal intervals.
pub fn merge_segments(segments: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut sanitized: Vec<(f64, f64)> = segments
        .iter()
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .filter(|(start, end)| end > start)
        .collect();
    if sanitized.is_empty() {
        return Vec::new();
    }
    sanitized.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sanitized.len());
    let (mut current_start, mut current_end) = sanitized[0];
    for (start, end) in sanitized.into_iter().skip(1) {
        if start <= current_end {
            current_end = current_end.max(end);
            continue;
        }
        merged.push((current_start, current_end));
        (current_start, current_end) = (start, end);
    }
    merged.push((current_start, current_end));
    merged
}

/// Complement of `segments` within `[0, total]`.
pub fn complement_segments(total: f64, segments: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if total <= 0.0 {
        return Vec::new();
    }
    let merged = merge_segments(segments);
    let mut gaps: Vec<(f64, f64)> = Vec::new();
    let mut cursor = 0.0;
    for (start, end) in merged {
        if start > cursor {
            gaps.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < total {
        gaps.push((cursor, total));
    }
    gaps.retain(|(start, end)| end > start);
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_joins_touching_segments() {
        let merged = merge_segments(&[(0.0, 1.0), (1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(merged, vec![(0.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn merge_normalizes_inverted_pairs() {
        let merged = merge_segments(&[(2.0, 1.0), (1.5, 3.0)]);
        assert_eq!(merged, vec![(1.0, 3.0)]);
    }

    #[test]
    fn merge_drops_empty_pairs() {
        let merged = merge_segments(&[(1.0, 1.0), (2.0, 3.0)]);
        assert_eq!(merged, vec![(2.0, 3.0)]);
    }

    #[test]
    fn complement_tiles_the_axis() {
        let gaps = complement_segments(6.0, &[(1.0, 2.0), (4.0, 5.0)]);
        assert_eq!(gaps, vec![(0.0, 1.0), (2.0, 4.0), (5.0, 6.0)]);
    }

    #[test]
    fn complement_of_empty_is_whole_axis() {
        assert_eq!(complement_segments(4.0, &[]), vec![(0.0, 4.0)]);
    }

    #[test]
    fn complement_of_degenerate_axis_is_empty() {
        assert!(complement_segments(0.0, &[(0.0, 1.0)]).is_empty());
    }
}
