//! Cover clamping and hook accounting.
//!
//! Endpoints are clamped into `[cover, total − cover]`; a hook allowance is
//! added only when the *original* endpoint reached the beam edge. When the
//! hooked total exceeds commercial stock the straight portion shrinks, and
//! if the hooks alone blow the budget the length is capped with a warning.

use core_model::{EPSILON_M, RebarDetail};
use core_tables::{MIN_EDGE_COVER_M, hook_allowance};

/// Adjust every bar of one face in place, reporting stock overruns.
pub fn apply_cover_and_hook_adjustments(
    bars: &mut [RebarDetail],
    total_length: f64,
    edge_cover: f64,
    max_bar_length: f64,
    warnings: &mut Vec<String>,
) {
    if bars.is_empty() {
        return;
    }

    let cover = edge_cover.max(MIN_EDGE_COVER_M);
    let max_end = (total_length - cover).max(cover);
    let max_length = max_bar_length.max(0.0);

    for bar in bars.iter_mut() {
        let original_start = bar.start_m;
        let original_end = bar.end_m;

        let mut start = original_start.clamp(cover, max_end);
        let mut end = original_end.clamp(cover, max_end);
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        bar.start_m = start;
        bar.end_m = end;
        let mut straight_length = (end - start).max(0.0);

        let hook_length = hook_allowance(bar.diameter, bar.hook_type).unwrap_or(0.0);
        let start_hook = if hook_length > 0.0 && original_start <= cover + EPSILON_M {
            hook_length
        } else {
            0.0
        };
        let end_hook = if hook_length > 0.0 && original_end >= total_length - cover - EPSILON_M {
            hook_length
        } else {
            0.0
        };
        let mut total_with_hooks = straight_length + start_hook + end_hook;

        if max_length > 0.0 && total_with_hooks > max_length + EPSILON_M {
            warnings.push(format!(
                "Barra {}: requiere {:.2}m incluyendo ganchos y excede la longitud comercial de {:.2}m",
                bar.id, total_with_hooks, max_length
            ));
            let allowed_straight = (max_length - (start_hook + end_hook)).max(0.0);
            if allowed_straight + EPSILON_M < straight_length {
                bar.end_m = bar.start_m + allowed_straight;
                straight_length = (bar.end_m - bar.start_m).max(0.0);
                total_with_hooks = straight_length + start_hook + end_hook;
            }
            if total_with_hooks > max_length + EPSILON_M {
                total_with_hooks = max_length;
            }
        }

        bar.length_m = total_with_hooks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{BarKind, BarMark, BarPosition, HookType};

    fn bar(id: &str, start_m: f64, end_m: f64) -> RebarDetail {
        RebarDetail {
            id: id.to_string(),
            diameter: BarMark::M6,
            position: BarPosition::Top,
            kind: BarKind::Continuous,
            length_m: end_m - start_m,
            start_m,
            end_m,
            quantity: 1,
            splices: None,
            hook_type: HookType::Deg135,
            development_length_m: Some(0.6),
            notes: None,
        }
    }

    #[test]
    fn endpoints_clamp_into_cover() {
        let mut bars = vec![bar("T6-C01", 0.0, 4.6)];
        let mut warnings = Vec::new();
        apply_cover_and_hook_adjustments(&mut bars, 4.6, 0.05, 12.0, &mut warnings);
        assert_eq!(bars[0].start_m, 0.05);
        assert_eq!(bars[0].end_m, 4.55);
        // Both original endpoints reached the edges: two #6 135° hooks.
        assert!((bars[0].length_m - (4.5 + 2.0 * 0.191)).abs() < 1e-9);
        assert!(warnings.is_empty());
    }

    #[test]
    fn interior_bar_gets_no_hooks() {
        let mut bars = vec![bar("B6-M01", 1.5, 3.5)];
        let mut warnings = Vec::new();
        apply_cover_and_hook_adjustments(&mut bars, 6.0, 0.05, 12.0, &mut warnings);
        assert!((bars[0].length_m - 2.0).abs() < 1e-9);
    }

    #[test]
    fn hook_overflow_shrinks_straight_length() {
        // Nominal straight length equals the stock; hooks overflow it.
        let mut bars = vec![bar("T6-C01", 0.0, 12.0)];
        let mut warnings = Vec::new();
        apply_cover_and_hook_adjustments(&mut bars, 12.0, 0.05, 12.0, &mut warnings);
        let hooks = 2.0 * 0.191;
        // Straight portion shrank to stock minus the hook allowances and the
        // recorded length lands exactly on the stock limit.
        assert!((bars[0].length_m - 12.0).abs() < 1e-9);
        assert!(bars[0].end_m - bars[0].start_m <= 12.0 - hooks + 1e-9);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("excede la longitud comercial"));
    }

    #[test]
    fn impossible_budget_caps_with_warning() {
        let mut bars = vec![bar("T6-C01", 0.0, 0.4)];
        let mut warnings = Vec::new();
        // Stock shorter than the two hooks alone.
        apply_cover_and_hook_adjustments(&mut bars, 0.4, 0.05, 0.3, &mut warnings);
        assert_eq!(bars[0].length_m, 0.3);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("excede la longitud comercial"));
    }
}
