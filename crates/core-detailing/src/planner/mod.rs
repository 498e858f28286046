//! Bar layout planning: one detailed bar list per face.
//!
//! Continuous instances get a splice plan and are split into commercial
//! segments; the remainder becomes support bars (top) or anchored and
//! mid-span bars (bottom, honoring the one-third-into-support rule).
//! Segment-specific reinforcement is applied after both faces are planned.

pub mod distribute;
pub mod segmentation;
pub mod splices;

use crate::lengths::LengthResolver;
use crate::preprocess::FaceBars;
use core_geometry::CoordinateLayout;
use core_model::{
    BarKind, BarPosition, ContinuousBars, HookType, ProhibitedZone, RebarDetail,
    SegmentReinforcement,
};
use core_tables::{DEFAULT_DEVELOPMENT_M, base_development_length, hook_allowance};
use distribute::{
    create_mid_span_bars, create_segment_bars, distribute_anchored_bars, distribute_support_bars,
};
use segmentation::{SplitParams, SplitStrategy, split_bar_by_max_length};
use splices::{build_bottom_splice_plan, calculate_splices};
use tracing::debug;

/// Per-instance splice offset ratios for bottom continuous bars.
const BOTTOM_OFFSET_RATIOS: [f64; 3] = [0.08, 0.16, 0.24];

const CONTINUOUS_NOTE: &str = "Barra continua - NSR-10 C.21.5.2.1";

/// Shared planning context for one `compute_detailing` call.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub layout: &'a CoordinateLayout,
    pub zones: &'a [ProhibitedZone],
    pub resolver: &'a LengthResolver,
    pub continuous: &'a ContinuousBars,
    pub hook_type: HookType,
    pub max_length_m: f64,
    pub edge_cover_m: f64,
}

impl PlanContext<'_> {
    fn split_params(&self, splice_length_m: f64, hook_length_m: f64) -> SplitParams {
        SplitParams {
            max_length_m: self.max_length_m,
            splice_length_m,
            hook_length_m,
            edge_cover_m: self.edge_cover_m,
            beam_length_m: self.layout.total_length_m,
        }
    }
}

pub fn detail_top_bars(
    ctx: &PlanContext<'_>,
    face: &FaceBars,
    warnings: &mut Vec<String>,
) -> Vec<RebarDetail> {
    let mut bars = Vec::new();
    let total_length = ctx.layout.total_length_m;

    for (&mark, &total_count) in &face.counts {
        let dev = ctx.resolver.resolve(mark);
        let continuous_count = ctx
            .continuous
            .top
            .count_per_diameter
            .get(&mark)
            .copied()
            .unwrap_or(0);
        let hook_length = hook_allowance(mark, ctx.hook_type).unwrap_or(0.0);

        for instance in 0..continuous_count {
            let bar = RebarDetail {
                id: format!("T{}-C{:02}", mark.id_fragment(), instance + 1),
                diameter: mark,
                position: BarPosition::Top,
                kind: BarKind::Continuous,
                length_m: total_length,
                start_m: 0.0,
                end_m: total_length,
                quantity: 1,
                splices: calculate_splices(
                    total_length,
                    ctx.max_length_m,
                    ctx.zones,
                    dev.splice_m,
                ),
                hook_type: ctx.hook_type,
                development_length_m: Some(dev.development_m),
                notes: Some(CONTINUOUS_NOTE.to_string()),
            };
            bars.extend(split_bar_by_max_length(
                bar,
                SplitStrategy::Top,
                &ctx.split_params(dev.splice_m, hook_length),
                ctx.zones,
                warnings,
            ));
        }

        let remaining = total_count - continuous_count;
        if remaining > 0 {
            bars.extend(distribute_support_bars(
                mark,
                remaining,
                ctx.layout,
                BarPosition::Top,
                ctx.hook_type,
                dev.development_m,
            ));
        }
    }

    debug!(bars = bars.len(), "top face planned");
    bars
}

pub fn detail_bottom_bars(
    ctx: &PlanContext<'_>,
    face: &FaceBars,
    warnings: &mut Vec<String>,
) -> Vec<RebarDetail> {
    let mut bars = Vec::new();
    let total_length = ctx.layout.total_length_m;

    for (&mark, &total_count) in &face.counts {
        let dev = ctx.resolver.resolve(mark);
        let continuous_count = ctx
            .continuous
            .bottom
            .count_per_diameter
            .get(&mark)
            .copied()
            .unwrap_or(0);
        let hook_length = hook_allowance(mark, ctx.hook_type).unwrap_or(0.0);

        for instance in 0..continuous_count {
            let offset_ratio =
                BOTTOM_OFFSET_RATIOS[instance as usize % BOTTOM_OFFSET_RATIOS.len()];
            let bar = RebarDetail {
                id: format!("B{}-C{:02}", mark.id_fragment(), instance + 1),
                diameter: mark,
                position: BarPosition::Bottom,
                kind: BarKind::Continuous,
                length_m: total_length,
                start_m: 0.0,
                end_m: total_length,
                quantity: 1,
                splices: build_bottom_splice_plan(
                    total_length,
                    dev.splice_m,
                    ctx.zones,
                    ctx.max_length_m,
                    instance as usize,
                ),
                hook_type: ctx.hook_type,
                development_length_m: Some(dev.development_m),
                notes: Some(CONTINUOUS_NOTE.to_string()),
            };
            bars.extend(split_bar_by_max_length(
                bar,
                SplitStrategy::Bottom { offset_ratio },
                &ctx.split_params(dev.splice_m, hook_length),
                ctx.zones,
                warnings,
            ));
        }

        let remaining = total_count - continuous_count;
        if remaining > 0 {
            // At least one third of the positive reinforcement must enter
            // the supports (NSR-10); anchored bars make up the shortfall.
            let min_into_support = total_count.div_ceil(3).max(1);
            let support_count = min_into_support
                .saturating_sub(continuous_count)
                .min(remaining);
            let mut mid_span_counter = 0;

            if support_count > 0 {
                bars.extend(distribute_anchored_bars(
                    mark,
                    support_count,
                    ctx.layout,
                    BarPosition::Bottom,
                    ctx.hook_type,
                    dev.development_m,
                    &mut mid_span_counter,
                ));
            }
            let span_count = remaining - support_count;
            if span_count > 0 {
                bars.extend(create_mid_span_bars(
                    mark,
                    span_count,
                    ctx.layout,
                    BarPosition::Bottom,
                    ctx.hook_type,
                    dev.development_m,
                    &mut mid_span_counter,
                ));
            }
        }
    }

    debug!(bars = bars.len(), "bottom face planned");
    bars
}

/// Append segment-specific reinforcement to the planned faces.
pub fn apply_segment_reinforcement(
    segments: &[SegmentReinforcement],
    layout: &CoordinateLayout,
    top_bars: &mut Vec<RebarDetail>,
    bottom_bars: &mut Vec<RebarDetail>,
) {
    for segment in segments {
        for &span_index in &segment.span_indexes {
            if let Some(group) = segment.top_rebar {
                top_bars.extend(create_segment_bars(
                    group.diameter,
                    group.quantity,
                    span_index,
                    layout,
                    BarPosition::Top,
                    base_development_length(group.diameter).unwrap_or(DEFAULT_DEVELOPMENT_M),
                ));
            }
            if let Some(group) = segment.bottom_rebar {
                bottom_bars.extend(create_segment_bars(
                    group.diameter,
                    group.quantity,
                    span_index,
                    layout,
                    BarPosition::Bottom,
                    base_development_length(group.diameter).unwrap_or(DEFAULT_DEVELOPMENT_M),
                ));
            }
        }
    }
}
