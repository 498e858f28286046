//! Beam rebar detailing engine (NSR-10 Título C).
//!
//! `compute_detailing` is the single entry point: a pure, deterministic,
//! single-threaded function from a `DetailingInput` to the canonical
//! `DetailingResults`. Stage order is fixed:
//!
//! 1. Preprocess (bar expansion, covers) and lay out the axis.
//! 2. Select mandatory continuous bars; derive forbidden zones; resolve
//!    development and lap lengths.
//! 3. Plan both faces (continuous segmentation + remainder distribution).
//! 4. Coordinate bottom laps against top laps.
//! 5. Apply segment-specific reinforcement.
//! 6. Clamp covers and account hooks.
//! 7. Stirrup plan, material list, validation, score.
//!
//! Recoverable trouble (infeasible segmentation or splice corridors, stock
//! overruns, code violations) lands in `warnings`; only invalid geometry
//! and an empty reinforcement set are fatal.

pub mod continuity;
pub mod coordinator;
pub mod finisher;
pub mod lengths;
pub mod materials;
pub mod planner;
pub mod preprocess;
pub mod stirrups;
pub mod validate;

use core_geometry::{build_layout, calculate_prohibited_zones, preprocess_depth_m};
use core_model::{DetailingError, DetailingInput, DetailingResults, RebarDetail};
use tracing::info;

pub use continuity::identify_continuous_bars;
pub use coordinator::coordinate_splice_positions;
pub use finisher::apply_cover_and_hook_adjustments;
pub use lengths::{DevInfo, LengthResolver};
pub use materials::generate_material_list;
pub use planner::{PlanContext, apply_segment_reinforcement, detail_bottom_bars, detail_top_bars};
pub use stirrups::build_stirrups_summary;
pub use validate::{optimization_score, validate_nsr10};

/// Numbered progress trail, mirrored into the structured log.
struct StepTrace {
    step: u32,
}

impl StepTrace {
    fn new() -> Self {
        Self { step: 0 }
    }

    fn next(&mut self) -> u32 {
        self.step += 1;
        self.step
    }
}

/// Compute the full detailing result for one beam.
pub fn compute_detailing(input: &DetailingInput) -> Result<DetailingResults, DetailingError> {
    let mut trace = StepTrace::new();
    info!(
        step = trace.next(),
        spans = input.span_geometries.len(),
        supports = input.axis_supports.len(),
        "inicio de cálculo de despiece"
    );

    let (top_face, bottom_face) = preprocess::expand_faces(input)?;
    let covers = preprocess::derive_covers(input);
    info!(
        step = trace.next(),
        top_bars = top_face.total(),
        bottom_bars = bottom_face.total(),
        "datos preprocesados"
    );

    let layout = build_layout(input)?;
    info!(
        step = trace.next(),
        total_length_m = layout.total_length_m,
        "geometría calculada"
    );

    let continuous = identify_continuous_bars(&top_face, &bottom_face);
    info!(
        step = trace.next(),
        top = continuous.top.total_continuous,
        bottom = continuous.bottom.total_continuous,
        "barras continuas identificadas"
    );

    let depth = preprocess_depth_m(&input.span_geometries);
    let zones = calculate_prohibited_zones(&layout, depth);
    info!(step = trace.next(), zonas = zones.len(), "zonas prohibidas calculadas");

    let resolver = LengthResolver::new(
        input.concrete_strength,
        input.reinforcement,
        input.energy_dissipation_class,
    );

    let mut warnings: Vec<String> = Vec::new();
    let ctx = PlanContext {
        layout: &layout,
        zones: &zones,
        resolver: &resolver,
        continuous: &continuous,
        hook_type: input.hook_type,
        max_length_m: input.max_rebar_length_m,
        edge_cover_m: covers.edge_cover_m,
    };

    let mut top_bars = detail_top_bars(&ctx, &top_face, &mut warnings);
    info!(step = trace.next(), barras = top_bars.len(), "detalle barras superiores");

    let mut bottom_bars = detail_bottom_bars(&ctx, &bottom_face, &mut warnings);
    info!(step = trace.next(), barras = bottom_bars.len(), "detalle barras inferiores");

    coordinate_splice_positions(
        &top_bars,
        &mut bottom_bars,
        &zones,
        layout.total_length_m,
        &mut warnings,
    );
    info!(step = trace.next(), "empalmes coordinados");

    if !input.segment_reinforcements.is_empty() {
        apply_segment_reinforcement(
            &input.segment_reinforcements,
            &layout,
            &mut top_bars,
            &mut bottom_bars,
        );
        info!(
            step = trace.next(),
            segmentos = input.segment_reinforcements.len(),
            "refuerzo segmentado aplicado"
        );
    }

    apply_cover_and_hook_adjustments(
        &mut top_bars,
        layout.total_length_m,
        covers.edge_cover_m,
        input.max_rebar_length_m,
        &mut warnings,
    );
    apply_cover_and_hook_adjustments(
        &mut bottom_bars,
        layout.total_length_m,
        covers.edge_cover_m,
        input.max_rebar_length_m,
        &mut warnings,
    );

    let stirrups_summary = build_stirrups_summary(input, &layout, &zones, &top_bars, &bottom_bars);

    let all_bars: Vec<RebarDetail> = top_bars
        .iter()
        .chain(bottom_bars.iter())
        .cloned()
        .collect();
    let material_list = generate_material_list(&all_bars, input.max_rebar_length_m);
    info!(step = trace.next(), items = material_list.len(), "lista de materiales generada");

    warnings.extend(validate_nsr10(
        input.energy_dissipation_class,
        &top_bars,
        &bottom_bars,
        &zones,
    ));
    info!(
        step = trace.next(),
        advertencias = warnings.len(),
        "validaciones completadas"
    );

    let total_weight_kg = material_list.iter().map(|item| item.weight_kg).sum();
    let total_bars_count = (top_bars.len() + bottom_bars.len()) as u32;
    let optimization_score =
        optimization_score(&warnings, &material_list, &top_bars, &bottom_bars);
    let validation_passed = warnings.is_empty();

    let results = DetailingResults {
        top_bars,
        bottom_bars,
        prohibited_zones: zones,
        material_list,
        continuous_bars: continuous,
        warnings,
        validation_passed,
        total_weight_kg,
        total_bars_count,
        optimization_score,
        stirrups_summary,
    };
    info!(
        step = trace.next(),
        peso_total_kg = results.total_weight_kg,
        score = results.optimization_score,
        "cálculo finalizado"
    );
    Ok(results)
}
