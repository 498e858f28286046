//! Vector drawing assembly for beam detailing results.
//!
//! Consumes the normalized drawing payload and a named template; produces
//! an ordered, layered `DrawingDocument` of primitive entities in a
//! single millimeter coordinate space. Pure and single-threaded; the only
//! shared state is the memoized template manifest and section template in
//! `core-templates` (load-once, read-many).

pub mod beam;
pub mod context;
pub mod dimensions;
pub mod document;
pub mod geometry;
pub mod payload;
pub mod rebar;
pub mod schema;
pub mod service;
pub mod title_block;

pub use context::RenderContext;
pub use document::{
    DimensionEntity, DrawingDocument, DrawingEntity, HatchEntity, LineEntity, Metadata, Point,
    PolylineEntity, TextEntity,
};
pub use payload::build_payload;
pub use schema::{
    BeamDrawingMetadata, BeamDrawingPayload, DrawingAxisMarker, DrawingGeometry,
    DrawingRebarGroup, DrawingRebarLayout, DrawingRenderRequest, DrawingSpan, DrawingSupport,
};
pub use service::{BeamDrawingService, render_document};
