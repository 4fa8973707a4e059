use std::panic::{AssertUnwindSafe, catch_unwind};

use areasurf_base::{ConversionSettings, Guid};
use areasurf_geometry::{Verdict, validate_boundary};
use areasurf_model::{
    ModelObject, ObjectGraph, ObjectKey, extract_curves, extract_metadata, flatten,
    locate_boundaries,
};
use areasurf_surface::SurfaceBuilder;
use serde_json::Value as Json;
use tracing::{debug, info, warn};

use crate::outcome::{ConversionOutcome, Failure, FailureReason, SurfaceResult};
use crate::summary::RunSummary;

#[derive(Clone, Debug)]
pub struct ConversionRun {
    pub candidates: Vec<ObjectKey>,
    pub outcomes: Vec<ConversionOutcome>,
    pub summary: RunSummary,
}

impl ConversionRun {
    pub fn surfaces(&self) -> impl Iterator<Item = &SurfaceResult> {
        self.outcomes.iter().filter_map(ConversionOutcome::surface)
    }

    pub fn output_objects(&self, graph: &ObjectGraph, settings: &ConversionSettings) -> Vec<Json> {
        let originals = self
            .candidates
            .iter()
            .filter(|_| settings.preserve_original)
            .map(|&key| graph.object_to_json(key));
        originals
            .chain(self.surfaces().map(SurfaceResult::to_json))
            .collect()
    }

    pub fn version_message(&self) -> String {
        format!(
            "Area boundaries converted to surfaces - {} surfaces created",
            self.summary.converted
        )
    }
}

/// A failing candidate never stops the others.
pub fn run_conversion(graph: &ObjectGraph, settings: &ConversionSettings) -> ConversionRun {
    let candidates = locate_boundaries(graph, flatten(graph, graph.roots()));
    info!(
        objects = graph.len(),
        candidates = candidates.len(),
        "located area boundaries"
    );

    let outcomes: Vec<ConversionOutcome> = candidates
        .iter()
        .map(|candidate| convert_isolated(graph, candidate, settings))
        .collect();
    let summary = RunSummary::from_outcomes(&outcomes);

    ConversionRun {
        candidates: candidates.iter().map(|candidate| candidate.key()).collect(),
        outcomes,
        summary,
    }
}

fn convert_isolated(
    graph: &ObjectGraph,
    candidate: &ModelObject,
    settings: &ConversionSettings,
) -> ConversionOutcome {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        convert_candidate(graph, candidate, settings)
    }))
    .unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "conversion panicked".to_string());
        ConversionOutcome::Failure(Failure::new(
            candidate.id(),
            FailureReason::ProcessingError,
            detail,
        ))
    });

    match &outcome {
        ConversionOutcome::Success(result) => debug!(
            source = %result.source_id,
            area = result.area,
            faces = result.mesh.face_count(),
            "converted area boundary"
        ),
        ConversionOutcome::Failure(failure) if failure.reason.is_skip() => debug!(
            source = %failure.source_id,
            detail = %failure.detail,
            "skipped area boundary"
        ),
        ConversionOutcome::Failure(failure) => warn!(
            source = %failure.source_id,
            reason = %failure.reason,
            detail = %failure.detail,
            "area boundary conversion failed"
        ),
    }
    outcome
}

pub fn convert_candidate(
    graph: &ObjectGraph,
    candidate: &ModelObject,
    settings: &ConversionSettings,
) -> ConversionOutcome {
    match try_convert(graph, candidate, settings) {
        Ok(result) => ConversionOutcome::Success(result),
        Err(failure) => ConversionOutcome::Failure(failure),
    }
}

fn try_convert(
    graph: &ObjectGraph,
    candidate: &ModelObject,
    settings: &ConversionSettings,
) -> Result<SurfaceResult, Failure> {
    let source_id = candidate.id();
    let extracted = extract_curves(graph, candidate)
        .ok_or_else(|| Failure::new(source_id, FailureReason::NoCurvesFound, ""))?;
    debug!(
        source = %source_id,
        lookup = %extracted.lookup.label(),
        curves = extracted.curves.len(),
        voids = extracted.void_curves,
        "extracted boundary curves"
    );

    let boundary = match validate_boundary(&extracted.curves, settings) {
        Ok(Verdict::Accepted(boundary)) => boundary,
        Ok(Verdict::BelowMinimumArea { area }) => {
            return Err(Failure::new(
                source_id,
                FailureReason::BelowMinimumArea,
                format!("area {area} < {}", settings.min_area_threshold),
            ));
        }
        Err(error) => {
            let reason = match error {
                areasurf_geometry::Error::NotCoplanar { .. } => FailureReason::NotCoplanar,
                areasurf_geometry::Error::NoClosedLoop { .. }
                | areasurf_geometry::Error::Degenerate(_) => FailureReason::DegenerateGeometry,
            };
            return Err(Failure::new(source_id, reason, error.to_string()));
        }
    };

    let mesh = SurfaceBuilder::planar_mesh(&boundary).map_err(|error| {
        let reason = match error {
            areasurf_surface::Error::Degenerate(_) => FailureReason::DegenerateGeometry,
            areasurf_surface::Error::Triangulation(_) => FailureReason::ProcessingError,
        };
        Failure::new(source_id, reason, error.to_string())
    })?;

    let perimeter = boundary.outer.perimeter()
        + boundary.holes.iter().map(|hole| hole.perimeter()).sum::<f64>();

    Ok(SurfaceResult {
        id: Guid::new(),
        source_id: source_id.to_string(),
        source_type: candidate.speckle_type().to_string(),
        area: mesh.area(),
        perimeter,
        hole_count: boundary.holes.len(),
        metadata: extract_metadata(graph, candidate),
        mesh,
    })
}
