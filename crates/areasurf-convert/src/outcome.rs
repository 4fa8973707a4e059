use areasurf_base::Guid;
use areasurf_model::Metadata;
use areasurf_surface::SurfaceMesh;
use serde::Serialize;
use serde_json::{Map, Value as Json, json};

pub const MESH_TYPE: &str = "Objects.Geometry.Mesh";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NoCurvesFound,
    NotCoplanar,
    DegenerateGeometry,
    BelowMinimumArea,
    ProcessingError,
}

impl FailureReason {
    pub fn is_skip(self) -> bool {
        matches!(self, Self::BelowMinimumArea)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::NoCurvesFound => "no curves found",
            Self::NotCoplanar => "not coplanar",
            Self::DegenerateGeometry => "degenerate geometry",
            Self::BelowMinimumArea => "below minimum area",
            Self::ProcessingError => "processing error",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Failure {
    pub source_id: String,
    pub reason: FailureReason,
    pub detail: String,
}

impl Failure {
    pub fn new(source_id: &str, reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            source_id: source_id.to_string(),
            reason,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}: {}", self.source_id, self.reason)
        } else {
            write!(f, "{}: {} ({})", self.source_id, self.reason, self.detail)
        }
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceResult {
    pub id: Guid,
    pub source_id: String,
    pub source_type: String,
    pub mesh: SurfaceMesh,
    pub metadata: Metadata,
    pub area: f64,
    pub perimeter: f64,
    pub hole_count: usize,
}

impl SurfaceResult {
    pub fn object_id(&self) -> String {
        self.id.to_object_id()
    }

    /// Geometry and identity keys win over metadata of the same name.
    pub fn to_json(&self) -> Json {
        let mut object: Map<String, Json> = self
            .metadata
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let fields = json!({
            "id": self.object_id(),
            "speckle_type": MESH_TYPE,
            "vertices": self.mesh.flat_vertices(),
            "faces": self.mesh.encoded_faces(),
            "converted_from": self.source_type,
            "source_id": self.source_id,
            "surface_area": self.area,
            "surface_perimeter": self.perimeter,
            "hole_count": self.hole_count,
        });
        if let Json::Object(fields) = fields {
            object.extend(fields);
        }
        Json::Object(object)
    }
}

#[derive(Clone, Debug)]
pub enum ConversionOutcome {
    Success(SurfaceResult),
    Failure(Failure),
}

impl ConversionOutcome {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Success(result) => &result.source_id,
            Self::Failure(failure) => &failure.source_id,
        }
    }

    pub fn surface(&self) -> Option<&SurfaceResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
