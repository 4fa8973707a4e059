use anyhow::Result;
use areasurf_base::ConversionSettings;
use serde_json::{Value as Json, json};
use std::path::Path;

use crate::json::write_json;

pub fn settings_schema() -> Json {
    let defaults = ConversionSettings::default();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "FunctionInputs",
        "type": "object",
        "properties": {
            "surface_tolerance": {
                "title": "Surface Creation Tolerance",
                "description": "Tolerance for determining if curves are coplanar and creating surfaces",
                "type": "number",
                "exclusiveMinimum": 0.0,
                "default": defaults.surface_tolerance
            },
            "preserve_original": {
                "title": "Preserve Original Boundaries",
                "description": "Keep original area boundary curves alongside generated surfaces",
                "type": "boolean",
                "default": defaults.preserve_original
            },
            "merge_holes": {
                "title": "Handle Interior Holes",
                "description": "Process interior boundaries as holes in the main surface",
                "type": "boolean",
                "default": defaults.merge_holes
            },
            "min_area_threshold": {
                "title": "Minimum Area Threshold",
                "description": "Minimum area size to process (in square units)",
                "type": "number",
                "minimum": 0.0,
                "default": defaults.min_area_threshold
            }
        }
    })
}

pub fn write_schema(path: impl AsRef<Path>) -> Result<()> {
    write_json(&settings_schema(), path)
}
