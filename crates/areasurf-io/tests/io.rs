use anyhow::Result;
use areasurf_base::ConversionSettings;
use areasurf_convert::{RunStatus, automate};
use areasurf_io::{FileHost, HostContext, load_graph, write_json, write_schema};
use serde_json::{Value as Json, json};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("areasurf_{stamp}_{file_name}"));
    path
}

fn area_model() -> Json {
    json!([
        {
            "id": "root",
            "speckle_type": "Base",
            "@elements": [{ "referencedId": "area-1", "speckle_type": "reference" }]
        },
        {
            "id": "area-1",
            "speckle_type": "Objects.BuiltElements.Area",
            "name": "Office",
            "level": { "referencedId": "level-1", "speckle_type": "reference" },
            "outline": {
                "speckle_type": "Objects.Geometry.Polyline",
                "value": [0.0, 0.0, 3.0, 5.0, 0.0, 3.0, 5.0, 4.0, 3.0, 0.0, 4.0, 3.0],
                "closed": true
            }
        },
        { "id": "level-1", "speckle_type": "Objects.BuiltElements.Level", "name": "Level 1" }
    ])
}

#[test]
fn load_graph_reads_object_tables() -> Result<()> {
    let path = temp_path("table.json");
    write_json(&area_model(), &path)?;

    let graph = load_graph(&path)?;
    assert_eq!(graph.len(), 3);
    assert!(graph.find("level-1").is_some());

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn file_host_writes_version_and_summary() -> Result<()> {
    let source_path = temp_path("source.json");
    let output_dir = temp_path("out");
    write_json(&area_model(), &source_path)?;

    let context = HostContext {
        project_id: "project".to_string(),
        model_id: "model".to_string(),
        version_id: "v1".to_string(),
        source_path: source_path.clone(),
        output_dir: output_dir.clone(),
        server_url: None,
    };
    let mut host = FileHost::new(context.clone(), Some("token".to_string()));
    let summary = automate(&mut host, &ConversionSettings::default())?;
    assert_eq!(summary.status, RunStatus::Converted);

    let version_id = summary.version_id.clone().unwrap_or_default();
    let version: Json = serde_json::from_str(&fs::read_to_string(context.version_path(&version_id))?)?;
    assert_eq!(version["parent_version_id"], "v1");
    let objects = version["objects"].as_array().cloned().unwrap_or_default();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1]["level"]["name"], "Level 1");
    assert_eq!(objects[1]["surface_area"], 20.0);

    let report: Json = serde_json::from_str(&fs::read_to_string(context.summary_path())?)?;
    assert_eq!(report["summary"]["converted"], 1);
    assert_eq!(report["summary"]["status"], "converted");
    assert_eq!(report["object_results"][0]["level"], "info");
    assert_eq!(report["object_results"][0]["category"], "Surface Conversion");
    assert_eq!(report["object_results"][0]["object_ids"][0], objects[1]["id"]);

    let _ = fs::remove_file(&source_path);
    let _ = fs::remove_dir_all(&output_dir);
    Ok(())
}

#[test]
fn missing_source_is_a_host_error() {
    let context = HostContext {
        project_id: "project".to_string(),
        model_id: "model".to_string(),
        version_id: "v1".to_string(),
        source_path: temp_path("does-not-exist.json"),
        output_dir: temp_path("unused"),
        server_url: None,
    };
    let mut host = FileHost::new(context, None);
    assert!(automate(&mut host, &ConversionSettings::default()).is_err());
}

#[test]
fn write_schema_creates_file() -> Result<()> {
    let path = temp_path("schema/inputs.schema.json");
    write_schema(&path)?;

    let metadata = fs::metadata(&path)?;
    assert!(metadata.len() > 0);

    if let Some(parent) = path.parent() {
        let _ = fs::remove_dir_all(parent);
    }
    Ok(())
}
