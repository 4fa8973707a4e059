use anyhow::{Context, Result};
use areasurf_base::ConversionSettings;
use areasurf_model::ObjectGraph;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read JSON file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON file {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let text = serde_json::to_string_pretty(value).context("serialize JSON")?;
    std::fs::write(path, text).with_context(|| format!("write JSON file {}", path.display()))?;
    Ok(())
}

pub fn load_graph(path: impl AsRef<Path>) -> Result<ObjectGraph> {
    let path = path.as_ref();
    let json: serde_json::Value = read_json(path)?;
    ObjectGraph::from_json(&json).with_context(|| format!("build object graph from {}", path.display()))
}

/// Reads function inputs from inline JSON (when `source` starts with `{`) or from a file.
pub fn load_settings(source: &str) -> Result<ConversionSettings> {
    let trimmed = source.trim();
    let settings: ConversionSettings = if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).context("parse inline function inputs")?
    } else {
        read_json(trimmed)?
    };
    settings.validate().context("invalid function inputs")?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_settings_fill_defaults() -> Result<()> {
        let settings = load_settings(r#" { "preserve_original": false } "#)?;
        assert!(!settings.preserve_original);
        assert_eq!(settings, ConversionSettings {
            preserve_original: false,
            ..ConversionSettings::default()
        });
        Ok(())
    }

    #[test]
    fn inline_settings_are_validated() {
        assert!(load_settings(r#"{ "surface_tolerance": 0 }"#).is_err());
        assert!(load_settings(r#"{ "merge_holes": "yes" }"#).is_err());
    }
}
