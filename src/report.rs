use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("scan result is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How to read the top level of a scan response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputShape {
    /// Envelope when the keys are only `host`/`ports` and `ports` is an object, else bare.
    #[default]
    Auto,
    /// The whole value is the port mapping.
    Bare,
    /// Always `{"host": {...}, "ports": {...}}`.
    Envelope,
}

/// A scan response: optional host metadata plus the per-port scan result.
///
/// The scan backend wraps results as `{"host": {...}, "ports": {...}}`. A bare
/// port mapping is accepted too, in which case there is no host metadata.
///
/// With [`InputShape::Auto`] a bare result whose only port is literally named
/// `ports` (optionally beside one named `host`) reads as an envelope. Callers
/// that know their input use [`ScanReport::from_value_as`] with an explicit shape.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ScanReport {
    pub host: Vec<(String, String)>,
    pub ports: Value,
}

impl ScanReport {
    pub fn from_value(value: Value) -> Self {
        Self::from_value_as(value, InputShape::Auto)
    }

    pub fn from_value_as(value: Value, shape: InputShape) -> Self {
        let envelope = match (&value, shape) {
            (_, InputShape::Bare) => false,
            (_, InputShape::Envelope) => true,
            (Value::Object(top), InputShape::Auto) => is_envelope(top),
            (_, InputShape::Auto) => false,
        };
        if !envelope {
            return ScanReport { host: Vec::new(), ports: value };
        }
        match value {
            Value::Object(mut top) => {
                let host = match top.remove("host") {
                    Some(Value::Object(info)) => info
                        .into_iter()
                        .map(|(k, v)| (k, value_text(v)))
                        .collect(),
                    _ => Vec::new(),
                };
                let ports = top.remove("ports").unwrap_or(Value::Null);
                ScanReport { host, ports }
            }
            other => ScanReport { host: Vec::new(), ports: other },
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ReportError> {
        Self::from_json_str_as(s, InputShape::Auto)
    }

    pub fn from_json_str_as(s: &str, shape: InputShape) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Self::from_value_as(value, shape))
    }
}

/// Load a scan report from a JSON file.
pub fn load_report_from_path(path: impl AsRef<Path>, shape: InputShape) -> Result<ScanReport> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read scan result: {}", path.as_ref().display()))?;
    ScanReport::from_json_str_as(&content, shape)
        .with_context(|| format!("failed to parse scan result: {}", path.as_ref().display()))
}

fn is_envelope(top: &serde_json::Map<String, Value>) -> bool {
    matches!(top.get("ports"), Some(Value::Object(_)))
        && top.keys().all(|k| k == "ports" || k == "host")
}

fn value_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
