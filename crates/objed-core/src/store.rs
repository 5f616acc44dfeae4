// Reading and writing documents, plus form-data input formats.
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::rebuild::FlatMapping;

/// Extensions the editor opens.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "yml", "yaml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    /// Format of a file the editor can open; errors for anything else.
    pub fn from_path(path: &Path) -> Result<Self> {
        match extension(path).as_deref() {
            Some("json") => Ok(DocFormat::Json),
            Some("yml" | "yaml") => Ok(DocFormat::Yaml),
            _ => Err(Error::UnsupportedExtension(path.to_path_buf())),
        }
    }

    /// Format to write a save target in: YAML for `yml`/`yaml`, JSON otherwise.
    pub fn for_target(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("yml" | "yaml") => DocFormat::Yaml,
            _ => DocFormat::Json,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocFormat::Json => "JSON",
            DocFormat::Yaml => "YAML",
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

pub fn is_supported(path: &Path) -> bool {
    DocFormat::from_path(path).is_ok()
}

/// Load a JSON or YAML document. Both go through the YAML parser, which also
/// accepts JSON text.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str::<Value>(text)?)
}

/// Serialize a document: YAML, or JSON pretty-printed with 4-space indent.
pub fn to_text(doc: &Value, format: DocFormat) -> Result<String> {
    match format {
        DocFormat::Yaml => Ok(serde_yaml::to_string(doc)?),
        DocFormat::Json => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            doc.serialize(&mut ser)?;
            Ok(String::from_utf8(buf).map_err(std::io::Error::other)?)
        }
    }
}

pub fn write_document(path: &Path, doc: &Value, format: DocFormat) -> Result<()> {
    let text = to_text(doc, format)?;
    fs::write(path, text)?;
    debug!(path = %path.display(), format = format.label(), "document written");
    Ok(())
}

/// Parse flat form data from text.
///
/// A leading `{` means a JSON object whose values are strings (numbers,
/// booleans and null are accepted and rendered back to text). Anything else is
/// read as `key=value` lines; blank lines and lines starting with `#` are
/// skipped, and a line without `=` is an error.
pub fn parse_form(text: &str) -> Result<FlatMapping> {
    match text.trim_start().chars().next() {
        Some('{') => parse_form_json(text),
        _ => parse_form_lines(text),
    }
}

fn parse_form_json(text: &str) -> Result<FlatMapping> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(Error::InvalidForm("expected a JSON object".into()));
    };
    let mut out = Vec::with_capacity(map.len());
    for (k, v) in map {
        let raw = match v {
            Value::String(s) => s,
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidForm(format!("field {k:?} is not a scalar")));
            }
            scalar => crate::flatten::render_scalar(&scalar),
        };
        out.push((k, raw));
    }
    Ok(out)
}

fn parse_form_lines(text: &str) -> Result<FlatMapping> {
    let mut out = Vec::new();
    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (k, v) = line
            .split_once('=')
            .ok_or_else(|| Error::InvalidForm(format!("line {}: missing '='", n + 1)))?;
        out.push((k.to_string(), v.to_string()));
    }
    Ok(out)
}

pub fn read_form(path: &Path) -> Result<FlatMapping> {
    parse_form(&fs::read_to_string(path)?)
}

/// Render flat form data as `key=value` lines.
pub fn form_to_lines(form: &FlatMapping) -> String {
    let mut out = String::new();
    for (k, v) in form {
        out.push_str(k);
        out.push('=');
        out.push_str(v);
        out.push('\n');
    }
    out
}

/// Render flat form data as a JSON object of strings.
pub fn form_to_json(form: &FlatMapping) -> Value {
    Value::Object(
        form.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
