//! Manifest wire format: parsing both shapes and producing the structured one.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persist::{write_atomically, PersistError};
use crate::{FailureKind, FetchError, Manifest};

/// Extension of the files a generated manifest lists.
pub const CONTENT_EXTENSION: &str = ".txt";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestWire {
    Structured {
        files: Vec<String>,
        #[serde(rename = "lastModified")]
        last_modified: serde_json::Number,
    },
    Legacy(Vec<String>),
}

#[derive(Debug, Serialize)]
struct ManifestDocument<'a> {
    files: &'a [String],
    #[serde(rename = "lastModified")]
    last_modified: u64,
}

/// Accepts `{"files": [...], "lastModified": n}` or a bare `[...]` of names.
pub fn parse_manifest(bytes: &[u8]) -> Result<Manifest, FetchError> {
    let wire: ManifestWire = serde_json::from_slice(bytes).map_err(|err| {
        FetchError::new(FailureKind::Parse, format!("unrecognised manifest: {err}"))
    })?;

    Ok(match wire {
        ManifestWire::Structured {
            files,
            last_modified,
        } => Manifest {
            names: files,
            modified_at: timestamp_from(&last_modified),
        },
        ManifestWire::Legacy(names) => Manifest {
            names,
            modified_at: 0,
        },
    })
}

// Producers write milliseconds; fractional or negative values are clamped.
fn timestamp_from(number: &serde_json::Number) -> u64 {
    number.as_u64().unwrap_or_else(|| {
        number
            .as_f64()
            .filter(|value| value.is_finite() && *value > 0.0)
            .map_or(0, |value| value as u64)
    })
}

/// Serialises the structured wire shape with two-space indentation.
pub fn render_manifest(manifest: &Manifest) -> String {
    let document = ManifestDocument {
        files: &manifest.names,
        last_modified: manifest.modified_at,
    };
    // Serialising strings and an integer cannot fail.
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

/// Lists the `.txt` file names directly inside `dir`, sorted.
pub fn scan_content_dir(dir: &Path) -> Result<Vec<String>, PersistError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(CONTENT_EXTENSION) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Scans `content_dir` and writes a structured manifest to `output`.
///
/// The timestamp is `now_ms`, bumped past the timestamp of any manifest
/// already at `output` so consumers always see a strictly newer value.
pub fn generate_manifest(
    content_dir: &Path,
    output: &Path,
    now_ms: u64,
) -> Result<Manifest, PersistError> {
    let names = scan_content_dir(content_dir)?;
    let previous = fs::read(output)
        .ok()
        .and_then(|bytes| parse_manifest(&bytes).ok())
        .map_or(0, |manifest| manifest.modified_at);

    let manifest = Manifest {
        names,
        modified_at: now_ms.max(previous.saturating_add(1)),
    };
    write_atomically(output, &render_manifest(&manifest))?;
    Ok(manifest)
}
