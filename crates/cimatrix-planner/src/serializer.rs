//! Platform-specific rendering of the assembled matrix.

use cimatrix_core::{MatrixJob, OutputShape, Platform, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Serialized matrix plus the names lost to collisions in map output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    /// Names whose earlier job was overwritten by a later one (map shape only).
    pub overwritten: Vec<String>,
}

#[derive(Serialize)]
struct ArrayMatrix<'a> {
    config: &'a [MatrixJob],
}

/// Render `jobs` in the shape `platform` expects.
///
/// For the map shape a later job silently replaces an earlier one with the
/// same name; every such overwrite is logged and reported in
/// [`Rendered::overwritten`].
pub fn render(platform: Platform, jobs: &[MatrixJob]) -> Result<Rendered> {
    match platform.shape() {
        OutputShape::Array => Ok(Rendered {
            body: serde_json::to_string(&ArrayMatrix { config: jobs })?,
            overwritten: Vec::new(),
        }),
        OutputShape::Map => {
            let mut map = Map::new();
            let mut overwritten = Vec::new();
            for job in jobs {
                let value = serde_json::to_value(job)?;
                if map.insert(job.name().to_string(), value).is_some() {
                    warn!(name = %job.name(), "Duplicate job name, earlier job overwritten");
                    overwritten.push(job.name().to_string());
                }
            }
            Ok(Rendered {
                body: serde_json::to_string(&Value::Object(map))?,
                overwritten,
            })
        }
    }
}
