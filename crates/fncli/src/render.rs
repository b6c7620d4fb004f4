//! Output renderers.
//!
//! A callable produces an [`Output`]; the renderer selected at
//! registration time turns it into a user-visible [`Outcome`]. The
//! default renderer yields the value's text representation for stdout;
//! the artifact renderer persists produced bytes to the destination
//! supplied through the renderer-owned `--filename` option.

use crate::error::RenderError;
use crate::schema::{OutputKind, DEFAULT_ARTIFACT_PATH};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a callable produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A value to render as text.
    Render(serde_json::Value),
    /// An in-memory artifact (e.g. a generated chart) to persist.
    Artifact(Vec<u8>),
}

impl Output {
    /// Wraps any serializable value as renderable output.
    pub fn render<T: Serialize>(value: T) -> anyhow::Result<Output> {
        Ok(Output::Render(serde_json::to_value(value)?))
    }

    /// Wraps raw bytes as an artifact to persist.
    pub fn artifact(data: impl Into<Vec<u8>>) -> Output {
        Output::Artifact(data.into())
    }
}

/// The user-visible result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to write to stdout, newline-terminated by the caller.
    Rendered(String),
    /// An artifact was persisted to this path.
    Saved(PathBuf),
}

/// Routes a callable's output to the renderer selected at registration.
///
/// `artifact_path` is the renderer-owned destination; it is only
/// consulted for [`OutputKind::ArtifactSave`].
pub(crate) fn render(
    kind: OutputKind,
    output: Output,
    artifact_path: Option<&Path>,
) -> Result<Outcome, RenderError> {
    match (kind, output) {
        (OutputKind::Default, Output::Render(value)) => Ok(Outcome::Rendered(value_to_text(&value))),
        (OutputKind::Default, Output::Artifact(_)) => Err(RenderError::UnexpectedArtifact),
        (OutputKind::ArtifactSave, Output::Artifact(data)) => {
            let path = artifact_path.unwrap_or_else(|| Path::new(DEFAULT_ARTIFACT_PATH));
            write_artifact(path, &data)?;
            Ok(Outcome::Saved(path.to_path_buf()))
        }
        (OutputKind::ArtifactSave, Output::Render(_)) => Err(RenderError::MissingArtifact),
    }
}

/// Text representation of a rendered value. Strings print unquoted;
/// everything else uses its JSON form.
fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_artifact(path: &Path, data: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(RenderError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("parent directory {} does not exist", parent.display()),
                ),
            });
        }
    }
    std::fs::write(path, data).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_renders_number() {
        let outcome = render(OutputKind::Default, Output::Render(json!(120)), None).unwrap();
        assert_eq!(outcome, Outcome::Rendered("120".into()));
    }

    #[test]
    fn test_default_renders_string_unquoted() {
        let outcome = render(OutputKind::Default, Output::Render(json!("hello")), None).unwrap();
        assert_eq!(outcome, Outcome::Rendered("hello".into()));
    }

    #[test]
    fn test_default_rejects_artifact() {
        let err = render(OutputKind::Default, Output::artifact(vec![1u8]), None).unwrap_err();
        assert!(matches!(err, RenderError::UnexpectedArtifact));
    }

    #[test]
    fn test_artifact_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let outcome = render(
            OutputKind::ArtifactSave,
            Output::artifact(b"bytes".to_vec()),
            Some(&path),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Saved(path.clone()));
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");
    }

    #[test]
    fn test_artifact_save_rejects_text_output() {
        let err = render(OutputKind::ArtifactSave, Output::Render(json!(1)), None).unwrap_err();
        assert!(matches!(err, RenderError::MissingArtifact));
    }

    #[test]
    fn test_artifact_save_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = render(
            OutputKind::ArtifactSave,
            Output::artifact(vec![1u8]),
            Some(&path),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn test_output_render_from_serialize() {
        #[derive(serde::Serialize)]
        struct Summary {
            mean: f64,
        }
        let output = Output::render(Summary { mean: 6.0 }).unwrap();
        assert_eq!(output, Output::Render(json!({"mean": 6.0})));
    }
}
