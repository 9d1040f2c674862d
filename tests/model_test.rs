//! Integration tests for model artifact loading and validation.

use std::fs;

use outpdf::{Error, LinearModel, Outpdf, SpanDocument, TextSpan};

fn write_artifact(dir: &tempfile::TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_load_valid_artifact_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = LinearModel::baseline().to_artifact();
    let path = write_artifact(&dir, "model.json", &serde_json::to_string(&artifact).unwrap());

    let model = LinearModel::from_path(&path).unwrap();
    let restored = model.to_artifact();
    assert_eq!(restored.schema, artifact.schema);
    assert_eq!(restored.classes, artifact.classes);
    assert_eq!(restored.weights, artifact.weights);
}

#[test]
fn test_missing_artifact_is_io_error() {
    let err = LinearModel::from_path("/does/not/exist.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_truncated_artifact_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(&dir, "truncated.json", "{\"schema\": [\"size_ratio\"");

    let err = LinearModel::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidArtifact(_)));
}

#[test]
fn test_schema_drift_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut artifact = LinearModel::baseline().to_artifact();
    // A feature the inference code does not know about.
    artifact.schema[3] = "line_height".to_string();
    let path = write_artifact(&dir, "drifted.json", &serde_json::to_string(&artifact).unwrap());

    let err = LinearModel::from_path(&path).unwrap_err();
    match err {
        Error::SchemaMismatch { expected, found } => {
            assert!(expected.contains("x_position"));
            assert!(found.contains("line_height"));
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_builder_surfaces_artifact_failure_at_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(&dir, "corrupt.json", "not json at all");

    let result = Outpdf::new().with_model_path(&path).build();
    assert!(matches!(result, Err(Error::InvalidArtifact(_))));
}

#[test]
fn test_builder_extracts_with_loaded_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = LinearModel::baseline().to_artifact();
    let path = write_artifact(&dir, "model.json", &serde_json::to_string(&artifact).unwrap());

    let document = SpanDocument::from_spans(vec![
        TextSpan::new("A Heading Candidate", 30.0, 1, 72.0, 20.0),
        TextSpan::new(
            "A much longer run of ordinary paragraph text that fills the line.",
            11.0,
            1,
            72.0,
            60.0,
        ),
    ]);

    // Loaded artifact and in-process baseline must classify identically.
    let from_disk = Outpdf::new()
        .with_model_path(&path)
        .extract(&document)
        .unwrap();
    let in_process = Outpdf::new().extract(&document).unwrap();

    assert_eq!(
        from_disk.outline().to_json().unwrap(),
        in_process.outline().to_json().unwrap()
    );
}
