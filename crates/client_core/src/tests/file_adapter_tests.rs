use super::*;
use crate::model::ParameterPatch;

fn model_with(a1: f64, b1: f64) -> ParameterModel {
    let mut model = ParameterModel::new();
    model.set(ParameterPatch {
        a1: Some(a1),
        b1: Some(b1),
    });
    model
}

fn drop_of(name: &str, content: &str) -> Vec<DroppedFile> {
    vec![DroppedFile::from_bytes(name, content.as_bytes().to_vec())]
}

#[tokio::test]
async fn valid_file_replaces_parameters_and_records_name() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    let applied = adapter
        .drop_files(&mut model, &drop_of("params.txt", r#"{"a1": 5, "b1": 10}"#))
        .await
        .expect("import");

    assert_eq!(applied, Some(ParameterSet::new(5.0, 10.0)));
    assert_eq!(model.get(), Some(ParameterSet::new(5.0, 10.0)));
    assert_eq!(
        model.source(),
        &ParameterSource::File {
            name: "params.txt".into()
        }
    );
}

#[tokio::test]
async fn wrong_extension_is_rejected_without_mutation() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    let err = adapter
        .drop_files(&mut model, &drop_of("x.csv", r#"{"a1": 5, "b1": 10}"#))
        .await
        .expect_err("csv must be rejected");

    assert_eq!(
        err,
        ValidationError::UnsupportedExtension {
            filename: "x.csv".into()
        }
    );
    assert_eq!(model.get(), Some(ParameterSet::new(1.0, 2.0)));
    assert_eq!(model.source(), &ParameterSource::Controls);
}

#[tokio::test]
async fn malformed_json_leaves_model_unchanged() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    let err = adapter
        .drop_files(&mut model, &drop_of("bad.txt", "not json"))
        .await
        .expect_err("not json");

    assert!(matches!(err, ValidationError::MalformedJson { .. }), "got {err:?}");
    assert_eq!(model.get(), Some(ParameterSet::new(1.0, 2.0)));
}

#[tokio::test]
async fn wrong_shape_is_never_partially_applied() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    for content in [
        r#"{"a1": 5}"#,
        r#"{"a1": "5", "b1": 10}"#,
        "42",
        r#"{"a1": null, "b1": 10}"#,
        "[5, 10]",
        "[]",
    ] {
        let err = adapter
            .drop_files(&mut model, &drop_of("shape.txt", content))
            .await
            .expect_err(content);
        assert!(matches!(err, ValidationError::MalformedJson { .. }), "{content}: {err:?}");
        assert_eq!(model.get(), Some(ParameterSet::new(1.0, 2.0)));
    }
}

#[tokio::test]
async fn extension_check_looks_at_the_name_suffix() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    adapter
        .drop_files(&mut model, &drop_of(".txt", r#"{"a1": 3, "b1": 4}"#))
        .await
        .expect("bare .txt name");
    assert_eq!(model.get(), Some(ParameterSet::new(3.0, 4.0)));

    for name in ["txt", "params.txt.bak", "paramstxt"] {
        let err = adapter
            .drop_files(&mut model, &drop_of(name, r#"{"a1": 5, "b1": 6}"#))
            .await
            .expect_err(name);
        assert!(matches!(err, ValidationError::UnsupportedExtension { .. }), "{name}: {err:?}");
    }
    assert_eq!(model.get(), Some(ParameterSet::new(3.0, 4.0)));
}

#[tokio::test]
async fn empty_drop_is_a_no_op() {
    let adapter = FileAdapter::default();
    let mut model = model_with(1.0, 2.0);

    let applied = adapter.drop_files(&mut model, &[]).await.expect("no-op");

    assert_eq!(applied, None);
    assert_eq!(model.get(), Some(ParameterSet::new(1.0, 2.0)));
}

#[tokio::test]
async fn only_first_file_is_considered() {
    let adapter = FileAdapter::default();
    let mut model = ParameterModel::new();
    let mut files = drop_of("first.txt", r#"{"a1": 1.5, "b1": 2.5}"#);
    files.extend(drop_of("second.csv", "ignored"));

    adapter.drop_files(&mut model, &files).await.expect("first wins");

    assert_eq!(model.get(), Some(ParameterSet::new(1.5, 2.5)));
}

#[tokio::test]
async fn uppercase_keys_and_extension_are_accepted() {
    let adapter = FileAdapter::default();
    let imported = adapter
        .load(&drop_of("LEGACY.TXT", "\u{feff}{\"A1\": 7, \"B1\": 8}"))
        .await
        .expect("load")
        .expect("some");

    assert_eq!(imported.filename, "LEGACY.TXT");
    assert_eq!(imported.params, ParameterSet::new(7.0, 8.0));
}

#[tokio::test]
async fn out_of_range_values_follow_policy() {
    let content = r#"{"a1": 75, "b1": 10}"#;

    let err = FileAdapter::new(FileRangePolicy::Reject)
        .load(&drop_of("wide.txt", content))
        .await
        .expect_err("reject policy");
    assert_eq!(
        err,
        ValidationError::OutOfRange {
            field: ParameterField::A1,
            value: 75.0,
            min: 0.0,
            max: 50.0
        }
    );

    let mut model = ParameterModel::new();
    FileAdapter::new(FileRangePolicy::Accept)
        .drop_files(&mut model, &drop_of("wide.txt", content))
        .await
        .expect("accept policy");
    assert_eq!(model.get(), Some(ParameterSet::new(75.0, 10.0)));
}

#[tokio::test]
async fn reads_dropped_path_and_round_trips_saved_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("saved.txt");
    FileAdapter::save(&path, &ParameterSet::new(12.5, 30.0))
        .await
        .expect("save");

    let saved = std::fs::read_to_string(&path).expect("read back");
    assert!(saved.contains("\"a1\""), "canonical casing: {saved}");

    let mut model = ParameterModel::new();
    FileAdapter::default()
        .drop_files(&mut model, &[DroppedFile::from_path(&path)])
        .await
        .expect("import saved file");
    assert_eq!(model.get(), Some(ParameterSet::new(12.5, 30.0)));
    assert_eq!(
        model.source(),
        &ParameterSource::File {
            name: "saved.txt".into()
        }
    );
}

#[tokio::test]
async fn missing_path_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = FileAdapter::default()
        .load(&[DroppedFile::from_path(dir.path().join("gone.txt"))])
        .await
        .expect_err("missing file");

    assert!(matches!(err, ValidationError::Unreadable { .. }), "got {err:?}");
}

#[tokio::test]
async fn non_utf8_content_is_unreadable() {
    let err = FileAdapter::default()
        .load(&[DroppedFile::from_bytes("binary.txt", vec![0xff, 0xfe, 0x00])])
        .await
        .expect_err("binary");

    assert!(matches!(err, ValidationError::Unreadable { .. }), "got {err:?}");
}
