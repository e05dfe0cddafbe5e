//! Tests for the build driver.

use std::fs;

use strata_build::{BuildError, Builder};
use tempfile::TempDir;

const MODELS: &str = r#"
    #[derive(Model)]
    pub struct Todo {
        #[primary_key]
        pub id: i64,
        pub title: String,
    }
"#;

fn write_source(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn generate_writes_the_models_file() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "models.rs", MODELS);
    let out = dir.path().join("out");

    let path = Builder::new()
        .source(&source)
        .out_dir(&out)
        .cargo_instructions(false)
        .generate()
        .unwrap();

    assert_eq!(path, out.join("strata_models.rs"));
    let code = fs::read_to_string(&path).unwrap();
    assert!(code.starts_with("// @generated by strata-build"));
    assert!(code.contains("TodoSchema"));
    assert!(code.contains("title_eq"));
    syn::parse_file(&code).unwrap();
}

#[test]
fn custom_file_name() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "models.rs", MODELS);
    let path = Builder::new()
        .source(&source)
        .out_dir(dir.path())
        .file_name("todo_api.rs")
        .cargo_instructions(false)
        .generate()
        .unwrap();
    assert!(path.ends_with("todo_api.rs"));
    assert!(path.exists());
}

#[test]
fn models_across_files_are_linked() {
    let dir = TempDir::new().unwrap();
    let author = write_source(
        &dir,
        "author.rs",
        "#[derive(Model)] pub struct Author { #[primary_key] pub id: i64 }",
    );
    let book = write_source(
        &dir,
        "book.rs",
        "#[derive(Model)] pub struct Book { #[primary_key] pub id: i64, pub author: Author }",
    );
    let code = Builder::new()
        .sources([author, book])
        .cargo_instructions(false)
        .render()
        .unwrap();
    assert!(code.contains("LEFT OUTER JOIN `Author`"));
}

#[test]
fn model_errors_are_reported_together() {
    let dir = TempDir::new().unwrap();
    let source = write_source(
        &dir,
        "models.rs",
        "#[derive(Model)] struct A { id: Uuid }\n#[derive(Model)] struct B { at: Instant }\n",
    );
    let err = Builder::new()
        .source(&source)
        .out_dir(dir.path())
        .cargo_instructions(false)
        .generate()
        .unwrap_err();
    match err {
        BuildError::Processing(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected processing errors, got {other:?}"),
    }
    assert!(!dir.path().join("strata_models.rs").exists());
}

#[test]
fn missing_source_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Builder::new()
        .source(dir.path().join("nope.rs"))
        .out_dir(dir.path())
        .cargo_instructions(false)
        .generate()
        .unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
}

#[test]
fn no_sources() {
    let err = Builder::new().render().unwrap_err();
    assert!(matches!(err, BuildError::NoSources));
}
