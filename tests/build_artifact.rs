//! Build tests: the output directory, the artifact, and its shape.

mod common;

use sha2::{Digest, Sha256};
use vitrina::assets::{AssetResolver, FsOutputDir, OutputDir};
use vitrina::render::ARTIFACT_PATH;
use vitrina::BuildMode;

struct Built {
    _tmp: tempfile::TempDir,
    out: FsOutputDir,
    html: String,
}

fn build(mode: BuildMode) -> Built {
    let tmp = tempfile::tempdir().unwrap();
    let assets = tmp.path().join("public");
    std::fs::create_dir(&assets).unwrap();
    common::write_source_assets(&assets);

    let model = vitrina::data::arturo_soto().unwrap();
    let out = FsOutputDir::create(tmp.path().join("dist")).unwrap();
    let html = vitrina::build_site(&model, &AssetResolver::new(&assets), &out, mode).unwrap();
    Built { _tmp: tmp, out, html }
}

#[test]
fn build_creates_output_directory_and_artifact() {
    let built = build(BuildMode::Production);
    assert!(built.out.root().is_dir());
    assert!(built.out.exists(ARTIFACT_PATH));
}

#[test]
fn build_copies_public_assets() {
    let built = build(BuildMode::Production);
    for path in ["/favicon.ico", "/portada.jpg", "/avalem.webp"] {
        assert!(built.out.exists(path), "missing {}", path);
    }
}

#[test]
fn artifact_has_essential_structure() {
    let built = build(BuildMode::Production);
    let html = &built.html;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<html lang=\"es\">"));
    assert!(html.contains("<head>"));
    assert!(html.contains("<body>"));
    assert!(html.ends_with("</html>"));
}

#[test]
fn artifact_includes_meta_tags() {
    let built = build(BuildMode::Production);
    assert!(built.html.contains("charset=\"utf-8\""));
    assert!(built.html.contains("name=\"viewport\""));
    assert!(built.html.contains("name=\"generator\""));
}

#[test]
fn artifact_includes_page_title() {
    let built = build(BuildMode::Production);
    assert!(built
        .html
        .contains("<title>Arturo Soto SA - Patatas y Cebollas</title>"));
}

#[test]
fn production_build_is_minified() {
    let built = build(BuildMode::Production);
    assert!(!vitrina::render::has_blank_run(&built.html));
    // and what reaches disk matches what the renderer produced
    let on_disk = built.out.read(ARTIFACT_PATH).unwrap();
    assert_eq!(on_disk, built.html.as_bytes());
}

#[test]
fn development_build_keeps_whitespace_allowance() {
    let dev = build(BuildMode::Development);
    let prod = build(BuildMode::Production);
    assert!(dev.html.len() >= prod.html.len());
}

#[test]
fn repeated_builds_are_byte_identical() {
    let a = build(BuildMode::Production);
    let b = build(BuildMode::Production);
    let digest_a = hex::encode(Sha256::digest(a.html.as_bytes()));
    let digest_b = hex::encode(Sha256::digest(b.html.as_bytes()));
    assert_eq!(digest_a, digest_b);
}

#[test]
fn missing_asset_source_aborts_the_build() {
    let tmp = tempfile::tempdir().unwrap();
    let assets = tmp.path().join("public");
    std::fs::create_dir(&assets).unwrap();
    common::write_source_assets(&assets);
    std::fs::remove_file(assets.join("portada.jpg")).unwrap();

    let model = vitrina::data::arturo_soto().unwrap();
    let out = FsOutputDir::create(tmp.path().join("dist")).unwrap();
    let err = vitrina::build_site(&model, &AssetResolver::new(&assets), &out, BuildMode::Production)
        .unwrap_err();
    assert!(matches!(err, vitrina::Error::MissingAsset { .. }), "got {:?}", err);
    assert!(err.to_string().contains("cover"));
}
