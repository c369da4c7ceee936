//! Assertion groups are independent: one failing group never stops the
//! others from being evaluated and reported.

mod common;

use vitrina::assets::{AssetResolver, MemOutputDir};
use vitrina::static_check::StaticValidator;
use vitrina::BuildMode;

fn built() -> (vitrina::content::ContentModel, MemOutputDir) {
    let tmp = tempfile::tempdir().unwrap();
    common::write_source_assets(tmp.path());
    let model = vitrina::data::arturo_soto().unwrap();
    let out = MemOutputDir::new();
    vitrina::build_site(&model, &AssetResolver::new(tmp.path()), &out, BuildMode::Production)
        .unwrap();
    (model, out)
}

#[test]
fn removed_asset_fails_presence_check_while_others_run() {
    let (model, out) = built();
    out.remove("/portada.jpg");

    let report = StaticValidator::new(&model, BuildMode::Production).run(&out);
    assert!(!report.passed());

    // the asset-presence group reports the exact missing asset
    let build = report.group("build outputs").unwrap();
    assert!(!build.passed());
    let failure = build.checks.iter().find(|c| !c.passed).unwrap();
    assert_eq!(failure.name, "asset cover");
    assert!(failure.actual.contains("/portada.jpg"));

    // every other group still executed and reports its own result
    let others: Vec<_> = report
        .groups
        .iter()
        .filter(|g| g.name != "build outputs")
        .collect();
    assert_eq!(others.len(), 6);
    for group in others {
        assert!(!group.checks.is_empty(), "group {} did not run", group.name);
        assert!(group.passed(), "group {} affected by missing asset", group.name);
    }
}

#[test]
fn multiple_failures_are_all_reported() {
    let (model, out) = built();
    out.remove("/portada.jpg");
    out.remove("/favicon.ico");

    let report = StaticValidator::new(&model, BuildMode::Production).run(&out);
    let names: Vec<&str> = report.failures().iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"asset cover"));
    assert!(names.contains(&"asset favicon"));
    assert_eq!(names.len(), 2);
}

#[test]
fn empty_output_reports_every_group_with_failures() {
    let model = vitrina::data::arturo_soto().unwrap();
    let out = MemOutputDir::new();
    let report = StaticValidator::new(&model, BuildMode::Production).run(&out);
    assert!(!report.passed());
    assert_eq!(report.groups.len(), 7);
    for group in &report.groups {
        assert!(
            !group.checks.is_empty(),
            "group {} reported no checks",
            group.name
        );
    }
}
