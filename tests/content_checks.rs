//! Content tests: every section's markup and copy, checked against the
//! built artifact text and through the static validator.

mod common;

use vitrina::assets::{AssetResolver, MemOutputDir, OutputDir};
use vitrina::content::ContentModel;
use vitrina::render::ARTIFACT_PATH;
use vitrina::static_check::StaticValidator;
use vitrina::BuildMode;

fn built() -> (ContentModel, MemOutputDir, String) {
    let tmp = tempfile::tempdir().unwrap();
    common::write_source_assets(tmp.path());
    let model = vitrina::data::arturo_soto().unwrap();
    let out = MemOutputDir::new();
    let html =
        vitrina::build_site(&model, &AssetResolver::new(tmp.path()), &out, BuildMode::Production)
            .unwrap();
    (model, out, html)
}

#[test]
fn header_section_contains_cover_image() {
    let (_, _, html) = built();
    assert!(html.contains("<header"));
    assert!(html.contains("portada.jpg"));
    assert!(html.contains("alt=\"Arturo Soto SA\""));
}

#[test]
fn about_section_contains_company_description() {
    let (_, _, html) = built();
    assert!(html.contains("id=\"about\""));
    assert!(html.contains("Sobre Nosotros"));
    assert!(html.contains("Arturo Soto SA es una empresa líder"));
    assert!(html.contains("patatas y cebollas"));
}

#[test]
fn contact_section_contains_address_phone_and_hours() {
    let (_, _, html) = built();
    assert!(html.contains("id=\"contact\""));
    assert!(html.contains("Contacto"));
    assert!(html.contains("Vía Camino, 51"));
    assert!(html.contains("46229 Picassent, Valencia"));
    assert!(html.contains("961 27 28 55"));
    assert!(html.contains("Horario Comercial"));
    assert!(html.contains("Lunes a Viernes"));
    assert!(html.contains("7:00"));
}

#[test]
fn map_section_embeds_google_maps_iframe() {
    let (_, _, html) = built();
    assert!(html.contains("id=\"map\""));
    assert!(html.contains("Ubicación"));
    assert!(html.contains("<iframe"));
    assert!(html.contains("google.com/maps/embed"));
    assert!(html.contains("width=\"100%\""));
    assert!(html.contains("height=\"450\""));
    assert!(html.contains("loading=\"lazy\""));
}

#[test]
fn subsidies_section_contains_image_and_caption() {
    let (_, _, html) = built();
    assert!(html.contains("id=\"subsidies\""));
    assert!(html.contains("Subvenciones"));
    assert!(html.contains("avalem.webp"));
    assert!(html.contains("Programa de fomento"));
}

#[test]
fn footer_carries_copyright_line() {
    let (_, _, html) = built();
    assert!(html.contains("<footer"));
    assert!(html.contains("&copy; 2024 Arturo Soto SA"));
    assert!(html.contains("Todos los derechos reservados"));
}

#[test]
fn styling_is_inline_with_custom_properties() {
    let (_, _, html) = built();
    for needle in [
        "--primary-color",
        "--secondary-color",
        "--text-color",
        "--background-color",
        "@media",
        "max-width: 600px",
    ] {
        assert!(html.contains(needle), "missing {}", needle);
    }
    assert!(!html.contains("rel=\"stylesheet\""));
}

#[test]
fn heading_hierarchy_is_exact() {
    let (_, _, html) = built();
    assert!(html.contains("<h2>Sobre Nosotros</h2>"));
    assert!(html.contains("<h2>Contacto</h2>"));
    assert!(html.contains("<h3>Horario Comercial</h3>"));
    assert_eq!(html.matches("<h2>").count(), 4);
    assert_eq!(html.matches("<h3>").count(), 1);
}

#[test]
fn static_validator_accepts_the_build() {
    let (model, out, _) = built();
    let report = StaticValidator::new(&model, BuildMode::Production).run(&out);
    assert!(report.passed(), "failures: {:?}", report.failures());
}

#[test]
fn tampered_title_fails_only_document_checks() {
    let (model, out, html) = built();
    let tampered = html.replace(
        "<title>Arturo Soto SA - Patatas y Cebollas</title>",
        "<title>Otra Cosa</title>",
    );
    out.write(ARTIFACT_PATH, tampered.as_bytes()).unwrap();

    let report = StaticValidator::new(&model, BuildMode::Production).run(&out);
    assert!(!report.passed());
    assert!(report.group("build outputs").unwrap().passed());
    assert!(report.group("section content").unwrap().passed());
    assert!(!report.group("seo").unwrap().passed());

    let failure = report
        .failures()
        .into_iter()
        .find(|c| c.name == "title")
        .expect("title failure reported");
    assert_eq!(failure.expected, "Arturo Soto SA - Patatas y Cebollas");
    assert_eq!(failure.actual, "Otra Cosa");
}
