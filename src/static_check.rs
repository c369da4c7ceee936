//! Static validator: inspects the built artifact as text and DOM.
//!
//! No rendering engine is involved; everything here is derivable from the
//! file contents and the output directory listing. Check groups are
//! independent: a failure in one group never prevents another group from
//! being evaluated and reported.

use scraper::{ElementRef, Html, Selector};

use crate::assets::{OutputDir, FAVICON_PATH};
use crate::check::{CheckGroup, Report};
use crate::content::{ContentModel, Section};
use crate::render::{has_blank_run, ARTIFACT_PATH};
use crate::BuildMode;

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Runs every structural and content assertion against a finished build
pub struct StaticValidator<'a> {
    model: &'a ContentModel,
    mode: BuildMode,
}

impl<'a> StaticValidator<'a> {
    pub fn new(model: &'a ContentModel, mode: BuildMode) -> Self {
        Self { model, mode }
    }

    /// Evaluate all check groups against the output directory. Always returns
    /// a full report; nothing in here fails fast.
    pub fn run(&self, out: &dyn OutputDir) -> Report {
        let html = out
            .read(ARTIFACT_PATH)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());

        let mut groups = vec![self.build_outputs(out)];
        match &html {
            Some(html) => {
                let doc = Html::parse_document(html);
                groups.push(self.document_shape(html, &doc));
                groups.push(self.section_content(&doc));
                groups.push(self.accessibility(&doc));
                groups.push(self.seo(&doc));
                groups.push(self.styling(html));
                groups.push(self.minification(html));
            }
            None => {
                // The artifact is unreadable; every document-level group still
                // reports, each with its own failure.
                for name in [
                    "document shape",
                    "section content",
                    "accessibility",
                    "seo",
                    "styling",
                    "minification",
                ] {
                    let mut g = CheckGroup::new(name);
                    g.expect_true("artifact readable", false, "missing or non-utf8 artifact");
                    groups.push(g);
                }
            }
        }
        Report::new(groups)
    }

    fn build_outputs(&self, out: &dyn OutputDir) -> CheckGroup {
        let mut g = CheckGroup::new("build outputs");
        g.expect_true("output directory", out.ready(), "missing output directory");
        g.expect_true(
            "artifact index.html",
            out.exists(ARTIFACT_PATH),
            "artifact not found",
        );
        for asset in self.model.assets() {
            g.expect_true(
                &format!("asset {}", asset.logical_name),
                out.exists(&asset.public_path),
                format!("no file at {}", asset.public_path),
            );
        }
        g.expect_true(
            "asset favicon",
            out.exists(FAVICON_PATH),
            format!("no file at {}", FAVICON_PATH),
        );
        g
    }

    fn document_shape(&self, html: &str, doc: &Html) -> CheckGroup {
        let mut g = CheckGroup::new("document shape");
        g.expect_true(
            "doctype",
            html.trim_start().starts_with("<!DOCTYPE html>"),
            "missing doctype declaration",
        );
        for tag in ["html", "head", "body", "header", "main", "footer"] {
            g.expect_count(
                &format!("exactly one {}", tag),
                1,
                doc.select(&sel(tag)).count(),
            );
        }
        let lang = doc
            .select(&sel("html"))
            .next()
            .and_then(|el| el.value().attr("lang"))
            .unwrap_or("");
        g.expect_eq("html lang", &self.model.locale, lang);

        // One <section> child of <main> per non-header section, in model order
        let rendered_ids: Vec<String> = doc
            .select(&sel("main > section"))
            .filter_map(|el| el.value().attr("id").map(str::to_string))
            .collect();
        let expected_ids: Vec<String> = self
            .model
            .sections
            .iter()
            .filter(|s| !matches!(s, Section::Header { .. }))
            .map(|s| s.id().to_string())
            .collect();
        g.expect_eq(
            "main sections in model order",
            &expected_ids.join(","),
            &rendered_ids.join(","),
        );

        if let Some(footer) = doc.select(&sel("footer")).next() {
            let text = text_of(footer);
            let has_mark = text.contains('©');
            g.expect_true("footer copyright mark", has_mark, text.clone());
            g.expect_contains(
                "footer year",
                &text,
                &self.model.footer.copyright_year.to_string(),
            );
            g.expect_contains("footer owner", &text, &self.model.footer.owner_name);
            g.expect_contains("footer rights", &text, &self.model.footer.rights_notice);
        }
        g
    }

    fn section_content(&self, doc: &Html) -> CheckGroup {
        let mut g = CheckGroup::new("section content");
        for section in &self.model.sections {
            let id = section.id();
            if let Section::Header { cover, .. } = section {
                let src = doc
                    .select(&sel("header img.cover"))
                    .next()
                    .and_then(|el| el.value().attr("src"))
                    .unwrap_or("");
                g.expect_eq("header cover src", &cover.public_path, src);
                continue;
            }

            let selector = sel(&format!("section#{}", id));
            g.expect_count(&format!("{} block", id), 1, doc.select(&selector).count());
            let Some(block) = doc.select(&selector).next() else {
                continue;
            };
            let block_text = text_of(block);

            if let Some(heading) = section.heading() {
                let h2 = block.select(&sel("h2")).next().map(text_of).unwrap_or_default();
                g.expect_eq(&format!("{} heading", id), heading, &h2);
            }

            match section {
                Section::About { body, .. } => {
                    g.expect_contains(&format!("{} body", id), &block_text, body);
                }
                Section::Contact {
                    address_lines,
                    phone,
                    hours,
                    ..
                } => {
                    for (i, line) in address_lines.iter().enumerate() {
                        g.expect_contains(&format!("{} address line {}", id, i + 1), &block_text, line);
                    }
                    g.expect_contains(&format!("{} phone", id), &block_text, phone);
                    let h3 = block.select(&sel("h3")).next().map(text_of).unwrap_or_default();
                    g.expect_eq(&format!("{} hours heading", id), &hours.heading, &h3);
                    for entry in &hours.entries {
                        g.expect_contains(&format!("{} hours label", id), &block_text, &entry.label);
                        g.expect_contains(&format!("{} hours times", id), &block_text, &entry.times);
                    }
                }
                Section::Map {
                    embed_url,
                    width,
                    height,
                    lazy_load,
                    ..
                } => {
                    let iframe = block.select(&sel("iframe")).next();
                    match iframe {
                        Some(iframe) => {
                            let attr = |name: &str| iframe.value().attr(name).unwrap_or("");
                            g.expect_eq(&format!("{} iframe src", id), embed_url, attr("src"));
                            g.expect_eq(&format!("{} iframe width", id), width, attr("width"));
                            g.expect_eq(&format!("{} iframe height", id), height, attr("height"));
                            if *lazy_load {
                                g.expect_eq(&format!("{} iframe loading", id), "lazy", attr("loading"));
                            }
                            g.expect_true(
                                &format!("{} iframe allowfullscreen", id),
                                iframe.value().attr("allowfullscreen").is_some(),
                                "attribute absent",
                            );
                        }
                        None => g.expect_true(&format!("{} iframe", id), false, "no iframe in block"),
                    }
                }
                Section::Subsidies { image, caption, .. } => {
                    let src = block
                        .select(&sel("img.subsidy"))
                        .next()
                        .and_then(|el| el.value().attr("src"))
                        .unwrap_or("");
                    g.expect_eq(&format!("{} image src", id), &image.public_path, src);
                    let figcaption = block
                        .select(&sel("figcaption"))
                        .next()
                        .map(text_of)
                        .unwrap_or_default();
                    g.expect_eq(&format!("{} caption", id), caption, &figcaption);
                }
                Section::Header { .. } => unreachable!("handled above"),
            }
        }
        g
    }

    fn accessibility(&self, doc: &Html) -> CheckGroup {
        let mut g = CheckGroup::new("accessibility");
        let lang = doc
            .select(&sel("html"))
            .next()
            .and_then(|el| el.value().attr("lang"))
            .unwrap_or("");
        g.expect_true("lang attribute present", !lang.is_empty(), "empty lang");

        let mut missing_alt = 0usize;
        for img in doc.select(&sel("img")) {
            if img.value().attr("alt").map_or(true, |a| a.trim().is_empty()) {
                missing_alt += 1;
            }
        }
        g.expect_count("images without alt text", 0, missing_alt);

        for asset in self.model.assets() {
            let alt = doc
                .select(&sel("img"))
                .find(|img| img.value().attr("src") == Some(asset.public_path.as_str()))
                .and_then(|img| img.value().attr("alt"))
                .unwrap_or("");
            g.expect_eq(&format!("alt for {}", asset.logical_name), &asset.alt_text, alt);
        }

        g.expect_count(
            "h2 count",
            self.model.expected_h2_count(),
            doc.select(&sel("h2")).count(),
        );
        g.expect_count(
            "h3 count",
            self.model.expected_h3_count(),
            doc.select(&sel("h3")).count(),
        );
        g
    }

    fn seo(&self, doc: &Html) -> CheckGroup {
        let mut g = CheckGroup::new("seo");
        let charset = doc
            .select(&sel("meta[charset]"))
            .next()
            .and_then(|el| el.value().attr("charset"))
            .unwrap_or("");
        g.expect_eq("meta charset", "utf-8", charset);
        g.expect_count(
            "meta viewport",
            1,
            doc.select(&sel("meta[name=\"viewport\"]")).count(),
        );
        g.expect_count(
            "meta generator",
            1,
            doc.select(&sel("meta[name=\"generator\"]")).count(),
        );
        let title = doc.select(&sel("title")).next().map(text_of).unwrap_or_default();
        g.expect_eq("title", &self.model.title, &title);
        let favicon = doc
            .select(&sel("link[rel=\"icon\"]"))
            .next()
            .and_then(|el| el.value().attr("href"))
            .unwrap_or("");
        g.expect_eq("favicon link", FAVICON_PATH, favicon);
        g
    }

    fn styling(&self, html: &str) -> CheckGroup {
        let mut g = CheckGroup::new("styling");
        g.expect_contains("inline style block", html, "<style>");
        g.expect_true(
            "no linked stylesheet",
            !html.contains("rel=\"stylesheet\""),
            "found external stylesheet link",
        );
        for var in [
            "--primary-color",
            "--secondary-color",
            "--text-color",
            "--background-color",
        ] {
            g.expect_contains(&format!("custom property {}", var), html, var);
        }
        g.expect_contains("media query", html, "@media");
        g.expect_contains("narrow viewport rule", html, "max-width: 600px");
        g
    }

    fn minification(&self, html: &str) -> CheckGroup {
        let mut g = CheckGroup::new("minification");
        match self.mode {
            BuildMode::Production => g.expect_true(
                "no blank whitespace runs",
                !has_blank_run(html),
                "found \\n\\s+\\n run",
            ),
            BuildMode::Development => {
                // Development output is allowed to keep its whitespace; record
                // the mode so the report stays the same shape.
                g.expect_true("development mode (not minified)", true, "");
            }
        }
        g
    }
}
