//! Renderer: a validated [`ContentModel`] in, one HTML document string out.
//!
//! Rendering is a pure, deterministic single pass; the same model renders to
//! byte-identical output every time. Styling is embedded inline (never
//! linked) and the production mode strips the blank-line runs a development
//! render keeps for readability.

use crate::assets::{OutputDir, FAVICON_PATH};
use crate::content::{ContentModel, Section};
use crate::{BuildMode, Error, Result};

/// Public path of the rendered artifact inside the output directory
pub const ARTIFACT_PATH: &str = "/index.html";

/// Inline stylesheet embedded into every render. Colors are exposed as
/// custom properties so the contrast contract is observable from the CSS, and
/// the narrow-viewport rule keeps the page usable on mobile profiles.
const STYLE: &str = "\
:root {
  --primary-color: #2f6b2f;
  --secondary-color: #c98a2b;
  --text-color: #222222;
  --background-color: #fdfaf4;
}
body { margin: 0; font-family: system-ui, sans-serif; color: var(--text-color); background-color: var(--background-color); }
img { max-width: 100%; height: auto; }
header img.cover { width: 100%; display: block; }
main { max-width: 960px; margin: 0 auto; padding: 0 1rem; }
h2 { color: var(--primary-color); }
h3 { color: var(--secondary-color); }
section { margin: 2rem 0; }
footer { background-color: var(--primary-color); color: var(--background-color); text-align: center; padding: 1rem; }
@media (max-width: 600px) {
  main { padding: 0 0.5rem; }
  h2 { font-size: 1.3rem; }
}";

/// Escape text for element content and attribute values
fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// Deterministic writer; push order is document order.
struct Doc {
    buf: String,
}

impl Doc {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(8 * 1024),
        }
    }

    fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Render the model into a complete HTML document string.
///
/// Errors with [`Error::Render`] if an asset reference cannot be turned into
/// a usable path string; whether the file behind it exists is the asset
/// resolver's contract, not the renderer's.
pub fn render(model: &ContentModel, mode: BuildMode) -> Result<String> {
    let mut w = Doc::new();

    w.line("<!DOCTYPE html>");
    w.line(&format!("<html lang=\"{}\">", esc(&model.locale)));
    w.line("<head>");
    w.line("<meta charset=\"utf-8\">");
    w.line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    w.line(&format!(
        "<meta name=\"generator\" content=\"vitrina {}\">",
        env!("CARGO_PKG_VERSION")
    ));
    w.line(&format!("<title>{}</title>", esc(&model.title)));
    w.line(&format!("<link rel=\"icon\" href=\"{}\">", FAVICON_PATH));
    w.line("<style>");
    w.line(STYLE);
    w.line("</style>");
    w.line("</head>");
    w.line("<body>");

    // The header section renders outside <main>; every other section becomes
    // one <section> child of <main>, in model order.
    for section in &model.sections {
        if let Section::Header { cover, .. } = section {
            w.line("<header>");
            w.line(&format!(
                "<img class=\"cover\" src=\"{}\" alt=\"{}\">",
                asset_path(&cover.public_path, &cover.logical_name)?,
                esc(&cover.alt_text)
            ));
            w.line("</header>");
        }
    }

    w.line("<main>");
    for section in &model.sections {
        match section {
            Section::Header { .. } => {}
            Section::About { id, heading, body } => {
                w.line(&format!("<section id=\"{}\">", esc(id)));
                w.line(&format!("<h2>{}</h2>", esc(heading)));
                w.line(&format!("<p>{}</p>", esc(body)));
                w.line("</section>");
            }
            Section::Contact {
                id,
                heading,
                address_lines,
                phone,
                hours,
            } => {
                w.line(&format!("<section id=\"{}\">", esc(id)));
                w.line(&format!("<h2>{}</h2>", esc(heading)));
                w.line("<address>");
                let joined = address_lines
                    .iter()
                    .map(|l| esc(l))
                    .collect::<Vec<_>>()
                    .join("<br>");
                w.line(&format!("<p>{}</p>", joined));
                w.line(&format!(
                    "<p>Teléfono: <a href=\"tel:{}\">{}</a></p>",
                    esc(&phone.replace(' ', "")),
                    esc(phone)
                ));
                w.line("</address>");
                w.line("<div class=\"hours\">");
                w.line(&format!("<h3>{}</h3>", esc(&hours.heading)));
                w.line("<ul>");
                for entry in &hours.entries {
                    w.line(&format!(
                        "<li>{}: {}</li>",
                        esc(&entry.label),
                        esc(&entry.times)
                    ));
                }
                w.line("</ul>");
                w.line("</div>");
                w.line("</section>");
            }
            Section::Map {
                id,
                heading,
                embed_url,
                width,
                height,
                lazy_load,
            } => {
                w.line(&format!("<section id=\"{}\">", esc(id)));
                w.line(&format!("<h2>{}</h2>", esc(heading)));
                let loading = if *lazy_load { " loading=\"lazy\"" } else { "" };
                w.line(&format!(
                    "<iframe src=\"{}\" width=\"{}\" height=\"{}\"{} allowfullscreen style=\"border: 0\" referrerpolicy=\"no-referrer-when-downgrade\"></iframe>",
                    esc(embed_url),
                    esc(width),
                    esc(height),
                    loading
                ));
                w.line("</section>");
            }
            Section::Subsidies {
                id,
                heading,
                image,
                caption,
            } => {
                w.line(&format!("<section id=\"{}\">", esc(id)));
                w.line(&format!("<h2>{}</h2>", esc(heading)));
                w.line("<figure>");
                w.line(&format!(
                    "<img class=\"subsidy\" src=\"{}\" alt=\"{}\">",
                    asset_path(&image.public_path, &image.logical_name)?,
                    esc(&image.alt_text)
                ));
                w.line(&format!("<figcaption>{}</figcaption>", esc(caption)));
                w.line("</figure>");
                w.line("</section>");
            }
        }
    }
    w.line("</main>");

    w.line("<footer>");
    w.line(&format!(
        "<p>&copy; {} {}. {}.</p>",
        model.footer.copyright_year,
        esc(&model.footer.owner_name),
        esc(&model.footer.rights_notice)
    ));
    w.line("</footer>");
    w.line("</body>");
    w.line("</html>");

    let html = w.finish();
    Ok(match mode {
        BuildMode::Development => html,
        BuildMode::Production => minify(&html),
    })
}

fn asset_path<'a>(public_path: &'a str, logical_name: &str) -> Result<&'a str> {
    if public_path.starts_with('/') {
        Ok(public_path)
    } else {
        Err(Error::Render(format!(
            "asset `{}` has unresolvable public path {:?}",
            logical_name, public_path
        )))
    }
}

/// Strip indentation and blank lines. The observable contract is the absence
/// of `\n<whitespace>\n` runs; see [`has_blank_run`].
fn minify(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for line in html.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(trimmed);
    }
    out
}

/// Whether the document contains a whitespace-only run between two newlines.
///
/// This mirrors the minification probe both validators use. It is a weak
/// proxy for "minified" and would false-fail on a blank line inside a `pre`
/// block; the page has none, so the limitation is kept as-is.
pub fn has_blank_run(html: &str) -> bool {
    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                if bytes[j] == b'\n' && j > i + 1 {
                    return true;
                }
                j += 1;
            }
            i = j;
        } else {
            i += 1;
        }
    }
    false
}

/// Write the rendered document to its well-known path in the output directory
pub fn write_artifact(out: &dyn OutputDir, html: &str) -> Result<()> {
    out.write(ARTIFACT_PATH, html.as_bytes())
}
