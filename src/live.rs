//! Live validator: asserts what only a rendering engine can observe.
//!
//! The rendering capability is abstracted behind the [`Browser`] trait
//! (navigate, query attributes, query computed style, observe the network),
//! so the validator logic is unit-testable against [`FakeBrowser`] without a
//! server. [`HttpBrowser`] is the real backend: it fetches the served
//! artifact and every same-origin subresource, resolves the inline
//! stylesheet, and answers computed-style and layout questions from it.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use log::{debug, warn};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::check::{Check, CheckGroup, Report};
use crate::content::{ContentModel, Section};
use crate::css::{Elem, Stylesheet};
use crate::{Error, Result, Viewport};

/// Load state of one image on the page, as a real engine would report it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStatus {
    pub src: String,
    /// Whether the resource was fetched successfully
    pub complete: bool,
    /// Width decoded from the image header; zero when undecodable
    pub natural_width: u32,
}

/// Configuration for a live browsing session
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub viewport: Viewport,
    /// Bound on the whole navigation, page plus subresources
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 3000,
            user_agent: format!("vitrina-live/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BrowserConfig {
    pub fn mobile() -> Self {
        Self {
            viewport: Viewport::mobile(),
            ..Default::default()
        }
    }
}

/// The minimal rendering-engine capability the live validator needs.
///
/// One session per scenario; `navigate` must complete before any query runs.
pub trait Browser {
    /// Load the page and all of its same-origin subresources, bounded by the
    /// session timeout. Fails with [`Error::Timeout`] rather than hanging.
    fn navigate(&mut self, url: &str) -> Result<()>;

    fn title(&self) -> Result<String>;

    /// Attribute value of the first element matching `selector`; `Ok(None)`
    /// when the element or the attribute is absent
    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Computed value of a CSS property for the first matching element
    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>>;

    /// Text content of the first matching element's subtree
    fn text(&self, selector: &str) -> Result<String>;

    /// Whether the first matching element exists and computes to a visible
    /// display and visibility
    fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Number of elements matching `selector` in the whole document
    fn count(&self, selector: &str) -> Result<usize>;

    /// Load state of every image on the page
    fn images(&self) -> Result<Vec<ImageStatus>>;

    /// Resolved layout width in pixels for the first matching element, when
    /// its styles determine one
    fn layout_width(&self, selector: &str) -> Result<Option<u32>>;

    fn console_errors(&self) -> Vec<String>;

    fn failed_requests(&self) -> Vec<String>;

    /// Wall-clock time the last navigation took, page and subresources
    fn load_time_ms(&self) -> u64;

    fn viewport(&self) -> Viewport;
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| Error::Query(selector.to_string()))
}

fn elem_of(el: ElementRef<'_>) -> Elem {
    Elem {
        tag: el.value().name().to_string(),
        id: el.value().attr("id").map(str::to_string),
        classes: el.value().classes().map(str::to_string).collect(),
    }
}

fn chain_of(el: ElementRef<'_>) -> Vec<Elem> {
    let mut chain: Vec<Elem> = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(elem_of)
        .collect();
    chain.reverse();
    chain.push(elem_of(el));
    chain
}

// UA default display for the handful of tags on the page; everything the
// stylesheet doesn't set still has a sensible computed value.
fn default_display(tag: &str) -> &'static str {
    match tag {
        "a" | "span" | "img" | "iframe" | "br" => "inline",
        "li" => "list-item",
        _ => "block",
    }
}

fn inline_decl(el: ElementRef<'_>, property: &str) -> Option<String> {
    let style = el.value().attr("style")?;
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim() == property).then(|| value.trim().to_string())
    })
}

// "100%" against the viewport, "450px"/"450" as pixels
fn resolve_length(value: &str, viewport_width: u32) -> Option<u32> {
    let v = value.trim();
    if let Some(pct) = v.strip_suffix('%') {
        let pct: f32 = pct.trim().parse().ok()?;
        return Some((viewport_width as f32 * pct / 100.0).round() as u32);
    }
    let v = v.strip_suffix("px").unwrap_or(v);
    v.trim().parse::<f32>().ok().map(|x| x.round() as u32)
}

/// Live backend over HTTP: reqwest for the fetches, scraper for the DOM, and
/// the crate's CSS cascade for computed styles.
pub struct HttpBrowser {
    client: Client,
    config: BrowserConfig,
    doc: Option<Html>,
    sheet: Stylesheet,
    images: Vec<ImageStatus>,
    failed: Vec<String>,
    // A static page runs no scripts, so this stays empty; the surface exists
    // so the validator contract is the same across backends.
    console: Vec<String>,
    load_time_ms: u64,
}

impl HttpBrowser {
    pub fn new(config: BrowserConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Load(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            doc: None,
            sheet: Stylesheet::default(),
            images: Vec::new(),
            failed: Vec::new(),
            console: Vec::new(),
            load_time_ms: 0,
        })
    }

    fn doc(&self) -> Result<&Html> {
        self.doc
            .as_ref()
            .ok_or_else(|| Error::Load("no document loaded".into()))
    }

    fn element<'a>(&'a self, selector: &str) -> Result<Option<ElementRef<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.doc()?.select(&sel).next())
    }

    fn fetch_bytes(&self, url: &Url) -> std::result::Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| e.to_string())
    }

    fn check_deadline(&self, started: Instant) -> Result<()> {
        if started.elapsed().as_millis() as u64 > self.config.timeout_ms {
            return Err(Error::Timeout(self.config.timeout_ms));
        }
        Ok(())
    }
}

impl Browser for HttpBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        let started = Instant::now();
        self.images.clear();
        self.failed.clear();

        let base = Url::parse(url).map_err(|e| Error::Load(format!("bad url {}: {}", url, e)))?;
        let response = self.client.get(base.clone()).send().map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.config.timeout_ms)
            } else {
                Error::Load(e.to_string())
            }
        })?;
        if !response.status().is_success() {
            return Err(Error::Load(format!("status {} for {}", response.status(), url)));
        }
        let body = response.text().map_err(|e| Error::Load(e.to_string()))?;
        self.check_deadline(started)?;

        let doc = Html::parse_document(&body);

        let style_sel = Selector::parse("style").unwrap();
        let css: String = doc
            .select(&style_sel)
            .map(|el| el.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        self.sheet = Stylesheet::parse(&css);

        // Subresources: every image and the favicon; iframes only when they
        // point back at the same origin (the maps embed is external and a
        // real engine would load it, but the network-success check concerns
        // our own artifacts).
        let mut subresources: Vec<(String, bool)> = Vec::new();
        let img_sel = Selector::parse("img[src]").unwrap();
        for img in doc.select(&img_sel) {
            if let Some(src) = img.value().attr("src") {
                subresources.push((src.to_string(), true));
            }
        }
        let icon_sel = Selector::parse("link[rel=\"icon\"][href]").unwrap();
        for icon in doc.select(&icon_sel) {
            if let Some(href) = icon.value().attr("href") {
                subresources.push((href.to_string(), false));
            }
        }
        let iframe_sel = Selector::parse("iframe[src]").unwrap();
        for iframe in doc.select(&iframe_sel) {
            if let Some(src) = iframe.value().attr("src") {
                let same_origin = Url::parse(src)
                    .map(|u| u.host_str() == base.host_str() && u.port() == base.port())
                    .unwrap_or(true);
                if same_origin {
                    subresources.push((src.to_string(), false));
                } else {
                    debug!("skipping cross-origin iframe {}", src);
                }
            }
        }

        for (src, is_image) in subresources {
            self.check_deadline(started)?;
            let resolved = base
                .join(&src)
                .map_err(|e| Error::Load(format!("bad subresource url {}: {}", src, e)))?;
            match self.fetch_bytes(&resolved) {
                Ok(bytes) => {
                    if is_image {
                        self.images.push(ImageStatus {
                            src: src.clone(),
                            complete: true,
                            natural_width: sniff::intrinsic_width(&bytes),
                        });
                    }
                }
                Err(reason) => {
                    warn!("subresource {} failed: {}", resolved, reason);
                    self.failed.push(resolved.to_string());
                    if is_image {
                        self.images.push(ImageStatus {
                            src: src.clone(),
                            complete: false,
                            natural_width: 0,
                        });
                    }
                }
            }
        }

        self.load_time_ms = started.elapsed().as_millis() as u64;
        self.doc = Some(doc);
        debug!("navigated to {} in {}ms", url, self.load_time_ms);
        Ok(())
    }

    fn title(&self) -> Result<String> {
        let sel = Selector::parse("title").unwrap();
        Ok(self
            .doc()?
            .select(&sel)
            .next()
            .map(|el| el.text().collect())
            .unwrap_or_default())
    }

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .element(selector)?
            .and_then(|el| el.value().attr(name).map(str::to_string)))
    }

    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let Some(el) = self.element(selector)? else {
            return Ok(None);
        };
        if let Some(value) = inline_decl(el, property) {
            return Ok(Some(value));
        }
        let computed = self
            .sheet
            .computed(&chain_of(el), property, self.config.viewport);
        if computed.is_some() {
            return Ok(computed);
        }
        Ok(match property {
            "display" => Some(default_display(el.value().name()).to_string()),
            "visibility" => Some("visible".to_string()),
            _ => None,
        })
    }

    fn text(&self, selector: &str) -> Result<String> {
        Ok(self
            .element(selector)?
            .map(|el| el.text().collect())
            .unwrap_or_default())
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        if self.element(selector)?.is_none() {
            return Ok(false);
        }
        let display = self.computed_style(selector, "display")?.unwrap_or_default();
        let visibility = self
            .computed_style(selector, "visibility")?
            .unwrap_or_default();
        Ok(display != "none" && visibility != "hidden")
    }

    fn count(&self, selector: &str) -> Result<usize> {
        let sel = parse_selector(selector)?;
        Ok(self.doc()?.select(&sel).count())
    }

    fn images(&self) -> Result<Vec<ImageStatus>> {
        self.doc()?;
        Ok(self.images.clone())
    }

    fn layout_width(&self, selector: &str) -> Result<Option<u32>> {
        let viewport_width = self.config.viewport.width;
        let Some(width) = self.computed_style(selector, "width")? else {
            return Ok(None);
        };
        let mut resolved = match resolve_length(&width, viewport_width) {
            Some(w) => w,
            None => return Ok(None),
        };
        if let Some(max) = self.computed_style(selector, "max-width")? {
            if let Some(max) = resolve_length(&max, viewport_width) {
                resolved = resolved.min(max);
            }
        }
        Ok(Some(resolved))
    }

    fn console_errors(&self) -> Vec<String> {
        self.console.clone()
    }

    fn failed_requests(&self) -> Vec<String> {
        self.failed.clone()
    }

    fn load_time_ms(&self) -> u64 {
        self.load_time_ms
    }

    fn viewport(&self) -> Viewport {
        self.config.viewport
    }
}

/// Canned-answer backend for unit-testing validator logic without a server
#[derive(Default)]
pub struct FakeBrowser {
    pub title: String,
    pub attributes: HashMap<(String, String), String>,
    pub styles: HashMap<(String, String), String>,
    pub texts: HashMap<String, String>,
    pub counts: HashMap<String, usize>,
    pub visible: HashSet<String>,
    pub image_statuses: Vec<ImageStatus>,
    pub widths: HashMap<String, u32>,
    pub console: Vec<String>,
    pub failed: Vec<String>,
    pub load_time: u64,
    pub viewport: Viewport,
    pub navigated: Vec<String>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            ..Default::default()
        }
    }
}

impl Browser for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigated.push(url.to_string());
        Ok(())
    }

    fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        Ok(self
            .styles
            .get(&(selector.to_string(), property.to_string()))
            .cloned())
    }

    fn text(&self, selector: &str) -> Result<String> {
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.visible.contains(selector))
    }

    fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    fn images(&self) -> Result<Vec<ImageStatus>> {
        Ok(self.image_statuses.clone())
    }

    fn layout_width(&self, selector: &str) -> Result<Option<u32>> {
        Ok(self.widths.get(selector).copied())
    }

    fn console_errors(&self) -> Vec<String> {
        self.console.clone()
    }

    fn failed_requests(&self) -> Vec<String> {
        self.failed.clone()
    }

    fn load_time_ms(&self) -> u64 {
        self.load_time
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Bound every live scenario must load within, in milliseconds
pub const LOAD_TIME_BUDGET_MS: u64 = 3000;

/// Drives a [`Browser`] session against the served artifact and reports every
/// check, independent of sibling outcomes.
pub struct LiveValidator<'a> {
    model: &'a ContentModel,
}

impl<'a> LiveValidator<'a> {
    pub fn new(model: &'a ContentModel) -> Self {
        Self { model }
    }

    pub fn run(&self, browser: &mut dyn Browser, base_url: &str) -> Report {
        if let Err(e) = browser.navigate(base_url) {
            let mut g = CheckGroup::new("navigation");
            g.checks
                .push(Check::fail("page loaded", "navigation succeeds", e.to_string()));
            return Report::new(vec![g]);
        }

        Report::new(vec![
            self.page(browser),
            self.visibility(browser),
            self.section_text(browser),
            self.media(browser),
            self.contrast(browser),
        ])
    }

    fn page(&self, browser: &dyn Browser) -> CheckGroup {
        let mut g = CheckGroup::new("page");
        let load = browser.load_time_ms();
        g.expect_true(
            "load time under budget",
            load < LOAD_TIME_BUDGET_MS,
            format!("{}ms", load),
        );
        g.expect_count("console errors", 0, browser.console_errors().len());
        g.expect_count("failed requests", 0, browser.failed_requests().len());
        match browser.title() {
            Ok(title) => g.expect_eq("title", &self.model.title, &title),
            Err(e) => g
                .checks
                .push(Check::fail("title", self.model.title.as_str(), e.to_string())),
        }
        g
    }

    fn visibility(&self, browser: &dyn Browser) -> CheckGroup {
        let mut g = CheckGroup::new("visibility");
        let mut landmarks = vec!["header".to_string(), "main".to_string(), "footer".to_string()];
        for section in &self.model.sections {
            if !matches!(section, Section::Header { .. }) {
                landmarks.push(format!("#{}", section.id()));
            }
        }
        for selector in landmarks {
            match browser.is_visible(&selector) {
                Ok(visible) => g.expect_true(
                    &format!("{} visible", selector),
                    visible,
                    "hidden or absent",
                ),
                Err(e) => g
                    .checks
                    .push(Check::fail(format!("{} visible", selector), "true", e.to_string())),
            }
        }
        g
    }

    fn section_text(&self, browser: &dyn Browser) -> CheckGroup {
        let mut g = CheckGroup::new("sections");
        for section in &self.model.sections {
            let id = section.id();
            if let Some(heading) = section.heading() {
                match browser.text(&format!("#{} h2", id)) {
                    Ok(text) => g.expect_eq(&format!("{} heading", id), heading, &text),
                    Err(e) => g
                        .checks
                        .push(Check::fail(format!("{} heading", id), heading, e.to_string())),
                }
            }
            let subtree = browser.text(&format!("#{}", id)).unwrap_or_default();
            match section {
                Section::Header { .. } | Section::Map { .. } => {}
                Section::About { body, .. } => {
                    g.expect_contains(&format!("{} body", id), &subtree, body);
                }
                Section::Contact {
                    address_lines,
                    phone,
                    hours,
                    ..
                } => {
                    for (i, line) in address_lines.iter().enumerate() {
                        g.expect_contains(&format!("{} address line {}", id, i + 1), &subtree, line);
                    }
                    g.expect_contains(&format!("{} phone", id), &subtree, phone);
                    match browser.text(&format!("#{} h3", id)) {
                        Ok(text) => g.expect_eq(&format!("{} hours heading", id), &hours.heading, &text),
                        Err(e) => g.checks.push(Check::fail(
                            format!("{} hours heading", id),
                            hours.heading.as_str(),
                            e.to_string(),
                        )),
                    }
                    for entry in &hours.entries {
                        g.expect_contains(&format!("{} hours label", id), &subtree, &entry.label);
                        g.expect_contains(&format!("{} hours times", id), &subtree, &entry.times);
                    }
                }
                Section::Subsidies { caption, .. } => {
                    g.expect_contains(&format!("{} caption", id), &subtree, caption);
                }
            }
        }
        for (tag, expected) in [
            ("h2", self.model.expected_h2_count()),
            ("h3", self.model.expected_h3_count()),
        ] {
            match browser.count(tag) {
                Ok(actual) => g.expect_count(&format!("{} count", tag), expected, actual),
                Err(e) => g.checks.push(Check::fail(
                    format!("{} count", tag),
                    expected.to_string(),
                    e.to_string(),
                )),
            }
        }
        g
    }

    fn media(&self, browser: &dyn Browser) -> CheckGroup {
        let mut g = CheckGroup::new("media");

        let attr_eq = |g: &mut CheckGroup, selector: &str, name: &str, expected: &str| {
            let check_name = format!("{} {}", selector, name);
            match browser.attribute(selector, name) {
                Ok(Some(value)) => g.expect_eq(&check_name, expected, &value),
                Ok(None) => g.checks.push(Check::fail(check_name, expected, "absent")),
                Err(e) => g.checks.push(Check::fail(check_name, expected, e.to_string())),
            }
        };

        for section in &self.model.sections {
            match section {
                Section::Header { cover, .. } => {
                    attr_eq(&mut g, "header img.cover", "src", &cover.public_path);
                    attr_eq(&mut g, "header img.cover", "alt", &cover.alt_text);
                }
                Section::Subsidies { id, image, .. } => {
                    let selector = format!("#{} img.subsidy", id);
                    attr_eq(&mut g, &selector, "src", &image.public_path);
                    attr_eq(&mut g, &selector, "alt", &image.alt_text);
                }
                Section::Map {
                    id,
                    width,
                    height,
                    lazy_load,
                    ..
                } => {
                    let selector = format!("#{} iframe", id);
                    attr_eq(&mut g, &selector, "width", width);
                    attr_eq(&mut g, &selector, "height", height);
                    if *lazy_load {
                        attr_eq(&mut g, &selector, "loading", "lazy");
                    }
                    let fullscreen = browser
                        .attribute(&selector, "allowfullscreen")
                        .ok()
                        .flatten();
                    g.expect_true(
                        &format!("{} allowfullscreen non-null", selector),
                        fullscreen.is_some(),
                        "null",
                    );
                }
                _ => {}
            }
        }

        match browser.images() {
            Ok(images) => {
                g.expect_true("page has images", !images.is_empty(), "no images observed");
                for image in images {
                    g.expect_true(
                        &format!("{} loaded", image.src),
                        image.complete && image.natural_width > 0,
                        format!(
                            "complete={} natural_width={}",
                            image.complete, image.natural_width
                        ),
                    );
                }
            }
            Err(e) => g.checks.push(Check::fail("images loaded", "all loaded", e.to_string())),
        }

        let viewport = browser.viewport();
        match browser.layout_width("header img.cover") {
            Ok(Some(width)) => g.expect_true(
                "cover fits viewport",
                width <= viewport.width,
                format!("{}px in a {}px viewport", width, viewport.width),
            ),
            Ok(None) => g
                .checks
                .push(Check::fail("cover fits viewport", "resolved width", "no width resolved")),
            Err(e) => g
                .checks
                .push(Check::fail("cover fits viewport", "resolved width", e.to_string())),
        }
        g
    }

    fn contrast(&self, browser: &dyn Browser) -> CheckGroup {
        let mut g = CheckGroup::new("contrast");
        let background = browser
            .computed_style("body", "background-color")
            .ok()
            .flatten();
        let color = browser.computed_style("body", "color").ok().flatten();
        g.expect_true(
            "body background set",
            background.is_some(),
            "no computed background-color",
        );
        g.expect_true("body color set", color.is_some(), "no computed color");
        if let (Some(background), Some(color)) = (background, color) {
            g.expect_true(
                "background differs from text color",
                background != color,
                format!("both {}", background),
            );
        }
        g
    }
}

/// Decode the intrinsic width from an image header (JPEG, PNG, WebP, ICO).
/// Returns zero for formats it cannot read.
pub(crate) mod sniff {
    pub fn intrinsic_width(bytes: &[u8]) -> u32 {
        jpeg(bytes)
            .or_else(|| png(bytes))
            .or_else(|| webp(bytes))
            .or_else(|| ico(bytes))
            .unwrap_or(0)
    }

    fn jpeg(bytes: &[u8]) -> Option<u32> {
        if !bytes.starts_with(&[0xFF, 0xD8]) {
            return None;
        }
        let mut i = 2;
        while i + 9 <= bytes.len() {
            if bytes[i] != 0xFF {
                return None;
            }
            let marker = bytes[i + 1];
            match marker {
                // standalone markers carry no length
                0x01 | 0xD0..=0xD9 => i += 2,
                // any start-of-frame marker carries the dimensions
                0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                    return Some(u16::from_be_bytes([bytes[i + 7], bytes[i + 8]]) as u32);
                }
                _ => {
                    let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
                    i += 2 + len;
                }
            }
        }
        None
    }

    fn png(bytes: &[u8]) -> Option<u32> {
        const SIG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        if !bytes.starts_with(SIG) || bytes.len() < 24 {
            return None;
        }
        Some(u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]))
    }

    fn webp(bytes: &[u8]) -> Option<u32> {
        if bytes.len() < 30 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WEBP" {
            return None;
        }
        let le24 = |b: &[u8]| (b[0] as u32) | ((b[1] as u32) << 8) | ((b[2] as u32) << 16);
        match &bytes[12..16] {
            b"VP8X" => Some(1 + le24(&bytes[24..27])),
            b"VP8L" => {
                if bytes[20] != 0x2F {
                    return None;
                }
                Some(1 + ((bytes[21] as u32) | (((bytes[22] & 0x3F) as u32) << 8)))
            }
            b"VP8 " => {
                if bytes[23..26] != [0x9D, 0x01, 0x2A] {
                    return None;
                }
                Some((u16::from_le_bytes([bytes[26], bytes[27]]) & 0x3FFF) as u32)
            }
            _ => None,
        }
    }

    fn ico(bytes: &[u8]) -> Option<u32> {
        if bytes.len() < 8 || bytes[0..4] != [0, 0, 1, 0] {
            return None;
        }
        let count = u16::from_le_bytes([bytes[4], bytes[5]]);
        if count == 0 {
            return None;
        }
        // width byte of the first directory entry; zero encodes 256
        Some(if bytes[6] == 0 { 256 } else { bytes[6] as u32 })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn jpeg_sof_width() {
            let bytes = [
                0xFF, 0xD8, // SOI
                0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x10, 0x00, 0x20, 0x01, 0x01, 0x11, 0x00,
                0xFF, 0xD9, // EOI
            ];
            assert_eq!(intrinsic_width(&bytes), 0x20);
        }

        #[test]
        fn webp_vp8x_width() {
            let mut bytes = Vec::new();
            bytes.extend_from_slice(b"RIFF");
            bytes.extend_from_slice(&26u32.to_le_bytes());
            bytes.extend_from_slice(b"WEBPVP8X");
            bytes.extend_from_slice(&10u32.to_le_bytes());
            bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // flags + reserved
            bytes.extend_from_slice(&[0x3F, 0x00, 0x00]); // width - 1 = 63
            bytes.extend_from_slice(&[0x1F, 0x00, 0x00]); // height - 1
            assert_eq!(intrinsic_width(&bytes), 64);
        }

        #[test]
        fn ico_width_byte() {
            let bytes = [0, 0, 1, 0, 1, 0, 16, 16, 0, 0, 1, 0, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0];
            assert_eq!(intrinsic_width(&bytes), 16);
        }

        #[test]
        fn garbage_reports_zero() {
            assert_eq!(intrinsic_width(b"not an image"), 0);
        }
    }
}
