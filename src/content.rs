//! The typed content model behind the rendered page.
//!
//! A `ContentModel` is a pure, serializable description of every section of
//! the site. It is constructed once from static data, validated up front, and
//! consumed exactly once by the renderer. Both validators restate its
//! invariants in their own observation mode, so this module is the single
//! source of truth for what "correct" means.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A named reference to a static file (image, icon) with its public path and
/// accessibility text.
///
/// `public_path` must start with `/` and, after the build step, resolve to a
/// real file in the output directory. `alt_text` must be non-empty; every
/// image on the page carries accessibility text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub logical_name: String,
    pub public_path: String,
    pub alt_text: String,
}

/// One labelled time range in the business-hours block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursEntry {
    /// e.g. "Lunes a Viernes"
    pub label: String,
    /// e.g. "7:00–14:00, 16:00–18:00"
    pub times: String,
}

/// The business-hours sub-block of the contact section; renders as one `h3`
/// plus one list item per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBlock {
    pub heading: String,
    pub entries: Vec<HoursEntry>,
}

/// One self-contained content block of the page.
///
/// This is a closed set: the renderer matches exhaustively over it, so adding
/// a variant without a render rule fails at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// Full-width cover image; the only section without a heading
    Header { id: String, cover: AssetRef },
    About {
        id: String,
        heading: String,
        body: String,
    },
    Contact {
        id: String,
        heading: String,
        address_lines: Vec<String>,
        phone: String,
        hours: HoursBlock,
    },
    Map {
        id: String,
        heading: String,
        embed_url: String,
        width: String,
        height: String,
        lazy_load: bool,
    },
    Subsidies {
        id: String,
        heading: String,
        image: AssetRef,
        caption: String,
    },
}

impl Section {
    /// Unique DOM anchor for this section
    pub fn id(&self) -> &str {
        match self {
            Section::Header { id, .. }
            | Section::About { id, .. }
            | Section::Contact { id, .. }
            | Section::Map { id, .. }
            | Section::Subsidies { id, .. } => id,
        }
    }

    /// `h2` text for this section; `None` for the header, which has no heading
    pub fn heading(&self) -> Option<&str> {
        match self {
            Section::Header { .. } => None,
            Section::About { heading, .. }
            | Section::Contact { heading, .. }
            | Section::Map { heading, .. }
            | Section::Subsidies { heading, .. } => Some(heading),
        }
    }

    /// Short variant name used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Header { .. } => "header",
            Section::About { .. } => "about",
            Section::Contact { .. } => "contact",
            Section::Map { .. } => "map",
            Section::Subsidies { .. } => "subsidies",
        }
    }

    /// The asset this section references, if any
    pub fn asset(&self) -> Option<&AssetRef> {
        match self {
            Section::Header { cover, .. } => Some(cover),
            Section::Subsidies { image, .. } => Some(image),
            _ => None,
        }
    }
}

/// Copyright line rendered in the page footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterInfo {
    pub copyright_year: i32,
    pub owner_name: String,
    pub rights_notice: String,
}

/// Root aggregate: everything the renderer needs to emit the page.
///
/// Construct with [`ContentModel::new`], which validates the whole model and
/// fails with [`Error::Validation`] before any rendering can happen. Section
/// order determines document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModel {
    pub title: String,
    pub locale: String,
    pub sections: Vec<Section>,
    pub footer: FooterInfo,
}

impl ContentModel {
    /// Validate and construct a model. This is the only constructor; a value
    /// of this type is always a valid model.
    pub fn new(
        title: impl Into<String>,
        locale: impl Into<String>,
        sections: Vec<Section>,
        footer: FooterInfo,
    ) -> Result<Self> {
        let model = Self {
            title: title.into(),
            locale: locale.into(),
            sections,
            footer,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        fn required(name: &str, value: &str) -> Result<()> {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{} must not be empty", name)));
            }
            Ok(())
        }

        fn check_asset(asset: &AssetRef) -> Result<()> {
            required(&format!("asset `{}` logical_name", asset.public_path), &asset.logical_name)?;
            if !asset.public_path.starts_with('/') {
                return Err(Error::Validation(format!(
                    "asset `{}` public_path must start with '/', got {:?}",
                    asset.logical_name, asset.public_path
                )));
            }
            if asset.alt_text.trim().is_empty() {
                return Err(Error::Validation(format!(
                    "asset `{}` alt_text must not be empty",
                    asset.logical_name
                )));
            }
            Ok(())
        }

        required("title", &self.title)?;
        required("locale", &self.locale)?;
        required("footer owner_name", &self.footer.owner_name)?;
        required("footer rights_notice", &self.footer.rights_notice)?;

        if self.sections.is_empty() {
            return Err(Error::Validation("sections must not be empty".into()));
        }

        let mut seen_ids: Vec<&str> = Vec::new();
        let mut counts = [0usize; 5];
        for section in &self.sections {
            let id = section.id();
            required("section id", id)?;
            // ids double as DOM anchors and selector fragments, so they must
            // stay within the charset both accept
            let selector_safe = id.starts_with(|c: char| c.is_ascii_alphabetic())
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !selector_safe {
                return Err(Error::Validation(format!(
                    "section id `{}` must start with a letter and contain only letters, digits, '-' or '_'",
                    id
                )));
            }
            if seen_ids.contains(&id) {
                return Err(Error::Validation(format!("duplicate section id `{}`", id)));
            }
            seen_ids.push(id);

            if let Some(heading) = section.heading() {
                required(&format!("section `{}` heading", id), heading)?;
            }
            if let Some(asset) = section.asset() {
                check_asset(asset)?;
            }

            let slot = match section {
                Section::Header { .. } => 0,
                Section::About { body, .. } => {
                    required(&format!("section `{}` body", id), body)?;
                    1
                }
                Section::Contact {
                    address_lines,
                    phone,
                    hours,
                    ..
                } => {
                    if address_lines.iter().all(|l| l.trim().is_empty()) {
                        return Err(Error::Validation(format!(
                            "section `{}` needs at least one address line",
                            id
                        )));
                    }
                    required(&format!("section `{}` phone", id), phone)?;
                    required(&format!("section `{}` hours heading", id), &hours.heading)?;
                    2
                }
                Section::Map {
                    embed_url,
                    width,
                    height,
                    ..
                } => {
                    required(&format!("section `{}` embed_url", id), embed_url)?;
                    required(&format!("section `{}` width", id), width)?;
                    required(&format!("section `{}` height", id), height)?;
                    3
                }
                Section::Subsidies { caption, .. } => {
                    required(&format!("section `{}` caption", id), caption)?;
                    4
                }
            };
            counts[slot] += 1;
        }

        if counts[0] != 1 {
            return Err(Error::Validation(format!(
                "expected exactly one header section, found {}",
                counts[0]
            )));
        }
        if counts[1] == 0 {
            return Err(Error::Validation("an about section is required".into()));
        }
        if counts[2] == 0 {
            return Err(Error::Validation("a contact section is required".into()));
        }
        for (slot, name) in [(1, "about"), (2, "contact"), (3, "map"), (4, "subsidies")] {
            if counts[slot] > 1 {
                return Err(Error::Validation(format!(
                    "at most one {} section is allowed, found {}",
                    name, counts[slot]
                )));
            }
        }
        Ok(())
    }

    /// Every asset referenced anywhere in the model, in document order
    pub fn assets(&self) -> Vec<&AssetRef> {
        self.sections.iter().filter_map(|s| s.asset()).collect()
    }

    /// Number of `h2` elements a correct render contains: one per headed section
    pub fn expected_h2_count(&self) -> usize {
        self.sections.iter().filter(|s| s.heading().is_some()).count()
    }

    /// Number of `h3` elements a correct render contains: one per hours block
    pub fn expected_h3_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, Section::Contact { .. }))
            .count()
    }
}
