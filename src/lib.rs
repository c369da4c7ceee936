//! Vitrina
//!
//! A small content-assembly-and-validation pipeline: a typed content model is
//! rendered into a single static HTML document, and that artifact is then
//! verified two independent ways — statically (string/DOM assertions against
//! the built file) and live (a browser-like backend asserting visibility,
//! computed styles and network success against the served page). The two
//! passes never communicate; both must agree on the same artifact.
//!
//! # Example
//!
//! ```no_run
//! use vitrina::{assets::{AssetResolver, FsOutputDir}, BuildMode};
//!
//! # fn main() -> vitrina::Result<()> {
//! let model = vitrina::data::arturo_soto()?;
//! let out = FsOutputDir::create("dist")?;
//! let resolver = AssetResolver::new("public");
//! vitrina::build_site(&model, &resolver, &out, BuildMode::Production)?;
//!
//! let report = vitrina::static_check::StaticValidator::new(&model, BuildMode::Production).run(&out);
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod content;
pub mod data;

pub mod assets;
pub mod render;

pub mod check;
pub mod css;
pub mod live;
pub mod static_check;

use log::info;

/// Build mode: development keeps readable markup, production minifies.
///
/// The minification contract is observable: production output contains no
/// blank-line-only whitespace runs between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl Default for BuildMode {
    fn default() -> Self {
        BuildMode::Production
    }
}

/// Viewport dimensions used by the live backend's style resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    /// A narrow mobile profile, used for the responsive layout checks
    pub fn mobile() -> Self {
        Self {
            width: 375,
            height: 667,
        }
    }
}

/// Render the model, stage its assets, and write the artifact into `out`.
///
/// Returns the rendered document. Fails fast: a missing asset source or a
/// render error stops the build before any validator would run.
pub fn build_site(
    model: &content::ContentModel,
    resolver: &assets::AssetResolver,
    out: &dyn assets::OutputDir,
    mode: BuildMode,
) -> Result<String> {
    let html = render::render(model, mode)?;
    resolver.stage(model, out)?;
    render::write_artifact(out, &html)?;
    info!(
        "built artifact ({} bytes, {} assets, {:?})",
        html.len(),
        model.assets().len() + 1,
        mode
    );
    Ok(html)
}
