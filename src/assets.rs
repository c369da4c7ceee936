//! Output-directory abstraction and asset staging.
//!
//! The build writes into an [`OutputDir`], an injectable handle over the
//! output tree. Production uses [`FsOutputDir`]; unit tests use
//! [`MemOutputDir`] so both validators can be exercised without touching a
//! real filesystem.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

use crate::content::ContentModel;
use crate::{Error, Result};

/// Public path the favicon is always staged under, whether or not the model
/// references it.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// An immutable handle on the build output directory.
///
/// Paths are public paths (`/portada.jpg`), not OS paths. Implementations are
/// safe to share between the independent validator passes.
pub trait OutputDir: Send + Sync {
    /// Whether the output tree itself exists and can be read
    fn ready(&self) -> bool;

    /// Whether a file exists at the given public path
    fn exists(&self, public_path: &str) -> bool;

    /// Read the file at the given public path
    fn read(&self, public_path: &str) -> Result<Vec<u8>>;

    /// Write a file at the given public path, creating parent directories
    fn write(&self, public_path: &str, bytes: &[u8]) -> Result<()>;
}

/// Filesystem-backed output directory
pub struct FsOutputDir {
    root: PathBuf,
}

impl FsOutputDir {
    /// Wrap an existing (or not-yet-existing) directory without creating it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory if needed and wrap it
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, public_path: &str) -> PathBuf {
        self.root.join(public_path.trim_start_matches('/'))
    }
}

impl OutputDir for FsOutputDir {
    fn ready(&self) -> bool {
        self.root.is_dir()
    }

    fn exists(&self, public_path: &str) -> bool {
        self.resolve(public_path).is_file()
    }

    fn read(&self, public_path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(public_path))?)
    }

    fn write(&self, public_path: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(public_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// In-memory output directory for unit tests
#[derive(Default)]
pub struct MemOutputDir {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemOutputDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a staged file; used to simulate a corrupted output tree
    pub fn remove(&self, public_path: &str) {
        if let Ok(mut files) = self.files.lock() {
            files.remove(public_path);
        }
    }
}

impl OutputDir for MemOutputDir {
    fn ready(&self) -> bool {
        true
    }

    fn exists(&self, public_path: &str) -> bool {
        self.files
            .lock()
            .map(|f| f.contains_key(public_path))
            .unwrap_or(false)
    }

    fn read(&self, public_path: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|f| f.get(public_path).cloned())
            .ok_or_else(|| Error::Load(format!("no staged file at {}", public_path)))
    }

    fn write(&self, public_path: &str, bytes: &[u8]) -> Result<()> {
        if let Ok(mut files) = self.files.lock() {
            files.insert(public_path.to_string(), bytes.to_vec());
        }
        Ok(())
    }
}

/// Copies every asset the model references (plus the favicon) from a source
/// directory into the output directory under its public path.
///
/// A missing source file is a fatal build error, reported by logical name and
/// never retried. Copies are disjoint per asset and order-independent.
pub struct AssetResolver {
    source: PathBuf,
}

impl AssetResolver {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Stage all of the model's assets plus the always-required favicon
    pub fn stage(&self, model: &ContentModel, out: &dyn OutputDir) -> Result<()> {
        for asset in model.assets() {
            self.stage_one(&asset.logical_name, &asset.public_path, out)?;
        }
        self.stage_one("favicon", FAVICON_PATH, out)
    }

    fn stage_one(&self, logical_name: &str, public_path: &str, out: &dyn OutputDir) -> Result<()> {
        let src = self.source.join(public_path.trim_start_matches('/'));
        if !src.is_file() {
            return Err(Error::MissingAsset {
                logical_name: logical_name.to_string(),
                public_path: public_path.to_string(),
            });
        }
        let bytes = fs::read(&src)?;
        debug!("staging {} -> {} ({} bytes)", src.display(), public_path, bytes.len());
        out.write(public_path, &bytes)
    }
}
