//! Host configuration.
//!
//! Environment variables choose where assets, the manifest and the save file
//! live; the manifest itself describes the game.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use underpass_assets::domain::catalog::{AssetCatalog, IMAGE_PREFIX};
use underpass_assets::domain::manifest::GameManifest;
use underpass_core::config::Timings;

use crate::error::AppError;
use crate::infrastructure::fs_loader::reports_duration;

/// Asset root and manifest name used when the environment is silent.
const DEFAULT_ASSET_ROOT: &str = "assets";
const MANIFEST_FILE: &str = "manifest.yaml";

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding `audio/` and `img/`.
    pub asset_root: PathBuf,
    /// Game manifest location.
    pub manifest_path: PathBuf,
    /// Save slot file; saves are kept in memory when absent.
    pub save_file: Option<PathBuf>,
    /// Overrides the manifest's frame interval.
    pub frame_ms: Option<u32>,
}

/// Everything the runtime is built from.
#[derive(Debug)]
pub struct GameSetup {
    /// Validated catalog.
    pub catalog: AssetCatalog,
    /// Timings with any environment override applied.
    pub timings: Timings,
}

impl RuntimeConfig {
    /// Reads `UNDERPASS_ASSET_ROOT`, `UNDERPASS_MANIFEST`,
    /// `UNDERPASS_SAVE_FILE` and `UNDERPASS_FRAME_MS`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `UNDERPASS_FRAME_MS` is not a positive
    /// integer.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `UNDERPASS_FRAME_MS` is not a positive
    /// integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let asset_root = PathBuf::from(
            lookup("UNDERPASS_ASSET_ROOT").unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string()),
        );
        let manifest_path = lookup("UNDERPASS_MANIFEST")
            .map_or_else(|| asset_root.join(MANIFEST_FILE), PathBuf::from);
        let save_file = lookup("UNDERPASS_SAVE_FILE").map(PathBuf::from);
        let frame_ms = lookup("UNDERPASS_FRAME_MS")
            .map(|raw| {
                raw.parse::<u32>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| {
                        AppError::Config(format!(
                            "UNDERPASS_FRAME_MS must be a positive integer, got {raw:?}"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self {
            asset_root,
            manifest_path,
            save_file,
            frame_ms,
        })
    }

    /// Reads the manifest, scans the image root if asked to, and builds the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the manifest or image root cannot be read,
    /// and `AppError::Manifest` if the manifest is invalid.
    pub fn load_game(&self) -> Result<GameSetup, AppError> {
        let text = fs::read_to_string(&self.manifest_path)?;
        let manifest = GameManifest::from_yaml(&text)?;

        let discovered = if manifest.scan_images {
            discover_images(&self.asset_root.join(IMAGE_PREFIX))?
        } else {
            Vec::new()
        };
        let catalog = manifest.to_catalog(&discovered)?;
        warn_unresolvable_loops(&catalog);

        let mut timings = manifest.timings;
        if let Some(frame_ms) = self.frame_ms {
            timings.frame_ms = frame_ms;
        }

        info!(
            manifest = %self.manifest_path.display(),
            assets = catalog.assets().len(),
            loops = catalog.loops().len(),
            "game manifest loaded"
        );
        Ok(GameSetup { catalog, timings })
    }
}

/// Loops with no `length_ms` take their length from the decoded base layer.
/// Returns, and logs, the keys of loops whose base has no source the loader
/// can read a duration from. Such loops are refused when queued.
pub fn warn_unresolvable_loops(catalog: &AssetCatalog) -> Vec<String> {
    let unresolvable: Vec<String> = catalog
        .loops()
        .iter()
        .filter(|def| def.length.is_none())
        .filter(|def| {
            !catalog
                .get(&def.base)
                .is_some_and(|base| base.extensions.iter().any(|ext| reports_duration(ext)))
        })
        .map(|def| def.key.clone())
        .collect();
    for key in &unresolvable {
        warn!(
            loop_key = %key,
            "loop has no length_ms and its base layer has no WAV source; it cannot start"
        );
    }
    unresolvable
}

/// Every file under `image_root`, as `/`-separated paths relative to it,
/// sorted. A missing directory yields nothing.
///
/// # Errors
///
/// Returns `AppError::Io` if a directory exists but cannot be listed.
pub fn discover_images(image_root: &Path) -> Result<Vec<String>, AppError> {
    let mut found = Vec::new();
    if image_root.is_dir() {
        walk(image_root, image_root, &mut found)?;
    } else {
        debug!(root = %image_root.display(), "no image root to scan");
    }
    found.sort();
    Ok(found)
}

fn walk(root: &Path, dir: &Path, found: &mut Vec<String>) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(root, &path, found)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            found.push(parts.join("/"));
        }
    }
    Ok(())
}
