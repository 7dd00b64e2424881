//! Export workflow around an external geometry writer.
//!
//! The writer ([`ModelSaver`]), the file chooser ([`PathRequester`]) and the
//! status display ([`StatusNotifier`]) are supplied by the caller. This module
//! resolves the chosen path, runs the save and reports the outcome with the
//! target's file name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, error, info};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "survey.kml";

/// Writes the processed model to `path`. Any failure is reported as-is.
pub trait ModelSaver {
    fn save(&self, path: &Path) -> Result<()>;
}

/// Receives one display string per finished export.
pub trait StatusNotifier {
    fn notify(&self, message: &str);
}

/// Asks the user where to export. `None` means the request was cancelled.
pub trait PathRequester {
    fn request_path(&self, initial_dir: Option<&Path>, initial_name: &str) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    pub last_export_folder: Option<PathBuf>,
}

impl ExportSettings {
    /// Resolves the chosen path. A bare file name lands in the last export
    /// folder.
    pub fn resolve_target(&self, chosen: &Path) -> PathBuf {
        let is_bare_name = chosen
            .parent()
            .is_none_or(|parent| parent.as_os_str().is_empty());
        match &self.last_export_folder {
            Some(folder) if is_bare_name => folder.join(chosen),
            _ => chosen.to_path_buf(),
        }
    }

    fn remember(&mut self, target: &Path) {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_export_folder = Some(parent.to_path_buf());
        }
    }
}

fn display_name(target: &Path) -> String {
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.display().to_string())
}

/// Asks `requester` for a target, saves through `saver` and tells `notifier`
/// how it went.
///
/// Returns `Ok(None)` when the request is cancelled; nothing is saved and no
/// notice goes out. The save error is returned to the caller after the
/// failure notice.
pub fn export(
    saver: &dyn ModelSaver,
    settings: &mut ExportSettings,
    requester: &dyn PathRequester,
    notifier: &dyn StatusNotifier,
) -> Result<Option<PathBuf>> {
    let Some(chosen) = requester.request_path(
        settings.last_export_folder.as_deref(),
        DEFAULT_EXPORT_FILE_NAME,
    ) else {
        debug!("Export cancelled");
        return Ok(None);
    };
    let target = settings.resolve_target(&chosen);
    settings.remember(&target);
    let name = display_name(&target);
    match saver.save(&target) {
        Ok(()) => {
            info!("Exported to {target:?}");
            notifier.notify(&format!("Export to '{name}' finished!"));
            Ok(Some(target))
        }
        Err(err) => {
            error!("Export to {target:?} failed: {err:#}");
            notifier.notify(&format!("Error during export to '{name}'"));
            Err(err).with_context(|| format!("Exporting to {target:?}"))
        }
    }
}

/// Saver for callers without a geometry writer configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSaver;

impl ModelSaver for UnsupportedSaver {
    fn save(&self, path: &Path) -> Result<()> {
        Err(anyhow!("No geometry writer configured for {path:?}"))
    }
}
