/// Persisting the point total between sessions.
///
/// ## File format:
///   The decimal ASCII representation of one non-negative integer.
///   No header, no key, no versioning. Surrounding whitespace is
///   tolerated on load.
///
/// Loading never fails (missing or corrupt → 0) and saving never fails
/// from the caller's point of view (errors are logged and dropped).

use std::io;
use std::path::{Path, PathBuf};

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Directory for relative data files (points, log).
pub fn save_dir() -> PathBuf {
    // 1. Exe directory (local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // System installs like /usr/games/ won't be writable
            let test_path = parent.join(".write_test_orefield");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/orefield");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Absolute paths are kept; relative ones land in `save_dir()`.
pub fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        save_dir().join(path)
    }
}

// ══════════════════════════════════════════════════════════════
// Store
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct PointsStore {
    path: PathBuf,
}

impl PointsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PointsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved point total, or 0 if absent/unreadable/unparseable.
    pub fn load(&self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match parse_points(&content) {
                Some(points) => points,
                None => {
                    log::warn!("{}: not a point total, starting from 0", self.path.display());
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("could not read {}: {e}", self.path.display());
                0
            }
        }
    }

    /// Overwrite the file with `points`. Failures are logged, not returned.
    pub fn save(&self, points: u64) {
        if let Err(e) = self.try_save(points) {
            log::warn!("error saving points to {}: {e}", self.path.display());
        }
    }

    /// Write `points` only if it differs from what was loaded.
    /// Returns whether a write was attempted.
    pub fn save_if_changed(&self, loaded: u64, points: u64) -> bool {
        if points == loaded {
            return false;
        }
        self.save(points);
        true
    }

    fn try_save(&self, points: u64) -> io::Result<()> {
        std::fs::write(&self.path, points.to_string())
    }
}

fn parse_points(content: &str) -> Option<u64> {
    content.trim().parse().ok()
}
