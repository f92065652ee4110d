//! Startup cleanup of old exports
//!
//! Only the top level of the export directory is scanned and only regular
//! files are considered. A file that can't be removed is logged and skipped;
//! the sweep always visits every candidate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::CleanupItemFailed;

/// Outcome of one sweep
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files that were deleted
    pub removed: Vec<PathBuf>,
    /// Files old enough to delete that could not be removed
    pub failed: Vec<CleanupItemFailed>,
    /// Regular files younger than the cutoff
    pub kept: usize,
}

/// Delete regular files in `dir` last modified more than `max_age` ago
pub fn cleanup_exports(dir: &Path, max_age: Duration) -> CleanupReport {
    sweep(dir, max_age, SystemTime::now(), |path| fs::remove_file(path))
}

/// [`cleanup_exports`] with an explicit clock and removal function
pub fn sweep<F>(dir: &Path, max_age: Duration, now: SystemTime, mut remove: F) -> CleanupReport
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut report = CleanupReport::default();

    if !dir.is_dir() {
        debug!(dir = %dir.display(), "export directory does not exist, nothing to clean");
        return report;
    }

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("cleanup: skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let modified = match entry.metadata().map_err(io::Error::from).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(path = %entry.path().display(), "cleanup: no modification time: {e}");
                continue;
            }
        };

        // Timestamps in the future count as fresh
        let is_expired = now
            .duration_since(modified)
            .map(|age| age > max_age)
            .unwrap_or(false);

        if !is_expired {
            report.kept += 1;
            continue;
        }

        let path = entry.into_path();
        match remove(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed old export");
                report.removed.push(path);
            }
            Err(source) => {
                let failure = CleanupItemFailed { path, source };
                warn!("cleanup: {failure}");
                report.failed.push(failure);
            }
        }
    }

    info!(
        dir = %dir.display(),
        removed = report.removed.len(),
        failed = report.failed.len(),
        kept = report.kept,
        "export cleanup finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn touch(dir: &Path, name: &str, age: Duration) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    #[test]
    fn test_removes_only_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = touch(dir.path(), "old.png", 10 * DAY);
        let fresh = touch(dir.path(), "fresh.png", 2 * DAY);
        let edge = touch(dir.path(), "six_days.png", 6 * DAY);

        let report = cleanup_exports(dir.path(), 7 * DAY);

        assert_eq!(report.removed, vec![old.clone()]);
        assert_eq!(report.kept, 2);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(edge.exists());
    }

    #[test]
    fn test_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let inner = touch(&nested, "inner.png", 30 * DAY);

        let report = cleanup_exports(dir.path(), 7 * DAY);

        assert!(report.removed.is_empty());
        assert!(inner.exists());
        assert!(nested.exists());
    }

    #[test]
    fn test_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png", 20 * DAY);
        let locked = touch(dir.path(), "locked.png", 20 * DAY);
        let c = touch(dir.path(), "c.png", 20 * DAY);

        let report = sweep(dir.path(), 7 * DAY, SystemTime::now(), |path| {
            if path.ends_with("locked.png") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"))
            } else {
                fs::remove_file(path)
            }
        });

        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, locked);
        assert!(!a.exists());
        assert!(!c.exists());
        assert!(locked.exists());
    }

    #[test]
    fn test_missing_dir_is_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = cleanup_exports(&dir.path().join("missing"), DAY);

        assert!(report.removed.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(report.kept, 0);
    }
}
