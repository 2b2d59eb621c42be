//! Per-install storage tree under the user document root
//!
//! Ten fixed category directories are created next to each other. Creation is
//! best-effort: a failure on one category is logged and the rest still run.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Logical storage categories, one directory each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageCategory {
    Cheats,
    Config,
    Log,
    Nand,
    Roms,
    Sdmc,
    Shaders,
    Sounds,
    States,
    Sysdata,
}

impl StorageCategory {
    pub const ALL: [StorageCategory; 10] = [
        Self::Cheats,
        Self::Config,
        Self::Log,
        Self::Nand,
        Self::Roms,
        Self::Sdmc,
        Self::Shaders,
        Self::Sounds,
        Self::States,
        Self::Sysdata,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Cheats => "cheats",
            Self::Config => "config",
            Self::Log => "log",
            Self::Nand => "nand",
            Self::Roms => "roms",
            Self::Sdmc => "sdmc",
            Self::Shaders => "shaders",
            Self::Sounds => "sounds",
            Self::States => "states",
            Self::Sysdata => "sysdata",
        }
    }
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Location of a category's directory under `root`
pub fn storage_path(root: &Path, category: StorageCategory) -> PathBuf {
    root.join(category.dir_name())
}

/// The two filesystem operations the bootstrapper needs
pub trait DirectoryFs {
    fn exists(&self, path: &Path) -> bool;

    /// Create exactly one directory; parents must already exist
    fn create_dir(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DirectoryFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }
}

/// Outcome of one bootstrap pass
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub created: Vec<StorageCategory>,
    pub existing: Vec<StorageCategory>,
    pub failed: Vec<(StorageCategory, io::Error)>,
}

impl BootstrapReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Make sure every category directory exists under `root`
pub fn ensure_storage_directories(root: &Path) -> BootstrapReport {
    ensure_storage_directories_with(&LocalFs, root)
}

pub fn ensure_storage_directories_with(fs: &dyn DirectoryFs, root: &Path) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    for category in StorageCategory::ALL {
        let path = storage_path(root, category);
        if fs.exists(&path) {
            report.existing.push(category);
            continue;
        }

        match fs.create_dir(&path) {
            Ok(()) => {
                log::debug!("Created {}", path.display());
                report.created.push(category);
            }
            Err(e) => {
                log::error!("Failed to create {}: {}", path.display(), e);
                report.failed.push((category, e));
            }
        }
    }

    log::info!(
        "Storage under {}: {} created, {} existing, {} failed",
        root.display(),
        report.created.len(),
        report.existing.len(),
        report.failed.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Wraps the real filesystem, counting and optionally failing creations
    #[derive(Default)]
    struct RecordingFs {
        created: RefCell<Vec<PathBuf>>,
        fail_on: Option<&'static str>,
    }

    impl DirectoryFs for RecordingFs {
        fn exists(&self, path: &Path) -> bool {
            LocalFs.exists(path)
        }

        fn create_dir(&self, path: &Path) -> io::Result<()> {
            self.created.borrow_mut().push(path.to_path_buf());
            if path.file_name().and_then(|n| n.to_str()) == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            LocalFs.create_dir(path)
        }
    }

    #[test]
    fn test_creates_all_ten_directories() {
        let dir = TempDir::new().unwrap();
        let report = ensure_storage_directories(dir.path());

        assert!(report.is_complete());
        assert_eq!(report.created.len(), 10);
        for category in StorageCategory::ALL {
            assert!(storage_path(dir.path(), category).is_dir(), "{}", category);
        }
    }

    #[test]
    fn test_second_run_performs_no_creations() {
        let dir = TempDir::new().unwrap();
        ensure_storage_directories(dir.path());

        let fs = RecordingFs::default();
        let report = ensure_storage_directories_with(&fs, dir.path());

        assert!(fs.created.borrow().is_empty());
        assert!(report.is_complete());
        assert!(report.created.is_empty());
        assert_eq!(report.existing.len(), 10);
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let fs = RecordingFs {
            fail_on: Some("nand"),
            ..Default::default()
        };
        let report = ensure_storage_directories_with(&fs, dir.path());

        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, StorageCategory::Nand);
        assert_eq!(report.created.len(), 9);
        assert!(storage_path(dir.path(), StorageCategory::Sysdata).is_dir());
    }

    #[test]
    fn test_creation_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("missing").join("Documents");
        let report = ensure_storage_directories(&root);

        assert_eq!(report.failed.len(), 10);
        assert!(!root.exists());
    }

    #[test]
    fn test_existing_subset_is_kept() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(storage_path(dir.path(), StorageCategory::Roms)).unwrap();
        std::fs::write(
            storage_path(dir.path(), StorageCategory::Roms).join("game.3ds"),
            b"rom",
        )
        .unwrap();

        let report = ensure_storage_directories(dir.path());
        assert_eq!(report.existing, vec![StorageCategory::Roms]);
        assert!(storage_path(dir.path(), StorageCategory::Roms)
            .join("game.3ds")
            .exists());
    }
}
