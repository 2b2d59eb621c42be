//! Version and build identifiers read from packaging metadata

use std::fmt;

/// Release identity of the running application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub version: String,
    pub build: String,
}

impl AppInfo {
    pub fn new(version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build: build.into(),
        }
    }

    /// Identifiers baked in at compile time (`build.rs` provides the build number)
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"), env!("LIMON_BUILD"))
    }

    /// Caption shown under the What's New buttons, e.g. `v1.2.0 (7)`
    pub fn caption(&self) -> String {
        format!("v{} ({})", self.version, self.build)
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.version, self.build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_and_display() {
        let info = AppInfo::new("1.2.0", "7");
        assert_eq!(info.caption(), "v1.2.0 (7)");
        assert_eq!(info.to_string(), "1.2.0.7");
    }

    #[test]
    fn test_current_uses_package_version() {
        let info = AppInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.build.is_empty());
    }
}
