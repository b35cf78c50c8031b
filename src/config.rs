//! Fixed configuration tables and per-call engine options.
//!
//! The engine reads no configuration file. Which manifests count and how the
//! package manager is invoked are constants; only the knobs in
//! [`EngineOptions`] vary between calls.

use std::time::Duration;

/// Manifest files whose presence marks a Python dependency-management setup.
/// Checked in this order; contents are never parsed.
pub const MANIFEST_FILES: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
];

/// Package manager binary queried for the installed-package inventory.
pub const PACKAGE_MANAGER: &str = "pip";

/// Arguments that make the package manager print its inventory as JSON.
pub const PACKAGE_MANAGER_ARGS: &[&str] = &["list", "--format=json"];

/// Default bound on the package-manager query and the directory lookup.
pub const DEFAULT_PACKAGE_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest line accepted by the style checklist (PEP 8).
pub const MAX_LINE_LENGTH: usize = 79;

/// Label used for source units that did not come from a file.
pub const INLINE_LABEL: &str = "inline";

/// Options for a single [`crate::Engine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Upper bound for the package-manager query and directory lookup.
    pub package_query_timeout: Duration,
    /// Also report class methods that declare no parameters at all.
    pub report_receiverless_methods: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            package_query_timeout: DEFAULT_PACKAGE_QUERY_TIMEOUT,
            report_receiverless_methods: false,
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout applied to environment scanning.
    pub fn package_query_timeout(mut self, timeout: Duration) -> Self {
        self.package_query_timeout = timeout;
        self
    }

    /// Enable the `missing-receiver` detector.
    pub fn report_receiverless_methods(mut self, enabled: bool) -> Self {
        self.report_receiverless_methods = enabled;
        self
    }
}
